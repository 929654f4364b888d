// Wire types for the upstream tracking provider.
//
// The provider wraps every response in a small envelope whose payload is
// usually a JSON *string* (a serialized tracking document), occasionally an
// already-structured object. Fields use `#[serde(default)]` liberally
// because the upstream is inconsistent about field presence, and catch-all
// `extra` maps keep undocumented fields from breaking deserialization.

use serde::{Deserialize, Serialize};

/// Top-level response envelope from the tracking upstream.
///
/// ```json
/// { "carrier": "CARRIER_CORREIOS", "json": "{\"codObjeto\":…}" }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrackEnvelope {
    #[serde(default)]
    pub carrier: Option<String>,

    /// Serialized tracking payload. `None` or unparsable content means
    /// "no data for this code", not an error.
    #[serde(default)]
    pub json: Option<serde_json::Value>,

    /// Catch-all for undocumented envelope fields.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The tracking document carried inside [`TrackEnvelope::json`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrackingDocument {
    /// Object identifier as echoed by the carrier.
    #[serde(default, rename = "codObjeto")]
    pub cod_objeto: Option<String>,

    /// Movement history, newest and oldest in no guaranteed order.
    #[serde(default)]
    pub eventos: Vec<RawTrackingEvent>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// One provider-side movement event. Every field is optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTrackingEvent {
    #[serde(default, rename = "dtHrCriado")]
    pub dt_hr_criado: Option<RawTimestamp>,

    #[serde(default)]
    pub descricao: Option<String>,

    #[serde(default)]
    pub unidade: Option<RawUnit>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Creation-timestamp object: `{ "date": "2026-02-05 15:16:23.000000" }`.
///
/// The `date` string is ISO-like and lexicographically sortable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTimestamp {
    #[serde(default)]
    pub date: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// The postal unit an event originated from.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawUnit {
    #[serde(default)]
    pub tipo: Option<String>,

    #[serde(default)]
    pub endereco: Option<RawAddress>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Unit address: city plus two-letter state code.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawAddress {
    #[serde(default)]
    pub cidade: Option<String>,

    #[serde(default)]
    pub uf: Option<String>,

    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}
