// ── Normalized tracking record ──

use serde::{Deserialize, Serialize};

/// One normalized movement event.
///
/// Every provider-sourced field is optional; absence serializes as an
/// explicit `null`, never as a missing key. `from_text` is derived, never
/// provider-supplied, and is present exactly when `unit_type` is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingEvent {
    /// ISO-like timestamp string, lexicographically sortable.
    pub date: Option<String>,
    pub description: Option<String>,
    pub unit_type: Option<String>,
    pub city: Option<String>,
    pub uf: Option<String>,
    /// Human-readable origin label: `"<unitType>, <city> - <uf>"`, or just
    /// the unit type when the address is incomplete.
    pub from_text: Option<String>,
}

/// Normalized record for one tracking code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NormalizedRecord {
    /// Object identifier as echoed by the carrier, if present.
    pub code: Option<String>,
    pub carrier: Option<String>,
    /// Date of the newest event, or `null` when there are none.
    pub last_update: Option<String>,
    /// Events ordered newest-first; undated events sink to the end.
    pub events: Vec<TrackingEvent>,
}
