// Hand-crafted async HTTP client for the tracking upstream.
//
// One fixed endpoint, `POST { "code": … }`, `Authorization: Apikey …`.
// Transient upstream statuses (429/502/503/504) get exactly one retry
// after a fixed backoff; everything else fails immediately.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::{debug, warn};
use url::Url;

use crate::error::Error;
use crate::provider::TrackingProvider;
use crate::transport::TransportConfig;
use crate::types::TrackEnvelope;

/// Retries after the first attempt. The upstream contract allows at most
/// two attempts per code.
const TRANSIENT_RETRY_LIMIT: u32 = 1;

/// Fixed pause before the single retry.
const RETRY_BACKOFF: Duration = Duration::from_secs(1);

// ── Request shape ────────────────────────────────────────────────────

#[derive(Serialize)]
struct TrackRequest<'a> {
    code: &'a str,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the tracking upstream.
///
/// Holds a `reqwest::Client` with the credential baked in as a default
/// header, so every lookup is a plain POST to the fixed endpoint.
pub struct UpstreamClient {
    http: reqwest::Client,
    endpoint: Url,
}

impl UpstreamClient {
    /// Build from the endpoint URL, an API-key-style credential, and
    /// transport settings.
    ///
    /// The credential goes out verbatim as the `Authorization` header
    /// (the upstream expects `Apikey <token>`, not a standard scheme).
    pub fn new(
        endpoint: &str,
        credential: &SecretString,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        let mut auth_value =
            HeaderValue::from_str(credential.expose_secret()).map_err(|e| Error::Authentication {
                message: format!("invalid credential header value: {e}"),
            })?;
        auth_value.set_sensitive(true);
        headers.insert(reqwest::header::AUTHORIZATION, auth_value);

        let http = transport.build_client_with_headers(headers)?;
        let endpoint = Url::parse(endpoint)?;

        Ok(Self { http, endpoint })
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(endpoint: &str, http: reqwest::Client) -> Result<Self, Error> {
        let endpoint = Url::parse(endpoint)?;
        Ok(Self { http, endpoint })
    }

    // ── Single attempt ───────────────────────────────────────────────

    async fn send_track(&self, code: &str) -> Result<TrackEnvelope, Error> {
        let resp = self
            .http
            .post(self.endpoint.clone())
            .json(&TrackRequest { code })
            .send()
            .await?;

        let status = resp.status();
        if status.is_success() {
            let body = resp.text().await?;
            serde_json::from_str(&body).map_err(|e| {
                let preview = &body[..body.len().min(200)];
                Error::Deserialization {
                    message: format!("{e} (body preview: {preview:?})"),
                    body,
                }
            })
        } else {
            Err(parse_error(status, resp).await)
        }
    }
}

/// Turn a non-success response into an [`Error::Upstream`], keeping the
/// body for diagnostics when it is readable.
async fn parse_error(status: reqwest::StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let details: Option<serde_json::Value> = serde_json::from_str(&raw).ok();
    let message = details
        .as_ref()
        .and_then(|v| v.get("message"))
        .and_then(serde_json::Value::as_str)
        .map(str::to_owned)
        .unwrap_or_else(|| status.to_string());

    let details = details.or_else(|| {
        if raw.is_empty() {
            None
        } else {
            Some(serde_json::Value::String(raw))
        }
    });

    Error::Upstream {
        status: status.as_u16(),
        message,
        details,
    }
}

#[async_trait]
impl TrackingProvider for UpstreamClient {
    async fn track(&self, code: &str) -> Result<TrackEnvelope, Error> {
        let mut retries = 0;
        loop {
            debug!(code, attempt = retries + 1, "tracking lookup");
            match self.send_track(code).await {
                Ok(envelope) => return Ok(envelope),
                Err(err) if retries < TRANSIENT_RETRY_LIMIT && err.is_transient() => {
                    retries += 1;
                    warn!(
                        code,
                        status = ?err.status(),
                        "transient upstream failure, retrying after backoff"
                    );
                    tokio::time::sleep(RETRY_BACKOFF).await;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
