// Simulated tracking provider.
//
// Stands in for the upstream when the service runs without network
// access: a random delay in [500ms, 1500ms), a 10% chance of a
// synthetic status-500 failure, otherwise a schema-correct envelope.
// The payload is serialized to a JSON string exactly as the real
// upstream sends it, so the normalizer downstream cannot tell the
// difference.

use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use tracing::debug;

use crate::error::Error;
use crate::provider::TrackingProvider;
use crate::types::TrackEnvelope;

const MIN_DELAY_MS: u64 = 500;
const MAX_DELAY_MS: u64 = 1500;
const FAILURE_RATE: f64 = 0.10;

/// Tracking provider that fabricates envelopes instead of calling out.
#[derive(Debug, Clone, Copy, Default)]
pub struct SimulatedProvider;

impl SimulatedProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl TrackingProvider for SimulatedProvider {
    async fn track(&self, code: &str) -> Result<TrackEnvelope, Error> {
        // rand's thread-local RNG is not Send; sample before the await.
        let (delay_ms, fail) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(MIN_DELAY_MS..MAX_DELAY_MS),
                rng.gen_bool(FAILURE_RATE),
            )
        };

        debug!(code, delay_ms, fail, "simulated lookup");
        tokio::time::sleep(Duration::from_millis(delay_ms)).await;

        if fail {
            return Err(Error::Upstream {
                status: 500,
                message: "Simulated failure".into(),
                details: Some(serde_json::Value::String(
                    "This is a mock error for testing purposes.".into(),
                )),
            });
        }

        Ok(synthetic_envelope(code))
    }
}

/// A single posted-object event for the given code, stamped now.
fn synthetic_envelope(code: &str) -> TrackEnvelope {
    let posted_at = Utc::now().format("%Y-%m-%d %H:%M:%S%.6f").to_string();
    let payload = serde_json::json!({
        "codObjeto": code,
        "eventos": [{
            "dtHrCriado": { "date": posted_at },
            "descricao": "Objeto postado",
            "unidade": {
                "tipo": "Agência dos Correios",
                "endereco": { "cidade": "BELO HORIZONTE", "uf": "MG" }
            }
        }]
    });

    TrackEnvelope {
        carrier: Some("CARRIER_CORREIOS".into()),
        json: Some(serde_json::Value::String(payload.to_string())),
        extra: serde_json::Map::new(),
    }
}
