//! HTTP route definitions and handlers.
//!
//! The boundary owns request validation: anything malformed is rejected
//! with a structured 400 before the core ever sees it. The batch handler
//! itself cannot fail -- the core always returns a full summary.

use std::sync::Arc;

use axum::{
    Json, Router,
    async_trait,
    extract::{FromRequest, Request, State},
    http::StatusCode,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use tower_http::limit::RequestBodyLimitLayer;
use tracing::info;

use rastro_core::BatchSummary;

use crate::state::AppState;

/// Default request body size limit (1MB).
pub const DEFAULT_BODY_LIMIT: usize = 1024 * 1024;

// ── Error shape ──────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    pub message: String,
}

impl ApiError {
    fn validation(message: impl Into<String>) -> Self {
        Self {
            error: "validation_error".into(),
            message: message.into(),
        }
    }
}

type ApiRejection = (StatusCode, Json<ApiError>);

fn bad_request(message: impl Into<String>) -> ApiRejection {
    (StatusCode::BAD_REQUEST, Json(ApiError::validation(message)))
}

// ── JSON extractor ───────────────────────────────────────────────────

/// JSON extractor returning 400 Bad Request instead of 422 for
/// deserialization errors, so malformed bodies and invalid field types
/// get the same status as semantic validation failures. 413 for body
/// limit overruns is preserved.
pub struct JsonBadRequest<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBadRequest<T>
where
    T: serde::de::DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiRejection;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(JsonBadRequest(value)),
            Err(rejection) => {
                let status = if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
                    StatusCode::PAYLOAD_TOO_LARGE
                } else {
                    StatusCode::BAD_REQUEST
                };
                Err((status, Json(ApiError::validation(rejection.body_text()))))
            }
        }
    }
}

// ── Router ───────────────────────────────────────────────────────────

/// Build the application router with the default body limit.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/track/batch", post(track_batch))
        .route("/api/health", get(health))
        .layer(RequestBodyLimitLayer::new(DEFAULT_BODY_LIMIT))
        .with_state(state)
}

// ── Handlers ─────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct BatchRequest {
    codes: Vec<String>,
}

async fn track_batch(
    State(state): State<Arc<AppState>>,
    JsonBadRequest(req): JsonBadRequest<BatchRequest>,
) -> Result<Json<BatchSummary>, ApiRejection> {
    if req.codes.is_empty() || req.codes.len() > state.max_codes {
        return Err(bad_request(format!(
            "codes must be an array with 1 to {} items",
            state.max_codes
        )));
    }
    if req.codes.iter().any(|code| code.is_empty()) {
        return Err(bad_request("each code must be a non-empty string"));
    }

    info!(codes = req.codes.len(), "received batch request");
    let summary = state.tracker.track_batch(&req.codes).await;
    info!(
        succeeded = summary.succeeded,
        failed = summary.failed,
        "batch processed"
    );

    Ok(Json(summary))
}

async fn health(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "simulation": state.simulation,
    }))
}
