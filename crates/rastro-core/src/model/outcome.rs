// ── Per-code and batch outcomes ──

use serde::{Deserialize, Serialize};

use super::record::NormalizedRecord;

/// What went wrong for one code. Mirrors the upstream failure when there
/// was one; synthetic for internal faults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackError {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl TrackError {
    /// An internal fault with no upstream status attached.
    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            status: None,
            details: None,
        }
    }
}

impl From<rastro_api::Error> for TrackError {
    fn from(err: rastro_api::Error) -> Self {
        match err {
            rastro_api::Error::Upstream {
                status,
                message,
                details,
            } => Self {
                message,
                status: Some(status),
                details,
            },
            other => Self {
                message: other.to_string(),
                status: other.status(),
                details: None,
            },
        }
    }
}

/// Tagged outcome for one tracking code.
///
/// `data` is always present on the wire -- `null` both for failures and
/// for the deliberate "provider had no payload" success case. `error` is
/// populated exactly when `ok` is false.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackResult {
    pub code: String,
    pub ok: bool,
    pub data: Option<NormalizedRecord>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<TrackError>,
}

impl TrackResult {
    pub fn success(code: String, data: Option<NormalizedRecord>) -> Self {
        Self {
            code,
            ok: true,
            data,
            error: None,
        }
    }

    pub fn failure(code: String, error: TrackError) -> Self {
        Self {
            code,
            ok: false,
            data: None,
            error: Some(error),
        }
    }
}

/// Aggregate of one batch call: counts plus the per-code results in the
/// same order as the deduplicated input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchSummary {
    pub requested: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub results: Vec<TrackResult>,
}

impl BatchSummary {
    /// Fold ordered per-code outcomes into a summary. Pure; order is
    /// passed through untouched.
    pub fn from_results(results: Vec<TrackResult>) -> Self {
        let succeeded = results.iter().filter(|r| r.ok).count();
        Self {
            requested: results.len(),
            succeeded,
            failed: results.len() - succeeded,
            results,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_counts_add_up() {
        let results = vec![
            TrackResult::success("A".into(), None),
            TrackResult::failure("B".into(), TrackError::internal("boom")),
            TrackResult::success("C".into(), None),
        ];

        let summary = BatchSummary::from_results(results);

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.succeeded + summary.failed, summary.requested);
        assert_eq!(summary.results.len(), summary.requested);
    }

    #[test]
    fn empty_batch_summarizes_to_zeroes() {
        let summary = BatchSummary::from_results(Vec::new());
        assert_eq!(summary.requested, 0);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 0);
        assert!(summary.results.is_empty());
    }

    #[test]
    fn failure_serializes_error_and_null_data() {
        let result = TrackResult::failure(
            "NB1".into(),
            TrackError {
                message: "Not found".into(),
                status: Some(404),
                details: None,
            },
        );

        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["ok"], serde_json::json!(false));
        assert_eq!(value["data"], serde_json::Value::Null);
        assert_eq!(value["error"]["status"], serde_json::json!(404));
        // Absent optional error fields are omitted, not null.
        assert!(value["error"].get("details").is_none());
    }

    #[test]
    fn null_data_success_keeps_data_key() {
        let result = TrackResult::success("NB2".into(), None);
        let value = serde_json::to_value(&result).expect("serializes");
        assert_eq!(value["ok"], serde_json::json!(true));
        assert!(value.get("data").is_some());
        assert_eq!(value["data"], serde_json::Value::Null);
        assert!(value.get("error").is_none());
    }
}
