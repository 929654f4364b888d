// ── Batch dispatch ──
//
// One task per unique code, capped by a counting semaphore, joined in
// input order. A code's failure -- upstream error or a panicked task --
// is contained in its own TrackResult; the batch always settles every
// code before returning.

use std::sync::Arc;

use indexmap::IndexSet;
use tokio::sync::Semaphore;
use tracing::{debug, info, warn};

use rastro_api::{SimulatedProvider, TrackingProvider, TransportConfig, UpstreamClient};

use crate::config::TrackerConfig;
use crate::convert;
use crate::error::CoreError;
use crate::model::{BatchSummary, TrackError, TrackResult};

/// Collapse a code list to unique codes, keeping first-seen order.
pub fn dedupe_codes(codes: &[String]) -> Vec<String> {
    codes
        .iter()
        .cloned()
        .collect::<IndexSet<String>>()
        .into_iter()
        .collect()
}

/// Runs batches of tracking lookups through a [`TrackingProvider`].
///
/// All state is request-scoped: the tracker itself only holds the
/// provider and the concurrency ceiling, and each `track_batch` call
/// builds its own limiter and result buffers.
pub struct BatchTracker {
    provider: Arc<dyn TrackingProvider>,
    concurrency: usize,
}

impl BatchTracker {
    /// Build from an explicit provider. `concurrency` is clamped to 1+.
    pub fn new(provider: Arc<dyn TrackingProvider>, concurrency: usize) -> Self {
        Self {
            provider,
            concurrency: concurrency.max(1),
        }
    }

    /// Factory: pick the provider variant from config and wire it in.
    ///
    /// Real mode requires a credential; simulation mode needs nothing.
    pub fn from_config(config: &TrackerConfig) -> Result<Self, CoreError> {
        let provider: Arc<dyn TrackingProvider> = if config.simulation {
            Arc::new(SimulatedProvider::new())
        } else {
            let credential = config.credential.as_ref().ok_or_else(|| CoreError::Config {
                message: "upstream credential is required outside simulation mode".into(),
            })?;
            let transport = TransportConfig {
                timeout: config.timeout,
            };
            Arc::new(UpstreamClient::new(
                config.upstream_url.as_str(),
                credential,
                &transport,
            )?)
        };

        Ok(Self::new(provider, config.concurrency))
    }

    /// Run one batch: dedupe, fan out under the concurrency cap, and
    /// aggregate once every lookup has settled.
    ///
    /// Results come back in deduplicated input order no matter which
    /// lookups finish first. The call never fails; per-code failures
    /// land in their own `TrackResult`.
    pub async fn track_batch(&self, codes: &[String]) -> BatchSummary {
        let codes = dedupe_codes(codes);
        debug!(
            requested = codes.len(),
            concurrency = self.concurrency,
            "dispatching batch"
        );

        let limiter = Arc::new(Semaphore::new(self.concurrency));
        let mut handles = Vec::with_capacity(codes.len());
        for code in &codes {
            let limiter = Arc::clone(&limiter);
            let provider = Arc::clone(&self.provider);
            let code = code.clone();
            handles.push(tokio::spawn(async move {
                let _permit = limiter
                    .acquire_owned()
                    .await
                    .expect("limiter is never closed");
                track_one(provider.as_ref(), &code).await
            }));
        }

        // Join in input order; completion order is irrelevant to the output.
        let mut results = Vec::with_capacity(codes.len());
        for (handle, code) in handles.into_iter().zip(codes) {
            let result = match handle.await {
                Ok(result) => result,
                Err(err) => {
                    warn!(code, error = %err, "tracking task aborted");
                    TrackResult::failure(
                        code,
                        TrackError::internal(format!("tracking task aborted: {err}")),
                    )
                }
            };
            results.push(result);
        }

        let summary = BatchSummary::from_results(results);
        info!(
            requested = summary.requested,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "batch complete"
        );
        summary
    }
}

async fn track_one(provider: &dyn TrackingProvider, code: &str) -> TrackResult {
    match provider.track(code).await {
        Ok(envelope) => {
            TrackResult::success(code.to_owned(), convert::normalize_envelope(&envelope))
        }
        Err(err) => {
            warn!(code, status = ?err.status(), "tracking lookup failed");
            TrackResult::failure(code.to_owned(), TrackError::from(err))
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::{HashMap, HashSet};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;

    use rastro_api::types::TrackEnvelope;

    use super::*;

    /// Scripted provider: per-code latency and failure, plus counters
    /// for total invocations and the high-water mark of concurrent
    /// in-flight lookups.
    #[derive(Default)]
    struct ScriptedProvider {
        delays_ms: HashMap<String, u64>,
        failing: HashSet<String>,
        calls: AtomicUsize,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    impl ScriptedProvider {
        fn with_delays(delays: &[(&str, u64)]) -> Self {
            Self {
                delays_ms: delays
                    .iter()
                    .map(|(code, ms)| ((*code).to_owned(), *ms))
                    .collect(),
                ..Self::default()
            }
        }

        fn failing_on(mut self, codes: &[&str]) -> Self {
            self.failing = codes.iter().map(|c| (*c).to_owned()).collect();
            self
        }
    }

    fn empty_envelope() -> TrackEnvelope {
        TrackEnvelope {
            carrier: Some("CARRIER_CORREIOS".into()),
            json: Some(serde_json::Value::String(
                serde_json::json!({ "eventos": [] }).to_string(),
            )),
            extra: serde_json::Map::new(),
        }
    }

    #[async_trait]
    impl TrackingProvider for ScriptedProvider {
        async fn track(&self, code: &str) -> Result<TrackEnvelope, rastro_api::Error> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            let delay = self.delays_ms.get(code).copied().unwrap_or(10);
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);

            if self.failing.contains(code) {
                Err(rastro_api::Error::Upstream {
                    status: 404,
                    message: "Not found".into(),
                    details: None,
                })
            } else {
                Ok(empty_envelope())
            }
        }
    }

    /// Provider that dies mid-lookup; the batch must survive it.
    struct PanickingProvider;

    #[async_trait]
    impl TrackingProvider for PanickingProvider {
        async fn track(&self, code: &str) -> Result<TrackEnvelope, rastro_api::Error> {
            if code == "BAD" {
                panic!("lookup blew up");
            }
            Ok(empty_envelope())
        }
    }

    fn codes(list: &[&str]) -> Vec<String> {
        list.iter().map(|c| (*c).to_owned()).collect()
    }

    #[test]
    fn dedupe_keeps_first_seen_order() {
        let deduped = dedupe_codes(&codes(&["B", "A", "B", "C", "A"]));
        assert_eq!(deduped, codes(&["B", "A", "C"]));
    }

    #[test]
    fn dedupe_of_empty_list_is_empty() {
        assert!(dedupe_codes(&[]).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn results_follow_input_order_despite_latency() {
        // First code is the slowest; it must still come back first.
        let provider = ScriptedProvider::with_delays(&[("A", 900), ("B", 5), ("C", 50)]);
        let tracker = BatchTracker::new(Arc::new(provider), 3);

        let summary = tracker.track_batch(&codes(&["A", "B", "C"])).await;

        let order: Vec<&str> = summary.results.iter().map(|r| r.code.as_str()).collect();
        assert_eq!(order, vec!["A", "B", "C"]);
        assert_eq!(summary.succeeded, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn duplicates_collapse_to_one_lookup() {
        let provider = Arc::new(ScriptedProvider::default());
        let tracker = BatchTracker::new(Arc::clone(&provider) as Arc<dyn TrackingProvider>, 4);

        let summary = tracker.track_batch(&codes(&["X", "Y", "X", "X"])).await;

        assert_eq!(summary.requested, 2);
        assert_eq!(summary.results.len(), 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn one_failure_never_aborts_the_batch() {
        let provider = ScriptedProvider::default().failing_on(&["B"]);
        let tracker = BatchTracker::new(Arc::new(provider), 2);

        let summary = tracker.track_batch(&codes(&["A", "B", "C"])).await;

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let failed = &summary.results[1];
        assert_eq!(failed.code, "B");
        assert!(!failed.ok);
        let error = failed.error.as_ref().expect("failed result carries error");
        assert_eq!(error.status, Some(404));
        assert!(summary.results[0].ok);
        assert!(summary.results[2].ok);
    }

    #[tokio::test(start_paused = true)]
    async fn all_failures_still_account_for_every_code() {
        let provider = ScriptedProvider::default().failing_on(&["A", "B", "C"]);
        let tracker = BatchTracker::new(Arc::new(provider), 2);

        let summary = tracker.track_batch(&codes(&["A", "B", "C"])).await;

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.succeeded, 0);
        assert_eq!(summary.failed, 3);
        assert!(summary.results.iter().all(|r| !r.ok));
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_lookups_never_exceed_the_cap() {
        let provider = Arc::new(ScriptedProvider::with_delays(&[
            ("A", 50),
            ("B", 50),
            ("C", 50),
            ("D", 50),
            ("E", 50),
            ("F", 50),
        ]));
        let tracker = BatchTracker::new(Arc::clone(&provider) as Arc<dyn TrackingProvider>, 2);

        tracker
            .track_batch(&codes(&["A", "B", "C", "D", "E", "F"]))
            .await;

        assert!(provider.max_in_flight.load(Ordering::SeqCst) <= 2);
        assert_eq!(provider.calls.load(Ordering::SeqCst), 6);
    }

    #[tokio::test(start_paused = true)]
    async fn cap_of_one_runs_sequentially() {
        let provider = Arc::new(ScriptedProvider::with_delays(&[
            ("A", 30),
            ("B", 30),
            ("C", 30),
        ]));
        let tracker = BatchTracker::new(Arc::clone(&provider) as Arc<dyn TrackingProvider>, 1);

        tracker.track_batch(&codes(&["A", "B", "C"])).await;

        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn panicking_lookup_becomes_a_failed_result() {
        let tracker = BatchTracker::new(Arc::new(PanickingProvider), 2);

        let summary = tracker.track_batch(&codes(&["A", "BAD", "C"])).await;

        assert_eq!(summary.requested, 3);
        assert_eq!(summary.succeeded, 2);
        assert_eq!(summary.failed, 1);

        let aborted = &summary.results[1];
        assert_eq!(aborted.code, "BAD");
        assert!(!aborted.ok);
        assert!(
            aborted
                .error
                .as_ref()
                .expect("aborted result carries error")
                .message
                .contains("aborted")
        );
    }

    #[tokio::test]
    async fn empty_batch_returns_empty_summary() {
        let tracker = BatchTracker::new(Arc::new(ScriptedProvider::default()), 2);
        let summary = tracker.track_batch(&[]).await;
        assert_eq!(summary.requested, 0);
        assert!(summary.results.is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn zero_concurrency_is_clamped_to_one() {
        let provider = Arc::new(ScriptedProvider::default());
        let tracker = BatchTracker::new(Arc::clone(&provider) as Arc<dyn TrackingProvider>, 0);

        let summary = tracker.track_batch(&codes(&["A", "B"])).await;

        assert_eq!(summary.succeeded, 2);
        assert_eq!(provider.max_in_flight.load(Ordering::SeqCst), 1);
    }
}
