use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::errors::AppError;
use crate::models::{RecommendationsResponse, ResultSetState, SearchMessage, SearchQuery};
use crate::services::backend::RecommendationSource;

/// Owns the search form's result state and issues recommendation requests.
///
/// Every dispatched search takes a sequence token. Only the completion holding
/// the latest token is applied; anything older is dropped.
pub struct QueryController {
    source: Arc<dyn RecommendationSource>,
    state: Mutex<ResultSetState>,
    latest: AtomicU64,
}

impl QueryController {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            source,
            state: Mutex::new(ResultSetState::default()),
            latest: AtomicU64::new(0),
        }
    }

    pub fn snapshot(&self) -> ResultSetState {
        self.lock_state().clone()
    }

    pub async fn submit(&self, service: &str, neighborhood: &str) -> ResultSetState {
        let query = match SearchQuery::new(service, neighborhood) {
            Ok(q) => q,
            Err(_) => {
                let mut state = self.lock_state();
                state.message = Some(SearchMessage::MissingInput);
                return state.clone();
            }
        };

        let token = self.latest.fetch_add(1, Ordering::SeqCst) + 1;
        {
            let _in_flight = InFlight::begin(self, token);

            tracing::info!(
                service = %query.service,
                neighborhood = %query.neighborhood,
                token,
                "searching for providers"
            );

            let outcome = self.source.recommendations(&query).await;
            self.apply(token, &query, outcome);
        }

        self.snapshot()
    }

    fn apply(
        &self,
        token: u64,
        query: &SearchQuery,
        outcome: Result<RecommendationsResponse, AppError>,
    ) {
        let mut state = self.lock_state();
        if self.latest.load(Ordering::SeqCst) != token {
            tracing::debug!(token, "discarding stale search response");
            return;
        }

        match outcome {
            Ok(resp) => {
                let count = resp.providers.len();
                tracing::info!(count, "search completed");
                state.providers = resp.providers;
                state.error = None;
                state.message = Some(SearchMessage::for_results(query, count));
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch recommendations");
                state.providers.clear();
                state.message = None;
                state.error = Some(format!(
                    "Failed to fetch recommendations: {}",
                    fetch_cause(&e)
                ));
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, ResultSetState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// The backend's own wording for a failed fetch, without the error-kind prefix.
fn fetch_cause(e: &AppError) -> String {
    match e {
        AppError::Transport(cause) | AppError::DataShape(cause) => cause.clone(),
        other => other.to_string(),
    }
}

/// Holds the `loading` flag for one dispatched search and releases it on drop,
/// unless a newer search has taken ownership of the flag in the meantime.
struct InFlight<'a> {
    controller: &'a QueryController,
    token: u64,
}

impl<'a> InFlight<'a> {
    fn begin(controller: &'a QueryController, token: u64) -> Self {
        let mut state = controller.lock_state();
        state.loading = true;
        state.error = None;
        state.message = None;
        Self { controller, token }
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        if self.controller.latest.load(Ordering::SeqCst) == self.token {
            self.controller.lock_state().loading = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::AtomicUsize;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::sync::Notify;

    use super::*;
    use crate::models::{CatalogOptions, Provider};

    fn provider(rank: u32, name: &str) -> Provider {
        serde_json::from_value(serde_json::json!({
            "id": rank,
            "rank": rank,
            "name": name,
            "service_type": "plumber",
            "neighborhood": "downtown",
            "contact": "555-0100",
            "rating": 4.5,
            "recommendation_strength": "Strongly Recommended"
        }))
        .unwrap()
    }

    struct FixedSource {
        result: Result<Vec<Provider>, String>,
        calls: AtomicUsize,
    }

    impl FixedSource {
        fn ok(providers: Vec<Provider>) -> Arc<Self> {
            Arc::new(Self {
                result: Ok(providers),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(msg: &str) -> Arc<Self> {
            Arc::new(Self {
                result: Err(msg.to_string()),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl RecommendationSource for FixedSource {
        async fn recommendations(
            &self,
            _query: &SearchQuery,
        ) -> Result<RecommendationsResponse, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.result {
                Ok(providers) => Ok(RecommendationsResponse {
                    providers: providers.clone(),
                }),
                Err(msg) => Err(AppError::Transport(msg.clone())),
            }
        }

        async fn options(&self) -> Result<CatalogOptions, AppError> {
            Err(AppError::Transport("unused".to_string()))
        }
    }

    #[tokio::test]
    async fn test_blank_input_sends_no_request() {
        let source = FixedSource::ok(vec![provider(1, "Ace")]);
        let controller = QueryController::new(source.clone());

        let state = controller.submit("", "Downtown").await;
        assert_eq!(
            state.message.unwrap().to_string(),
            "Please enter both service type and neighborhood"
        );
        let state = controller.submit("Plumber", "   ").await;
        assert_eq!(state.message, Some(SearchMessage::MissingInput));
        assert!(!state.loading);
        assert_eq!(source.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_found_message_counts_providers() {
        let source = FixedSource::ok(vec![
            provider(1, "Ace"),
            provider(2, "Best"),
            provider(3, "Cheap"),
        ]);
        let controller = QueryController::new(source);

        let state = controller.submit(" Plumber ", "Downtown").await;
        assert_eq!(state.providers.len(), 3);
        assert_eq!(
            state.message.unwrap().to_string(),
            "Found 3 providers for Plumber in Downtown"
        );
        assert!(state.error.is_none());
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_empty_result_message() {
        let controller = QueryController::new(FixedSource::ok(vec![]));
        let state = controller.submit("Plumber", "Downtown").await;
        assert!(state.providers.is_empty());
        assert_eq!(
            state.message.unwrap().to_string(),
            "No providers found for Plumber in Downtown"
        );
    }

    #[tokio::test]
    async fn test_transport_failure_clears_providers() {
        let ok = QueryController::new(FixedSource::ok(vec![provider(1, "Ace")]));
        ok.submit("Plumber", "Downtown").await;

        let controller = QueryController::new(FixedSource::failing("API error: 500"));
        controller.lock_state().providers = ok.snapshot().providers;

        let state = controller.submit("Plumber", "Downtown").await;
        assert!(state.providers.is_empty());
        assert_eq!(
            state.error.as_deref(),
            Some("Failed to fetch recommendations: API error: 500")
        );
        assert!(state.message.is_none());
        assert!(!state.loading);
    }

    /// First call parks until released; later calls answer immediately.
    struct GatedSource {
        gate: Notify,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecommendationSource for GatedSource {
        async fn recommendations(
            &self,
            query: &SearchQuery,
        ) -> Result<RecommendationsResponse, AppError> {
            if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
                self.gate.notified().await;
            }
            Ok(RecommendationsResponse {
                providers: vec![provider(1, &query.service)],
            })
        }

        async fn options(&self) -> Result<CatalogOptions, AppError> {
            Ok(CatalogOptions::default())
        }
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let source = Arc::new(GatedSource {
            gate: Notify::new(),
            calls: AtomicUsize::new(0),
        });
        let controller = Arc::new(QueryController::new(source.clone()));

        let slow = {
            let controller = Arc::clone(&controller);
            tokio::spawn(async move { controller.submit("Electrician", "Downtown").await })
        };
        while source.calls.load(Ordering::SeqCst) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        assert!(controller.snapshot().loading);

        let fresh = controller.submit("Plumber", "Downtown").await;
        assert_eq!(fresh.providers[0].name, "Plumber");
        assert!(!fresh.loading);

        source.gate.notify_one();
        slow.await.unwrap();

        let state = controller.snapshot();
        assert_eq!(state.providers[0].name, "Plumber");
        assert_eq!(
            state.message.unwrap().to_string(),
            "Found 1 providers for Plumber in Downtown"
        );
        assert!(!state.loading);
    }
}
