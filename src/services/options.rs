use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::sync::OnceCell;

use crate::models::options::FALLBACK_ADVISORY;
use crate::models::{CatalogOptions, OptionsState};
use crate::services::backend::RecommendationSource;

/// Loads the service-type and neighbourhood suggestions once per activation.
pub struct OptionsLoader {
    source: Arc<dyn RecommendationSource>,
    state: Mutex<OptionsState>,
    activated: OnceCell<()>,
}

impl OptionsLoader {
    pub fn new(source: Arc<dyn RecommendationSource>) -> Self {
        Self {
            source,
            state: Mutex::new(OptionsState::default()),
            activated: OnceCell::new(),
        }
    }

    pub fn snapshot(&self) -> OptionsState {
        self.lock_state().clone()
    }

    /// Fetches the catalog on the first call. Later and concurrent calls wait for
    /// that single fetch and return its outcome.
    pub async fn activate(&self) -> OptionsState {
        self.activated.get_or_init(|| self.load()).await;
        self.snapshot()
    }

    async fn load(&self) {
        let (options, advisory) = match self.source.options().await {
            Ok(catalog) => {
                tracing::info!(
                    service_types = catalog.service_types.len(),
                    neighbourhoods = catalog.neighbourhoods.len(),
                    "loaded options catalog"
                );
                (normalize(catalog), None)
            }
            Err(e) => {
                tracing::warn!(error = %e, "options catalog unavailable, using defaults");
                (CatalogOptions::fallback(), Some(FALLBACK_ADVISORY.to_string()))
            }
        };

        let mut state = self.lock_state();
        state.service_types = options.service_types;
        state.neighbourhoods = options.neighbourhoods;
        state.advisory = advisory;
        state.loaded = true;
    }

    fn lock_state(&self) -> MutexGuard<'_, OptionsState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

fn normalize(catalog: CatalogOptions) -> CatalogOptions {
    CatalogOptions {
        service_types: catalog.service_types.iter().map(|s| title_case(s)).collect(),
        neighbourhoods: catalog.neighbourhoods.iter().map(|s| title_case(s)).collect(),
    }
}

pub fn title_case(s: &str) -> String {
    s.split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(s: &str) -> String {
    let mut c = s.chars();
    match c.next() {
        None => String::new(),
        Some(f) => f.to_uppercase().to_string() + &c.as_str().to_lowercase(),
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;

    use super::*;
    use crate::errors::AppError;
    use crate::models::{RecommendationsResponse, SearchQuery};

    struct CatalogSource {
        catalog: Option<CatalogOptions>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl RecommendationSource for CatalogSource {
        async fn recommendations(
            &self,
            _query: &SearchQuery,
        ) -> Result<RecommendationsResponse, AppError> {
            Ok(RecommendationsResponse::default())
        }

        async fn options(&self) -> Result<CatalogOptions, AppError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.catalog
                .clone()
                .ok_or_else(|| AppError::DataShape("missing field `service_types`".to_string()))
        }
    }

    #[test]
    fn test_title_case() {
        assert_eq!(title_case("plumber"), "Plumber");
        assert_eq!(title_case("west side"), "West Side");
        assert_eq!(title_case("  NORTH   hills "), "North Hills");
        assert_eq!(title_case(""), "");
    }

    #[tokio::test]
    async fn test_empty_before_activation() {
        let loader = OptionsLoader::new(Arc::new(CatalogSource {
            catalog: None,
            calls: AtomicUsize::new(0),
        }));
        let state = loader.snapshot();
        assert!(state.service_types.is_empty());
        assert!(state.neighbourhoods.is_empty());
        assert!(!state.loaded);
    }

    #[tokio::test]
    async fn test_activation_normalizes_catalog() {
        let source = Arc::new(CatalogSource {
            catalog: Some(CatalogOptions {
                service_types: vec!["auto repair".to_string(), "plumber".to_string()],
                neighbourhoods: vec!["west side".to_string()],
            }),
            calls: AtomicUsize::new(0),
        });
        let loader = OptionsLoader::new(source.clone());

        let state = loader.activate().await;
        assert_eq!(state.service_types, vec!["Auto Repair", "Plumber"]);
        assert_eq!(state.neighbourhoods, vec!["West Side"]);
        assert!(state.advisory.is_none());
        assert!(state.loaded);

        loader.activate().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_failure_uses_fallback() {
        let source = Arc::new(CatalogSource {
            catalog: None,
            calls: AtomicUsize::new(0),
        });
        let loader = OptionsLoader::new(source.clone());

        let state = loader.activate().await;
        assert_eq!(
            state.service_types,
            vec!["Plumber", "Electrician", "Gardener", "Auto", "Handyman", "Cleaner", "Locksmith"]
        );
        assert_eq!(
            state.neighbourhoods,
            vec!["Reading", "Downtown", "West Side", "North Hills"]
        );
        assert_eq!(state.advisory.as_deref(), Some(FALLBACK_ADVISORY));

        loader.activate().await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    }
}
