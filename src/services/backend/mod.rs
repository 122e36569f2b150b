pub mod http;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{CatalogOptions, RecommendationsResponse, SearchQuery};

/// The remote recommendation backend: ranked providers plus the options catalog.
#[async_trait]
pub trait RecommendationSource: Send + Sync {
    async fn recommendations(
        &self,
        query: &SearchQuery,
    ) -> Result<RecommendationsResponse, AppError>;

    async fn options(&self) -> Result<CatalogOptions, AppError>;
}
