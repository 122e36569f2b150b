use async_trait::async_trait;
use reqwest::Url;
use serde::de::DeserializeOwned;

use super::RecommendationSource;
use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::{CatalogOptions, RecommendationsResponse, SearchQuery};

pub struct HttpBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    pub fn new(config: &AppConfig) -> Result<Self, AppError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AppError::Transport(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            base_url: config.backend_url.clone(),
            client,
        })
    }

    pub fn recommendations_url(&self, query: &SearchQuery) -> Result<Url, AppError> {
        Url::parse_with_params(
            &format!("{}/recommendations", self.base_url),
            &[
                ("service_type", query.service.as_str()),
                ("neighborhood", query.neighborhood.as_str()),
            ],
        )
        .map_err(|e| AppError::Transport(format!("invalid backend URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, AppError> {
        let resp = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| AppError::Transport(format!("request to {url} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(AppError::Transport(format!("API error: {}", status.as_u16())));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| AppError::Transport(format!("failed to read response body: {e}")))?;

        serde_json::from_str(&body).map_err(|e| AppError::DataShape(e.to_string()))
    }
}

#[async_trait]
impl RecommendationSource for HttpBackend {
    async fn recommendations(
        &self,
        query: &SearchQuery,
    ) -> Result<RecommendationsResponse, AppError> {
        let url = self.recommendations_url(query)?;
        tracing::debug!(%url, "fetching recommendations");
        self.get_json(url).await
    }

    async fn options(&self) -> Result<CatalogOptions, AppError> {
        let url = Url::parse(&format!("{}/options", self.base_url))
            .map_err(|e| AppError::Transport(format!("invalid backend URL: {e}")))?;
        tracing::debug!(%url, "fetching options catalog");
        self.get_json(url).await
    }
}
