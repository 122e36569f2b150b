use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::models::{MessageTone, OptionsState, ResultSetState};
use crate::services::presenter::ProviderCard;
use crate::state::AppState;

// POST /api/search
#[derive(Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub service: String,
    #[serde(default)]
    pub neighborhood: String,
}

#[derive(Serialize)]
pub struct SearchView {
    pub providers: Vec<ProviderCard>,
    pub loading: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message_tone: Option<MessageTone>,
}

impl From<ResultSetState> for SearchView {
    fn from(state: ResultSetState) -> Self {
        Self {
            providers: state.providers.iter().map(ProviderCard::from_provider).collect(),
            loading: state.loading,
            error: state.error,
            message_tone: state.message.as_ref().map(|m| m.tone()),
            message: state.message.map(|m| m.to_string()),
        }
    }
}

pub async fn search(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SearchRequest>,
) -> Json<SearchView> {
    let result = state.search.submit(&body.service, &body.neighborhood).await;
    Json(result.into())
}

// GET /api/search
pub async fn current_results(State(state): State<Arc<AppState>>) -> Json<SearchView> {
    Json(state.search.snapshot().into())
}

// GET /api/options
pub async fn options(State(state): State<Arc<AppState>>) -> Json<OptionsState> {
    Json(state.options.activate().await)
}
