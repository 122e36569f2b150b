use serde::{Deserialize, Serialize};

pub const FALLBACK_SERVICE_TYPES: [&str; 7] = [
    "Plumber",
    "Electrician",
    "Gardener",
    "Auto",
    "Handyman",
    "Cleaner",
    "Locksmith",
];

pub const FALLBACK_NEIGHBOURHOODS: [&str; 4] = ["Reading", "Downtown", "West Side", "North Hills"];

pub const FALLBACK_ADVISORY: &str = "Could not load options from server. Using default values.";

/// Body of `GET /options`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogOptions {
    pub service_types: Vec<String>,
    pub neighbourhoods: Vec<String>,
}

impl CatalogOptions {
    pub fn fallback() -> Self {
        Self {
            service_types: FALLBACK_SERVICE_TYPES.iter().map(|s| s.to_string()).collect(),
            neighbourhoods: FALLBACK_NEIGHBOURHOODS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Suggestion lists exposed to the search form. Empty until the first fetch resolves.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OptionsState {
    pub service_types: Vec<String>,
    pub neighbourhoods: Vec<String>,
    pub advisory: Option<String>,
    pub loaded: bool,
}
