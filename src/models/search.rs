use std::fmt;

use serde::{Serialize, Serializer};

use crate::errors::AppError;
use crate::models::Provider;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub service: String,
    pub neighborhood: String,
}

impl SearchQuery {
    /// Trims both fields; either one empty is a validation failure.
    pub fn new(service: &str, neighborhood: &str) -> Result<Self, AppError> {
        let service = service.trim();
        let neighborhood = neighborhood.trim();
        if service.is_empty() || neighborhood.is_empty() {
            return Err(AppError::Validation(SearchMessage::MissingInput.to_string()));
        }
        Ok(Self {
            service: service.to_string(),
            neighborhood: neighborhood.to_string(),
        })
    }
}

/// Feedback line shown under the search form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMessage {
    MissingInput,
    Found {
        count: usize,
        service: String,
        neighborhood: String,
    },
    NoneFound {
        service: String,
        neighborhood: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageTone {
    Warning,
    Success,
}

impl SearchMessage {
    pub fn for_results(query: &SearchQuery, count: usize) -> Self {
        if count > 0 {
            SearchMessage::Found {
                count,
                service: query.service.clone(),
                neighborhood: query.neighborhood.clone(),
            }
        } else {
            SearchMessage::NoneFound {
                service: query.service.clone(),
                neighborhood: query.neighborhood.clone(),
            }
        }
    }

    pub fn tone(&self) -> MessageTone {
        match self {
            SearchMessage::MissingInput | SearchMessage::NoneFound { .. } => MessageTone::Warning,
            SearchMessage::Found { .. } => MessageTone::Success,
        }
    }
}

impl fmt::Display for SearchMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SearchMessage::MissingInput => {
                write!(f, "Please enter both service type and neighborhood")
            }
            SearchMessage::Found {
                count,
                service,
                neighborhood,
            } => write!(f, "Found {count} providers for {service} in {neighborhood}"),
            SearchMessage::NoneFound {
                service,
                neighborhood,
            } => write!(f, "No providers found for {service} in {neighborhood}"),
        }
    }
}

impl Serialize for SearchMessage {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// What the results panel is currently showing.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResultSetState {
    pub providers: Vec<Provider>,
    pub loading: bool,
    pub error: Option<String>,
    pub message: Option<SearchMessage>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_trims_fields() {
        let q = SearchQuery::new("  Plumber ", "\tDowntown\n").unwrap();
        assert_eq!(q.service, "Plumber");
        assert_eq!(q.neighborhood, "Downtown");
    }

    #[test]
    fn test_query_rejects_blank_field() {
        let err = SearchQuery::new("   ", "Downtown").unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert_eq!(err.to_string(), "Please enter both service type and neighborhood");
        assert!(SearchQuery::new("Plumber", "").is_err());
    }

    #[test]
    fn test_message_text_and_tone() {
        let q = SearchQuery::new("Plumber", "Downtown").unwrap();
        let found = SearchMessage::for_results(&q, 3);
        assert_eq!(found.to_string(), "Found 3 providers for Plumber in Downtown");
        assert_eq!(found.tone(), MessageTone::Success);

        let none = SearchMessage::for_results(&q, 0);
        assert_eq!(none.to_string(), "No providers found for Plumber in Downtown");
        assert_eq!(none.tone(), MessageTone::Warning);
        assert_eq!(SearchMessage::MissingInput.tone(), MessageTone::Warning);
    }

    #[test]
    fn test_tone_serializes_lowercase() {
        assert_eq!(serde_json::to_value(MessageTone::Warning).unwrap(), "warning");
        assert_eq!(serde_json::to_value(MessageTone::Success).unwrap(), "success");
    }
}
