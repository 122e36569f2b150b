use std::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Provider ids arrive as integers from the current backend, but the contract
/// only promises an opaque identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProviderId {
    Number(i64),
    Text(String),
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderId::Number(n) => write!(f, "{n}"),
            ProviderId::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Provider {
    pub id: ProviderId,
    pub rank: u32,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub service_type: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub neighborhood: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default)]
    pub reviews_count: Option<u32>,
    #[serde(default)]
    pub recommendation_strength: RecommendationStrength,
    #[serde(default, deserialize_with = "null_as_default")]
    pub contact: String,
    #[serde(default)]
    pub full_phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub street: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
    #[serde(default)]
    pub review_distribution: Option<ReviewDistribution>,
    #[serde(default)]
    pub reviews: Option<Vec<Review>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewDistribution {
    pub one_star: Option<u32>,
    pub two_star: Option<u32>,
    pub three_star: Option<u32>,
    pub four_star: Option<u32>,
    pub five_star: Option<u32>,
}

impl ReviewDistribution {
    /// Bucket count for a star level (1..=5). Unknown levels have no bucket.
    pub fn bucket(&self, stars: u8) -> Option<u32> {
        match stars {
            1 => self.one_star,
            2 => self.two_star,
            3 => self.three_star,
            4 => self.four_star,
            5 => self.five_star,
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    #[serde(default, deserialize_with = "null_as_default")]
    pub reviewer: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub text: String,
}

/// Strength label attached to each provider by the ranking engine. Labels the
/// client does not know are kept verbatim as `Unclassified`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecommendationStrength {
    HighlyRecommended,
    StronglyRecommended,
    Recommended,
    Unclassified(String),
}

impl RecommendationStrength {
    pub fn parse(label: &str) -> Self {
        match label {
            "Highly Recommended" => RecommendationStrength::HighlyRecommended,
            "Strongly Recommended" => RecommendationStrength::StronglyRecommended,
            "Recommended" => RecommendationStrength::Recommended,
            other => RecommendationStrength::Unclassified(other.to_string()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            RecommendationStrength::HighlyRecommended => "Highly Recommended",
            RecommendationStrength::StronglyRecommended => "Strongly Recommended",
            RecommendationStrength::Recommended => "Recommended",
            RecommendationStrength::Unclassified(raw) => raw,
        }
    }
}

impl Default for RecommendationStrength {
    fn default() -> Self {
        RecommendationStrength::Unclassified(String::new())
    }
}

impl Serialize for RecommendationStrength {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for RecommendationStrength {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let label: Option<String> = Option::deserialize(deserializer)?;
        Ok(label
            .map(|l| RecommendationStrength::parse(&l))
            .unwrap_or_default())
    }
}

/// Body of `GET /recommendations`. A missing `providers` field is an empty result.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecommendationsResponse {
    #[serde(default, deserialize_with = "null_as_default")]
    pub providers: Vec<Provider>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_minimal_provider() {
        let json = r#"{"id":7,"rank":1,"name":"Ace Plumbing","service_type":"plumber","neighborhood":"downtown","contact":"555-0101","rating":4.6,"recommendation_strength":"Strongly Recommended"}"#;
        let provider: Provider = serde_json::from_str(json).unwrap();
        assert_eq!(provider.id, ProviderId::Number(7));
        assert_eq!(
            provider.recommendation_strength,
            RecommendationStrength::StronglyRecommended
        );
        assert!(provider.reviews.is_none());
        assert!(provider.review_distribution.is_none());
    }

    #[test]
    fn test_parse_unknown_strength_label() {
        let json = r#"{"id":"abc","rank":2,"name":"X","service_type":"s","neighborhood":"n","contact":null,"rating":null,"recommendation_strength":"Somewhat Recommended"}"#;
        let provider: Provider = serde_json::from_str(json).unwrap();
        assert_eq!(provider.id, ProviderId::Text("abc".to_string()));
        assert_eq!(provider.contact, "");
        assert_eq!(provider.rating, 0.0);
        assert_eq!(
            provider.recommendation_strength,
            RecommendationStrength::Unclassified("Somewhat Recommended".to_string())
        );
        assert_eq!(provider.recommendation_strength.label(), "Somewhat Recommended");
    }

    #[test]
    fn test_parse_distribution_camel_case() {
        let json = r#"{"oneStar":1,"twoStar":0,"fiveStar":9}"#;
        let dist: ReviewDistribution = serde_json::from_str(json).unwrap();
        assert_eq!(dist.bucket(1), Some(1));
        assert_eq!(dist.bucket(3), None);
        assert_eq!(dist.bucket(5), Some(9));
        assert_eq!(dist.bucket(6), None);
    }

    #[test]
    fn test_missing_providers_is_empty() {
        let resp: RecommendationsResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.providers.is_empty());
        let resp: RecommendationsResponse = serde_json::from_str(r#"{"providers":null}"#).unwrap();
        assert!(resp.providers.is_empty());
    }

    #[test]
    fn test_strength_serializes_as_label() {
        let value = serde_json::to_value(RecommendationStrength::HighlyRecommended).unwrap();
        assert_eq!(value, serde_json::json!("Highly Recommended"));
    }
}
