//! Pure view-model derivations over fetched providers. Nothing here does I/O.

use reqwest::Url;
use serde::Serialize;

use crate::models::{Provider, ProviderId, RecommendationStrength, Review};

pub const STAR_COUNT: usize = 5;
pub const MAX_VISIBLE_REVIEWS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StarCell {
    Full,
    Half,
    Empty,
}

/// Splits a rating into exactly five cells: `floor(rating)` full, one half when
/// the remainder is at least 0.5, the rest empty. Out-of-range input is clamped.
pub fn star_cells(rating: f64) -> [StarCell; STAR_COUNT] {
    let rating = if rating.is_nan() { 0.0 } else { rating.clamp(0.0, STAR_COUNT as f64) };
    let full = rating.floor() as usize;
    let half = full < STAR_COUNT && rating - rating.floor() >= 0.5;

    let mut cells = [StarCell::Empty; STAR_COUNT];
    for cell in cells.iter_mut().take(full) {
        *cell = StarCell::Full;
    }
    if half {
        cells[full] = StarCell::Half;
    }
    cells
}

pub fn rating_label(rating: f64) -> String {
    format!("{rating:.1}")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeTone {
    Success,
    Info,
    Accent,
    Neutral,
}

impl RecommendationStrength {
    pub fn badge(&self) -> BadgeTone {
        match self {
            RecommendationStrength::HighlyRecommended => BadgeTone::Success,
            RecommendationStrength::StronglyRecommended => BadgeTone::Info,
            RecommendationStrength::Recommended => BadgeTone::Accent,
            RecommendationStrength::Unclassified(_) => BadgeTone::Neutral,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistributionBar {
    pub stars: u8,
    pub count: u32,
    pub percent: f64,
}

/// One bar per star level, five stars first. Bars are display widths and need
/// not sum to 100.
pub fn distribution_bars(provider: &Provider) -> Vec<DistributionBar> {
    let total = provider.reviews_count.unwrap_or(0);
    (1..=STAR_COUNT as u8)
        .rev()
        .map(|stars| {
            let count = provider
                .review_distribution
                .as_ref()
                .and_then(|d| d.bucket(stars))
                .unwrap_or(0);
            DistributionBar {
                stars,
                count,
                percent: percentage(count, total),
            }
        })
        .collect()
}

pub fn percentage(count: u32, total: u32) -> f64 {
    if total == 0 {
        return 0.0;
    }
    f64::from(count) * 100.0 / f64::from(total)
}

/// The first few reviews in the order the source returned them.
pub fn visible_reviews(provider: &Provider) -> &[Review] {
    let reviews = provider.reviews.as_deref().unwrap_or(&[]);
    &reviews[..reviews.len().min(MAX_VISIBLE_REVIEWS)]
}

/// Relative link into the booking view carrying the provider's identity.
pub fn booking_link(provider: &Provider) -> String {
    let phone = provider
        .full_phone
        .as_deref()
        .filter(|p| !p.is_empty())
        .unwrap_or(&provider.contact);
    let email = provider.email.as_deref().unwrap_or("");

    match Url::parse_with_params(
        "http://localhost/booking",
        &[
            ("provider", provider.name.as_str()),
            ("service", provider.service_type.as_str()),
            ("phone", phone),
            ("email", email),
        ],
    ) {
        Ok(url) => format!("{}?{}", url.path(), url.query().unwrap_or("")),
        Err(_) => "/booking".to_string(),
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProviderCard {
    pub id: ProviderId,
    pub rank: u32,
    pub name: String,
    pub strength: RecommendationStrength,
    pub badge: BadgeTone,
    pub stars: [StarCell; STAR_COUNT],
    pub rating_label: String,
    pub reviews_count: Option<u32>,
    pub service_type: String,
    pub neighborhood: String,
    pub contact: String,
    pub website: Option<String>,
    pub address: Option<String>,
    pub distribution: Vec<DistributionBar>,
    pub reviews: Vec<Review>,
    pub booking_link: String,
}

impl ProviderCard {
    pub fn from_provider(provider: &Provider) -> Self {
        let address = match (provider.street.as_deref(), provider.postal_code.as_deref()) {
            (Some(street), Some(postal)) => Some(format!("{street}, {postal}")),
            (Some(street), None) => Some(street.to_string()),
            (None, Some(postal)) => Some(postal.to_string()),
            (None, None) => None,
        };

        Self {
            id: provider.id.clone(),
            rank: provider.rank,
            name: provider.name.clone(),
            strength: provider.recommendation_strength.clone(),
            badge: provider.recommendation_strength.badge(),
            stars: star_cells(provider.rating),
            rating_label: rating_label(provider.rating),
            reviews_count: provider.reviews_count,
            service_type: provider.service_type.clone(),
            neighborhood: provider.neighborhood.clone(),
            contact: provider.contact.clone(),
            website: provider.website.clone(),
            address,
            distribution: distribution_bars(provider),
            reviews: visible_reviews(provider).to_vec(),
            booking_link: booking_link(provider),
        }
    }
}
