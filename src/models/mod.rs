pub mod booking;
pub mod options;
pub mod provider;
pub mod search;

pub use booking::{
    BookingContext, BookingField, BookingForm, BookingReceipt, BookingRequest, BookingStage,
    NavigationParams,
};
pub use options::{CatalogOptions, OptionsState};
pub use provider::{
    Provider, ProviderId, RecommendationStrength, RecommendationsResponse, Review,
    ReviewDistribution,
};
pub use search::{MessageTone, ResultSetState, SearchMessage, SearchQuery};
