pub mod session;
pub mod simulated;
pub mod workflow;

use async_trait::async_trait;

use crate::errors::AppError;
use crate::models::{BookingReceipt, BookingRequest};

/// Hands a completed booking form to whoever confirms it.
#[async_trait]
pub trait BookingSubmitter: Send + Sync {
    async fn submit(&self, request: BookingRequest) -> Result<BookingReceipt, AppError>;
}
