use std::time::Duration;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::BookingSubmitter;
use crate::errors::AppError;
use crate::models::{BookingReceipt, BookingRequest};

/// Stands in for a booking backend: waits a fixed delay, then accepts.
pub struct SimulatedSubmitter {
    delay: Duration,
}

impl SimulatedSubmitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl BookingSubmitter for SimulatedSubmitter {
    async fn submit(&self, request: BookingRequest) -> Result<BookingReceipt, AppError> {
        tokio::time::sleep(self.delay).await;

        let receipt = BookingReceipt {
            reference: Uuid::new_v4(),
            provider: request.provider,
            date: request.date,
            time: request.time,
            confirmed_at: Utc::now().naive_utc(),
        };
        tracing::info!(reference = %receipt.reference, "simulated booking accepted");
        Ok(receipt)
    }
}
