use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use uuid::Uuid;

use crate::config::AppConfig;
use crate::errors::AppError;
use crate::models::BookingStage;
use crate::services::backend::RecommendationSource;
use crate::services::booking::session::BookingSession;
use crate::services::booking::BookingSubmitter;
use crate::services::options::OptionsLoader;
use crate::services::search::QueryController;

pub struct AppState {
    pub config: AppConfig,
    pub search: QueryController,
    pub options: OptionsLoader,
    pub submitter: Arc<dyn BookingSubmitter>,
    bookings: Mutex<HashMap<Uuid, Arc<BookingSession>>>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        source: Arc<dyn RecommendationSource>,
        submitter: Arc<dyn BookingSubmitter>,
    ) -> Self {
        Self {
            config,
            search: QueryController::new(Arc::clone(&source)),
            options: OptionsLoader::new(source),
            submitter,
            bookings: Mutex::new(HashMap::new()),
        }
    }

    /// Registers a new session, first dropping finished ones and any left in
    /// `Collecting` for longer than the idle TTL.
    pub fn insert_booking(&self, session: Arc<BookingSession>) {
        let idle_ttl = self.config.booking_idle_ttl;
        let mut bookings = self.lock_bookings();
        let before = bookings.len();
        bookings.retain(|_, s| match s.stage() {
            BookingStage::Collecting => s.idle_for() < idle_ttl,
            stage => !stage.is_finished(),
        });
        let pruned = before - bookings.len();
        if pruned > 0 {
            tracing::debug!(pruned, "pruned stale booking sessions");
        }
        bookings.insert(session.id(), session);
    }

    pub fn booking_count(&self) -> usize {
        self.lock_bookings().len()
    }

    pub fn booking(&self, id: Uuid) -> Result<Arc<BookingSession>, AppError> {
        self.lock_bookings()
            .get(&id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("booking {id}")))
    }

    /// Drops the session; any timer still pending for it becomes a no-op.
    pub fn discard_booking(&self, id: Uuid) {
        if self.lock_bookings().remove(&id).is_some() {
            tracing::debug!(booking_id = %id, "booking session discarded");
        }
    }

    fn lock_bookings(&self) -> MutexGuard<'_, HashMap<Uuid, Arc<BookingSession>>> {
        self.bookings.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
