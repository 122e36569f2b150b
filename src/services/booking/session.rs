use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use chrono::NaiveDate;
use serde::Serialize;
use tokio::sync::watch;
use uuid::Uuid;

use super::workflow::BookingWorkflow;
use super::BookingSubmitter;
use crate::errors::AppError;
use crate::models::{BookingContext, BookingField, BookingForm, BookingStage, NavigationParams};
use crate::services::scheduling::DateChoice;

#[derive(Debug, Clone, Serialize)]
pub struct BookingSnapshot {
    pub id: Uuid,
    #[serde(flatten)]
    pub stage: BookingStage,
    pub context: BookingContext,
    pub form: BookingForm,
    pub dates: Vec<DateChoice>,
    pub slots: Vec<String>,
    pub submit_error: Option<String>,
}

/// A live booking workflow plus the timers that drive it.
///
/// Timer tasks only hold a weak reference; once the session is dropped they
/// have nothing left to update.
pub struct BookingSession {
    id: Uuid,
    workflow: Mutex<BookingWorkflow>,
    stage_tx: watch::Sender<BookingStage>,
    submitter: Arc<dyn BookingSubmitter>,
    redirect_delay: Duration,
    last_touched: Mutex<Instant>,
}

impl BookingSession {
    pub fn start(
        params: &NavigationParams,
        today: NaiveDate,
        submitter: Arc<dyn BookingSubmitter>,
        redirect_delay: Duration,
    ) -> Arc<Self> {
        let workflow = BookingWorkflow::enter(params, today);
        let (stage_tx, _) = watch::channel(workflow.stage().clone());
        let id = Uuid::new_v4();

        tracing::info!(
            booking_id = %id,
            provider = %workflow.context().provider_name,
            service = %workflow.context().service_type,
            "booking started"
        );

        Arc::new(Self {
            id,
            workflow: Mutex::new(workflow),
            stage_tx,
            submitter,
            redirect_delay,
            last_touched: Mutex::new(Instant::now()),
        })
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn stage(&self) -> BookingStage {
        self.lock_workflow().stage().clone()
    }

    pub fn history(&self) -> Vec<&'static str> {
        self.lock_workflow().history().to_vec()
    }

    /// Time since the requester last read or changed this session.
    pub fn idle_for(&self) -> Duration {
        self.last_touched
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .elapsed()
    }

    fn touch(&self) {
        *self.last_touched.lock().unwrap_or_else(PoisonError::into_inner) = Instant::now();
    }

    pub fn subscribe(&self) -> watch::Receiver<BookingStage> {
        self.stage_tx.subscribe()
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        self.touch();
        let wf = self.lock_workflow();
        BookingSnapshot {
            id: self.id,
            stage: wf.stage().clone(),
            context: wf.context().clone(),
            form: wf.form().clone(),
            dates: wf.dates().to_vec(),
            slots: wf.slots().to_vec(),
            submit_error: wf.submit_error().map(str::to_string),
        }
    }

    pub fn update(&self, field: BookingField, value: String) -> Result<BookingSnapshot, AppError> {
        self.touch();
        self.lock_workflow().update(field, value)?;
        Ok(self.snapshot())
    }

    pub fn cancel(&self) -> Result<BookingSnapshot, AppError> {
        self.step(|wf| wf.cancel())?;
        tracing::info!(booking_id = %self.id, "booking cancelled");
        Ok(self.snapshot())
    }

    /// Moves to `Submitting` right away and hands the request to the submitter
    /// in the background. The returned snapshot is always in `Submitting`.
    pub fn submit(self: &Arc<Self>) -> Result<BookingSnapshot, AppError> {
        self.touch();
        let request = self.step(|wf| wf.begin_submit())?;
        let snapshot = self.snapshot();

        tracing::info!(booking_id = %self.id, date = %request.date, time = %request.time, "booking submitted");

        let weak = Arc::downgrade(self);
        let submitter = Arc::clone(&self.submitter);
        let redirect_delay = self.redirect_delay;
        let id = self.id;

        tokio::spawn(async move {
            let outcome = submitter.submit(request).await;

            let Some(session) = weak.upgrade() else {
                tracing::debug!(booking_id = %id, "booking session gone before submission finished");
                return;
            };
            if let Err(e) = &outcome {
                tracing::warn!(booking_id = %id, error = %e, "booking submission rejected");
            }
            let confirmed = outcome.is_ok();
            if let Err(e) = session.step(|wf| wf.finish_submit(outcome)) {
                tracing::error!(booking_id = %id, error = %e, "failed to record submission outcome");
                return;
            }
            drop(session);

            if !confirmed {
                return;
            }
            tokio::time::sleep(redirect_delay).await;

            match weak.upgrade() {
                Some(session) => {
                    if let Err(e) = session.step(|wf| wf.return_to_discovery()) {
                        tracing::error!(booking_id = %id, error = %e, "failed to leave confirmation");
                    } else {
                        tracing::info!(booking_id = %id, "returned to discovery");
                    }
                }
                None => tracing::debug!(booking_id = %id, "booking session gone before redirect"),
            }
        });

        Ok(snapshot)
    }

    /// Applies one workflow step and publishes the resulting stage.
    fn step<T>(
        &self,
        f: impl FnOnce(&mut BookingWorkflow) -> Result<T, AppError>,
    ) -> Result<T, AppError> {
        let mut wf = self.lock_workflow();
        let out = f(&mut wf)?;
        self.stage_tx.send_replace(wf.stage().clone());
        Ok(out)
    }

    fn lock_workflow(&self) -> MutexGuard<'_, BookingWorkflow> {
        self.workflow.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
