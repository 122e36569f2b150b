use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::Json;
use serde::Deserialize;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{BookingField, NavigationParams};
use crate::services::booking::session::{BookingSession, BookingSnapshot};
use crate::state::AppState;

// POST /api/bookings?provider=..&service=..&phone=..&email=..
pub async fn start_booking(
    State(state): State<Arc<AppState>>,
    Query(params): Query<NavigationParams>,
) -> (StatusCode, Json<BookingSnapshot>) {
    let session = BookingSession::start(
        &params,
        chrono::Local::now().date_naive(),
        Arc::clone(&state.submitter),
        state.config.redirect_delay,
    );
    let snapshot = session.snapshot();
    state.insert_booking(session);
    (StatusCode::CREATED, Json(snapshot))
}

// GET /api/bookings/:id
pub async fn get_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSnapshot>, AppError> {
    let snapshot = state.booking(id)?.snapshot();
    if snapshot.stage.is_finished() {
        state.discard_booking(id);
    }
    Ok(Json(snapshot))
}

// POST /api/bookings/:id/fields
#[derive(Deserialize)]
pub struct FieldUpdate {
    pub field: BookingField,
    #[serde(default)]
    pub value: String,
}

pub async fn update_field(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
    Json(body): Json<FieldUpdate>,
) -> Result<Json<BookingSnapshot>, AppError> {
    let snapshot = state.booking(id)?.update(body.field, body.value)?;
    Ok(Json(snapshot))
}

// POST /api/bookings/:id/submit
pub async fn submit_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<(StatusCode, Json<BookingSnapshot>), AppError> {
    let snapshot = state.booking(id)?.submit()?;
    Ok((StatusCode::ACCEPTED, Json(snapshot)))
}

// POST /api/bookings/:id/cancel
pub async fn cancel_booking(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<BookingSnapshot>, AppError> {
    let snapshot = state.booking(id)?.cancel()?;
    state.discard_booking(id);
    Ok(Json(snapshot))
}

// GET /api/bookings/:id/events (SSE stream of stage changes)
pub async fn booking_events(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Sse<ReceiverStream<Result<Event, Infallible>>>, AppError> {
    let mut stage_rx = state.booking(id)?.subscribe();
    let (tx, rx) = mpsc::channel(8);

    tokio::spawn(async move {
        loop {
            let stage = stage_rx.borrow_and_update().clone();
            let data = serde_json::to_string(&stage).unwrap_or_default();
            if tx
                .send(Ok(Event::default().event("stage").data(data)))
                .await
                .is_err()
            {
                break;
            }
            if stage.is_finished() {
                state.discard_booking(id);
                break;
            }
            // A client that goes away while the stage is idle must not park us.
            tokio::select! {
                _ = tx.closed() => {
                    tracing::debug!(booking_id = %id, "booking event stream closed by client");
                    break;
                }
                changed = stage_rx.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }
    });

    Ok(Sse::new(ReceiverStream::new(rx)).keep_alive(KeepAlive::default()))
}
