use aerobook_core::booking::{format_minor_units, Booking, BookingRequest};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

// ============================================================================
// Response Types
// ============================================================================

#[derive(Debug, Serialize)]
struct BookingResponse {
    status: &'static str,
    booking_code: String,
    message: String,
}

#[derive(Debug, Serialize)]
pub struct BookingHistoryItem {
    pub id: Uuid,
    pub booking_code: String,
    pub airline: String,
    pub origin: String,
    pub destination: String,
    pub departure_time: NaiveDateTime,
    /// Decimal string with two places, e.g. `"546.70"`
    pub price: String,
    pub currency: String,
    pub passenger_name: String,
    pub passport_number: String,
    pub email: String,
    pub gender: String,
    pub created_at: DateTime<Utc>,
}

impl From<Booking> for BookingHistoryItem {
    fn from(b: Booking) -> Self {
        Self {
            id: b.id,
            booking_code: b.booking_code,
            airline: b.airline,
            origin: b.origin,
            destination: b.destination,
            departure_time: b.departure_time,
            price: format_minor_units(b.price_cents),
            currency: b.currency,
            passenger_name: b.passenger_name,
            passport_number: b.passport_number,
            email: b.email,
            gender: b.gender,
            created_at: b.created_at,
        }
    }
}

// ============================================================================
// Handlers
// ============================================================================

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/book-amadeus", post(book_flight))
        .route("/api/booking-history", get(booking_history))
}

/// POST /api/book-amadeus
/// Re-price the selected offer, order it and record the booking
async fn book_flight(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<BookingRequest>,
) -> Result<Json<BookingResponse>, AppError> {
    let confirmation = state.orchestrator.book(req).await?;

    info!("Booking completed: {}", confirmation.booking_code);

    Ok(Json(BookingResponse {
        status: "success",
        booking_code: confirmation.booking_code,
        message: confirmation.message,
    }))
}

/// GET /api/booking-history
/// All recorded bookings, newest first
async fn booking_history(
    State(state): State<AppState>,
) -> Result<Json<Vec<BookingHistoryItem>>, AppError> {
    let bookings = state
        .bookings
        .list_bookings()
        .await
        .map_err(|e| AppError::UnexpectedError(format!("listing bookings: {}", e)))?;

    Ok(Json(bookings.into_iter().map(BookingHistoryItem::from).collect()))
}
