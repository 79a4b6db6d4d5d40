//! Booking endpoints.
//!
//! - POST /api/bookings - Reserve a slot
//! - GET /api/bookings?email= - A customer's bookings
//! - PATCH /api/bookings/:id/status - Change a booking's status

use crate::reservation::ReservationReceipt;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use slotbook_core::types::CustomerBooking;
use slotbook_core::validation::ReservationRequest;
use slotbook_web::AppError;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Response after a successful reservation.
#[derive(Debug, Serialize)]
pub struct BookingCreatedResponse {
    /// Success message
    pub message: String,
    /// The booking, with the resource name as `expertName`
    pub booking: ReservationReceipt,
}

/// Query parameters for a customer's bookings.
#[derive(Debug, Deserialize)]
pub struct CustomerBookingsQuery {
    /// Customer email, matched case-insensitively
    pub email: Option<String>,
}

/// A customer's bookings.
#[derive(Debug, Serialize)]
pub struct CustomerBookingsResponse {
    /// Bookings, latest slot first
    pub bookings: Vec<CustomerBooking>,
}

/// Request to change a booking's status.
#[derive(Debug, Deserialize)]
pub struct StatusUpdateRequest {
    /// Pending, Confirmed, Completed or Cancelled
    pub status: Option<String>,
}

/// Response after a status change.
#[derive(Debug, Serialize)]
pub struct StatusUpdatedResponse {
    /// Success message
    pub message: String,
    /// The updated booking
    pub booking: CustomerBooking,
}

// ============================================================================
// Handlers
// ============================================================================

/// Reserve a slot.
///
/// Returns 409 when another customer booked the slot first.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:5001/api/bookings \
///   -H "Content-Type: application/json" \
///   -d '{
///     "expertId": "550e8400-e29b-41d4-a716-446655440000",
///     "customerName": "Ada Lovelace",
///     "customerEmail": "ada@example.com",
///     "customerPhone": "5551234567",
///     "date": "2025-01-02",
///     "startTime": "09:00",
///     "endTime": "10:00"
///   }'
/// ```
pub async fn create_booking(
    State(state): State<AppState>,
    payload: Result<Json<ReservationRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<BookingCreatedResponse>), AppError> {
    let Json(request) = payload?;
    let receipt = state.reservations.reserve(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(BookingCreatedResponse {
            message: "Booking created successfully".to_string(),
            booking: receipt,
        }),
    ))
}

/// List a customer's bookings.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:5001/api/bookings?email=ada@example.com"
/// ```
pub async fn customer_bookings(
    State(state): State<AppState>,
    query: Result<Query<CustomerBookingsQuery>, QueryRejection>,
) -> Result<Json<CustomerBookingsResponse>, AppError> {
    let Query(query) = query?;
    let bookings = state
        .catalog
        .bookings_for_customer(query.email.as_deref())
        .await?;

    Ok(Json(CustomerBookingsResponse { bookings }))
}

/// Change a booking's status.
///
/// # Example
///
/// ```bash
/// curl -X PATCH http://localhost:5001/api/bookings/550e8400-e29b-41d4-a716-446655440000/status \
///   -H "Content-Type: application/json" \
///   -d '{"status": "Confirmed"}'
/// ```
pub async fn update_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<StatusUpdateRequest>, JsonRejection>,
) -> Result<Json<StatusUpdatedResponse>, AppError> {
    let Json(request) = payload?;
    let booking = state
        .catalog
        .update_booking_status(&id, request.status.as_deref())
        .await?;

    Ok(Json(StatusUpdatedResponse {
        message: "Booking status updated successfully".to_string(),
        booking,
    }))
}
