//! Slot reservation.
//!
//! A reservation validates the request, checks the slot against the
//! resource as last read, then hands the booking to the store, which
//! re-checks and commits booking plus slot flag in one transaction. Only a
//! committed booking is announced to subscribers.
//!
//! # Outcomes
//!
//! | Store result | Error |
//! |---|---|
//! | slot already has a booking | [`BookingError::SlotAlreadyBooked`] |
//! | slot vanished or was flagged in the meantime | [`BookingError::SlotUnavailable`] |
//! | anything else | [`BookingError::StorageFailure`] |

use crate::metrics;
use chrono::NaiveDate;
use serde::Serialize;
use slotbook_core::environment::Clock;
use slotbook_core::error::{BookingError, Result};
use slotbook_core::notifier::{SlotBooked, SlotNotifier};
use slotbook_core::store::{BookingStore, ResourceStore, StoreError};
use slotbook_core::types::{Booking, BookingCode, BookingId, BookingStatus};
use slotbook_core::validation::{ReservationRequest, validate_reservation};
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// A committed booking and the name of the booked resource.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ReservationReceipt {
    /// The new booking
    #[serde(flatten)]
    pub booking: Booking,
    /// Display name of the booked resource
    #[serde(rename = "expertName")]
    pub resource_name: String,
}

/// Creates bookings without ever double-booking a slot.
#[derive(Clone)]
pub struct ReservationService {
    resources: Arc<dyn ResourceStore>,
    bookings: Arc<dyn BookingStore>,
    notifier: Arc<dyn SlotNotifier>,
    clock: Arc<dyn Clock>,
}

impl ReservationService {
    /// Create a new reservation service.
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        bookings: Arc<dyn BookingStore>,
        notifier: Arc<dyn SlotNotifier>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            resources,
            bookings,
            notifier,
            clock,
        }
    }

    /// Reserve the slot named by `request`.
    ///
    /// On success exactly one booking exists for the slot and the slot is
    /// flagged booked. On failure nothing was persisted.
    ///
    /// # Errors
    ///
    /// - [`BookingError::ValidationFailed`]: malformed request, the store was not touched
    /// - [`BookingError::ResourceNotFound`]: unknown resource
    /// - [`BookingError::SlotUnavailable`]: no open slot at that date and time
    /// - [`BookingError::SlotAlreadyBooked`]: another reservation won the slot
    /// - [`BookingError::StorageFailure`]: the store failed
    #[tracing::instrument(
        skip(self, request),
        fields(
            resource_id = tracing::field::Empty,
            date = tracing::field::Empty,
            start_time = tracing::field::Empty,
        )
    )]
    pub async fn reserve(&self, request: &ReservationRequest) -> Result<ReservationReceipt> {
        let started = Instant::now();
        let result = self.try_reserve(request).await;
        metrics::record_reservation(outcome_label(&result), started.elapsed());
        result
    }

    async fn try_reserve(&self, request: &ReservationRequest) -> Result<ReservationReceipt> {
        let input = validate_reservation(request)?;

        let span = tracing::Span::current();
        span.record("resource_id", tracing::field::display(input.resource_id));
        span.record("date", tracing::field::display(input.date));
        span.record("start_time", input.start_time.as_str());

        let resource = self
            .resources
            .find_resource(input.resource_id)
            .await?
            .ok_or(BookingError::ResourceNotFound(input.resource_id))?;

        if resource
            .find_open_slot(input.date, &input.start_time)
            .is_none()
        {
            return Err(BookingError::SlotUnavailable {
                date: input.date,
                start_time: input.start_time,
            });
        }

        let now = self.clock.now();
        let booking = Booking {
            id: BookingId::new(),
            booking_code: BookingCode::generate(now),
            resource_id: input.resource_id,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone,
            notes: input.notes,
            date: input.date,
            start_time: input.start_time,
            end_time: input.end_time,
            status: BookingStatus::Pending,
            created_at: now,
            updated_at: now,
        };

        let (date, start_time) = (booking.date, booking.start_time.clone());
        let booking = self
            .bookings
            .reserve_slot(booking)
            .await
            .map_err(|e| classify(e, date, start_time))?;

        info!(booking_code = %booking.booking_code, "Slot reserved");

        self.notifier.publish(SlotBooked::from(&booking)).await;

        Ok(ReservationReceipt {
            booking,
            resource_name: resource.profile.name,
        })
    }
}

/// Map a failed reservation transaction onto the booking error taxonomy.
fn classify(err: StoreError, date: NaiveDate, start_time: String) -> BookingError {
    match err {
        StoreError::Conflict => {
            warn!(%date, start_time, "Lost race for slot");
            BookingError::SlotAlreadyBooked { date, start_time }
        }
        StoreError::SlotNotFound { .. } => BookingError::SlotUnavailable { date, start_time },
        other => BookingError::StorageFailure(other),
    }
}

fn outcome_label(result: &Result<ReservationReceipt>) -> &'static str {
    match result {
        Ok(_) => "booked",
        Err(BookingError::ValidationFailed(_)) => "validation_failed",
        Err(BookingError::ResourceNotFound(_)) => "resource_not_found",
        Err(BookingError::SlotUnavailable { .. }) => "slot_unavailable",
        Err(BookingError::SlotAlreadyBooked { .. }) => "conflict",
        Err(_) => "storage_failure",
    }
}
