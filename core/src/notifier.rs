//! Slot-booked notifications.
//!
//! After a reservation commits, subscribers watching the resource are told
//! which slot was taken. Delivery is best effort: a publish never fails and
//! never blocks the reservation that triggered it.

use crate::types::{Booking, BookingCode, ResourceId};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::future::Future;
use std::pin::Pin;

/// A slot on a resource was just booked.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlotBooked {
    /// Resource whose slot was booked
    pub resource_id: ResourceId,
    /// Slot date
    pub date: NaiveDate,
    /// Slot start time
    pub start_time: String,
    /// Code of the booking that claimed the slot
    pub booking_code: BookingCode,
}

impl From<&Booking> for SlotBooked {
    fn from(booking: &Booking) -> Self {
        Self {
            resource_id: booking.resource_id,
            date: booking.date,
            start_time: booking.start_time.clone(),
            booking_code: booking.booking_code.clone(),
        }
    }
}

/// Fan-out of [`SlotBooked`] events to subscribers of a resource.
pub trait SlotNotifier: Send + Sync {
    /// Deliver `event` to the current subscribers of its resource.
    ///
    /// Events for a resource with no subscribers are dropped.
    fn publish(&self, event: SlotBooked) -> Pin<Box<dyn Future<Output = ()> + Send + '_>>;
}

/// Notifier that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNotifier;

impl SlotNotifier for NoopNotifier {
    fn publish(&self, _event: SlotBooked) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async {})
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn slot_booked_serializes_camel_case() {
        let event = SlotBooked {
            resource_id: ResourceId::new(),
            date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: "09:00".to_string(),
            booking_code: BookingCode::new("BK1X"),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["date"], "2024-06-01");
        assert_eq!(json["startTime"], "09:00");
        assert_eq!(json["bookingCode"], "BK1X");
        assert_eq!(json["resourceId"], event.resource_id.to_string());
    }
}
