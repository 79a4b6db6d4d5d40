//! Application state for the booking HTTP server.

use crate::catalog::CatalogService;
use crate::reservation::ReservationService;
use axum::extract::FromRef;
use slotbook_core::environment::Clock;
use slotbook_core::notifier::SlotBooked;
use slotbook_core::store::{BookingStore, ResourceStore};
use slotbook_web::RoomBroadcaster;
use std::sync::Arc;

/// Application state shared across all HTTP handlers.
///
/// Cloned for each request; every field is a cheap handle.
#[derive(Clone)]
pub struct AppState {
    /// Slot reservation
    pub reservations: ReservationService,
    /// Catalog queries and booking status changes
    pub catalog: CatalogService,
    /// Websocket rooms receiving slot-booked events
    pub rooms: RoomBroadcaster<SlotBooked>,
    /// Store handle used by the readiness probe
    pub resources: Arc<dyn ResourceStore>,
}

impl AppState {
    /// Wire the services to the stores.
    ///
    /// Reservations publish to `rooms`.
    #[must_use]
    pub fn new(
        resources: Arc<dyn ResourceStore>,
        bookings: Arc<dyn BookingStore>,
        rooms: RoomBroadcaster<SlotBooked>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            reservations: ReservationService::new(
                Arc::clone(&resources),
                Arc::clone(&bookings),
                Arc::new(rooms.clone()),
                Arc::clone(&clock),
            ),
            catalog: CatalogService::new(Arc::clone(&resources), bookings, clock),
            rooms,
            resources,
        }
    }
}

impl FromRef<AppState> for RoomBroadcaster<SlotBooked> {
    fn from_ref(state: &AppState) -> Self {
        state.rooms.clone()
    }
}

impl FromRef<AppState> for Arc<dyn ResourceStore> {
    fn from_ref(state: &AppState) -> Self {
        Arc::clone(&state.resources)
    }
}
