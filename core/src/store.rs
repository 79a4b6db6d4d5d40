//! Store traits for resources and bookings.
//!
//! The two collections are reached through these traits so the reservation
//! protocol can run against `PostgreSQL` in production and an in-memory
//! store in tests.
//!
//! # Implementations
//!
//! - `PostgresStore` (in `slotbook-postgres`): production implementation
//! - `InMemoryStore` (in `slotbook-testing`): fast, deterministic testing
//!
//! # Dyn Compatibility
//!
//! Methods return boxed futures instead of using `async fn` so the stores can
//! be shared as `Arc<dyn ResourceStore>` / `Arc<dyn BookingStore>`.

use crate::query::{Page, ResourceQuery};
use crate::types::{
    Booking, BookingId, BookingStatus, CustomerBooking, Resource, ResourceId, ResourceProfile,
};
use chrono::{DateTime, NaiveDate, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by store operations.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors raised by store implementations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// A booking already exists for the (resource, date, start time) triple.
    ///
    /// Raised either by the in-transaction re-check or by the storage
    /// uniqueness constraint.
    #[error("a booking already exists for this slot")]
    Conflict,

    /// The slot to flag as booked was not found (or was already flagged)
    /// inside the reservation transaction.
    #[error("slot {date} {start_time} not found")]
    SlotNotFound {
        /// Slot date
        date: NaiveDate,
        /// Slot start time
        start_time: String,
    },

    /// A resource with this email already exists.
    #[error("duplicate resource email: {0}")]
    Duplicate(String),

    /// The store could not be reached in time.
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// Any other database failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Catalog of bookable resources and their embedded slots.
pub trait ResourceStore: Send + Sync {
    /// Load a resource with its full slot collection.
    fn find_resource(&self, id: ResourceId) -> StoreFuture<'_, Option<Resource>>;

    /// List resource profiles (slots stripped) matching `query`, sorted by
    /// rating descending, name ascending, id ascending.
    fn list_resources(&self, query: ResourceQuery) -> StoreFuture<'_, Page<ResourceProfile>>;

    /// Insert a resource and its slots.
    ///
    /// # Errors
    ///
    /// - `Duplicate`: another resource uses the same email
    fn insert_resource(&self, resource: Resource) -> StoreFuture<'_, ()>;

    /// Delete a resource and its slots. Returns `false` if it did not exist.
    ///
    /// Bookings referencing the resource are kept.
    fn delete_resource(&self, id: ResourceId) -> StoreFuture<'_, bool>;

    /// Delete every resource. Returns the number removed.
    fn clear_resources(&self) -> StoreFuture<'_, u64>;

    /// Distinct categories of active resources, sorted.
    fn categories(&self) -> StoreFuture<'_, Vec<String>>;

    /// Cheap round-trip used by readiness checks.
    fn ping(&self) -> StoreFuture<'_, ()>;
}

/// Booking records and the atomic slot reservation.
pub trait BookingStore: Send + Sync {
    /// Atomically persist `booking` and flag its slot as booked.
    ///
    /// Within one transaction: lock the slot, re-check that no booking exists
    /// for (resource, date, start time), insert the booking, flag the slot,
    /// commit. On any error nothing is persisted.
    ///
    /// # Errors
    ///
    /// - `Conflict`: a booking for the slot already exists (re-check or
    ///   uniqueness constraint)
    /// - `SlotNotFound`: the slot vanished or is already flagged booked
    /// - `Unavailable` / `Database`: infrastructure failure
    fn reserve_slot(&self, booking: Booking) -> StoreFuture<'_, Booking>;

    /// Bookings for a (lowercase) customer email, enriched with resource
    /// contact fields, sorted by date descending then creation descending.
    fn bookings_for_email(&self, email: String) -> StoreFuture<'_, Vec<CustomerBooking>>;

    /// Set a booking's status. Returns `None` if the booking does not exist.
    fn update_status(
        &self,
        id: BookingId,
        status: BookingStatus,
        updated_at: DateTime<Utc>,
    ) -> StoreFuture<'_, Option<CustomerBooking>>;
}
