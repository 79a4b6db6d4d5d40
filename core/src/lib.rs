//! # Slotbook Core
//!
//! Domain types, validation and store traits for the slotbook appointment
//! booking platform.
//!
//! ## Concepts
//!
//! - **Resource**: a bookable entity (person, place, item or service) with an
//!   ordered collection of time slots
//! - **Booking**: a customer's claim on exactly one slot of one resource
//! - **Stores**: [`store::ResourceStore`] and [`store::BookingStore`] abstract
//!   persistence; [`store::BookingStore::reserve_slot`] is the atomic
//!   reservation that prevents double booking
//! - **Notifier**: [`notifier::SlotNotifier`] fans out slot-booked events
//!
//! At most one booking may exist per (resource, date, start time). Stores
//! enforce this with a uniqueness constraint; services must not rely on a
//! read-then-write check alone.

pub mod environment;
pub mod error;
pub mod notifier;
pub mod query;
pub mod store;
pub mod types;
pub mod validation;

pub use environment::{Clock, SystemClock};
pub use error::{BookingError, Result, ValidationError};
pub use notifier::{NoopNotifier, SlotBooked, SlotNotifier};
pub use query::{Page, Pagination, ResourceQuery};
pub use store::{BookingStore, ResourceStore, StoreError, StoreFuture};
pub use types::{
    Booking, BookingCode, BookingId, BookingStatus, CustomerBooking, GroupedSlots, Resource,
    ResourceContact, ResourceDetail, ResourceId, ResourceProfile, ResourceType, SlotId, SlotView,
    TimeSlot,
};
