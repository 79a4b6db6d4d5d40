//! # Slotbook Server
//!
//! Appointment booking over HTTP: a catalog of bookable resources ("experts")
//! with time slots, booking creation that never double-books a slot, and a
//! websocket channel announcing slots as they get booked.
//!
//! # Architecture
//!
//! ```text
//!  HTTP (axum)                                  WebSocket /ws
//!      │                                              ▲
//!      ▼                                              │ slot-booked
//! ┌──────────────┐   ┌────────────────────┐   ┌──────────────────┐
//! │ api handlers │──>│ ReservationService │──>│ RoomBroadcaster  │
//! └──────────────┘   └────────────────────┘   └──────────────────┘
//!      │                       │
//!      ▼                       ▼
//! ┌────────────────┐   ┌───────────────────────────────┐
//! │ CatalogService │──>│ ResourceStore + BookingStore  │
//! └────────────────┘   │ (PostgreSQL)                  │
//!                      └───────────────────────────────┘
//! ```
//!
//! The double-booking guarantee lives in the store: one transaction
//! inserts the booking and flags the slot, and a unique constraint on
//! (resource, date, start time) rejects whichever concurrent attempt
//! commits second.

pub mod api;
pub mod catalog;
pub mod config;
pub mod metrics;
pub mod reservation;
pub mod seed;
pub mod server;

pub use catalog::CatalogService;
pub use config::Config;
pub use reservation::{ReservationReceipt, ReservationService};
pub use server::{AppState, build_router};
