//! `PostgreSQL` stores for slotbook.
//!
//! [`PostgresStore`] implements both `ResourceStore` and `BookingStore` from
//! `slotbook-core` on top of a sqlx connection pool:
//!
//! - Resources and their slots in `resources` / `time_slots`
//! - Bookings in `bookings`, with a uniqueness constraint on
//!   (resource, date, start time) as the final guard against double booking
//! - Slot reservation in a single transaction holding a row lock on the slot
//! - Embedded migrations (`sqlx::migrate!`)
//!
//! # Example
//!
//! ```ignore
//! use slotbook_postgres::{PoolConfig, PostgresStore};
//!
//! async fn example() -> Result<(), Box<dyn std::error::Error>> {
//!     let store = PostgresStore::connect("postgres://localhost/slotbook", &PoolConfig::default()).await?;
//!     store.migrate().await?;
//!     Ok(())
//! }
//! ```

mod error;
mod pool;
mod rows;
mod store;

pub use pool::PoolConfig;
pub use store::PostgresStore;
