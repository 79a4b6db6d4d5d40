//! # Slotbook Testing
//!
//! Testing utilities for slotbook.
//!
//! This crate provides:
//! - [`InMemoryStore`]: both store traits over in-process collections
//! - [`RecordingNotifier`]: captures published slot-booked events
//! - [`FixedClock`]: deterministic time
//! - Fixture builders for resources and reservation requests
//!
//! ## Example
//!
//! ```ignore
//! use slotbook_testing::{InMemoryStore, ResourceBuilder, date};
//!
//! #[tokio::test]
//! async fn lists_seeded_resources() {
//!     let store = InMemoryStore::new();
//!     store
//!         .insert_resource(ResourceBuilder::new("Dr. Sarah Wilson").slot(date("2025-01-02"), "09:00", "10:00").build())
//!         .await
//!         .unwrap();
//! }
//! ```

use chrono::{DateTime, Utc};
use slotbook_core::environment::Clock;

pub mod fixtures;
mod memory_store;
mod notifier;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use slotbook_testing::mocks::FixedClock;
    /// use slotbook_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

// Re-export commonly used items
pub use fixtures::{ResourceBuilder, date, reservation_request};
pub use memory_store::InMemoryStore;
pub use mocks::{FixedClock, test_clock};
pub use notifier::RecordingNotifier;
