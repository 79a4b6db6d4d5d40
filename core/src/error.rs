//! Error taxonomy for booking operations.
//!
//! Every failure is recovered at the request boundary; none of these are
//! fatal to the process and none are retried automatically.

use crate::store::StoreError;
use crate::types::{BookingId, ResourceId};
use chrono::NaiveDate;
use thiserror::Error;

/// A single rejected input field.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{field}: {message}")]
pub struct ValidationError {
    /// Field name as it appears on the wire
    pub field: &'static str,
    /// Human-readable reason
    pub message: String,
}

impl ValidationError {
    /// Create a validation error for `field`.
    #[must_use]
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Outcome of a failed booking or catalog operation.
#[derive(Error, Debug)]
pub enum BookingError {
    /// Malformed input; nothing was read or written.
    #[error("validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),

    /// Unknown resource id.
    #[error("resource {0} not found")]
    ResourceNotFound(ResourceId),

    /// Unknown booking id.
    #[error("booking {0} not found")]
    BookingNotFound(BookingId),

    /// The slot does not exist or was already flagged booked when checked.
    #[error("time slot {date} {start_time} is not available")]
    SlotUnavailable {
        /// Requested date
        date: NaiveDate,
        /// Requested start time
        start_time: String,
    },

    /// A concurrent reservation committed first. The caller should refresh
    /// and pick another slot.
    #[error("time slot {date} {start_time} is already booked")]
    SlotAlreadyBooked {
        /// Requested date
        date: NaiveDate,
        /// Requested start time
        start_time: String,
    },

    /// A resource with the same contact email already exists.
    #[error("a resource with email {0} already exists")]
    DuplicateResource(String),

    /// Store unreachable, timed out or the transaction failed for
    /// infrastructure reasons.
    #[error("storage failure: {0}")]
    StorageFailure(#[source] StoreError),
}

impl From<StoreError> for BookingError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Duplicate(email) => Self::DuplicateResource(email),
            other => Self::StorageFailure(other),
        }
    }
}

/// Result alias for booking operations.
pub type Result<T> = std::result::Result<T, BookingError>;
