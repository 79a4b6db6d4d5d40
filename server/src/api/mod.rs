//! HTTP API handlers.
//!
//! Wire names follow the mobile client: resources are "experts".

pub mod bookings;
pub mod categories;
pub mod experts;

use serde::Serialize;

/// Body carrying only a confirmation message.
#[derive(Debug, Serialize)]
pub struct MessageResponse {
    /// Confirmation message
    pub message: String,
}
