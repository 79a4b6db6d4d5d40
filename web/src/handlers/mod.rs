//! HTTP request handlers.
//!
//! This module contains the handlers shared by slotbook services.

pub mod health;
pub mod websocket;

// Re-export common handler utilities
pub use health::{health_check, readiness_check};
