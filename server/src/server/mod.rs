//! HTTP server module for the booking system.
//!
//! This module provides the Axum-based HTTP server with:
//! - Application state management
//! - Router configuration

pub mod routes;
pub mod state;

pub use routes::build_router;
pub use state::AppState;
