//! Axum integration for slotbook.
//!
//! This crate holds the HTTP-facing pieces that do not depend on how the
//! server is assembled:
//!
//! - [`AppError`]: booking errors mapped to JSON error responses
//! - [`middleware`]: correlation IDs on every request
//! - [`rooms`]: per-resource broadcast rooms implementing `SlotNotifier`
//! - [`handlers`]: health, readiness and the websocket room protocol
//!
//! # Example
//!
//! ```ignore
//! use slotbook_web::{AppError, correlation_id_layer};
//! use axum::{Router, routing::get, Json};
//!
//! async fn detail(
//!     State(state): State<AppState>,
//!     Path(id): Path<String>,
//! ) -> Result<Json<ResourceDetail>, AppError> {
//!     Ok(Json(state.catalog.resource_detail(&id).await?))
//! }
//!
//! let app = Router::new()
//!     .route("/api/experts/:id", get(detail))
//!     .layer(correlation_id_layer())
//!     .with_state(app_state);
//! ```

#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod rooms;

// Re-export key types for convenience
pub use error::AppError;
pub use middleware::{CORRELATION_ID_HEADER, CorrelationId, correlation_id_layer};
pub use rooms::{RoomBroadcaster, resource_room};

/// Result type alias for web handlers.
pub type WebResult<T> = Result<T, AppError>;
