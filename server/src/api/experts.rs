//! Resource catalog endpoints.
//!
//! - GET /api/experts - List resources with pagination and filters
//! - GET /api/experts/:id - Resource detail with slots grouped by date
//! - POST /api/experts - Add a resource
//! - DELETE /api/experts/:id - Remove a resource

use super::MessageResponse;
use crate::server::state::AppState;
use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, QueryRejection},
    },
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use slotbook_core::query::{Pagination, ResourceQuery};
use slotbook_core::types::{Resource, ResourceDetail, ResourceProfile};
use slotbook_core::validation::NewResourceRequest;
use slotbook_web::AppError;

// ============================================================================
// Request/Response Types
// ============================================================================

/// Query parameters for listing resources.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpertsQuery {
    /// Page number, starting at 1; anything else falls back to 1
    pub page: Option<String>,
    /// Page size (default: 10, max: 100); anything else falls back to 10
    pub limit: Option<String>,
    /// Substring matched against name and bio
    pub search: Option<String>,
    /// Category filter; `All` disables it
    pub category: Option<String>,
    /// Include inactive resources
    pub include_inactive: Option<bool>,
}

impl From<ExpertsQuery> for ResourceQuery {
    fn from(query: ExpertsQuery) -> Self {
        Self::new(
            parse_count(query.page.as_deref()),
            parse_count(query.limit.as_deref()),
            query.search,
            query.category,
            query.include_inactive.map(|include| !include),
        )
    }
}

/// Positive integer, or `None` so the listing default applies.
fn parse_count(raw: Option<&str>) -> Option<u32> {
    raw?.trim().parse().ok()
}

/// Response for listing resources.
#[derive(Debug, Serialize)]
pub struct ExpertsResponse {
    /// Resources on this page, without slots
    pub experts: Vec<ResourceProfile>,
    /// Page position and totals
    pub pagination: Pagination,
}

/// Response after creating a resource.
#[derive(Debug, Serialize)]
pub struct ExpertCreatedResponse {
    /// Success message
    pub message: String,
    /// The stored resource
    pub data: Resource,
}

// ============================================================================
// Handlers
// ============================================================================

/// List resources, best rated first.
///
/// # Example
///
/// ```bash
/// curl "http://localhost:5001/api/experts?page=1&limit=10&search=cloud&category=Technology"
/// ```
pub async fn list_experts(
    State(state): State<AppState>,
    query: Result<Query<ExpertsQuery>, QueryRejection>,
) -> Result<Json<ExpertsResponse>, AppError> {
    let Query(query) = query?;
    let page = state.catalog.list_resources(query.into()).await?;

    Ok(Json(ExpertsResponse {
        experts: page.items,
        pagination: page.pagination,
    }))
}

/// Get one resource with its slots grouped by date.
///
/// # Example
///
/// ```bash
/// curl http://localhost:5001/api/experts/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn get_expert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ResourceDetail>, AppError> {
    let detail = state.catalog.resource_detail(&id).await?;
    Ok(Json(detail))
}

/// Add a resource to the catalog.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:5001/api/experts \
///   -H "Content-Type: application/json" \
///   -d '{
///     "name": "Central Library",
///     "category": "Library",
///     "resourceType": "Place",
///     "email": "lib@city.com",
///     "phone": "5550100003",
///     "bio": "Book a quiet study room.",
///     "timeSlots": [{"date": "2025-01-02", "startTime": "09:00", "endTime": "10:00"}]
///   }'
/// ```
pub async fn create_expert(
    State(state): State<AppState>,
    payload: Result<Json<NewResourceRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ExpertCreatedResponse>), AppError> {
    let Json(request) = payload?;
    let resource = state.catalog.create_resource(&request).await?;

    Ok((
        StatusCode::CREATED,
        Json(ExpertCreatedResponse {
            message: "Expert created successfully".to_string(),
            data: resource,
        }),
    ))
}

/// Remove a resource. Bookings that reference it are kept.
///
/// # Example
///
/// ```bash
/// curl -X DELETE http://localhost:5001/api/experts/550e8400-e29b-41d4-a716-446655440000
/// ```
pub async fn delete_expert(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    state.catalog.delete_resource(&id).await?;

    Ok(Json(MessageResponse {
        message: "Expert deleted successfully".to_string(),
    }))
}
