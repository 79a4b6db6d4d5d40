//! GET /api/categories - Distinct categories for the client's filter picker.

use crate::server::state::AppState;
use axum::{Json, extract::State};
use serde::Serialize;
use slotbook_web::AppError;

/// Available categories.
#[derive(Debug, Serialize)]
pub struct CategoriesResponse {
    /// `All` followed by the categories of active resources, sorted
    pub categories: Vec<String>,
}

/// List categories of active resources.
///
/// # Example
///
/// ```bash
/// curl http://localhost:5001/api/categories
/// # {"categories":["All","Healthcare","Library"]}
/// ```
pub async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<CategoriesResponse>, AppError> {
    let categories = state.catalog.categories().await?;
    Ok(Json(CategoriesResponse { categories }))
}
