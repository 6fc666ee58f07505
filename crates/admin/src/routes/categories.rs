//! Category management route handlers.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{CategoryId, DomainError};

use crate::db::categories::CategoryWithCount;
use crate::db::{CategoryRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::{ApiSuccess, ok};
use crate::state::AppState;

/// Category display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryView {
    pub category_id: CategoryId,
    pub category_name: String,
    pub product_count: i64,
}

impl From<CategoryWithCount> for CategoryView {
    fn from(category: CategoryWithCount) -> Self {
        Self {
            category_id: category.id,
            category_name: category.name,
            product_count: category.product_count,
        }
    }
}

/// Category list response.
#[derive(Debug, Serialize)]
pub struct CategoryListResponse {
    pub success: bool,
    pub categories: Vec<CategoryView>,
}

/// List categories with their product counts.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<CategoryListResponse>> {
    let categories = CategoryRepository::new(state.pool()).list_with_counts().await?;

    Ok(Json(CategoryListResponse {
        success: true,
        categories: categories.into_iter().map(CategoryView::from).collect(),
    }))
}

/// Create-category request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub category_name: String,
}

/// Create-category response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryResponse {
    pub success: bool,
    pub category_id: CategoryId,
    pub category_name: String,
}

/// Create a category under the next free id.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<CreateCategoryRequest>,
) -> Result<Json<CreateCategoryResponse>> {
    let name = body.category_name.trim();
    if name.is_empty() {
        return Err(ApiError::BadRequest("category name is required".to_owned()));
    }

    let id = match CategoryRepository::new(state.pool()).create(name).await {
        Ok(id) => id,
        Err(RepositoryError::Conflict(_)) => {
            return Err(DomainError::DuplicateName(format!("category '{name}'")).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(category_id = %id, "category created");
    Ok(Json(CreateCategoryResponse {
        success: true,
        category_id: id,
        category_name: name.to_owned(),
    }))
}

/// Delete a category. Refused while any product still belongs to it.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<CategoryId>,
) -> Result<Json<ApiSuccess>> {
    let categories = CategoryRepository::new(state.pool());

    let product_count = categories.product_count(id).await?;
    if product_count > 0 {
        return Err(ApiError::Conflict(format!(
            "category still holds {product_count} product(s); delete them first"
        )));
    }

    if !categories.delete(id).await? {
        return Err(ApiError::BadRequest("no such category".to_owned()));
    }

    tracing::info!(category_id = %id, "category deleted");
    Ok(ok("category deleted"))
}
