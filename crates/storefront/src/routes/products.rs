//! Catalog route handlers.

use axum::{
    Json,
    extract::{Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{Money, Product, ProductId};

use crate::db::{ProductRepository, ProductSort};
use crate::error::Result;
use crate::state::AppState;

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
    pub sort_by: Option<String>,
}

/// Product display data for the shop grid.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub stock: i32,
    pub category_name: String,
    pub origin: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name,
            price: product.price,
            stock: product.stock_quantity,
            category_name: product.category_name,
            origin: product.origin,
        }
    }
}

/// List products with optional search, category filter, and sort order.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>> {
    let sort = ProductSort::parse(query.sort_by.as_deref());
    let products = ProductRepository::new(state.pool())
        .list(query.search.as_deref(), query.category.as_deref(), sort)
        .await?;

    Ok(Json(products.into_iter().map(ProductView::from).collect()))
}

/// List category names for the shop's filter bar.
#[instrument(skip(state))]
pub async fn categories(State(state): State<AppState>) -> Result<Json<Vec<String>>> {
    let names = ProductRepository::new(state.pool()).category_names().await?;
    Ok(Json(names))
}
