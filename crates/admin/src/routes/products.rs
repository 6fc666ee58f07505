//! Product management route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{CategoryId, DomainError, Money, Product, ProductId};

use crate::db::products::ProductInput;
use crate::db::{ProductRepository, RepositoryError};
use crate::error::{ApiError, Result};
use crate::middleware::RequireAdmin;
use crate::routes::{ApiSuccess, ok};
use crate::state::AppState;

/// Product display data for the back-office.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub stock_quantity: i32,
    pub category_id: CategoryId,
    pub category_name: String,
    pub origin: String,
}

impl From<Product> for ProductView {
    fn from(product: Product) -> Self {
        Self {
            product_id: product.id,
            product_name: product.name,
            price: product.price,
            stock_quantity: product.stock_quantity,
            category_id: product.category_id,
            category_name: product.category_name,
            origin: product.origin,
        }
    }
}

/// Product listing query parameters.
#[derive(Debug, Deserialize)]
pub struct ProductListQuery {
    pub search: Option<String>,
    pub category: Option<String>,
}

/// Product list response.
#[derive(Debug, Serialize)]
pub struct ProductListResponse {
    pub success: bool,
    pub products: Vec<ProductView>,
}

/// List products with optional filters.
#[instrument(skip(state))]
pub async fn list(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<ProductListResponse>> {
    let products = ProductRepository::new(state.pool())
        .list(query.search.as_deref(), query.category.as_deref())
        .await?;

    Ok(Json(ProductListResponse {
        success: true,
        products: products.into_iter().map(ProductView::from).collect(),
    }))
}

/// Product detail response.
#[derive(Debug, Serialize)]
pub struct ProductDetailResponse {
    pub success: bool,
    pub product: ProductView,
}

/// Show one product.
#[instrument(skip(state))]
pub async fn detail(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ProductDetailResponse>> {
    let product = ProductRepository::new(state.pool())
        .get(id)
        .await?
        .ok_or(DomainError::ProductNotFound)?;

    Ok(Json(ProductDetailResponse {
        success: true,
        product: ProductView::from(product),
    }))
}

/// Create-product request body. The product id is derived server-side and
/// never accepted from the client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub category_id: CategoryId,
    pub product_name: String,
    pub price: i64,
    pub stock_quantity: i32,
    pub origin: Option<String>,
}

/// Create-product response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductResponse {
    pub success: bool,
    pub product_id: ProductId,
}

fn validate_product_fields(name: &str, price: i64, stock_quantity: i32) -> Result<()> {
    if name.trim().is_empty() {
        return Err(ApiError::BadRequest("product name is required".to_owned()));
    }
    if price < 0 {
        return Err(ApiError::BadRequest("price must be 0 or more".to_owned()));
    }
    if stock_quantity < 0 {
        return Err(ApiError::BadRequest(
            "stock quantity must be 0 or more".to_owned(),
        ));
    }
    Ok(())
}

/// Create a product.
#[instrument(skip(state))]
pub async fn create(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Json(body): Json<CreateProductRequest>,
) -> Result<Json<CreateProductResponse>> {
    validate_product_fields(&body.product_name, body.price, body.stock_quantity)?;

    let input = ProductInput {
        name: body.product_name.trim().to_owned(),
        price: Money::from(body.price),
        stock_quantity: body.stock_quantity,
        origin: body.origin.clone(),
    };

    let id = match ProductRepository::new(state.pool())
        .create(body.category_id, &input)
        .await
    {
        Ok(id) => id,
        Err(RepositoryError::NotFound) => {
            return Err(ApiError::BadRequest("no such category".to_owned()));
        }
        Err(RepositoryError::Conflict(_)) => {
            return Err(DomainError::DuplicateName(format!("product '{}'", input.name)).into());
        }
        Err(e) => return Err(e.into()),
    };

    tracing::info!(product_id = %id, "product created");
    Ok(Json(CreateProductResponse {
        success: true,
        product_id: id,
    }))
}

/// Update-product request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub product_name: String,
    pub price: i64,
    pub stock_quantity: i32,
    pub origin: Option<String>,
}

/// Update a product's editable fields.
#[instrument(skip(state))]
pub async fn update(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
    Json(body): Json<UpdateProductRequest>,
) -> Result<Json<ApiSuccess>> {
    validate_product_fields(&body.product_name, body.price, body.stock_quantity)?;

    let input = ProductInput {
        name: body.product_name.trim().to_owned(),
        price: Money::from(body.price),
        stock_quantity: body.stock_quantity,
        origin: body.origin.clone(),
    };

    match ProductRepository::new(state.pool()).update(id, &input).await {
        Ok(()) => {}
        Err(RepositoryError::NotFound) => return Err(DomainError::ProductNotFound.into()),
        Err(RepositoryError::Conflict(_)) => {
            return Err(DomainError::DuplicateName(format!("product '{}'", input.name)).into());
        }
        Err(e) => return Err(e.into()),
    }

    tracing::info!(product_id = %id, "product updated");
    Ok(ok("product updated"))
}

/// Delete a product. Refused while any cart still reserves it.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    _admin: RequireAdmin,
    Path(id): Path<ProductId>,
) -> Result<Json<ApiSuccess>> {
    let products = ProductRepository::new(state.pool());

    if products.is_reserved(id).await? {
        return Err(ApiError::Conflict(
            "product is reserved in customer carts; it cannot be deleted".to_owned(),
        ));
    }

    if !products.delete(id).await? {
        return Err(DomainError::ProductNotFound.into());
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(ok("product deleted"))
}
