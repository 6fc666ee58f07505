//! Cart route handlers.
//!
//! Every mutation goes through the ledger service so stock and cart lines
//! move together; the view re-reads store state afterwards instead of
//! trusting anything the client computed.

use axum::{
    Json,
    extract::{Path, State},
};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{Money, ProductId};

use crate::db::CartRepository;
use crate::db::cart::CartLineDetail;
use crate::error::Result;
use crate::middleware::CurrentCustomer;
use crate::routes::{ApiSuccess, ok};
use crate::services::LedgerService;
use crate::state::AppState;

/// Cart line display data.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemView {
    pub product_id: ProductId,
    pub product_name: String,
    pub price: Money,
    pub quantity: i32,
    pub total_price: Money,
}

impl From<CartLineDetail> for CartItemView {
    fn from(line: CartLineDetail) -> Self {
        let total_price = line.total_price();
        Self {
            product_id: line.product_id,
            product_name: line.product_name,
            price: line.price,
            quantity: line.quantity,
            total_price,
        }
    }
}

/// Cart response: every line plus the sum the UI shows at the bottom.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub success: bool,
    pub items: Vec<CartItemView>,
    pub total_price: Money,
}

/// Show the current customer's cart.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<CartResponse>> {
    let lines = CartRepository::new(state.pool()).lines(customer_id).await?;
    let total_price = lines.iter().map(CartLineDetail::total_price).sum();

    Ok(Json(CartResponse {
        success: true,
        items: lines.into_iter().map(CartItemView::from).collect(),
        total_price,
    }))
}

/// Add-to-cart request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: i32,
}

/// Reserve units of a product into the cart.
#[instrument(skip(state))]
pub async fn add(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<ApiSuccess>> {
    LedgerService::new(state.pool())
        .add_to_cart(customer_id, body.product_id, body.quantity)
        .await?;

    Ok(ok("added to cart"))
}

/// Resize request body.
///
/// `quantity_diff` is part of the wire contract but deliberately unused: the
/// server recomputes the difference from the stored line under lock, since a
/// client-supplied delta could have been computed against stale state.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub new_quantity: i32,
    #[allow(dead_code)]
    pub quantity_diff: Option<i32>,
}

/// Resize a cart line, adjusting stock by the signed difference.
#[instrument(skip(state))]
pub async fn update_with_stock(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<ApiSuccess>> {
    LedgerService::new(state.pool())
        .resize_line(customer_id, body.product_id, body.new_quantity)
        .await?;

    Ok(ok("quantity updated"))
}

/// Remove a line from the cart, restoring its quantity to stock.
#[instrument(skip(state))]
pub async fn remove(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Path(product_id): Path<ProductId>,
) -> Result<Json<ApiSuccess>> {
    LedgerService::new(state.pool())
        .remove_from_cart(customer_id, product_id)
        .await?;

    Ok(ok("item removed and stock restored"))
}

/// Empty the cart, restoring every reservation. A no-op success when the
/// cart is already empty.
#[instrument(skip(state))]
pub async fn clear_restore(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<ApiSuccess>> {
    let cleared = LedgerService::new(state.pool()).clear_cart(customer_id).await?;

    if cleared == 0 {
        Ok(ok("cart was already empty"))
    } else {
        Ok(ok("cart emptied and stock restored"))
    }
}
