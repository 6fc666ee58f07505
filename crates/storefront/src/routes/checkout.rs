//! Checkout route handlers.

use axum::{Json, extract::State};
use serde::Deserialize;
use tracing::instrument;

use minimart_core::ProductId;

use crate::error::Result;
use crate::middleware::CurrentCustomer;
use crate::routes::{ApiSuccess, ok};
use crate::services::LedgerService;
use crate::state::AppState;

/// Check out the whole cart. Reservations become final deductions; no
/// balance moves in this flow.
#[instrument(skip(state))]
pub async fn purchase_all(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
) -> Result<Json<ApiSuccess>> {
    LedgerService::new(state.pool()).checkout_all(customer_id).await?;

    tracing::info!(%customer_id, "whole-cart checkout completed");
    Ok(ok("purchase complete"))
}

/// Selected-purchase request body. `purchase_quantity` is the final quantity
/// bought, which may differ from what the cart reserved.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseSelectedRequest {
    pub product_id: ProductId,
    pub purchase_quantity: i32,
}

/// Purchase a single cart line, debiting the balance.
#[instrument(skip(state))]
pub async fn purchase_selected(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<PurchaseSelectedRequest>,
) -> Result<Json<ApiSuccess>> {
    let debited = LedgerService::new(state.pool())
        .checkout_selected(customer_id, body.product_id, body.purchase_quantity)
        .await?;

    tracing::info!(%customer_id, product_id = %body.product_id, %debited, "selected checkout completed");
    Ok(ok(format!(
        "purchased {} item(s) for {debited}",
        body.purchase_quantity
    )))
}
