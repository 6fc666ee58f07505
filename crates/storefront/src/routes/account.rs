//! Balance and loyalty route handlers.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use minimart_core::{Grade, Money};

use crate::error::Result;
use crate::middleware::CurrentCustomer;
use crate::services::LedgerService;
use crate::state::AppState;

/// Charge request body. Amounts are whole currency units.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeRequest {
    pub amount: i64,
}

/// Charge response: the new balance and (possibly upgraded) grade.
/// `grade_changed` lets the UI celebrate a tier crossing.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChargeResponse {
    pub success: bool,
    pub new_balance: Money,
    pub new_grade: Grade,
    pub new_total_charge: Money,
    pub grade_changed: bool,
}

/// Top up the current customer's balance.
#[instrument(skip(state))]
pub async fn charge(
    State(state): State<AppState>,
    CurrentCustomer(customer_id): CurrentCustomer,
    Json(body): Json<ChargeRequest>,
) -> Result<Json<ChargeResponse>> {
    let outcome = LedgerService::new(state.pool())
        .charge(customer_id, Money::from(body.amount))
        .await?;

    if outcome.grade_changed {
        tracing::info!(%customer_id, grade = %outcome.grade, "customer reached a new grade");
    }

    Ok(Json(ChargeResponse {
        success: true,
        new_balance: outcome.new_balance,
        new_grade: outcome.grade,
        new_total_charge: outcome.new_total_charge,
        grade_changed: outcome.grade_changed,
    }))
}
