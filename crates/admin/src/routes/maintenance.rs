//! Destructive maintenance operations.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use crate::db::CustomerRepository;
use crate::error::Result;
use crate::middleware::RequireAdmin;
use crate::state::AppState;

/// Resync response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ResyncResponse {
    pub success: bool,
    pub updated_count: u64,
}

/// Rewrite every customer's cumulative charge total to their current
/// balance, letting grades recompute from there.
///
/// A disaster-recovery tool: real charge history is discarded. It is never
/// scheduled; an operator has to ask for it.
#[instrument(skip(state))]
pub async fn resync_grades(
    State(state): State<AppState>,
    _admin: RequireAdmin,
) -> Result<Json<ResyncResponse>> {
    tracing::warn!("resyncing charge totals from balances - historical charge totals are discarded");

    let updated_count = CustomerRepository::new(state.pool())
        .resync_charge_totals()
        .await?;

    tracing::info!(updated_count, "grade resync complete");
    Ok(Json(ResyncResponse {
        success: true,
        updated_count,
    }))
}
