// handlers/protected/months.rs - GET /:user_id/budgets/:budget_id/months

use axum::{
    extract::{Path, State},
    response::Json,
};
use serde_json::{json, Value};

use super::budgets::owned_budget;
use super::ensure_owner;
use crate::auth::AuthContext;
use crate::error::ApiResult;
use crate::state::AppState;

/// Months of a budget, oldest first.
pub async fn list(
    State(state): State<AppState>,
    context: AuthContext,
    Path((user_id, budget_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    ensure_owner(&context, &user_id)?;
    owned_budget(&state, &user_id, &budget_id).await?;

    let months = state.months.get_months(&budget_id).await?;
    Ok(Json(json!({ "values": months })))
}
