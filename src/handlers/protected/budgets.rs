// handlers/protected/budgets.rs - /:user_id/budgets[/:budget_id]

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    Form,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::{json, Value};

use super::ensure_owner;
use crate::auth::AuthContext;
use crate::database::{BudgetRecord, BudgetUpdate};
use crate::error::{ApiResult, DomainError, ResourceKind};
use crate::handlers::utils::clean;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateBudgetForm {
    pub displayname: String,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct UpdateBudgetForm {
    pub displayname: Option<String>,
    pub notes: Option<String>,
}

/// Fetch a budget owned by `user_id`. Budgets of other users are reported
/// as absent.
pub(crate) async fn owned_budget(state: &AppState, user_id: &str, budget_id: &str) -> ApiResult<BudgetRecord> {
    match state.budgets.get_budget(budget_id).await? {
        Some(budget) if budget.userid == user_id => Ok(budget),
        _ => Err(DomainError::not_found(
            ResourceKind::Budget,
            format!("budget with id {budget_id} not found"),
        )),
    }
}

/// POST /:user_id/budgets
pub async fn create(
    State(state): State<AppState>,
    context: AuthContext,
    Path(user_id): Path<String>,
    Form(form): Form<CreateBudgetForm>,
) -> ApiResult<(StatusCode, Json<BudgetRecord>)> {
    ensure_owner(&context, &user_id)?;

    let budget = BudgetRecord {
        budgetid: state.budgets.generate_budget_id().await?,
        userid: user_id,
        displayname: clean(&form.displayname),
        budgetnotes: form.notes.as_deref().map(clean).unwrap_or_default(),
        accessdate: Utc::now(),
    };

    tracing::debug!(budgetid = %budget.budgetid, "adding budget");
    state.budgets.add_budget(budget.clone()).await?;
    tracing::info!(budgetid = %budget.budgetid, userid = %budget.userid, "budget created");

    Ok((StatusCode::CREATED, Json(budget)))
}

/// GET /:user_id/budgets
pub async fn list(
    State(state): State<AppState>,
    context: AuthContext,
    Path(user_id): Path<String>,
) -> ApiResult<Json<Value>> {
    ensure_owner(&context, &user_id)?;

    let budgets = state.budgets.get_budgets(&user_id).await?;
    tracing::debug!(userid = %user_id, count = budgets.len(), "fetched budgets");

    Ok(Json(json!({ "values": budgets })))
}

/// GET /:user_id/budgets/:budget_id
pub async fn get(
    State(state): State<AppState>,
    context: AuthContext,
    Path((user_id, budget_id)): Path<(String, String)>,
) -> ApiResult<Json<BudgetRecord>> {
    ensure_owner(&context, &user_id)?;
    Ok(Json(owned_budget(&state, &user_id, &budget_id).await?))
}

/// PATCH /:user_id/budgets/:budget_id
///
/// Only supplied fields change; the access date is always refreshed.
pub async fn update(
    State(state): State<AppState>,
    context: AuthContext,
    Path((user_id, budget_id)): Path<(String, String)>,
    Form(form): Form<UpdateBudgetForm>,
) -> ApiResult<Json<BudgetRecord>> {
    ensure_owner(&context, &user_id)?;
    owned_budget(&state, &user_id, &budget_id).await?;

    let update = BudgetUpdate {
        displayname: form.displayname.as_deref().map(clean).filter(|name| !name.is_empty()),
        budgetnotes: form.notes.as_deref().map(clean),
        accessdate: Some(Utc::now()),
    };

    let budget = state.budgets.update_budget(&budget_id, update).await?;
    tracing::info!(budgetid = %budget_id, "budget updated");

    Ok(Json(budget))
}

/// DELETE /:user_id/budgets/:budget_id
pub async fn remove(
    State(state): State<AppState>,
    context: AuthContext,
    Path((user_id, budget_id)): Path<(String, String)>,
) -> ApiResult<Json<Value>> {
    ensure_owner(&context, &user_id)?;
    owned_budget(&state, &user_id, &budget_id).await?;

    state.budgets.delete_budget(&budget_id).await?;
    tracing::info!(budgetid = %budget_id, "budget deleted");

    Ok(Json(json!({})))
}
