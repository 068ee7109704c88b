// handlers/public/auth/signin.rs - GET /signin handler

use axum::{
    extract::{Query, State},
    response::Json,
};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::error::{ApiResult, DomainError, ResourceKind};
use crate::handlers::utils::{clean, is_truthy};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SigninQuery {
    pub email: String,
    pub password: String,
    pub rememberme: Option<String>,
}

/// GET /signin?email=&password=[&rememberme=]
///
/// Returns `{"token": ...}`. An unknown email is a user lookup failure; a
/// wrong password is an authentication failure. `rememberme` selects the
/// longer token lifetime.
pub async fn signin_get(
    State(state): State<AppState>,
    Query(query): Query<SigninQuery>,
) -> ApiResult<Json<Value>> {
    let email = clean(&query.email);

    let user = state
        .users
        .get_user(&email)
        .await?
        .ok_or_else(|| DomainError::not_found(ResourceKind::User, format!("user {email} does not exist")))?;

    // argon2 is CPU-bound
    let hasher = state.hasher.clone();
    let password = query.password;
    let passhash = user.passhash;
    let valid = tokio::task::spawn_blocking(move || hasher.verify(&password, &passhash)).await??;

    if !valid {
        tracing::warn!(userid = %user.userid, "signin rejected: wrong password");
        return Err(DomainError::authentication("Invalid login"));
    }

    let token = if is_truthy(query.rememberme.as_deref()) {
        state.tokens.issue_remembered(&user.userid)?
    } else {
        state.tokens.issue(&user.userid)?
    };

    tracing::info!(userid = %user.userid, "signin succeeded");
    Ok(Json(json!({ "token": token })))
}
