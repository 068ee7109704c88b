// handlers/public/auth/signup.rs - POST /signup handler

use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    Form,
};
use serde::Deserialize;

use super::utils::{validate_email_format, validate_timezone};
use crate::database::{UserProfile, UserRecord};
use crate::error::{ApiResult, DomainError};
use crate::handlers::utils::clean;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SignupForm {
    pub email: String,
    pub password: String,
    pub timezone: String,
}

/// POST /signup - create an account
///
/// Responds 201 with the stored profile. The password hash never leaves
/// the store.
pub async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> ApiResult<(StatusCode, Json<UserProfile>)> {
    let email = clean(&form.email);
    let timezone = clean(&form.timezone);

    validate_email_format(&email).map_err(DomainError::validation)?;
    validate_timezone(&timezone).map_err(DomainError::validation)?;

    if state.users.get_user(&email).await?.is_some() {
        return Err(DomainError::conflict(format!("email {email} is already in use")));
    }

    let userid = state.users.generate_user_id().await?;

    tracing::debug!("generating password hash");
    let hasher = state.hasher.clone();
    let password = form.password;
    let passhash = tokio::task::spawn_blocking(move || hasher.hash(&password)).await??;

    let record = UserRecord { userid, email, timezone, passhash };
    state.users.add_user(record.clone()).await?;

    tracing::info!(userid = %record.userid, "user created");
    Ok((StatusCode::CREATED, Json(UserProfile::from(record))))
}
