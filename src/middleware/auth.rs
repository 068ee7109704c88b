use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap, HeaderName},
    middleware::Next,
    response::Response,
};

use crate::auth::AuthContext;
use crate::error::DomainError;
use crate::state::AppState;

const NO_TOKEN: &str = "No token provided";

/// Token authorization stage.
///
/// Verifies the token in the configured header and injects the caller's
/// [`AuthContext`] into the request before it reaches the handler.
pub async fn requires_token(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, DomainError> {
    let token = extract_token(request.headers(), &state.token_header)?;
    let context = state.tokens.verify(&token)?;

    tracing::debug!(user_id = %context.user_id, "token verified");
    request.extensions_mut().insert(context);

    Ok(next.run(request).await)
}

/// Pull the raw token out of `header`, accepting an optional `Bearer ` prefix.
fn extract_token(headers: &HeaderMap, header: &HeaderName) -> Result<String, DomainError> {
    let value = headers
        .get(header)
        .ok_or_else(|| DomainError::authentication(NO_TOKEN))?;

    let value = value
        .to_str()
        .map_err(|_| DomainError::MalformedToken("token header is not valid ASCII".to_string()))?;

    let token = value.strip_prefix("Bearer ").unwrap_or(value).trim();
    if token.is_empty() {
        return Err(DomainError::authentication(NO_TOKEN));
    }

    Ok(token.to_string())
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthContext
where
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthContext>()
            .cloned()
            .ok_or_else(|| DomainError::authentication(NO_TOKEN))
    }
}
