// handlers/protected/mod.rs - Protected handlers (token required)
//
// Every route here is addressed as /:user_id/... and runs behind the token
// stage. Handlers receive the caller's `AuthContext` and must confirm it owns
// the addressed user id before touching any data.

pub mod budgets;
pub mod months;

use crate::auth::AuthContext;
use crate::error::{ApiResult, DomainError};

/// Reject callers addressing another user's resources.
pub fn ensure_owner(context: &AuthContext, user_id: &str) -> ApiResult<()> {
    if context.user_id != user_id {
        tracing::warn!(caller = %context.user_id, target = %user_id, "ownership check failed");
        return Err(DomainError::authorization("Not permitted to access this user's resources"));
    }
    Ok(())
}
