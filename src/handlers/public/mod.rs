// handlers/public/mod.rs - Public handlers (no token required)
//
// Token acquisition and operational endpoints. Inputs arrive untrusted and
// are validated here.

pub mod auth;
pub mod health;

pub use auth::{signin_get, signup_post};
pub use health::health_get;
