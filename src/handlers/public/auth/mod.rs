// handlers/public/auth/mod.rs - Credential endpoints
//
// GET /signin exchanges an email and password for a token.
// POST /signup creates an account.

pub mod signin;
pub mod signup;
pub mod utils;

pub use signin::signin_get;
pub use signup::signup_post;
