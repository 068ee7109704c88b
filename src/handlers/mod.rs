// handlers/mod.rs - Two-tier handler layout
//
// Public (no token) → Protected (token + ownership of the addressed user id).
// Each tier only declares handler functions; route registration and the
// request pipeline live in `app`.

pub mod protected;
pub mod public;
pub mod utils;

pub use protected::{budgets, months};
pub use public::{health_get, signin_get, signup_post};
