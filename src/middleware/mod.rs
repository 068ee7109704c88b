//! Request pipeline.
//!
//! Every endpoint runs through the same fixed order:
//! exception handler, argument validation, token authorization, handler.
//! [`Pipeline`] composes the stages an endpoint asks for in that order no
//! matter which order the builder methods are called in.

pub mod auth;
pub mod exception;
pub mod required_args;

use axum::extract::DefaultBodyLimit;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::MethodRouter;

use crate::state::AppState;

pub use auth::requires_token;
pub use exception::exception_handler;
pub use required_args::{required_args, ArgSource, RequiredArgs};

#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    args: Option<RequiredArgs>,
    token: bool,
}

impl Pipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn required_args(mut self, args: RequiredArgs) -> Self {
        self.args = Some(args);
        self
    }

    pub fn requires_token(mut self) -> Self {
        self.token = true;
        self
    }

    /// Wrap `route` in the configured stages.
    ///
    /// Layers added later run first, so the innermost stage goes on first.
    /// Argument and token stages only see requests for a registered method.
    /// Bodies read by any stage or extractor are capped at `state.body_limit`.
    pub fn wrap(self, route: MethodRouter<AppState>, state: &AppState) -> MethodRouter<AppState> {
        let mut route = route;

        if self.token {
            route = route.route_layer(from_fn_with_state(state.clone(), requires_token));
        }
        if let Some(args) = self.args {
            route = route.route_layer(from_fn_with_state(args, required_args));
        }

        route
            .layer(DefaultBodyLimit::max(state.body_limit))
            .layer(from_fn(exception_handler))
    }
}
