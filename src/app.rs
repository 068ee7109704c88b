//! Router assembly.

use axum::{
    http::{HeaderValue, StatusCode},
    response::Response,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::error::message_response;
use crate::handlers::{self, budgets, months};
use crate::middleware::{Pipeline, RequiredArgs};
use crate::state::AppState;

pub fn app(state: AppState, config: &AppConfig) -> Router {
    let mut router = Router::new()
        // Operational
        .route("/health", get(handlers::health_get))
        // Credentials
        .merge(auth_routes(&state))
        // Per-user resources
        .merge(budget_routes(&state))
        .fallback(not_found)
        .with_state(state);

    if config.security.enable_cors {
        router = router.layer(cors_layer(config));
    }
    if config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router
}

fn auth_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/signin",
            Pipeline::new()
                .required_args(RequiredArgs::query(&["email", "password"]))
                .wrap(get(handlers::signin_get), state),
        )
        .route(
            "/signup",
            Pipeline::new()
                .required_args(RequiredArgs::form(&["email", "password", "timezone"]))
                .wrap(post(handlers::signup_post), state),
        )
}

fn budget_routes(state: &AppState) -> Router<AppState> {
    let protected = || Pipeline::new().requires_token();

    Router::new()
        .route(
            "/:user_id/budgets",
            protected()
                .required_args(RequiredArgs::form(&["displayname"]))
                .wrap(post(budgets::create), state)
                .merge(protected().wrap(get(budgets::list), state)),
        )
        .route(
            "/:user_id/budgets/:budget_id",
            protected().wrap(
                get(budgets::get).patch(budgets::update).delete(budgets::remove),
                state,
            ),
        )
        .route(
            "/:user_id/budgets/:budget_id/months",
            protected().wrap(get(months::list), state),
        )
}

async fn not_found() -> Response {
    message_response(StatusCode::NOT_FOUND, "Not found")
}

/// Permissive in development; otherwise only the configured origins.
fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.is_development() || config.security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(tower_http::cors::Any)
        .allow_headers(tower_http::cors::Any)
}
