//! Solbound Action Server
//!
//! HTTP surface for the burn-to-mint issuer, speaking the Solana Actions
//! shape wallets expect.
//!
//! # Routes
//!
//! ```text
//! GET     /api/actions/mint   - action description (icon, label, title, description)
//! OPTIONS /api/actions/mint   - same as GET
//! POST    /api/actions/mint   - {"account"} -> {"transaction"} or 400 {"message"}
//! GET     /health             - liveness and inventory size
//! GET     /status             - issued versus remaining, from the registry
//! GET     <icon path>         - the action icon, when configured as a local path
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use axum::{
    http::{header, HeaderValue},
    middleware,
    response::Response,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub use crate::config::ServerConfig;
pub use error::{AppError, AppResult, ErrorResponse};
pub use state::AppState;

/// Path of the mint action
pub const ACTION_PATH: &str = "/api/actions/mint";

/// CORS headers every action response carries
pub const ACTIONS_CORS_HEADERS: [(header::HeaderName, &str); 3] = [
    (header::ACCESS_CONTROL_ALLOW_ORIGIN, "*"),
    (header::ACCESS_CONTROL_ALLOW_METHODS, "GET,POST,PUT,OPTIONS"),
    (
        header::ACCESS_CONTROL_ALLOW_HEADERS,
        "Content-Type, Authorization, Content-Encoding, Accept-Encoding",
    ),
];

/// Create the router with all middleware
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route(
            ACTION_PATH,
            get(routes::get_action)
                .post(routes::post_action)
                .options(routes::get_action),
        )
        .route("/health", get(routes::health))
        .route("/status", get(routes::inventory_status));

    if let Some(path) = local_icon_route(&state.action.icon) {
        router = router.route(path, get(routes::icon));
    }

    router
        .with_state(state)
        .layer(middleware::map_response(with_actions_cors))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
}

/// Wallets call actions cross-origin, preflight included, so the headers are
/// set on every response rather than negotiated.
async fn with_actions_cors(mut response: Response) -> Response {
    let headers = response.headers_mut();
    for (name, value) in ACTIONS_CORS_HEADERS {
        headers.insert(name, HeaderValue::from_static(value));
    }
    response
}

/// Icon paths the server can serve itself
fn local_icon_route(icon: &str) -> Option<&str> {
    let servable = icon.starts_with('/')
        && icon.len() > 1
        && icon != ACTION_PATH
        && icon != "/health"
        && icon != "/status"
        && !icon.contains(|c: char| matches!(c, ':' | '*' | '{' | '}'));
    servable.then_some(icon)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_local_icon_route() {
        assert_eq!(local_icon_route("/solbound.png"), Some("/solbound.png"));
        assert_eq!(local_icon_route("/icons/og.png"), Some("/icons/og.png"));
        assert_eq!(local_icon_route("https://cdn.test/icon.png"), None);
        assert_eq!(local_icon_route("/"), None);
        assert_eq!(local_icon_route("/health"), None);
        assert_eq!(local_icon_route("/icons/:id"), None);
    }
}
