// ABOUTME: Route definitions for the gatehouse HTTP server.
// ABOUTME: Assembles the sample API, docs, and auth bridge into one Axum Router with tracing and CORS.

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{any, get};
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::api;
use crate::app_state::SharedState;
use crate::bridge;
use crate::docs;

/// Build the complete Axum router with all routes and shared state.
///
/// CORS covers first-party routes only. The auth service answers its own
/// preflights and CORS headers, and the bridge relays them untouched.
pub fn create_router(state: SharedState) -> Router {
    let public = Router::new()
        .route("/", get(api::hello::hello))
        .route("/docs", get(docs::docs))
        .route(docs::OPENAPI_PATH, get(docs::openapi_json))
        .layer(cors_layer(&state.trusted_origins));

    Router::new()
        .route("/api/auth/{*path}", any(bridge::auth_bridge))
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS policy admitting only the trusted origins, with credentials so
/// session cookies flow on cross-origin calls.
fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(%origin, "ignoring trusted origin that is not a valid header value");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}
