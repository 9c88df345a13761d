// ABOUTME: HTTP server for gatehouse: the auth bridge, the sample API, and generated documentation.
// ABOUTME: Uses Axum with explicitly injected state; the auth handler is supplied by the caller.

pub mod api;
pub mod app_state;
pub mod bridge;
pub mod config;
pub mod docs;
pub mod routes;

pub use app_state::{AppState, SharedState};
pub use config::{ConfigError, ServerConfig};
pub use routes::create_router;
