// ABOUTME: Shared application state for the gatehouse HTTP server.
// ABOUTME: Holds the injected auth handler and trusted origins; built once at startup and passed in.

use std::sync::Arc;

use gatehouse_auth::AuthHandler;

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    /// Resolves every request under the reserved `/api/auth/` prefix.
    pub auth: Arc<dyn AuthHandler>,
    /// Browser origins allowed to call the API with credentials.
    pub trusted_origins: Vec<String>,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create state around `auth` with no trusted origins.
    pub fn new(auth: Arc<dyn AuthHandler>) -> Self {
        Self {
            auth,
            trusted_origins: Vec::new(),
        }
    }

    pub fn with_trusted_origins(mut self, origins: Vec<String>) -> Self {
        self.trusted_origins = origins;
        self
    }
}
