// ABOUTME: The AuthHandler trait and the standard request/response representation it speaks.
// ABOUTME: Anything that can answer an authentication request implements this, real or fake.

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

/// A request addressed to an auth handler. The URI is absolute and an empty
/// body means the caller sent none.
pub type AuthRequest = http::Request<Bytes>;

/// A response produced by an auth handler.
pub type AuthResponse = http::Response<Bytes>;

/// Errors an auth handler can fail with.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("auth upstream request failed: {0}")]
    Upstream(#[from] reqwest::Error),

    #[error("cannot build auth upstream URL: {0}")]
    InvalidTarget(String),

    #[error("auth handler rejected the request: {0}")]
    Rejected(String),
}

/// An opaque component that resolves authentication requests (sign-in,
/// session lookup, sign-out, ...).
///
/// The gateway never inspects what the handler does; it only relays the
/// request in and the response out.
#[async_trait]
pub trait AuthHandler: Send + Sync {
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError>;
}
