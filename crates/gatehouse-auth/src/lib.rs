// ABOUTME: Authentication handler capability for gatehouse.
// ABOUTME: Defines the AuthHandler trait, its standard request/response types, and the upstream relay.

pub mod handler;
pub mod testing;
pub mod upstream;

pub use handler::{AuthError, AuthHandler, AuthRequest, AuthResponse};
pub use upstream::UpstreamAuthHandler;
