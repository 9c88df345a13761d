// ABOUTME: Test utilities for gatehouse-auth, including stub auth handlers.
// ABOUTME: Used in tests to stand in for the external auth service without a network.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, StatusCode};

use crate::handler::{AuthError, AuthHandler, AuthRequest, AuthResponse};

/// A stub auth handler that answers every request with the same response
/// and remembers the requests it was given.
#[derive(Debug, Clone)]
pub struct StubAuthHandler {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
    received: Arc<Mutex<Vec<AuthRequest>>>,
}

impl StubAuthHandler {
    /// Create a stub that replies with `status` and `body` and no headers.
    pub fn new(status: StatusCode, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
            received: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Create a stub that replies 200 with a JSON session payload.
    pub fn session() -> Self {
        Self::new(
            StatusCode::OK,
            r#"{"user":{"id":"u_1","email":"ada@example.com"}}"#,
        )
        .with_header("content-type", "application/json")
    }

    /// Add a response header. Calling this twice with the same name yields a
    /// multi-valued header.
    pub fn with_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers.append(name, HeaderValue::from_static(value));
        self
    }

    /// Requests received so far, oldest first.
    pub fn received(&self) -> Vec<AuthRequest> {
        self.received
            .lock()
            .map(|r| r.iter().map(clone_request).collect())
            .unwrap_or_default()
    }
}

fn clone_request(req: &AuthRequest) -> AuthRequest {
    let mut out = AuthRequest::new(req.body().clone());
    *out.method_mut() = req.method().clone();
    *out.uri_mut() = req.uri().clone();
    *out.version_mut() = req.version();
    *out.headers_mut() = req.headers().clone();
    out
}

#[async_trait]
impl AuthHandler for StubAuthHandler {
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(request);
        }

        let mut response = AuthResponse::new(self.body.clone());
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        Ok(response)
    }
}

/// A stub auth handler that fails every request.
#[derive(Debug, Clone)]
pub struct FailingAuthHandler {
    message: String,
}

impl FailingAuthHandler {
    pub fn new(message: &str) -> Self {
        Self {
            message: message.to_owned(),
        }
    }
}

#[async_trait]
impl AuthHandler for FailingAuthHandler {
    async fn handle(&self, _request: AuthRequest) -> Result<AuthResponse, AuthError> {
        Err(AuthError::Rejected(self.message.clone()))
    }
}
