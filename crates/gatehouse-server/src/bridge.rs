// ABOUTME: Auth bridge relaying every /api/auth/* request to the injected AuthHandler.
// ABOUTME: Converts axum requests into standard AuthRequests and the handler's reply back, failing closed with a 500.

use std::panic::AssertUnwindSafe;

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, StatusCode, Uri, header};
use axum::response::{IntoResponse, Response};
use futures::FutureExt;
use gatehouse_auth::{AuthError, AuthHandler, AuthRequest, AuthResponse};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

use crate::app_state::SharedState;

/// Largest request body the bridge will buffer before giving up.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub const AUTH_FAILURE_MESSAGE: &str = "Internal authentication error";
pub const AUTH_FAILURE_CODE: &str = "AUTH_FAILURE";

/// Error payload returned when the bridge cannot produce the handler's reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    /// Human-readable message. Never contains internal details.
    pub error: String,
    /// Stable machine-readable code.
    pub code: String,
}

impl ErrorBody {
    pub fn auth_failure() -> Self {
        Self {
            error: AUTH_FAILURE_MESSAGE.to_string(),
            code: AUTH_FAILURE_CODE.to_string(),
        }
    }
}

/// Ways relaying a request through the bridge can fail.
#[derive(Debug, Error)]
pub enum BridgeError {
    #[error("request carries no host to build an absolute URL from")]
    MissingHost,

    #[error("cannot build request URL: {0}")]
    InvalidUrl(#[from] axum::http::Error),

    #[error("cannot read request body: {0}")]
    Body(#[source] axum::Error),

    #[error(transparent)]
    Handler(#[from] AuthError),

    #[error("auth handler panicked")]
    Panicked,
}

/// Relay an authentication request to the auth service.
///
/// Every HTTP method is accepted and forwarded; the reply of the auth
/// service is returned with its status, headers and body unchanged.
#[utoipa::path(
    post,
    path = "/api/auth/{path}",
    tag = "auth",
    params(
        ("path" = String, Path, description = "Auth route, forwarded verbatim"),
    ),
    responses(
        (status = 200, description = "Reply of the auth service, relayed unchanged"),
        (status = 500, description = "The request could not be relayed", body = ErrorBody),
    )
)]
pub async fn auth_bridge(State(state): State<SharedState>, request: Request) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();

    match forward(state.auth.as_ref(), request).await {
        Ok(response) => response,
        Err(err) => {
            tracing::error!(%method, %path, error = %err, "auth bridge failed");
            auth_failure()
        }
    }
}

/// Relay `request` through `handler` and convert the reply.
pub async fn forward(handler: &dyn AuthHandler, request: Request) -> Result<Response, BridgeError> {
    let auth_request = to_auth_request(request).await?;

    let auth_response = AssertUnwindSafe(handler.handle(auth_request))
        .catch_unwind()
        .await
        .map_err(|_| BridgeError::Panicked)??;

    Ok(from_auth_response(auth_response))
}

/// The fixed reply sent when relaying fails.
pub fn auth_failure() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorBody::auth_failure()),
    )
        .into_response()
}

async fn to_auth_request(request: Request) -> Result<AuthRequest, BridgeError> {
    let (parts, body) = request.into_parts();
    let uri = absolute_uri(&parts.headers, &parts.uri)?;

    let mut headers = HeaderMap::with_capacity(parts.headers.len());
    for (name, value) in &parts.headers {
        if value.is_empty() {
            continue;
        }
        headers.append(name.clone(), value.clone());
    }

    // Raw bytes go through untouched; an empty buffer means no body.
    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(BridgeError::Body)?;

    let mut auth_request = AuthRequest::new(body);
    *auth_request.method_mut() = parts.method;
    *auth_request.uri_mut() = uri;
    *auth_request.headers_mut() = headers;
    Ok(auth_request)
}

/// Rebuild `http://{host}{path?query}` from the Host header, falling back to
/// the URI authority that HTTP/2 requests carry instead.
fn absolute_uri(headers: &HeaderMap, uri: &Uri) -> Result<Uri, BridgeError> {
    let host = headers
        .get(header::HOST)
        .and_then(|h| h.to_str().ok())
        .filter(|h| !h.is_empty())
        .or_else(|| uri.authority().map(|a| a.as_str()))
        .ok_or(BridgeError::MissingHost)?;
    let path_and_query = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    Ok(Uri::builder()
        .scheme("http")
        .authority(host)
        .path_and_query(path_and_query)
        .build()?)
}

fn from_auth_response(response: AuthResponse) -> Response {
    let (parts, body) = response.into_parts();
    let body = if body.is_empty() {
        Body::empty()
    } else {
        Body::from(body)
    };

    let mut reply = Response::new(body);
    *reply.status_mut() = parts.status;
    *reply.headers_mut() = parts.headers;
    reply
}
