// ABOUTME: AuthHandler implementation that relays requests to an external auth service over HTTP.
// ABOUTME: Preserves method, path, query, headers and raw body; returns the service's reply untouched.

use async_trait::async_trait;
use http::header::{HeaderMap, HeaderName};
use reqwest::Url;
use reqwest::redirect::Policy;

use crate::handler::{AuthError, AuthHandler, AuthRequest, AuthResponse};

/// Relays authentication requests to a service reachable at `base_url`.
#[derive(Debug, Clone)]
pub struct UpstreamAuthHandler {
    client: reqwest::Client,
    base_url: Url,
}

impl UpstreamAuthHandler {
    /// Create a handler targeting `base_url`. Redirects are not followed so
    /// that OAuth and sign-out redirects reach the browser as issued.
    pub fn new(base_url: Url) -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .redirect(Policy::none())
            .build()?;
        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Resolve the upstream URL for an inbound request URI. The request's
    /// absolute path replaces any path on the base URL.
    pub fn target_url(&self, uri: &http::Uri) -> Result<Url, AuthError> {
        let path_and_query = uri
            .path_and_query()
            .map(|pq| pq.as_str())
            .unwrap_or("/");
        self.base_url
            .join(path_and_query)
            .map_err(|e| AuthError::InvalidTarget(e.to_string()))
    }
}

/// Copy `headers`, dropping hop-by-hop entries. Every value of a multi-valued
/// header is kept.
pub fn relayable_headers(headers: &HeaderMap) -> HeaderMap {
    let mut out = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if is_hop_by_hop(name) {
            continue;
        }
        out.append(name.clone(), value.clone());
    }
    out
}

/// Connection-scoped headers describe a single hop and are not relayed.
/// `content-length` is recomputed by the transport.
fn is_hop_by_hop(name: &HeaderName) -> bool {
    matches!(
        name.as_str(),
        "connection"
            | "keep-alive"
            | "proxy-connection"
            | "te"
            | "transfer-encoding"
            | "upgrade"
            | "content-length"
    )
}

#[async_trait]
impl AuthHandler for UpstreamAuthHandler {
    async fn handle(&self, request: AuthRequest) -> Result<AuthResponse, AuthError> {
        let (parts, body) = request.into_parts();
        let url = self.target_url(&parts.uri)?;

        tracing::debug!(method = %parts.method, %url, "relaying auth request upstream");

        let mut builder = self
            .client
            .request(parts.method, url)
            .headers(relayable_headers(&parts.headers));
        if !body.is_empty() {
            builder = builder.body(body);
        }

        let upstream = builder.send().await?;
        let status = upstream.status();
        let headers = relayable_headers(upstream.headers());
        let body = upstream.bytes().await?;

        let mut response = AuthResponse::new(body);
        *response.status_mut() = status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}
