// ABOUTME: Sample greeting endpoint served at the root path.
// ABOUTME: Doubles as a liveness check; its typed response is published in the OpenAPI document.

use axum::Json;
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body of the greeting endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HelloResponse {
    pub hello: String,
}

/// Greeting.
///
/// testando
#[utoipa::path(
    get,
    path = "/",
    tag = "get",
    responses(
        (status = 200, description = "Greeting", body = HelloResponse),
    )
)]
pub async fn hello() -> (StatusCode, Json<HelloResponse>) {
    (
        StatusCode::OK,
        Json(HelloResponse {
            hello: "world".to_string(),
        }),
    )
}
