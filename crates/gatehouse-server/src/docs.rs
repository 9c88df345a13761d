// ABOUTME: OpenAPI document generation and the Swagger UI documentation page.
// ABOUTME: The document is derived from annotated handlers; the page is an Askama template loading it.

use askama::Template;
use askama_derive_axum::IntoResponse as AskamaIntoResponse;
use axum::Json;
use utoipa::OpenApi;

use crate::api::hello::HelloResponse;
use crate::bridge::ErrorBody;

/// Path the OpenAPI document is served at.
pub const OPENAPI_PATH: &str = "/swagger.json";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "gatehouse",
        description = "HTTP API with authentication delegated to an external auth service"
    ),
    paths(crate::api::hello::hello, crate::bridge::auth_bridge),
    components(schemas(HelloResponse, ErrorBody)),
    tags(
        (name = "get", description = "Sample endpoints"),
        (name = "auth", description = "Authentication routes relayed to the auth service")
    )
)]
pub struct ApiDoc;

/// GET /swagger.json - The generated OpenAPI document.
pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Documentation page rendering Swagger UI against the OpenAPI document.
#[derive(Template, AskamaIntoResponse)]
#[template(path = "docs.html")]
pub struct DocsTemplate {
    pub title: String,
    pub spec_url: String,
}

/// GET /docs - Render the documentation page.
pub async fn docs() -> DocsTemplate {
    DocsTemplate {
        title: "gatehouse API".to_string(),
        spec_url: OPENAPI_PATH.to_string(),
    }
}
