// ABOUTME: End-to-end smoke tests for the gatehouse HTTP surface.
// ABOUTME: Drives the full router against a stub auth handler and against a live fake auth service.

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::Request as AxumRequest;
use axum::response::Response;
use axum::routing::any;
use gatehouse_auth::testing::{FailingAuthHandler, StubAuthHandler};
use gatehouse_auth::{AuthHandler, UpstreamAuthHandler};
use gatehouse_server::{AppState, create_router};
use http::{Request, StatusCode};
use tower::ServiceExt;

fn router_with(auth: Arc<dyn AuthHandler>) -> Router {
    create_router(Arc::new(
        AppState::new(auth).with_trusted_origins(vec!["http://localhost:3333".to_string()]),
    ))
}

/// Helper to extract JSON body from a response.
async fn json_body(resp: Response) -> serde_json::Value {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

async fn text_body(resp: Response) -> String {
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(body.to_vec()).unwrap()
}

#[tokio::test]
async fn smoke_test_public_surface() {
    let stub = StubAuthHandler::session()
        .with_header("set-cookie", "better-auth.session_token=abc; Path=/; HttpOnly");
    let auth: Arc<dyn AuthHandler> = Arc::new(stub.clone());

    // 1. GET / -> greeting
    let resp = router_with(Arc::clone(&auth))
        .oneshot(Request::get("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "greeting should return 200");
    assert_eq!(json_body(resp).await, serde_json::json!({ "hello": "world" }));

    // 2. GET /swagger.json -> OpenAPI document covering / and the auth prefix
    let resp = router_with(Arc::clone(&auth))
        .oneshot(Request::get("/swagger.json").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "openapi document should return 200");
    let doc = json_body(resp).await;
    assert!(doc["paths"]["/"]["get"].is_object());
    assert!(doc["paths"]["/api/auth/{path}"].is_object());

    // 3. GET /docs -> HTML page
    let resp = router_with(Arc::clone(&auth))
        .oneshot(Request::get("/docs").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "docs should return 200");
    let html = text_body(resp).await;
    assert!(html.contains("<!DOCTYPE html>"));
    assert!(html.contains("swagger-ui"));

    // 4. GET /api/auth/session with a session cookie -> relayed
    let resp = router_with(Arc::clone(&auth))
        .oneshot(
            Request::get("/api/auth/session")
                .header("host", "localhost:3333")
                .header("cookie", "better-auth.session_token=abc")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), 200, "session lookup should return 200");
    assert_eq!(
        resp.headers().get("set-cookie").unwrap(),
        "better-auth.session_token=abc; Path=/; HttpOnly"
    );
    let session = json_body(resp).await;
    assert_eq!(session["user"]["email"], "ada@example.com");

    let received = stub.received();
    assert_eq!(received.len(), 1, "auth handler should be called once");
    assert_eq!(received[0].method(), http::Method::GET);
    assert!(received[0].body().is_empty());
}

#[tokio::test]
async fn smoke_test_auth_failure_is_opaque() {
    let resp = router_with(Arc::new(FailingAuthHandler::new(
        "relation \"user\" does not exist",
    )))
    .oneshot(
        Request::post("/api/auth/sign-in/email")
            .header("host", "localhost:3333")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"email":"ada@example.com","password":"hunter22"}"#))
            .unwrap(),
    )
    .await
    .unwrap();

    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = text_body(resp).await;
    assert!(!text.contains("relation"), "internal details must not leak: {}", text);
    let json: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(json["error"], "Internal authentication error");
    assert_eq!(json["code"], "AUTH_FAILURE");
}

/// Fake auth service: signs the caller in and echoes what it received.
async fn fake_auth_service(req: AxumRequest) -> Response {
    let host = req
        .headers()
        .get("host")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let path = req.uri().to_string();
    let body = axum::body::to_bytes(req.into_body(), usize::MAX)
        .await
        .unwrap();

    let echo = serde_json::json!({
        "host": host,
        "path": path,
        "body": String::from_utf8_lossy(&body),
    });
    Response::builder()
        .status(StatusCode::OK)
        .header("content-type", "application/json")
        .header("set-cookie", "better-auth.session_token=new; Path=/; HttpOnly")
        .header("set-cookie", "better-auth.session_data=cache; Path=/")
        .body(Body::from(echo.to_string()))
        .unwrap()
}

#[tokio::test]
async fn smoke_test_relay_through_live_auth_service() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let upstream = Router::new().route("/api/auth/{*rest}", any(fake_auth_service));
    tokio::spawn(async move {
        axum::serve(listener, upstream).await.unwrap();
    });

    let handler = UpstreamAuthHandler::new(format!("http://{}", addr).parse().unwrap()).unwrap();
    let app = router_with(Arc::new(handler));
    let sign_in = r#"{"email":"ada@example.com","password":"hunter22"}"#;

    let resp = app
        .oneshot(
            Request::post("/api/auth/sign-in/email?callbackURL=%2Fhome")
                .header("host", "localhost:3333")
                .header("content-type", "application/json")
                .body(Body::from(sign_in))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), 200);
    let cookies: Vec<_> = resp.headers().get_all("set-cookie").iter().collect();
    assert_eq!(
        cookies,
        vec![
            "better-auth.session_token=new; Path=/; HttpOnly",
            "better-auth.session_data=cache; Path=/"
        ]
    );

    let echo = json_body(resp).await;
    assert_eq!(echo["host"], "localhost:3333");
    assert_eq!(echo["path"], "/api/auth/sign-in/email?callbackURL=%2Fhome");
    assert_eq!(echo["body"], sign_in);
}
