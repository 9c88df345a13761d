// ABOUTME: API module containing first-party HTTP handlers for gatehouse.
// ABOUTME: Request and response bodies here are typed so serde validates them and utoipa documents them.

pub mod hello;
