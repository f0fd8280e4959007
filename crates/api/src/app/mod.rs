//! HTTP API application wiring (Axum router + service wiring).
//!
//! - `services.rs`: shared state (session registry, request limits)
//! - `routes/`: HTTP routes + handlers
//! - `dto.rs`: request DTOs and JSON mapping helpers
//! - `errors.rs`: consistent error responses

use std::sync::Arc;

use axum::{Extension, Router, routing::get};
use tower::ServiceBuilder;

use crate::config::ApiConfig;

pub mod dto;
pub mod errors;
pub mod routes;
pub mod services;

/// Build the full HTTP router (public entrypoint used by `main.rs`).
pub fn build_app(config: &ApiConfig) -> Router {
    let services = Arc::new(services::AppServices::new(config.max_amount));

    Router::new()
        .route("/health", get(routes::system::health))
        .merge(routes::router().layer(Extension(services)))
        .layer(ServiceBuilder::new())
}

#[cfg(test)]
mod tests {
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode, header};
    use serde_json::{Value, json};
    use tower::ServiceExt;

    use super::*;

    async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, body)
    }

    fn post_json(uri: &str, body: &str) -> Request<Body> {
        Request::post(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get(uri: &str) -> Request<Body> {
        Request::get(uri).body(Body::empty()).unwrap()
    }

    async fn open_session(app: &Router) -> String {
        let (status, body) = send(app, Request::post("/sessions").body(Body::empty()).unwrap()).await;
        assert_eq!(status, StatusCode::CREATED);
        body["session_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn over_removal_is_a_conflict_with_current_quantity() {
        let app = build_app(&ApiConfig::default());
        let session = open_session(&app).await;

        let add = json!({ "name": "widget", "amount": 2 }).to_string();
        let (status, _) = send(&app, post_json(&format!("/sessions/{session}/items"), &add)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, body) = send(
            &app,
            post_json(&format!("/sessions/{session}/items/widget/remove"), r#"{"amount":5}"#),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["error"], "insufficient_stock");
        assert_eq!(body["item"], "widget");
        assert_eq!(body["current"], 2);
        assert_eq!(body["requested"], 5);
    }

    #[tokio::test]
    async fn malformed_session_id_is_invalid_id() {
        let app = build_app(&ApiConfig::default());

        let (status, body) = send(&app, get("/sessions/not-a-session/items")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_id");
    }

    #[tokio::test]
    async fn malformed_json_body_is_invalid_input() {
        let app = build_app(&ApiConfig::default());
        let session = open_session(&app).await;

        let (status, body) =
            send(&app, post_json(&format!("/sessions/{session}/items"), "{not json")).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
        assert!(body["message"].is_string());

        let (status, body) = send(
            &app,
            post_json(&format!("/sessions/{session}/items/widget/remove"), r#"{"amount":"two"}"#),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");
    }

    #[tokio::test]
    async fn non_numeric_history_limit_is_invalid_input() {
        let app = build_app(&ApiConfig::default());
        let session = open_session(&app).await;

        let (status, body) = send(&app, get(&format!("/sessions/{session}/history?limit=abc"))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "invalid_input");

        let (status, body) = send(&app, get(&format!("/sessions/{session}/history?limit=1"))).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["count"], 0);
    }

    #[tokio::test]
    async fn health_answers_without_a_session() {
        let app = build_app(&ApiConfig::default());
        let (status, body) = send(&app, get("/health")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
