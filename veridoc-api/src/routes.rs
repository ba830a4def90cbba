//! API route configuration.

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::handlers;
use crate::state::AppState;

/// Creates the API router with all routes configured.
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // Metadata resolution proxy
        .route("/api/v1/metadata/resolve", get(handlers::resolve_metadata))
        .route(
            "/api/v1/metadata/candidates",
            get(handlers::list_candidates),
        )
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ApiConfig;
    use axum::body::Body;
    use axum::http::StatusCode;
    use serde_json::{json, Value};
    use tower::ServiceExt;
    use veridoc_resolve::GatewayEndpoint;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CID: &str = "bafyExampleCID1234567890123456789012345";

    fn test_app() -> Router {
        let state = Arc::new(AppState::new(ApiConfig::default()));
        create_router(state)
    }

    fn app_with_gateway(base: String) -> Router {
        let config = ApiConfig {
            gateways: vec![GatewayEndpoint::new(base)],
            ..Default::default()
        };
        create_router(Arc::new(AppState::new(config)))
    }

    async fn body_json(response: axum::response::Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_check() {
        let app = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_candidates_preview() {
        let app = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(format!("/api/v1/metadata/candidates?cid=ipfs://{}", CID))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["pointer"]["scheme"], json!("raw-cid"));
        assert_eq!(
            body["candidates"][0],
            json!(format!("https://ipfs.io/ipfs/{}", CID))
        );
    }

    #[tokio::test]
    async fn test_resolve_missing_param_is_bad_request() {
        let app = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/metadata/resolve")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resolve_unusable_pointer_is_bad_request() {
        let app = test_app();

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/api/v1/metadata/resolve?cid=%20%20")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_resolve_success_envelope() {
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path(format!("/ipfs/{}", CID)))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"name": "BSc"})))
            .mount(&gateway)
            .await;

        let app = app_with_gateway(gateway.uri());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(format!("/api/v1/metadata/resolve?cid={}", CID))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(true));
        assert_eq!(body["contentType"], json!("application/json"));
        assert_eq!(body["data"]["name"], json!("BSc"));
        assert_eq!(
            body["resolvedUrl"],
            json!(format!("{}/ipfs/{}", gateway.uri(), CID))
        );
    }

    #[tokio::test]
    async fn test_resolve_exhaustion_envelope() {
        let gateway = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&gateway)
            .await;

        let app = app_with_gateway(gateway.uri());

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri(format!("/api/v1/metadata/resolve?cid={}", CID))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        // Exhaustion is a well-formed ok:false envelope, not an HTTP error.
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["ok"], json!(false));
        assert!(body["error"].as_str().unwrap().contains("exhausted"));
        assert_eq!(
            body["candidates"][0],
            json!(format!("{}/ipfs/{}", gateway.uri(), CID))
        );
    }
}
