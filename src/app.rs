use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer};
use tracing::Level;
use utoipa::OpenApi;

use crate::core::middleware;
use crate::core::openapi::ApiDoc;
use crate::features::tickets::{routes as tickets_routes, TicketService};
use crate::shared::types::HealthResponse;

async fn health_check(State(service): State<Arc<TicketService>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        backend: service.backend().to_string(),
    })
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Assemble the full application router with its middleware stack
pub fn build_router(
    ticket_service: Arc<TicketService>,
    cors_allowed_origins: Vec<String>,
) -> Router {
    let health_route = Router::new()
        .route("/health", get(health_check))
        .with_state(Arc::clone(&ticket_service));

    Router::new()
        .merge(tickets_routes::routes(ticket_service))
        .merge(health_route)
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(middleware::cors_layer(cors_allowed_origins))
        // Propagate X-Request-Id to response headers
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(middleware::MakeSpanWithRequestId)
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        // Generate X-Request-Id using UUID v7 (or use client-provided one)
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
}

#[cfg(test)]
mod tests {
    use axum::http::{header, HeaderName, HeaderValue, StatusCode};
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::features::tickets::repositories::InMemoryTicketRepository;

    const X_REQUEST_ID: HeaderName = HeaderName::from_static("x-request-id");

    fn server() -> TestServer {
        let service = Arc::new(TicketService::new(Arc::new(
            InMemoryTicketRepository::new(),
        )));
        TestServer::new(build_router(service, vec!["*".to_string()])).unwrap()
    }

    #[tokio::test]
    async fn test_health_reports_backend() {
        let server = server();
        let response = server.get("/health").await;

        response.assert_status_ok();
        response.assert_json(&json!({ "status": "ok", "backend": "memory" }));
    }

    #[tokio::test]
    async fn test_request_id_is_generated() {
        let server = server();
        let response = server.get("/tickets").await;

        response.assert_status_ok();
        let request_id = response.header(X_REQUEST_ID);
        assert!(!request_id.is_empty());
    }

    #[tokio::test]
    async fn test_client_request_id_is_propagated() {
        let server = server();
        let response = server
            .get("/tickets")
            .add_header(X_REQUEST_ID, HeaderValue::from_static("req-123"))
            .await;

        assert_eq!(response.header(X_REQUEST_ID), "req-123");
    }

    #[tokio::test]
    async fn test_cors_allows_any_origin() {
        let server = server();
        let response = server
            .get("/tickets")
            .add_header(
                header::ORIGIN,
                HeaderValue::from_static("http://example.test"),
            )
            .await;

        assert_eq!(response.header(header::ACCESS_CONTROL_ALLOW_ORIGIN), "*");
    }

    #[tokio::test]
    async fn test_end_to_end_scenarios() {
        let server = server();

        server
            .get("/tickets/999")
            .await
            .assert_status(StatusCode::NOT_FOUND);

        let response = server
            .post("/tickets")
            .json(&json!({
                "title": "Printer broken",
                "description": "No toner",
                "status": "open"
            }))
            .await;
        response.assert_status(StatusCode::CREATED);
        response.assert_json(&json!({
            "id": "1",
            "title": "Printer broken",
            "description": "No toner",
            "status": "open"
        }));

        server
            .get("/tickets/1")
            .await
            .assert_json(&json!({
                "id": "1",
                "title": "Printer broken",
                "description": "No toner",
                "status": "open"
            }));
    }

    #[tokio::test]
    async fn test_openapi_document_served() {
        let server = server();
        let response = server.get("/api-docs/openapi.json").await;

        response.assert_status_ok();
        let doc = response.json::<serde_json::Value>();
        assert!(doc["paths"]["/tickets"].is_object());
    }
}
