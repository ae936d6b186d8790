use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppJson;
use crate::features::tickets::dtos::CreateTicketDto;
use crate::features::tickets::models::Ticket;
use crate::features::tickets::services::TicketService;
use crate::shared::types::ErrorResponse;

/// List all tickets
#[utoipa::path(
    get,
    path = "/tickets",
    responses(
        (status = 200, description = "Every stored ticket", body = Vec<Ticket>),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn list_tickets(
    State(service): State<Arc<TicketService>>,
) -> Result<Json<Vec<Ticket>>> {
    let tickets = service.get_all().await?;
    Ok(Json(tickets))
}

/// Get ticket by ID
#[utoipa::path(
    get,
    path = "/tickets/{id}",
    params(
        ("id" = String, Path, description = "Ticket ID")
    ),
    responses(
        (status = 200, description = "Ticket found", body = Ticket),
        (status = 404, description = "Ticket not found", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn get_ticket(
    State(service): State<Arc<TicketService>>,
    Path(id): Path<String>,
) -> Result<Json<Ticket>> {
    let ticket = service.get_by_id(&id).await?;
    Ok(Json(ticket))
}

/// Create a ticket
///
/// The store assigns the id; an `id` in the body is ignored.
#[utoipa::path(
    post,
    path = "/tickets",
    request_body = CreateTicketDto,
    responses(
        (status = 201, description = "Ticket created", body = Ticket),
        (status = 400, description = "Malformed body or validation error", body = ErrorResponse),
        (status = 500, description = "Storage failure", body = ErrorResponse)
    ),
    tag = "tickets"
)]
pub async fn create_ticket(
    State(service): State<Arc<TicketService>>,
    AppJson(dto): AppJson<CreateTicketDto>,
) -> Result<(StatusCode, Json<Ticket>)> {
    let ticket = service.create(dto).await?;
    Ok((StatusCode::CREATED, Json(ticket)))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use axum::http::header;
    use axum_test::TestServer;
    use serde_json::json;

    use super::*;
    use crate::core::error::{AppError, StorageError};
    use crate::features::tickets::models::NewTicket;
    use crate::features::tickets::repositories::{InMemoryTicketRepository, TicketRepository};
    use crate::features::tickets::routes;

    fn server_with(repository: Arc<dyn TicketRepository>) -> TestServer {
        let service = Arc::new(TicketService::new(repository));
        TestServer::new(routes::routes(service)).unwrap()
    }

    fn server() -> TestServer {
        server_with(Arc::new(InMemoryTicketRepository::new()))
    }

    /// Backend whose every call fails with a storage error
    struct FailingRepository;

    #[async_trait]
    impl TicketRepository for FailingRepository {
        async fn find_all(&self) -> Result<Vec<Ticket>> {
            Err(StorageError::MissingRecord("ticket:record:1".into()).into())
        }

        async fn find_by_id(&self, _id: &str) -> Result<Ticket> {
            Err(StorageError::MissingRecord("ticket:record:1".into()).into())
        }

        async fn create(&self, _ticket: NewTicket) -> Result<Ticket> {
            Err(AppError::Storage(StorageError::Poisoned))
        }

        fn backend(&self) -> &'static str {
            "failing"
        }
    }

    #[tokio::test]
    async fn test_create_returns_201_with_assigned_id() {
        let server = server();

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
        assert_eq!(
            response.header(header::CONTENT_TYPE),
            "application/json"
        );
    }

    #[tokio::test]
    async fn test_create_ignores_supplied_id() {
        let server = server();

        let response = server
            .post("/tickets")
            .json(&json!({
                "id": "abc",
                "title": "Printer broken",
                "description": "No toner",
                "status": "open"
            }))
            .await;

        response.assert_status(StatusCode::CREATED);
        assert_eq!(response.json::<Ticket>().id, "1");
    }

    #[tokio::test]
    async fn test_get_unknown_id_is_404() {
        let server = server();

        let response = server.get("/tickets/999").await;

        response.assert_status(StatusCode::NOT_FOUND);
        let body = response.json::<ErrorResponse>();
        assert!(!body.success);
        assert!(body.message.contains("999"));
    }

    #[tokio::test]
    async fn test_list_empty_store_is_empty_array() {
        let server = server();

        let response = server.get("/tickets").await;

        response.assert_status_ok();
        response.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_list_after_two_creates() {
        let server = server();

        for title in ["Printer broken", "VPN down"] {
            server
                .post("/tickets")
                .json(&json!({ "title": title, "description": "", "status": "open" }))
                .await
                .assert_status(StatusCode::CREATED);
        }

        let response = server.get("/tickets").await;
        response.assert_status_ok();

        let tickets = response.json::<Vec<Ticket>>();
        assert_eq!(tickets.len(), 2);
        assert!(tickets.iter().all(|t| !t.id.is_empty()));
        assert_ne!(tickets[0].id, tickets[1].id);

        let titles: Vec<_> = tickets.iter().map(|t| t.title.as_str()).collect();
        assert!(titles.contains(&"Printer broken"));
        assert!(titles.contains(&"VPN down"));
    }

    #[tokio::test]
    async fn test_get_created_ticket() {
        let server = server();

        let created = server
            .post("/tickets")
            .json(&json!({ "title": "Printer broken", "description": "No toner", "status": "closed" }))
            .await
            .json::<Ticket>();

        let response = server.get(&format!("/tickets/{}", created.id)).await;

        response.assert_status_ok();
        assert_eq!(response.json::<Ticket>(), created);
    }

    #[tokio::test]
    async fn test_get_non_canonical_id_is_404() {
        let server = server();

        server
            .post("/tickets")
            .json(&json!({ "title": "Printer broken", "status": "open" }))
            .await
            .assert_status(StatusCode::CREATED);

        server.get("/tickets/1").await.assert_status_ok();
        server
            .get("/tickets/01")
            .await
            .assert_status(StatusCode::NOT_FOUND);
        server
            .get("/tickets/id_seq")
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_malformed_body_is_400() {
        let server = server();

        let response = server
            .post("/tickets")
            .bytes("{\"title\": ".into())
            .content_type("application/json")
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_missing_status_is_400() {
        let server = server();

        let response = server
            .post("/tickets")
            .json(&json!({ "title": "Printer broken" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_blank_title_is_400() {
        let server = server();

        let response = server
            .post("/tickets")
            .json(&json!({ "title": "", "description": "", "status": "open" }))
            .await;

        response.assert_status(StatusCode::BAD_REQUEST);
        let body = response.json::<ErrorResponse>();
        assert!(body.errors.is_some());

        server.get("/tickets").await.assert_json(&json!([]));
    }

    #[tokio::test]
    async fn test_storage_failures_are_500() {
        let server = server_with(Arc::new(FailingRepository));

        server
            .get("/tickets")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        server
            .get("/tickets/1")
            .await
            .assert_status(StatusCode::INTERNAL_SERVER_ERROR);

        let response = server
            .post("/tickets")
            .json(&json!({ "title": "Printer broken", "description": "", "status": "open" }))
            .await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.json::<ErrorResponse>().message,
            "Storage error occurred"
        );
    }
}
