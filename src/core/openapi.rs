use utoipa::OpenApi;

use crate::features::tickets::{
    dtos as tickets_dtos, handlers as tickets_handlers, models as tickets_models,
};
use crate::shared::types::{ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Tickets
        tickets_handlers::list_tickets,
        tickets_handlers::get_ticket,
        tickets_handlers::create_ticket,
    ),
    components(
        schemas(
            // Shared
            ErrorResponse,
            HealthResponse,
            // Tickets
            tickets_models::Ticket,
            tickets_dtos::CreateTicketDto,
        )
    ),
    tags(
        (name = "tickets", description = "Support tickets"),
    ),
    info(
        title = "Ticket Desk API",
        version = "0.1.0",
        description = "Minimal ticketing service over a swappable store",
    )
)]
pub struct ApiDoc;
