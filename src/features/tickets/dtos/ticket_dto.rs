use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::features::tickets::models::NewTicket;

/// Request DTO for creating a ticket.
///
/// Any `id` in the body is ignored; the store assigns one.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateTicketDto {
    #[validate(custom(function = "validate_not_blank"))]
    #[schema(example = "Printer broken")]
    pub title: String,

    #[serde(default)]
    #[schema(example = "No toner")]
    pub description: String,

    #[schema(example = "open")]
    pub status: String,
}

impl From<CreateTicketDto> for NewTicket {
    fn from(dto: CreateTicketDto) -> Self {
        Self {
            title: dto.title,
            description: dto.description,
            status: dto.status,
        }
    }
}

fn validate_not_blank(value: &str) -> Result<(), validator::ValidationError> {
    if value.trim().is_empty() {
        let mut err = validator::ValidationError::new("blank");
        err.message = Some("Title must not be empty".into());
        return Err(err);
    }
    Ok(())
}
