use std::sync::Arc;

use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::tickets::dtos::CreateTicketDto;
use crate::features::tickets::models::Ticket;
use crate::features::tickets::repositories::TicketRepository;

/// Service for ticket operations.
///
/// Business rules belong here; storage errors pass through untouched.
pub struct TicketService {
    repository: Arc<dyn TicketRepository>,
}

impl TicketService {
    pub fn new(repository: Arc<dyn TicketRepository>) -> Self {
        Self { repository }
    }

    /// Name of the backend behind this service
    pub fn backend(&self) -> &'static str {
        self.repository.backend()
    }

    /// List every ticket
    pub async fn get_all(&self) -> Result<Vec<Ticket>> {
        self.repository.find_all().await
    }

    /// Get ticket by ID
    pub async fn get_by_id(&self, id: &str) -> Result<Ticket> {
        self.repository.find_by_id(id).await
    }

    /// Validate and store a new ticket
    pub async fn create(&self, dto: CreateTicketDto) -> Result<Ticket> {
        dto.validate()
            .map_err(|e| AppError::Validation(e.to_string()))?;

        self.repository.create(dto.into()).await
    }
}
