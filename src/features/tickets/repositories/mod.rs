//! Ticket persistence.
//!
//! Every backend implements [`TicketRepository`] with the same meaning:
//!
//! | Operation | Missing id | Backend failure |
//! |-----------|------------|-----------------|
//! | `find_all` | n/a (empty vec) | `AppError::Storage` |
//! | `find_by_id` | `AppError::NotFound` | `AppError::Storage` |
//! | `create` | n/a | `AppError::Storage` |
//!
//! Ordering of `find_all` is backend-defined but stable while the data is
//! unchanged. All shipped backends happen to return ascending id order.

mod memory_repository;
mod postgres_repository;
mod redis_repository;

use async_trait::async_trait;

use crate::core::error::{AppError, Result};
use crate::features::tickets::models::{NewTicket, Ticket};

pub use memory_repository::InMemoryTicketRepository;
pub use postgres_repository::PostgresTicketRepository;
pub use redis_repository::RedisTicketRepository;

/// Storage contract consumed by the ticket service.
#[async_trait]
pub trait TicketRepository: Send + Sync {
    /// Every stored ticket.
    async fn find_all(&self) -> Result<Vec<Ticket>>;

    /// The ticket stored under `id`.
    async fn find_by_id(&self, id: &str) -> Result<Ticket>;

    /// Persist a new ticket under a freshly assigned id.
    async fn create(&self, ticket: NewTicket) -> Result<Ticket>;

    /// Short backend name for logs and health output.
    fn backend(&self) -> &'static str;
}

pub(crate) fn not_found(id: &str) -> AppError {
    AppError::NotFound(format!("Ticket '{}' not found", id))
}

/// Parse an id in the exact form the stores hand out.
///
/// Ids are rendered as plain decimal, so `"01"`, `"+1"` or `"id_seq"` can
/// never name a stored ticket and yield `None`.
pub(crate) fn parse_id(id: &str) -> Option<u64> {
    id.parse::<u64>().ok().filter(|n| n.to_string() == id)
}
