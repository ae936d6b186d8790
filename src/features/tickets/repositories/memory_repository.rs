use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;

use async_trait::async_trait;

use super::{not_found, parse_id, TicketRepository};
use crate::core::error::{Result, StorageError};
use crate::features::tickets::models::{NewTicket, Ticket};

/// Process-local store, used for tests and `DATABASE_BACKEND=memory`.
#[derive(Debug)]
pub struct InMemoryTicketRepository {
    tickets: RwLock<BTreeMap<u64, Ticket>>,
    next_id: AtomicU64,
}

impl Default for InMemoryTicketRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryTicketRepository {
    pub fn new() -> Self {
        Self {
            tickets: RwLock::new(BTreeMap::new()),
            next_id: AtomicU64::new(1),
        }
    }
}

#[async_trait]
impl TicketRepository for InMemoryTicketRepository {
    async fn find_all(&self) -> Result<Vec<Ticket>> {
        let tickets = self.tickets.read().map_err(|_| StorageError::Poisoned)?;
        Ok(tickets.values().cloned().collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Ticket> {
        let key = parse_id(id).ok_or_else(|| not_found(id))?;
        let tickets = self.tickets.read().map_err(|_| StorageError::Poisoned)?;

        tickets.get(&key).cloned().ok_or_else(|| not_found(id))
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let mut tickets = self.tickets.write().map_err(|_| StorageError::Poisoned)?;
        let id = self.next_id.fetch_add(1, Ordering::SeqCst);

        let ticket = ticket.with_id(id.to_string());
        tickets.insert(id, ticket.clone());

        tracing::info!("Ticket created: id={}, backend=memory", ticket.id);

        Ok(ticket)
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
