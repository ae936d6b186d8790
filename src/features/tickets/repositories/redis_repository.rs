//! Redis-backed ticket store.
//!
//! Layout under a namespace (default `ticket`):
//! - **Record**: `{ns}:record:{id}` → JSON-encoded [`Ticket`]
//! - **Sequence**: `{ns}:id_seq` → `INCR` counter handing out ids
//! - **Index**: `{ns}:index` (sorted set, score = numeric id) → ids of every
//!   stored ticket, read back in ascending order by `find_all`
//!
//! Records sit under their own `record:` prefix and lookups only accept ids
//! in the decimal form `create` hands out, so no caller-supplied id can land
//! on the sequence or index keys.
//!
//! `create` takes an id from the sequence, then writes the record and the
//! index entry in one `MULTI/EXEC` transaction, so readers see both or
//! neither. A crash between `INCR` and `EXEC` only burns an id.

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;

use super::{not_found, parse_id, TicketRepository};
use crate::core::error::{Result, StorageError};
use crate::features::tickets::models::{NewTicket, Ticket};

const DEFAULT_NAMESPACE: &str = "ticket";

#[derive(Clone)]
pub struct RedisTicketRepository {
    conn_manager: ConnectionManager,
    namespace: String,
}

impl RedisTicketRepository {
    pub fn new(conn_manager: ConnectionManager) -> Self {
        Self::with_namespace(conn_manager, DEFAULT_NAMESPACE)
    }

    pub fn with_namespace(conn_manager: ConnectionManager, namespace: impl Into<String>) -> Self {
        Self {
            conn_manager,
            namespace: namespace.into(),
        }
    }
}

fn record_key(namespace: &str, id: u64) -> String {
    format!("{}:record:{}", namespace, id)
}

fn sequence_key(namespace: &str) -> String {
    format!("{}:id_seq", namespace)
}

fn index_key(namespace: &str) -> String {
    format!("{}:index", namespace)
}

/// Record key for a caller-supplied id, or `None` when no ticket can have it
fn lookup_key(namespace: &str, id: &str) -> Option<String> {
    parse_id(id).map(|n| record_key(namespace, n))
}

fn decode(key: &str, payload: &str) -> std::result::Result<Ticket, StorageError> {
    serde_json::from_str(payload).map_err(|source| StorageError::Decode {
        key: key.to_string(),
        source,
    })
}

/// Pair `MGET` replies with their keys; one gap or bad payload fails the lot
fn assemble(
    keys: &[String],
    payloads: Vec<Option<String>>,
) -> std::result::Result<Vec<Ticket>, StorageError> {
    let mut tickets = Vec::with_capacity(keys.len());
    for (key, payload) in keys.iter().zip(payloads) {
        let payload = payload.ok_or_else(|| {
            tracing::error!("Ticket index references missing record {}", key);
            StorageError::MissingRecord(key.clone())
        })?;
        tickets.push(decode(key, &payload)?);
    }
    Ok(tickets)
}

#[async_trait]
impl TicketRepository for RedisTicketRepository {
    async fn find_all(&self) -> Result<Vec<Ticket>> {
        let mut conn = self.conn_manager.clone();

        let ids: Vec<u64> = conn.zrange(index_key(&self.namespace), 0, -1).await.map_err(|e| {
            tracing::error!("Failed to read ticket index: {:?}", e);
            StorageError::Redis(e)
        })?;

        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let keys: Vec<String> = ids
            .iter()
            .map(|id| record_key(&self.namespace, *id))
            .collect();

        // Explicit MGET: a single-key call must still come back as a list
        let payloads: Vec<Option<String>> = redis::cmd("MGET")
            .arg(&keys)
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to read ticket records: {:?}", e);
                StorageError::Redis(e)
            })?;

        Ok(assemble(&keys, payloads)?)
    }

    async fn find_by_id(&self, id: &str) -> Result<Ticket> {
        let key = lookup_key(&self.namespace, id).ok_or_else(|| not_found(id))?;
        let mut conn = self.conn_manager.clone();

        let payload: Option<String> = conn.get(&key).await.map_err(|e| {
            tracing::error!("Failed to get ticket by ID: {:?}", e);
            StorageError::Redis(e)
        })?;

        match payload {
            Some(payload) => Ok(decode(&key, &payload)?),
            None => Err(not_found(id)),
        }
    }

    async fn create(&self, ticket: NewTicket) -> Result<Ticket> {
        let mut conn = self.conn_manager.clone();

        let id: u64 = conn.incr(sequence_key(&self.namespace), 1).await.map_err(|e| {
            tracing::error!("Failed to allocate ticket id: {:?}", e);
            StorageError::Redis(e)
        })?;

        let ticket = ticket.with_id(id.to_string());
        let payload = serde_json::to_string(&ticket).map_err(StorageError::Encode)?;

        let _: () = redis::pipe()
            .atomic()
            .set(record_key(&self.namespace, id), payload)
            .ignore()
            .zadd(index_key(&self.namespace), &ticket.id, id)
            .ignore()
            .query_async(&mut conn)
            .await
            .map_err(|e| {
                tracing::error!("Failed to create ticket: {:?}", e);
                StorageError::Redis(e)
            })?;

        tracing::info!("Ticket created: id={}, backend=redis", ticket.id);

        Ok(ticket)
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
