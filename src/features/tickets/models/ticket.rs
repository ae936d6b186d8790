use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A stored ticket.
///
/// `status` is free text and is kept exactly as the client sent it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    /// Store-assigned identifier
    #[schema(example = "1")]
    pub id: String,
    #[schema(example = "Printer broken")]
    pub title: String,
    #[serde(default)]
    #[schema(example = "No toner")]
    pub description: String,
    #[schema(example = "open")]
    pub status: String,
}

/// A ticket that has not been persisted yet and so has no id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTicket {
    pub title: String,
    pub description: String,
    pub status: String,
}

impl NewTicket {
    /// Attach the id the store assigned
    pub fn with_id(self, id: impl Into<String>) -> Ticket {
        Ticket {
            id: id.into(),
            title: self.title,
            description: self.description,
            status: self.status,
        }
    }
}
