//! Ticket feature.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/tickets` | List every ticket |
//! | GET | `/tickets/{id}` | Get one ticket |
//! | POST | `/tickets` | Create a ticket (201) |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;

pub use services::TicketService;
