mod ticket_dto;

pub use ticket_dto::CreateTicketDto;
