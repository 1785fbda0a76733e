//! Core domain types: tickets, trash entries, users, and builders

mod builders;
mod ticket;
mod user;

pub use builders::TicketBuilder;
pub use ticket::{Priority, Status, Ticket, TicketId, TrashedTicket, format_elapsed};
pub use user::{Role, UserId, UserProfile};
