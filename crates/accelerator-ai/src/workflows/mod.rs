pub mod academy;
pub mod content;
pub mod funnel;
pub mod repository;
pub mod ticket;

pub use repository::RepositoryError;
pub use ticket::{next_ticket, Outstanding, ReleaseOnDrop, RequestTicket};
