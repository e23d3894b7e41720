//! Contact form handlers.

mod send_contact_message;

pub use send_contact_message::{ContactError, SendContactMessageCommand, SendContactMessageHandler};
