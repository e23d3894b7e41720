//! Outbound mail adapters.
//!
//! - `resend` - Resend HTTP API (`ContactMailer`)
//! - `mock` - Recording mailer for tests

mod mock;
mod resend;

pub use mock::MockContactMailer;
pub use resend::{ResendConfig, ResendContactMailer};
