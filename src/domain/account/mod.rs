//! Account domain - registered users and credentials.

mod email;
mod errors;
mod user;

pub use email::EmailAddress;
pub use errors::AccountError;
pub use user::{Registration, UserAccount, MIN_PASSWORD_LEN};
