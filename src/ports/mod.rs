//! Ports - interfaces between the application core and the outside world.
//!
//! - `EntitlementRepository` / `UserRepository` - persistence
//! - `PaymentGateway` - order creation at the payment provider
//! - `SessionValidator` / `TokenIssuer` / `PasswordHasher` - credentials
//! - `ContactMailer` - outbound mail

mod contact_mailer;
mod credentials;
mod entitlement_repository;
mod payment_gateway;
mod session_validator;
mod user_repository;

pub use contact_mailer::{ContactMailer, MailError};
pub use credentials::{IssuedToken, PasswordHasher, TokenIssuer};
pub use entitlement_repository::EntitlementRepository;
pub use payment_gateway::{CreateOrderRequest, GatewayError, GatewayOrder, OrderNotes, PaymentGateway};
pub use session_validator::SessionValidator;
pub use user_repository::UserRepository;
