//! Razorpay payment gateway adapter.
//!
//! Implements the `PaymentGateway` port against the Razorpay Orders API.
//! Payment callbacks are verified in the domain (`PaymentVerifier`), so this
//! adapter only creates orders.
//!
//! # Configuration
//!
//! - `FLORA__PAYMENT__KEY_ID`: public key id, also handed to the checkout widget
//! - `FLORA__PAYMENT__KEY_SECRET`: API secret, also the callback signing key

mod gateway;
mod mock_gateway;

pub use gateway::{RazorpayConfig, RazorpayGateway};
pub use mock_gateway::MockPaymentGateway;
