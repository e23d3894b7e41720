//! Application layer - services and command/query handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.

mod entitlement_service;
pub mod handlers;

pub use entitlement_service::{
    receipt_id, ActivationResult, CreatePaymentOrderCommand, EntitlementService, PaymentOrder,
    VerifyPaymentCommand, MAX_WRITE_ATTEMPTS,
};
