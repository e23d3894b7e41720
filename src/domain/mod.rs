//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, time, clock, errors, auth)
//! - `account` - Registered users and signup validation
//! - `entitlement` - Trial/subscription state machine and payment verification
//! - `contact` - Contact form messages

pub mod account;
pub mod contact;
pub mod entitlement;
pub mod foundation;
