//! Flora Carbon backend
//!
//! Accounts, the trial/subscription entitlement engine that gates the
//! assistant feature, and Razorpay payment verification, served over a
//! JSON REST API.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
