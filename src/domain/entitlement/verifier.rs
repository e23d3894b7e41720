//! Payment callback signature verification.
//!
//! After checkout the gateway hands the client an order id, a payment id and
//! `hex(HMAC_SHA256(key_secret, "<order_id>|<payment_id>"))`. Only a caller
//! holding the key secret can produce that signature, so it is the single
//! proof that a payment actually happened.
//!
//! A [`VerifiedPayment`] can only be obtained from
//! [`PaymentVerifier::verify_payment`]; subscription activation requires one.

use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, SecretString};
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Fields the client relays from the gateway's checkout callback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentCallback {
    pub order_id: String,
    pub payment_id: String,
    pub signature: String,
}

/// Proof that a callback carried a valid signature.
///
/// Fields are private to this module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedPayment {
    order_id: String,
    payment_id: String,
}

impl VerifiedPayment {
    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    pub fn payment_id(&self) -> &str {
        &self.payment_id
    }
}

/// Checks gateway signatures against the configured key secret.
#[derive(Clone)]
pub struct PaymentVerifier {
    secret: SecretString,
}

impl PaymentVerifier {
    pub fn new(secret: SecretString) -> Self {
        Self { secret }
    }

    /// Returns true only for the exact signature of `order_id|payment_id`.
    pub fn verify(&self, order_id: &str, payment_id: &str, signature: &str) -> bool {
        verify_signature(
            self.secret.expose_secret().as_bytes(),
            order_id,
            payment_id,
            signature,
        )
    }

    /// Verifies a callback, yielding the proof value on success.
    pub fn verify_payment(&self, callback: &PaymentCallback) -> Option<VerifiedPayment> {
        if !self.verify(&callback.order_id, &callback.payment_id, &callback.signature) {
            return None;
        }
        Some(VerifiedPayment {
            order_id: callback.order_id.clone(),
            payment_id: callback.payment_id.clone(),
        })
    }
}

impl std::fmt::Debug for PaymentVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentVerifier")
            .field("secret", &"[REDACTED]")
            .finish()
    }
}

/// Stateless form of [`PaymentVerifier::verify`].
///
/// Fails closed: an empty input, an empty secret, or a signature that is not
/// the lowercase hex digest all yield false.
pub fn verify_signature(secret: &[u8], order_id: &str, payment_id: &str, signature: &str) -> bool {
    if secret.is_empty() || order_id.is_empty() || payment_id.is_empty() || signature.is_empty() {
        return false;
    }

    let Some(expected) = compute_signature(secret, order_id, payment_id) else {
        return false;
    };

    constant_time_compare(expected.as_bytes(), signature.as_bytes())
}

/// Hex HMAC-SHA256 of `order_id|payment_id`.
pub fn compute_signature(secret: &[u8], order_id: &str, payment_id: &str) -> Option<String> {
    let mut mac = Hmac::<Sha256>::new_from_slice(secret).ok()?;
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    Some(hex::encode(mac.finalize().into_bytes()))
}

/// Performs constant-time comparison of two byte slices.
fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.ct_eq(b).into()
}
