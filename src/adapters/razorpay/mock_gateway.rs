//! Mock payment gateway for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateOrderRequest, GatewayError, GatewayOrder, PaymentGateway};

/// Records order requests and answers with sequential order ids.
///
/// The returned order echoes the requested amount and currency.
#[derive(Clone)]
pub struct MockPaymentGateway {
    key_id: String,
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    requests: Vec<CreateOrderRequest>,
    next_error: Option<GatewayError>,
    issued: u64,
}

impl MockPaymentGateway {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            inner: Arc::new(Mutex::new(MockState::default())),
        }
    }

    /// Makes the next `create_order` call fail with a transport error.
    pub fn fail_next(&self, message: impl Into<String>) {
        self.inner.lock().unwrap().next_error = Some(GatewayError::Transport(message.into()));
    }

    /// Requests that reached the gateway, oldest first.
    pub fn requests(&self) -> Vec<CreateOrderRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl PaymentGateway for MockPaymentGateway {
    async fn create_order(&self, request: CreateOrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.inner.lock().unwrap();
        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        state.issued += 1;
        let order = GatewayOrder {
            id: format!("order_mock{:06}", state.issued),
            amount_minor: request.amount_minor,
            currency: request.currency.clone(),
        };
        state.requests.push(request);
        Ok(order)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}
