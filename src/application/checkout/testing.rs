//! Scripted payment gateway for coordinator tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::money::ExchangeRate;
use crate::domain::payment::{ApprovalLink, CapturedOrder, CreatedOrder, OrderStatus, PaymentGateway};
use crate::domain::DomainResult;
use crate::shared::errors::CheckoutError;

pub(crate) struct FakeGateway {
    rate: ExchangeRate,
    create_calls: AtomicUsize,
    capture_calls: AtomicUsize,
    capture_status: Mutex<String>,
    create_failure: Mutex<Option<u16>>,
    capture_failure: Mutex<Option<u16>>,
}

impl FakeGateway {
    pub fn new() -> Self {
        Self {
            rate: ExchangeRate::default(),
            create_calls: AtomicUsize::new(0),
            capture_calls: AtomicUsize::new(0),
            capture_status: Mutex::new("COMPLETED".to_string()),
            create_failure: Mutex::new(None),
            capture_failure: Mutex::new(None),
        }
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn capture_calls(&self) -> usize {
        self.capture_calls.load(Ordering::SeqCst)
    }

    pub fn capture_returns(&self, status: &str) {
        *self.capture_status.lock().unwrap() = status.to_string();
    }

    pub fn fail_create_with(&self, status: u16) {
        *self.create_failure.lock().unwrap() = Some(status);
    }

    pub fn fail_capture_with(&self, status: u16) {
        *self.capture_failure.lock().unwrap() = Some(status);
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(
        &self,
        source_amount: i64,
        _description: &str,
        _reference_id: &str,
    ) -> DomainResult<CreatedOrder> {
        let n = self.create_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if source_amount <= 0 {
            return Err(CheckoutError::InvalidAmount(source_amount.to_string()));
        }
        if let Some(status) = *self.create_failure.lock().unwrap() {
            return Err(CheckoutError::OrderCreation {
                status: Some(status),
                body: "{\"name\":\"INTERNAL_SERVICE_ERROR\"}".to_string(),
            });
        }

        let id = format!("ORDER-{}", n);
        Ok(CreatedOrder {
            links: vec![ApprovalLink {
                href: format!("https://www.sandbox.example/checkoutnow?token={}", id),
                rel: "approve".to_string(),
                method: Some("GET".to_string()),
            }],
            id,
            status: OrderStatus::Created,
            amount: self.rate.convert(source_amount),
            currency: "USD".to_string(),
        })
    }

    async fn capture_order(&self, order_id: &str) -> DomainResult<CapturedOrder> {
        self.capture_calls.fetch_add(1, Ordering::SeqCst);
        if order_id.trim().is_empty() {
            return Err(CheckoutError::InvalidOrderId);
        }
        if let Some(status) = *self.capture_failure.lock().unwrap() {
            return Err(CheckoutError::OrderCapture {
                status: Some(status),
                body: "{\"name\":\"UNPROCESSABLE_ENTITY\"}".to_string(),
            });
        }

        let status = self.capture_status.lock().unwrap().clone();
        let completed = status == "COMPLETED";
        let raw = if completed {
            json!({
                "id": order_id,
                "status": status,
                "purchase_units": [{"payments": {"captures": [{"id": "CAP1"}]}}]
            })
        } else {
            json!({"id": order_id, "status": status})
        };

        Ok(CapturedOrder {
            id: order_id.to_string(),
            status: OrderStatus::from_provider(&status),
            capture_id: completed.then(|| "CAP1".to_string()),
            raw,
        })
    }
}
