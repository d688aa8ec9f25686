//! PayPal Orders v2 adapter for [`PaymentGateway`]

use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::Duration;
use tracing::{debug, info, warn};

use super::token_cache::{ProviderCredentials, TokenCache};
use super::wire::{
    AmountWithBreakdown, ApplicationContext, Breakdown, CaptureResponse, Money, OrderPayload,
    OrderResponse, PurchaseUnitRequest,
};
use crate::domain::money::ExchangeRate;
use crate::domain::payment::{CapturedOrder, CreatedOrder, OrderStatus, PaymentGateway};
use crate::domain::DomainResult;
use crate::shared::errors::CheckoutError;

const ORDERS_PATH: &str = "/v2/checkout/orders";

/// Everything the adapter needs, resolved from configuration.
#[derive(Debug, Clone)]
pub struct PayPalSettings {
    pub api_base: String,
    pub credentials: Option<ProviderCredentials>,
    pub brand_name: String,
    pub currency: String,
    pub rate: ExchangeRate,
    /// Base URL of the web frontend; enables return/cancel URLs
    pub frontend_url: Option<String>,
    pub token_safety_margin_secs: i64,
    pub request_timeout_secs: u64,
}

impl Default for PayPalSettings {
    fn default() -> Self {
        Self {
            api_base: "https://api-m.sandbox.paypal.com".to_string(),
            credentials: None,
            brand_name: "Paseo Amigo".to_string(),
            currency: "USD".to_string(),
            rate: ExchangeRate::default(),
            frontend_url: None,
            token_safety_margin_secs: 60,
            request_timeout_secs: 30,
        }
    }
}

pub struct PayPalGateway {
    http: reqwest::Client,
    orders_url: String,
    tokens: TokenCache,
    settings: PayPalSettings,
}

impl PayPalGateway {
    /// Build the gateway with its own HTTP client.
    pub fn new(settings: PayPalSettings) -> Result<Self, reqwest::Error> {
        let http = reqwest::Client::builder()
            .timeout(StdDuration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self::with_client(http, settings))
    }

    /// Build the gateway around an existing client.
    pub fn with_client(http: reqwest::Client, settings: PayPalSettings) -> Self {
        let base = settings.api_base.trim_end_matches('/').to_string();
        let tokens = TokenCache::new(
            http.clone(),
            &base,
            settings.credentials.clone(),
            Duration::seconds(settings.token_safety_margin_secs),
        );
        Self {
            http,
            orders_url: format!("{}{}", base, ORDERS_PATH),
            tokens,
            settings,
        }
    }

    pub fn settings(&self) -> &PayPalSettings {
        &self.settings
    }

    fn application_context(&self) -> ApplicationContext<'_> {
        let frontend = self
            .settings
            .frontend_url
            .as_deref()
            .map(|u| u.trim_end_matches('/'))
            .filter(|u| !u.is_empty());

        ApplicationContext {
            brand_name: &self.settings.brand_name,
            shipping_preference: "NO_SHIPPING",
            user_action: "PAY_NOW",
            return_url: frontend.map(|u| format!("{}/success", u)),
            cancel_url: frontend.map(|u| format!("{}/cancel", u)),
        }
    }
}

#[async_trait]
impl PaymentGateway for PayPalGateway {
    async fn create_order(
        &self,
        source_amount: i64,
        description: &str,
        reference_id: &str,
    ) -> DomainResult<CreatedOrder> {
        if source_amount <= 0 {
            return Err(CheckoutError::InvalidAmount(format!(
                "amount must be greater than zero, got {}",
                source_amount
            )));
        }

        let amount = self.settings.rate.convert(source_amount);
        let value = amount.to_string();
        let currency = self.settings.currency.as_str();

        let payload = OrderPayload {
            intent: "CAPTURE",
            purchase_units: vec![PurchaseUnitRequest {
                reference_id,
                description,
                amount: AmountWithBreakdown {
                    currency_code: currency,
                    value: value.clone(),
                    breakdown: Breakdown {
                        item_total: Money {
                            currency_code: currency,
                            value,
                        },
                    },
                },
            }],
            application_context: self.application_context(),
        };

        let token = self.tokens.get_token().await?;

        debug!(reference_id, source_amount, %amount, "Creating provider order");

        let response = self
            .http
            .post(&self.orders_url)
            .bearer_auth(&token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| CheckoutError::OrderCreation {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CheckoutError::OrderCreation {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(status = status.as_u16(), body = %body, "Provider refused order creation");
            return Err(CheckoutError::OrderCreation {
                status: Some(status.as_u16()),
                body,
            });
        }

        let parsed: OrderResponse =
            serde_json::from_str(&body).map_err(|e| CheckoutError::OrderCreation {
                status: Some(status.as_u16()),
                body: format!("unreadable order response: {}", e),
            })?;

        info!(order_id = %parsed.id, %amount, currency, "Provider order created");

        Ok(CreatedOrder {
            status: parsed
                .status
                .as_deref()
                .map(OrderStatus::from_provider)
                .unwrap_or(OrderStatus::Created),
            id: parsed.id,
            links: parsed.links,
            amount,
            currency: self.settings.currency.clone(),
        })
    }

    async fn capture_order(&self, order_id: &str) -> DomainResult<CapturedOrder> {
        let order_id = order_id.trim();
        if !is_provider_order_id(order_id) {
            return Err(CheckoutError::InvalidOrderId);
        }

        let token = self.tokens.get_token().await?;
        let url = format!("{}/{}/capture", self.orders_url, order_id);

        debug!(order_id, "Capturing provider order");

        // Same request id for every attempt on one order: the provider
        // replays the first result instead of charging again. Within the
        // provider's idempotency window this also replays a non-COMPLETED
        // answer, so a retry of the same order id may see the old status
        // until the window lapses.
        let response = self
            .http
            .post(&url)
            .bearer_auth(&token)
            .header("PayPal-Request-Id", format!("capture-{}", order_id))
            .header(reqwest::header::CONTENT_TYPE, "application/json")
            .body("{}")
            .send()
            .await
            .map_err(|e| CheckoutError::OrderCapture {
                status: None,
                body: e.to_string(),
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| CheckoutError::OrderCapture {
            status: Some(status.as_u16()),
            body: e.to_string(),
        })?;

        if !status.is_success() {
            warn!(order_id, status = status.as_u16(), body = %body, "Provider refused capture");
            return Err(CheckoutError::OrderCapture {
                status: Some(status.as_u16()),
                body,
            });
        }

        let raw: serde_json::Value =
            serde_json::from_str(&body).map_err(|e| CheckoutError::OrderCapture {
                status: Some(status.as_u16()),
                body: format!("unreadable capture response: {}", e),
            })?;
        let parsed: CaptureResponse = serde_json::from_value(raw.clone()).unwrap_or_default();

        let order_status = OrderStatus::from_provider(parsed.status.as_deref().unwrap_or(""));
        let capture_id = parsed.first_capture_id().map(str::to_string);

        info!(
            order_id,
            status = %order_status,
            capture_id = capture_id.as_deref().unwrap_or("-"),
            "Provider capture returned"
        );

        Ok(CapturedOrder {
            id: parsed.id.unwrap_or_else(|| order_id.to_string()),
            status: order_status,
            capture_id,
            raw,
        })
    }
}

/// Provider order ids are short alphanumeric tokens; anything else would
/// change the capture URL's path.
fn is_provider_order_id(order_id: &str) -> bool {
    !order_id.is_empty()
        && order_id.len() <= 64
        && order_id
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    async fn mount_token(server: &MockServer) {
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"access_token": "TOKEN", "expires_in": 32400})),
            )
            .mount(server)
            .await;
    }

    fn gateway(server: &MockServer, frontend_url: Option<&str>) -> PayPalGateway {
        PayPalGateway::with_client(
            reqwest::Client::new(),
            PayPalSettings {
                api_base: server.uri(),
                credentials: Some(ProviderCredentials {
                    client_id: "client-id".into(),
                    client_secret: "client-secret".into(),
                }),
                frontend_url: frontend_url.map(str::to_string),
                ..PayPalSettings::default()
            },
        )
    }

    #[tokio::test]
    async fn create_order_sends_converted_amount() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .and(header("authorization", "Bearer TOKEN"))
            .and(body_partial_json(json!({
                "intent": "CAPTURE",
                "purchase_units": [{
                    "reference_id": "PA-1",
                    "description": "Paseo de 60 minutos",
                    "amount": {
                        "currency_code": "USD",
                        "value": "7.70",
                        "breakdown": {"item_total": {"currency_code": "USD", "value": "7.70"}}
                    }
                }],
                "application_context": {
                    "brand_name": "Paseo Amigo",
                    "shipping_preference": "NO_SHIPPING",
                    "user_action": "PAY_NOW",
                    "return_url": "https://app.example/success",
                    "cancel_url": "https://app.example/cancel"
                }
            })))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "5O190127TN364715T",
                "status": "CREATED",
                "links": [
                    {"href": "https://www.example/checkoutnow?token=5O1", "rel": "approve", "method": "GET"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let order = gateway(&server, Some("https://app.example/"))
            .create_order(7000, "Paseo de 60 minutos", "PA-1")
            .await
            .unwrap();

        assert_eq!(order.id, "5O190127TN364715T");
        assert_eq!(order.status, OrderStatus::Created);
        assert_eq!(order.amount, Decimal::new(770, 2));
        assert!(order.approve_link().is_some());
    }

    #[tokio::test]
    async fn create_order_omits_return_urls_without_frontend() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"id": "O-2", "status": "CREATED"})))
            .mount(&server)
            .await;

        gateway(&server, None).create_order(1000, "x", "PA-2").await.unwrap();

        let requests = server.received_requests().await.unwrap();
        let order_request = requests
            .iter()
            .find(|r| r.url.path() == "/v2/checkout/orders")
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&order_request.body).unwrap();
        assert!(body["application_context"].get("return_url").is_none());
        assert!(body["application_context"].get("cancel_url").is_none());
    }

    #[tokio::test]
    async fn zero_amount_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let result = gateway(&server, None).create_order(0, "x", "PA-3").await;
        assert!(matches!(result, Err(CheckoutError::InvalidAmount(_))));
    }

    #[tokio::test]
    async fn create_order_failure_carries_status_and_body() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(422).set_body_string("{\"name\":\"UNPROCESSABLE_ENTITY\"}"))
            .expect(1)
            .mount(&server)
            .await;

        match gateway(&server, None).create_order(7000, "x", "PA-4").await {
            Err(CheckoutError::OrderCreation { status, body }) => {
                assert_eq!(status, Some(422));
                assert!(body.contains("UNPROCESSABLE_ENTITY"));
            }
            other => panic!("expected order creation error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn capture_extracts_first_capture_id() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-1/capture"))
            .and(header("paypal-request-id", "capture-ORDER-1"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({
                "id": "ORDER-1",
                "status": "COMPLETED",
                "purchase_units": [{"payments": {"captures": [{"id": "CAP1"}]}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let captured = gateway(&server, None).capture_order("ORDER-1").await.unwrap();
        assert_eq!(captured.id, "ORDER-1");
        assert!(captured.status.is_completed());
        assert_eq!(captured.capture_id.as_deref(), Some("CAP1"));
        assert_eq!(captured.raw["status"], "COMPLETED");
    }

    #[tokio::test]
    async fn capture_keeps_unknown_status_verbatim() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-2/capture"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": "ORDER-2",
                "status": "PENDING"
            })))
            .mount(&server)
            .await;

        let captured = gateway(&server, None).capture_order("ORDER-2").await.unwrap();
        assert_eq!(captured.status, OrderStatus::Other("PENDING".into()));
        assert_eq!(captured.capture_id, None);
    }

    #[tokio::test]
    async fn blank_order_id_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(500))
            .expect(0)
            .mount(&server)
            .await;

        let result = gateway(&server, None).capture_order("   ").await;
        assert!(matches!(result, Err(CheckoutError::InvalidOrderId)));
    }

    #[tokio::test]
    async fn order_id_with_path_characters_makes_no_request() {
        let server = MockServer::start().await;
        Mock::given(wiremock::matchers::any())
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({"status": "COMPLETED"})))
            .expect(0)
            .mount(&server)
            .await;

        let gateway = gateway(&server, None);
        for order_id in [
            "X/../../../v2/payments/captures/CAP9/refund?",
            "ORDER-1?x=1",
            "ORDER%2F1",
            "ORDER 1",
            "ORDER#1",
        ] {
            let result = gateway.capture_order(order_id).await;
            assert!(
                matches!(result, Err(CheckoutError::InvalidOrderId)),
                "{} was accepted",
                order_id
            );
        }
    }

    #[tokio::test]
    async fn capture_failure_carries_status_and_body() {
        let server = MockServer::start().await;
        mount_token(&server).await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders/ORDER-3/capture"))
            .respond_with(ResponseTemplate::new(422).set_body_string("ORDER_NOT_APPROVED"))
            .mount(&server)
            .await;

        match gateway(&server, None).capture_order("ORDER-3").await {
            Err(err @ CheckoutError::OrderCapture { .. }) => {
                assert!(err.is_retryable());
                assert!(err.to_string().contains("ORDER_NOT_APPROVED"));
            }
            other => panic!("expected capture error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn token_failure_stops_before_order_call() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/oauth2/token"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid_client"))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v2/checkout/orders"))
            .respond_with(ResponseTemplate::new(201))
            .expect(0)
            .mount(&server)
            .await;

        let result = gateway(&server, None).create_order(7000, "x", "PA-5").await;
        assert!(matches!(
            result,
            Err(CheckoutError::Credentials { status: Some(401), .. })
        ));
    }
}
