//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::CheckoutCoordinator;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::interfaces::http::common::{ApiResponse, PaginatedResponse, PaginationParams};
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{bookings, checkout, health, metrics, request_id};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the Paseo Amigo account service"))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        checkout::create_order,
        checkout::capture_order,
        bookings::list_my_bookings,
    ),
    components(
        schemas(
            ApiResponse<String>,
            PaginationParams,
            PaginatedResponse<bookings::BookingDto>,
            health::HealthResponse,
            health::ComponentHealth,
            checkout::CartLineDto,
            checkout::CreateOrderRequest,
            checkout::CreateOrderResponse,
            checkout::LinkDto,
            checkout::CaptureOrderRequest,
            checkout::CaptureOrderResponse,
            checkout::PaymentNotCompletedDto,
            bookings::BookingDto,
            bookings::PaymentDto,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Checkout", description = "PayPal checkout: create an order, then capture it and record the booking"),
        (name = "Bookings", description = "Confirmed walk bookings of the caller"),
    ),
    info(
        title = "Paseo Amigo Checkout API",
        version = "1.0.0",
        description = "Payment-authorized booking checkout for the Paseo Amigo pet-walking service"
    )
)]
pub struct ApiDoc;

/// Everything the router needs from the running service
#[derive(Clone)]
pub struct RouterDeps {
    pub coordinator: Arc<CheckoutCoordinator>,
    pub db: DatabaseConnection,
    pub jwt_config: JwtConfig,
    pub prometheus: PrometheusHandle,
}

/// Create the API router with all routes
pub fn create_api_router(deps: RouterDeps) -> Router {
    let auth_state = AuthState {
        jwt_config: deps.jwt_config,
    };

    let checkout_routes = Router::new()
        .route("/create-order", post(checkout::create_order))
        .route("/capture-order", post(checkout::capture_order))
        .route_layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(checkout::CheckoutAppState {
            coordinator: deps.coordinator.clone(),
        });

    let booking_routes = Router::new()
        .route("/mine", get(bookings::list_my_bookings))
        .route_layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(bookings::BookingsAppState {
            coordinator: deps.coordinator,
        });

    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(health::HealthState {
            db: deps.db,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(metrics::prometheus_metrics))
        .with_state(metrics::MetricsState {
            handle: deps.prometheus,
        });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .merge(health_routes)
        .merge(metrics_routes)
        .nest("/api/v1/checkout", checkout_routes)
        .nest("/api/v1/bookings", booking_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(request_id::request_id_middleware))
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{header, Request, StatusCode};
    use metrics_exporter_prometheus::PrometheusBuilder;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::application::checkout::testing::FakeGateway;
    use crate::application::CheckoutSettings;
    use crate::infrastructure::crypto::jwt::sign_token;
    use crate::infrastructure::database::test_connection;
    use crate::infrastructure::InMemoryRepositoryProvider;

    fn jwt() -> JwtConfig {
        JwtConfig {
            secret: "router-secret".into(),
            issuer: "paseo-amigo".into(),
        }
    }

    struct TestApp {
        router: Router,
        gateway: Arc<FakeGateway>,
    }

    async fn app() -> TestApp {
        let gateway = Arc::new(FakeGateway::new());
        let coordinator = Arc::new(CheckoutCoordinator::new(
            gateway.clone(),
            Arc::new(InMemoryRepositoryProvider::new()),
            CheckoutSettings::default(),
        ));
        let router = create_api_router(RouterDeps {
            coordinator,
            db: test_connection().await,
            jwt_config: jwt(),
            prometheus: PrometheusBuilder::new().build_recorder().handle(),
        });
        TestApp { router, gateway }
    }

    async fn call(
        router: &Router,
        method: &str,
        uri: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(
                header::AUTHORIZATION,
                format!("Bearer {}", sign_token(user, &jwt(), 3600)),
            );
        }
        let req = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let resp = router.clone().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }

    fn capture_body(order_id: &str) -> Value {
        json!({
            "order_id": order_id,
            "service_type": "long-walk",
            "date_time": "2026-11-02T15:00:00Z",
            "duration_mins": 60,
            "price": "7.70",
            "notes": "Max tira de la correa"
        })
    }

    async fn open_order(router: &Router, user: &str) -> String {
        let (status, body) = call(
            router,
            "POST",
            "/api/v1/checkout/create-order",
            Some(user),
            Some(json!({"cart": [{"name": "Paseo 60", "price": 7000, "quantity": 1}]})),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["order_id"].as_str().unwrap().to_string()
    }

    #[tokio::test]
    async fn checkout_requires_token() {
        let app = app().await;
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/create-order",
            None,
            Some(json!({"amount": 7000})),
        )
        .await;

        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["code"], "MISSING_TOKEN");
        assert_eq!(app.gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn create_order_converts_cart_total() {
        let app = app().await;
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/create-order",
            Some("user-1"),
            Some(json!({"cart": [{"price": 7000, "quantity": 1}]})),
        )
        .await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["total_source"], 7000);
        assert_eq!(body["data"]["amount_target"], "7.70");
        assert_eq!(body["data"]["currency"], "USD");
        assert!(body["data"]["approve_url"].as_str().is_some());
    }

    #[tokio::test]
    async fn invalid_cart_is_rejected_before_provider() {
        let app = app().await;
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/create-order",
            Some("user-1"),
            Some(json!({"cart": []})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "INVALID_CART");
        assert_eq!(app.gateway.create_calls(), 0);
    }

    #[tokio::test]
    async fn provider_failure_is_bad_gateway() {
        let app = app().await;
        app.gateway.fail_create_with(500);
        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/create-order",
            Some("user-1"),
            Some(json!({"amount": 7000})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["code"], "ORDER_CREATION_ERROR");
    }

    #[tokio::test]
    async fn capture_books_once_then_conflicts() {
        let app = app().await;
        let order_id = open_order(&app.router, "user-1").await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/capture-order",
            Some("user-1"),
            Some(capture_body(&order_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        assert_eq!(body["data"]["capture_id"], "CAP1");
        assert_eq!(body["data"]["booking"]["payment"]["order_id"], order_id.as_str());
        assert_eq!(body["data"]["booking"]["price"], "7.70");

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/capture-order",
            Some("user-1"),
            Some(capture_body(&order_id)),
        )
        .await;
        assert_eq!(status, StatusCode::CONFLICT);
        assert_eq!(body["code"], "DUPLICATE_BOOKING");

        let (status, body) = call(&app.router, "GET", "/api/v1/bookings/mine", Some("user-1"), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 1);
    }

    #[tokio::test]
    async fn missing_field_is_named() {
        let app = app().await;
        let order_id = open_order(&app.router, "user-1").await;
        let mut body = capture_body(&order_id);
        body.as_object_mut().unwrap().remove("price");

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/capture-order",
            Some("user-1"),
            Some(body),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["code"], "MISSING_FIELD");
        assert!(body["error"].as_str().unwrap().contains("price"));
        assert_eq!(app.gateway.capture_calls(), 0);
    }

    #[tokio::test]
    async fn uncompleted_payment_is_422_without_booking() {
        let app = app().await;
        let order_id = open_order(&app.router, "user-1").await;
        app.gateway.capture_returns("PAYER_ACTION_REQUIRED");

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/capture-order",
            Some("user-1"),
            Some(capture_body(&order_id)),
        )
        .await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "PAYMENT_NOT_COMPLETED");
        assert_eq!(body["data"]["status"], "PAYER_ACTION_REQUIRED");

        let (_, body) = call(&app.router, "GET", "/api/v1/bookings/mine", Some("user-1"), None).await;
        assert_eq!(body["data"]["total"], 0);
    }

    #[tokio::test]
    async fn foreign_order_is_not_found() {
        let app = app().await;
        let order_id = open_order(&app.router, "user-1").await;

        let (status, body) = call(
            &app.router,
            "POST",
            "/api/v1/checkout/capture-order",
            Some("user-2"),
            Some(capture_body(&order_id)),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], "ORDER_NOT_FOUND");
        assert_eq!(app.gateway.capture_calls(), 0);
    }

    #[tokio::test]
    async fn public_endpoints_need_no_token() {
        let app = app().await;

        let (status, body) = call(&app.router, "GET", "/health", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, doc) = call(&app.router, "GET", "/api-doc/openapi.json", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert!(doc["paths"]["/api/v1/checkout/capture-order"].is_object());
    }
}
