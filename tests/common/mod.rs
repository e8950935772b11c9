// Not every test binary uses every helper.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request},
    Router,
};
use serde_json::{json, Value};
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use shop_orders_api::{
    clients::{HttpCatalogClient, HttpIdentityClient, HttpPaymentGateway},
    config::AppConfig,
    db::{self, DbConfig},
    handlers::{AppServices, CONSUMER_HEADER},
    repositories::SeaOrmShopRepository,
    services::{orders::OrderService, payments::PaymentService},
    AppState,
};

/// Helper harness backed by an in-memory SQLite database and one mock server
/// per remote collaborator.
pub struct TestApp {
    router: Router,
    pub state: AppState,
    pub identity_server: MockServer,
    pub payment_server: MockServer,
    pub catalog_server: MockServer,
}

impl TestApp {
    /// Construct a new test application with fresh database state.
    pub async fn new() -> Self {
        let identity_server = MockServer::start().await;
        let payment_server = MockServer::start().await;
        let catalog_server = MockServer::start().await;

        // A single pooled connection keeps the in-memory database alive and
        // shared for the whole test.
        let db_cfg = DbConfig {
            url: "sqlite::memory:".to_string(),
            max_connections: 1,
            min_connections: 1,
            ..DbConfig::default()
        };
        let pool = db::establish_connection_with_config(&db_cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");
        let db_arc = Arc::new(pool);

        let http = reqwest::Client::new();
        let identity = Arc::new(HttpIdentityClient::new(http.clone(), identity_server.uri()));
        let gateway = Arc::new(HttpPaymentGateway::new(http.clone(), payment_server.uri()));
        let catalog = Arc::new(HttpCatalogClient::new(http, catalog_server.uri()));

        let repo = Arc::new(SeaOrmShopRepository::new(db_arc.clone()));
        let orders = Arc::new(OrderService::new(
            repo.clone(),
            identity.clone(),
            gateway,
            catalog,
        ));
        let payments = Arc::new(PaymentService::new(repo, identity));
        let services = AppServices { orders, payments };

        let cfg = AppConfig {
            database_url: db_cfg.url.clone(),
            identity_service_url: identity_server.uri(),
            payment_service_url: payment_server.uri(),
            catalog_service_url: catalog_server.uri(),
            host: "127.0.0.1".to_string(),
            port: 18_080,
            environment: "test".to_string(),
            log_level: "debug".to_string(),
            log_json: false,
            auto_migrate: true,
            cors_allowed_origins: None,
            request_timeout_secs: 5,
            db_max_connections: 1,
            db_min_connections: 1,
            db_connect_timeout_secs: 5,
            db_idle_timeout_secs: 60,
            db_acquire_timeout_secs: 5,
        };

        let state = AppState {
            db: db_arc,
            config: cfg,
            services,
        };

        let router = shop_orders_api::api_routes().with_state(state.clone());

        Self {
            router,
            state,
            identity_server,
            payment_server,
            catalog_server,
        }
    }

    /// Send a request against the router, optionally asserting an upstream
    /// caller identity.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
        caller: Option<&str>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        if let Some(email) = caller {
            builder = builder.header(CONSUMER_HEADER, email);
        }

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Register the identity lookup for an email with the given admin flag.
    pub async fn stub_identity(&self, email: &str, is_admin: bool) {
        Mock::given(method("GET"))
            .and(path(format!("/users/{email}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "is_admin": is_admin })))
            .mount(&self.identity_server)
            .await;
    }

    /// Register a successful payment creation returning the given id.
    pub async fn stub_payment_created(&self, payment_id: &str) {
        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "id": payment_id })))
            .mount(&self.payment_server)
            .await;
    }

    /// Register a payment processor rejection.
    pub async fn stub_payment_rejected(&self) {
        Mock::given(method("POST"))
            .and(path("/payments"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&self.payment_server)
            .await;
    }

    /// Register a catalog detail lookup for a product.
    pub async fn stub_product(&self, product_id: i32, name: &str) {
        Mock::given(method("GET"))
            .and(path(format!("/products/{product_id}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": product_id,
                "name": name,
                "description": "",
                "categories": "",
                "size": "M",
                "price": "10",
                "tax": "2",
                "available": true,
                "store_id": 1,
                "images": [
                    { "id": 1, "image_path": format!("/img/{product_id}.png"), "product_id": product_id }
                ]
            })))
            .mount(&self.catalog_server)
            .await;
    }

    /// Register a successful availability withdrawal for a product.
    pub async fn stub_mark_unavailable(&self, product_id: i32) {
        Mock::given(method("PUT"))
            .and(path(format!("/products/{product_id}/unavailable")))
            .respond_with(ResponseTemplate::new(200))
            .mount(&self.catalog_server)
            .await;
    }
}

/// Decode a JSON response body.
pub async fn read_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("failed to read response body");
    serde_json::from_slice(&bytes).expect("response body was not valid json")
}
