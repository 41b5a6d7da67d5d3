//! Cart endpoints driven through the full router.

use async_trait::async_trait;
use axum::http::StatusCode;
use axum_test::TestServer;
use cart_api::{create_router, AppConfig, AppState};
use cart_core::{
    CartError, CartResult, CartStorage, CartStore, CheckoutSession, CheckoutSessionCreator,
    FileStorage, LineItem, MemoryStorage,
};
use serde_json::{json, Value};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct StubCreator {
    fail: bool,
}

#[async_trait]
impl CheckoutSessionCreator for StubCreator {
    async fn create_session(&self, items: &[LineItem]) -> CartResult<CheckoutSession> {
        if self.fail {
            return Err(CartError::Network("connection reset".to_string()));
        }
        Ok(CheckoutSession::new(
            "stub",
            format!("https://checkout.example/c/{}", items.len()),
        )
        .with_cart_id("cart-1"))
    }

    fn provider_name(&self) -> &'static str {
        "stub"
    }
}

/// Holds every save until the test releases it
struct SlowStorage {
    release: Mutex<Receiver<()>>,
}

impl CartStorage for SlowStorage {
    fn save(&self, _key: &str, _value: &str) -> CartResult<()> {
        self.release
            .lock()
            .unwrap()
            .recv_timeout(Duration::from_secs(5))
            .map_err(|_| CartError::Storage("save was never released".to_string()))
    }

    fn load(&self, _key: &str) -> CartResult<Option<String>> {
        Ok(None)
    }
}

fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        environment: "test".to_string(),
        storage_dir: None,
    }
}

fn server_over(storage: Arc<dyn CartStorage>, fail: bool) -> TestServer {
    let store = CartStore::open(Arc::new(StubCreator { fail }), storage).unwrap();
    TestServer::new(create_router(AppState::with_store(test_config(), store))).unwrap()
}

fn server_with(fail: bool) -> TestServer {
    server_over(Arc::new(MemoryStorage::new()), fail)
}

fn server() -> TestServer {
    server_with(false)
}

fn shirt(quantity: u32) -> Value {
    json!({
        "variantId": "shirt-m",
        "productRef": {"id": "p1", "handle": "shirt", "title": "Shirt"},
        "variantTitle": "M",
        "unitPrice": {"amount": "10.00", "currencyCode": "USD"},
        "quantity": quantity,
        "selectedOptions": [{"name": "Size", "value": "M"}]
    })
}

fn mug() -> Value {
    json!({
        "variantId": "mug",
        "unitPrice": {"amount": "4.00", "currencyCode": "USD"}
    })
}

#[tokio::test]
async fn health_reports_provider() {
    let server = server();

    let response = server.get("/health").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["provider"], "stub");
}

#[tokio::test]
async fn empty_cart_has_zero_totals() {
    let server = server();

    let body: Value = server.get("/api/v1/cart").await.json();

    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalItems"], 0);
    assert_eq!(body["totalPrice"], "0");
    assert_eq!(body["isLoading"], false);
    assert_eq!(body["isOpen"], false);
}

#[tokio::test]
async fn adding_same_variant_merges_quantities() {
    let server = server();

    server.post("/api/v1/cart/items").json(&shirt(2)).await.assert_status_ok();
    server.post("/api/v1/cart/items").json(&mug()).await.assert_status_ok();
    let response = server.post("/api/v1/cart/items").json(&shirt(1)).await;

    response.assert_status_ok();
    let body: Value = response.json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["variantId"], "shirt-m");
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[1]["variantId"], "mug");
    assert_eq!(items[1]["quantity"], 1);
    assert_eq!(body["totalItems"], 4);
    assert_eq!(body["totalPrice"], "34.00");
}

#[tokio::test]
async fn add_rejects_zero_quantity_and_blank_variant() {
    let server = server();

    server
        .post("/api/v1/cart/items")
        .json(&shirt(0))
        .await
        .assert_status(StatusCode::BAD_REQUEST);

    let response = server
        .post("/api/v1/cart/items")
        .json(&json!({"variantId": " ", "unitPrice": {"amount": "1.00", "currencyCode": "USD"}}))
        .await;
    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["code"], 400);
    assert_eq!(body["details"], "variantId");

    let cart: Value = server.get("/api/v1/cart").await.json();
    assert_eq!(cart["items"], json!([]));
}

#[tokio::test]
async fn update_quantity_sets_and_removes() {
    let server = server();
    server.post("/api/v1/cart/items").json(&shirt(2)).await;
    server.post("/api/v1/cart/items").json(&mug()).await;

    let body: Value = server
        .patch("/api/v1/cart/items/shirt-m")
        .json(&json!({"quantity": 5}))
        .await
        .json();
    assert_eq!(body["items"][0]["quantity"], 5);
    assert_eq!(body["totalItems"], 6);

    let body: Value = server
        .patch("/api/v1/cart/items/shirt-m")
        .json(&json!({"quantity": 0}))
        .await
        .json();
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["variantId"], "mug");

    let body: Value = server
        .patch("/api/v1/cart/items/mug")
        .json(&json!({"quantity": -3}))
        .await
        .json();
    assert_eq!(body["items"], json!([]));
}

#[tokio::test]
async fn update_unknown_variant_is_a_no_op() {
    let server = server();
    server.post("/api/v1/cart/items").json(&mug()).await;

    let response = server
        .patch("/api/v1/cart/items/missing")
        .json(&json!({"quantity": 9}))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["totalItems"], 1);
}

#[tokio::test]
async fn remove_and_clear() {
    let server = server();
    server.post("/api/v1/cart/items").json(&shirt(1)).await;
    server.post("/api/v1/cart/items").json(&mug()).await;

    let body: Value = server.delete("/api/v1/cart/items/shirt-m").await.json();
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let body: Value = server.delete("/api/v1/cart").await.json();
    assert_eq!(body["items"], json!([]));
    assert_eq!(body["totalPrice"], "0");
}

#[tokio::test]
async fn open_flag_toggles() {
    let server = server();

    let body: Value = server
        .put("/api/v1/cart/open")
        .json(&json!({"open": true}))
        .await
        .json();
    assert_eq!(body["isOpen"], true);

    let body: Value = server
        .put("/api/v1/cart/open")
        .json(&json!({"open": false}))
        .await
        .json();
    assert_eq!(body["isOpen"], false);
}

#[tokio::test]
async fn checkout_on_empty_cart_returns_null_url() {
    let server = server();

    let response = server.post("/api/v1/cart/checkout").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["checkoutUrl"], Value::Null);
    assert_eq!(body["cart"]["isLoading"], false);
}

#[tokio::test]
async fn checkout_returns_url_and_records_it() {
    let server = server();
    server.post("/api/v1/cart/items").json(&shirt(1)).await;
    server.post("/api/v1/cart/items").json(&mug()).await;

    let body: Value = server.post("/api/v1/cart/checkout").await.json();

    assert_eq!(body["checkoutUrl"], "https://checkout.example/c/2");
    assert_eq!(body["cart"]["checkoutUrl"], "https://checkout.example/c/2");
    assert_eq!(body["cart"]["cartId"], "cart-1");
    assert_eq!(body["cart"]["isLoading"], false);
    assert_eq!(body["cart"]["totalItems"], 2);
}

#[tokio::test]
async fn failed_checkout_keeps_items() {
    let server = server_with(true);
    server.post("/api/v1/cart/items").json(&shirt(2)).await;

    let body: Value = server.post("/api/v1/cart/checkout").await.json();

    assert_eq!(body["checkoutUrl"], Value::Null);
    assert_eq!(body["cart"]["isLoading"], false);
    assert_eq!(body["cart"]["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn slow_storage_does_not_stall_other_requests() {
    let (release, gate): (Sender<()>, Receiver<()>) = mpsc::channel();
    let server = server_over(
        Arc::new(SlowStorage {
            release: Mutex::new(gate),
        }),
        false,
    );

    let add = async { server.post("/api/v1/cart/items").json(&mug()).await };
    let health = async {
        let response = server.get("/health").await;
        release.send(()).unwrap();
        response
    };
    let (added, health) = tokio::join!(add, health);

    health.assert_status_ok();
    added.assert_status_ok();
    let body: Value = added.json();
    assert_eq!(body["totalItems"], 1);
}

#[tokio::test]
async fn file_storage_keeps_items_across_restarts() {
    let dir = tempfile::tempdir().unwrap();

    let server = server_over(Arc::new(FileStorage::new(dir.path())), false);
    server.post("/api/v1/cart/items").json(&shirt(2)).await.assert_status_ok();
    server
        .put("/api/v1/cart/open")
        .json(&json!({"open": true}))
        .await
        .assert_status_ok();
    drop(server);

    let restarted = server_over(Arc::new(FileStorage::new(dir.path())), false);
    let body: Value = restarted.get("/api/v1/cart").await.json();

    assert_eq!(body["items"][0]["variantId"], "shirt-m");
    assert_eq!(body["totalItems"], 2);
    assert_eq!(body["isOpen"], false);
}
