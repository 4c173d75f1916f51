//! HTTP tests for catalog and cart routes.
//!
//! Drives the full router against an in-memory catalog, carrying the session
//! cookie between requests the way a browser would.

#![allow(clippy::unwrap_used, clippy::indexing_slicing)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use boutique_core::{Collection, CurrencyCode, Product};
use boutique_storefront::catalog::InMemoryCatalog;
use boutique_storefront::config::{CatalogSource, StorefrontConfig};
use boutique_storefront::routes::build_router;
use boutique_storefront::state::AppState;
use serde_json::{Value, json};
use tower::ServiceExt;

// =============================================================================
// Harness
// =============================================================================

fn product() -> Product {
    serde_json::from_value(json!({
        "_id": "prod-1",
        "title": "Linen Shirt",
        "price": 10,
        "image": "https://cdn.example/shirt.jpg",
        "colors": [{ "name": "Blue", "image": "https://cdn.example/blue.jpg" }],
        "variants": [
            { "size": "M", "color": "Red", "quantity": 0, "sku": "Red-M-000001" },
            { "size": "M", "color": "Blue", "quantity": 5, "priceOverride": 12, "sku": "Blue-M-000002" },
            { "size": "L", "color": "Blue", "quantity": 2, "sku": "Blue-L-000003" }
        ],
        "slug": "linen-shirt"
    }))
    .unwrap()
}

fn collection() -> Collection {
    serde_json::from_value(json!({
        "_id": "c-men",
        "name": "Men",
        "linkTarget": "/products?category=men"
    }))
    .unwrap()
}

fn app() -> Router {
    let config = StorefrontConfig {
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_owned(),
        currency: CurrencyCode::KWD,
        catalog: CatalogSource::File(PathBuf::from("catalog.json")),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };
    let catalog = InMemoryCatalog::new(vec![product()], vec![collection()]);
    build_router(AppState::new(config, Arc::new(catalog)))
}

/// A browser-like client holding one session cookie.
struct Client {
    app: Router,
    cookie: Option<String>,
}

struct Reply {
    status: StatusCode,
    hx_trigger: Option<String>,
    body: Value,
}

impl Client {
    fn new() -> Self {
        Self {
            app: app(),
            cookie: None,
        }
    }

    async fn get(&mut self, uri: &str) -> Reply {
        let request = Request::get(uri);
        self.send(request, Body::empty()).await
    }

    async fn post(&mut self, uri: &str, form: &str) -> Reply {
        let request = Request::post(uri).header(
            header::CONTENT_TYPE,
            "application/x-www-form-urlencoded",
        );
        self.send(request, Body::from(form.to_owned())).await
    }

    async fn send(&mut self, mut request: axum::http::request::Builder, body: Body) -> Reply {
        if let Some(cookie) = &self.cookie {
            request = request.header(header::COOKIE, cookie);
        }
        let response = self
            .app
            .clone()
            .oneshot(request.body(body).unwrap())
            .await
            .unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_owned());
        }

        let status = response.status();
        let hx_trigger = response
            .headers()
            .get("HX-Trigger")
            .map(|v| v.to_str().unwrap().to_owned());
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);

        Reply {
            status,
            hx_trigger,
            body,
        }
    }
}

// =============================================================================
// Catalog
// =============================================================================

#[tokio::test]
async fn test_health() {
    let response = app()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_product_listing() {
    let reply = Client::new().get("/products").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body[0]["slug"], "linen-shirt");
    assert_eq!(reply.body[0]["price"], "KWD 10.000");
}

#[tokio::test]
async fn test_product_detail_resolves_selection() {
    let mut client = Client::new();

    let reply = client.get("/products/linen-shirt").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["selection"]["status"], "Select Variant");
    assert_eq!(reply.body["sizes"], json!(["M", "L"]));
    assert_eq!(
        reply.body["colors"],
        json!([
            { "name": "Red", "image": null },
            { "name": "Blue", "image": "https://cdn.example/blue.jpg" }
        ])
    );

    let reply = client.get("/products/linen-shirt?size=M&color=Blue").await;
    assert_eq!(reply.body["selection"]["status"], "Add to Cart");
    assert_eq!(reply.body["selection"]["price"], "KWD 12.000");
    assert_eq!(reply.body["selection"]["stock"], 5);

    let reply = client.get("/products/linen-shirt?size=L&color=Red").await;
    assert_eq!(reply.body["selection"]["status"], "Unavailable");
    assert_eq!(reply.body["selection"]["can_add"], false);
}

#[tokio::test]
async fn test_unknown_product_is_not_found() {
    let reply = Client::new().get("/products/nope").await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_collections() {
    let reply = Client::new().get("/collections").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body[0]["name"], "Men");
    assert_eq!(reply.body[0]["linkTarget"], "/products?category=men");
}

// =============================================================================
// Cart
// =============================================================================

#[tokio::test]
async fn test_empty_cart_for_new_session() {
    let mut client = Client::new();
    let reply = client.get("/cart").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["items"], json!([]));
    assert_eq!(reply.body["subtotal"], "KWD 0.000");
    assert!(client.cookie.is_none());

    let reply = client.get("/cart/count").await;
    assert_eq!(reply.body["count"], 0);
    assert!(client.cookie.is_none());
}

#[tokio::test]
async fn test_add_persists_in_session() {
    let mut client = Client::new();

    let reply = client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue&quantity=2")
        .await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.hx_trigger.as_deref(), Some("cart-updated"));
    assert!(client.cookie.is_some());

    let reply = client.get("/cart").await;
    let items = reply.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "Blue-M-000002");
    assert_eq!(items[0]["quantity"], 2);
    assert_eq!(items[0]["image"], "https://cdn.example/blue.jpg");
    assert_eq!(reply.body["subtotal"], "KWD 24.000");
}

#[tokio::test]
async fn test_repeated_add_merges_by_sku() {
    let mut client = Client::new();
    client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue&quantity=1")
        .await;
    client
        .post("/cart/add", "slug=linen-shirt&size=L&color=Blue")
        .await;
    let reply = client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue&quantity=2")
        .await;

    let items = reply.body["items"].as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["sku"], "Blue-M-000002");
    assert_eq!(items[0]["quantity"], 3);
    assert_eq!(items[1]["sku"], "Blue-L-000003");
    assert_eq!(reply.body["item_count"], 4);

    let reply = client.get("/cart/count").await;
    assert_eq!(reply.body["count"], 2);
}

#[tokio::test]
async fn test_add_clamps_to_stock() {
    let mut client = Client::new();
    let reply = client
        .post("/cart/add", "slug=linen-shirt&size=L&color=Blue&quantity=10")
        .await;
    assert_eq!(reply.body["items"][0]["quantity"], 2);
}

#[tokio::test]
async fn test_add_rejects_unpurchasable_selection() {
    let mut client = Client::new();

    let reply = client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Red")
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = client
        .post("/cart/add", "slug=linen-shirt&size=L&color=Red")
        .await;
    assert_eq!(reply.status, StatusCode::CONFLICT);

    let reply = client
        .post("/cart/add", "slug=nope&size=M&color=Blue")
        .await;
    assert_eq!(reply.status, StatusCode::NOT_FOUND);

    let reply = client.get("/cart").await;
    assert_eq!(reply.body["items"], json!([]));
}

#[tokio::test]
async fn test_update_quantity() {
    let mut client = Client::new();
    client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue&quantity=2")
        .await;

    let reply = client.post("/cart/update", "sku=Blue-M-000002&quantity=4").await;
    assert_eq!(reply.body["items"][0]["quantity"], 4);

    let reply = client.post("/cart/update", "sku=Blue-M-000002&quantity=0").await;
    assert_eq!(reply.body["items"][0]["quantity"], 4);

    let reply = client.post("/cart/update", "sku=Blue-M-000002&quantity=-3").await;
    assert_eq!(reply.body["items"][0]["quantity"], 4);

    let reply = client.get("/cart").await;
    assert_eq!(reply.body["subtotal"], "KWD 48.000");
}

#[tokio::test]
async fn test_remove_is_idempotent() {
    let mut client = Client::new();
    client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue")
        .await;
    client
        .post("/cart/add", "slug=linen-shirt&size=L&color=Blue")
        .await;

    let reply = client.post("/cart/remove", "sku=Blue-M-000002").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["items"].as_array().unwrap().len(), 1);

    let reply = client.post("/cart/remove", "sku=Blue-M-000002").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body["items"][0]["sku"], "Blue-L-000003");
}

#[tokio::test]
async fn test_clear() {
    let mut client = Client::new();
    client
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue")
        .await;

    let reply = client.post("/cart/clear", "").await;
    assert_eq!(reply.body["items"], json!([]));

    let reply = client.get("/cart/count").await;
    assert_eq!(reply.body["count"], 0);
}

#[tokio::test]
async fn test_sessions_are_isolated() {
    let app = app();
    let mut first = Client {
        app: app.clone(),
        cookie: None,
    };
    let mut second = Client { app, cookie: None };

    first
        .post("/cart/add", "slug=linen-shirt&size=M&color=Blue")
        .await;

    let reply = second.get("/cart").await;
    assert_eq!(reply.body["items"], json!([]));
}

#[tokio::test]
async fn test_checkout_not_offered() {
    let reply = Client::new().post("/checkout", "").await;
    assert_eq!(reply.status, StatusCode::NOT_IMPLEMENTED);
}
