//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Health check
//!
//! # Catalog
//! GET  /products               - Product listing
//! GET  /products/{slug}        - Product detail (?size=&color= resolves a variant)
//! GET  /collections            - Navigation collections
//!
//! # Cart (session-backed)
//! GET  /cart                   - Cart contents
//! GET  /cart/count             - Number of cart lines
//! POST /cart/add               - Add a variant (slug, size, color, quantity)
//! POST /cart/update            - Set a line's quantity (sku, quantity)
//! POST /cart/remove            - Remove a line (sku)
//! POST /cart/clear             - Empty the cart
//!
//! # Checkout
//! POST /checkout               - Not offered (501)
//! ```

pub mod cart;
pub mod collections;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::middleware::create_session_layer;
use crate::state::AppState;

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/{slug}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        // Product routes
        .nest("/products", product_routes())
        // Collection routes
        .route("/collections", get(collections::index))
        // Cart routes
        .nest("/cart", cart_routes())
        // Checkout
        .route("/checkout", post(cart::checkout))
}

/// Build the full application router with sessions and request tracing.
pub fn build_router(state: AppState) -> Router {
    let session_layer = create_session_layer(state.config());

    Router::new()
        .route("/health", get(health))
        .merge(routes())
        .layer(session_layer)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Liveness health check endpoint.
async fn health() -> &'static str {
    "ok"
}
