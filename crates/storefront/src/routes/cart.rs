//! Cart route handlers.
//!
//! The cart lives in the shopper's session. Every mutation returns the full
//! cart and an `HX-Trigger: cart-updated` header so badges can refresh.

use axum::{
    Form, Json,
    extract::State,
    response::{AppendHeaders, IntoResponse, Response},
};
use boutique_core::{Cart, CartLine, CurrencyCode, Price, resolve};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::services::with_cart;
use crate::state::AppState;

/// Header value announcing a cart change.
const CART_UPDATED: (&str, &str) = ("HX-Trigger", "cart-updated");

/// Cart line display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartLineView {
    pub sku: String,
    pub title: String,
    pub size: String,
    pub color: String,
    pub quantity: u32,
    pub image: Option<String>,
    pub price: String,
    pub line_total: String,
    pub url: String,
}

/// Cart display data.
#[derive(Debug, Clone, Serialize)]
pub struct CartView {
    pub items: Vec<CartLineView>,
    pub subtotal: String,
    pub line_count: usize,
    pub item_count: u64,
}

/// Cart count badge data.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct CartCount {
    pub count: usize,
}

// =============================================================================
// Type Conversions
// =============================================================================

fn format_price(amount: Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

impl CartLineView {
    fn new(line: &CartLine, currency: CurrencyCode) -> Self {
        Self {
            sku: line.sku.to_string(),
            title: line.title.clone(),
            size: line.size.clone(),
            color: line.color.clone(),
            quantity: line.quantity,
            image: line.image.clone(),
            price: format_price(line.price, currency),
            line_total: format_price(line.line_total(), currency),
            url: format!("/products/{}", line.slug),
        }
    }
}

impl CartView {
    /// Build the view for a cart.
    #[must_use]
    pub fn new(cart: &Cart, currency: CurrencyCode) -> Self {
        Self {
            items: cart
                .lines()
                .iter()
                .map(|line| CartLineView::new(line, currency))
                .collect(),
            subtotal: format_price(cart.total(), currency),
            line_count: cart.line_count(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub slug: String,
    pub size: String,
    pub color: String,
    pub quantity: Option<u32>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub sku: String,
    pub quantity: i64,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub sku: String,
}

fn updated(view: CartView) -> Response {
    (AppendHeaders([CART_UPDATED]), Json(view)).into_response()
}

/// Display the cart.
#[instrument(skip(state, session))]
pub async fn show(State(state): State<AppState>, session: Session) -> Json<CartView> {
    let currency = state.config().currency;
    Json(with_cart(&session, |cart| CartView::new(cart.cart(), currency)).await)
}

/// Number of distinct lines in the cart.
#[instrument(skip(session))]
pub async fn count(session: Session) -> Json<CartCount> {
    let count = with_cart(&session, |cart| cart.cart().line_count()).await;
    Json(CartCount { count })
}

/// Add the selected variant to the cart.
///
/// Responds 409 when the selection is unavailable or out of stock. The
/// requested quantity is clamped to the variant's stock.
#[instrument(skip(state, session))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product = state.catalog().product_by_slug(&form.slug).await?;
    let resolution = resolve(&product, Some(&form.size), Some(&form.color));
    let line = resolution
        .cart_line(&product, form.quantity.unwrap_or(1))
        .ok_or_else(|| AppError::NotAddable(resolution.label().to_owned()))?;

    add_breadcrumb("cart", "Added to cart", Some(&[("sku", line.sku.as_str())]));

    let currency = state.config().currency;
    let view = with_cart(&session, |cart| {
        cart.add_to_cart(line);
        CartView::new(cart.cart(), currency)
    })
    .await;

    Ok(updated(view))
}

/// Set a line's quantity. Quantities below 1 leave the cart unchanged.
#[instrument(skip(state, session))]
pub async fn update(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<UpdateCartForm>,
) -> Response {
    let quantity = u32::try_from(form.quantity).unwrap_or(0);
    let currency = state.config().currency;
    let view = with_cart(&session, |cart| {
        cart.update_quantity(&form.sku, quantity);
        CartView::new(cart.cart(), currency)
    })
    .await;

    updated(view)
}

/// Remove a line. Removing an absent SKU is not an error.
#[instrument(skip(state, session))]
pub async fn remove(
    State(state): State<AppState>,
    session: Session,
    Form(form): Form<RemoveFromCartForm>,
) -> Response {
    let currency = state.config().currency;
    let view = with_cart(&session, |cart| {
        cart.remove_from_cart(&form.sku);
        CartView::new(cart.cart(), currency)
    })
    .await;

    updated(view)
}

/// Empty the cart.
#[instrument(skip(state, session))]
pub async fn clear(State(state): State<AppState>, session: Session) -> Response {
    let currency = state.config().currency;
    let view = with_cart(&session, |cart| {
        cart.clear_cart();
        CartView::new(cart.cart(), currency)
    })
    .await;

    updated(view)
}

/// Checkout is not offered by this storefront.
pub async fn checkout() -> AppError {
    AppError::NotImplemented("checkout".to_owned())
}
