//! Product route handlers.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use boutique_core::{CurrencyCode, Price, Product, Resolution, resolve};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::Result;
use crate::state::AppState;

/// Product card data for listings.
#[derive(Debug, Clone, Serialize)]
pub struct ProductSummary {
    pub title: String,
    pub slug: String,
    pub price: String,
    pub image: Option<String>,
    pub in_stock: bool,
    pub url: String,
}

/// Color picker entry. Only colors some variant is offered in are listed.
#[derive(Debug, Clone, Serialize)]
pub struct ColorView {
    pub name: String,
    pub image: Option<String>,
}

/// The shopper's current size/color selection, resolved.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub size: Option<String>,
    pub color: Option<String>,
    /// Add-to-cart label: "Select Variant", "Unavailable", "Out of Stock" or "Add to Cart".
    pub status: &'static str,
    pub can_add: bool,
    pub stock: u32,
    pub price: String,
    pub sku: Option<String>,
}

/// Product detail data.
#[derive(Debug, Clone, Serialize)]
pub struct ProductDetail {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub description: Option<String>,
    pub image: Option<String>,
    pub price: String,
    pub sizes: Vec<String>,
    pub colors: Vec<ColorView>,
    pub selection: SelectionView,
}

/// Variant selection query parameters.
#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    pub size: Option<String>,
    pub color: Option<String>,
}

// =============================================================================
// Type Conversions
// =============================================================================

fn format_price(amount: rust_decimal::Decimal, currency: CurrencyCode) -> String {
    Price::new(amount, currency).display()
}

impl ProductSummary {
    fn new(product: &Product, currency: CurrencyCode) -> Self {
        Self {
            title: product.title.clone(),
            slug: product.slug.to_string(),
            price: format_price(product.price, currency),
            image: product.image.clone(),
            in_stock: product.total_stock() > 0,
            url: format!("/products/{}", product.slug),
        }
    }
}

impl SelectionView {
    fn new(
        product: &Product,
        query: &SelectionQuery,
        resolution: &Resolution<'_>,
        currency: CurrencyCode,
    ) -> Self {
        Self {
            size: query.size.clone(),
            color: query.color.clone(),
            status: resolution.label(),
            can_add: resolution.can_add(),
            stock: resolution.stock(),
            price: format_price(resolution.display_price(product), currency),
            sku: resolution.variant().map(|v| v.sku.to_string()),
        }
    }
}

impl ProductDetail {
    fn new(product: &Product, query: &SelectionQuery, currency: CurrencyCode) -> Self {
        let resolution = resolve(product, query.size.as_deref(), query.color.as_deref());

        // Prefer the selected color's swatch as the hero image.
        let image = query
            .color
            .as_deref()
            .and_then(|c| product.color_image(c))
            .map(str::to_owned)
            .or_else(|| product.image.clone());

        Self {
            id: product.id.to_string(),
            title: product.title.clone(),
            slug: product.slug.to_string(),
            description: product.description.clone(),
            image,
            price: format_price(product.price, currency),
            sizes: product.sizes().into_iter().map(str::to_owned).collect(),
            colors: product
                .colors_offered()
                .into_iter()
                .map(|name| ColorView {
                    name: name.to_owned(),
                    image: product.color_image(name).map(str::to_owned),
                })
                .collect(),
            selection: SelectionView::new(product, query, &resolution, currency),
        }
    }
}

/// List all products.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<ProductSummary>>> {
    let currency = state.config().currency;
    let products = state.catalog().products().await?;
    Ok(Json(
        products
            .iter()
            .map(|p| ProductSummary::new(p, currency))
            .collect(),
    ))
}

/// Show one product with the selection in the query string resolved.
#[instrument(skip(state))]
pub async fn show(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Result<Json<ProductDetail>> {
    let product = state.catalog().product_by_slug(&slug).await?;
    Ok(Json(ProductDetail::new(
        &product,
        &query,
        state.config().currency,
    )))
}
