//! Catalog model: products, their display colors and sellable variants.
//!
//! The storefront only ever reads these; they are created and edited through
//! [`ProductDraft`] on the admin side.

mod draft;
mod resolve;

pub use draft::{CatalogError, MAX_TITLE_LENGTH, ProductDocument, ProductDraft, VariantDraft};
pub use resolve::{Resolution, resolve};

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::types::{CollectionId, ProductId, Sku, Slug};

/// A catalog product as stored in the content store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: ProductId,
    pub title: String,
    /// Base unit price, superseded per variant by [`Variant::price_override`].
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    /// Default display image reference (resolved asset URL).
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub colors: Vec<Color>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub variants: Vec<Variant>,
    pub slug: Slug,
}

/// A navigation collection (e.g. "Men" linking to a filtered listing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Collection {
    #[serde(rename = "_id")]
    pub id: CollectionId,
    pub name: String,
    /// Path the collection links to, e.g. `/products?category=men`.
    pub link_target: String,
}

/// A color swatch. Display only, carries no stock.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub name: String,
    #[serde(default)]
    pub image: Option<String>,
}

/// One sellable combination of color and size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub color: String,
    pub size: String,
    /// Units in stock.
    pub quantity: u32,
    #[serde(default)]
    pub price_override: Option<Decimal>,
    pub sku: Sku,
}

impl Variant {
    /// Returns true if at least one unit is in stock.
    #[must_use]
    pub const fn in_stock(&self) -> bool {
        self.quantity > 0
    }
}

impl Product {
    /// Find the variant matching both `size` and `color` exactly.
    #[must_use]
    pub fn variant(&self, size: &str, color: &str) -> Option<&Variant> {
        self.variants
            .iter()
            .find(|v| v.size == size && v.color == color)
    }

    /// Unit price of a variant of this product.
    #[must_use]
    pub fn unit_price(&self, variant: &Variant) -> Decimal {
        variant.price_override.unwrap_or(self.price)
    }

    /// Distinct sizes across all variants, in first-seen order.
    #[must_use]
    pub fn sizes(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.size.as_str()))
    }

    /// Distinct colors across all variants, in first-seen order.
    #[must_use]
    pub fn colors_offered(&self) -> Vec<&str> {
        distinct(self.variants.iter().map(|v| v.color.as_str()))
    }

    /// Swatch image for a color name, if one is configured.
    #[must_use]
    pub fn color_image(&self, name: &str) -> Option<&str> {
        self.colors
            .iter()
            .find(|c| c.name == name)
            .and_then(|c| c.image.as_deref())
    }

    /// Total units in stock across all variants.
    #[must_use]
    pub fn total_stock(&self) -> u64 {
        self.variants.iter().map(|v| u64::from(v.quantity)).sum()
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<&'a str> {
    let mut seen = Vec::new();
    for value in values {
        if !seen.contains(&value) {
            seen.push(value);
        }
    }
    seen
}

/// Treat an explicit `null` the same as a missing field.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
