//! Admin-side product input and validation.

use std::collections::HashSet;

use rand::Rng;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{Color, Variant};
use crate::types::{Sku, Slug};

/// Maximum product title length.
pub const MAX_TITLE_LENGTH: usize = 100;

/// Errors raised while validating a [`ProductDraft`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The title is empty or whitespace.
    #[error("title cannot be empty")]
    EmptyTitle,
    /// The title exceeds [`MAX_TITLE_LENGTH`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Maximum allowed length.
        max: usize,
    },
    /// The base price is zero or negative.
    #[error("price must be positive (got {0})")]
    NonPositivePrice(Decimal),
    /// A variant price override is negative.
    #[error("price override for {color}/{size} cannot be negative")]
    NegativePriceOverride {
        /// Variant color.
        color: String,
        /// Variant size.
        size: String,
    },
    /// A variant lacks a color or a size.
    #[error("variant color and size cannot be empty")]
    IncompleteVariant,
    /// Two variants share the same color and size.
    #[error("duplicate variant {color}/{size}")]
    DuplicateVariant {
        /// Variant color.
        color: String,
        /// Variant size.
        size: String,
    },
    /// Two variants were supplied with the same explicit SKU.
    #[error("duplicate SKU {0}")]
    DuplicateSku(Sku),
}

/// Variant input as entered in the admin product form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub color: String,
    pub size: String,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price_override: Option<Decimal>,
    /// Kept verbatim when present (edits); generated otherwise.
    #[serde(default)]
    pub sku: Option<Sku>,
}

/// Product input for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDraft {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: Option<String>,
    /// Asset id of an already uploaded default image (`image-...`).
    #[serde(default)]
    pub image: Option<String>,
    /// Derived from the title when absent.
    #[serde(default)]
    pub slug: Option<Slug>,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub variants: Vec<VariantDraft>,
}

/// A validated draft with slug and SKUs filled in, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductDocument {
    pub title: String,
    pub price: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    pub slug: Slug,
    pub colors: Vec<Color>,
    pub variants: Vec<Variant>,
}

impl ProductDraft {
    /// Check the draft against the catalog rules.
    ///
    /// Each `(color, size)` pair may appear at most once per product, and
    /// explicit SKUs must be distinct.
    ///
    /// # Errors
    ///
    /// Returns the first [`CatalogError`] encountered.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(CatalogError::EmptyTitle);
        }
        if title.chars().count() > MAX_TITLE_LENGTH {
            return Err(CatalogError::TitleTooLong {
                max: MAX_TITLE_LENGTH,
            });
        }
        if self.price <= Decimal::ZERO {
            return Err(CatalogError::NonPositivePrice(self.price));
        }

        let mut combos = HashSet::new();
        let mut skus = HashSet::new();
        for variant in &self.variants {
            if variant.color.trim().is_empty() || variant.size.trim().is_empty() {
                return Err(CatalogError::IncompleteVariant);
            }
            if variant.price_override.is_some_and(|p| p < Decimal::ZERO) {
                return Err(CatalogError::NegativePriceOverride {
                    color: variant.color.clone(),
                    size: variant.size.clone(),
                });
            }
            if !combos.insert((variant.color.as_str(), variant.size.as_str())) {
                return Err(CatalogError::DuplicateVariant {
                    color: variant.color.clone(),
                    size: variant.size.clone(),
                });
            }
            if let Some(sku) = &variant.sku
                && !skus.insert(sku)
            {
                return Err(CatalogError::DuplicateSku(sku.clone()));
            }
        }
        Ok(())
    }

    /// Validate the draft and fill in the slug and any missing SKUs.
    ///
    /// # Errors
    ///
    /// Returns a [`CatalogError`] if validation fails.
    pub fn into_document<R: Rng + ?Sized>(self, rng: &mut R) -> Result<ProductDocument, CatalogError> {
        self.validate()?;

        let slug = self
            .slug
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| Slug::from_title(&self.title));

        let mut taken: HashSet<Sku> = self.variants.iter().filter_map(|v| v.sku.clone()).collect();
        let variants = self
            .variants
            .into_iter()
            .map(|v| {
                let sku = v.sku.unwrap_or_else(|| {
                    let sku = Sku::generate_unique(&v.color, &v.size, &taken, rng);
                    taken.insert(sku.clone());
                    sku
                });
                Variant {
                    color: v.color,
                    size: v.size,
                    quantity: v.quantity,
                    price_override: v.price_override,
                    sku,
                }
            })
            .collect();

        Ok(ProductDocument {
            title: self.title.trim().to_owned(),
            price: self.price,
            description: self.description,
            image: self.image,
            slug,
            colors: self.colors,
            variants,
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    use super::*;

    fn variant(color: &str, size: &str) -> VariantDraft {
        VariantDraft {
            color: color.to_owned(),
            size: size.to_owned(),
            quantity: 3,
            price_override: None,
            sku: None,
        }
    }

    fn draft(variants: Vec<VariantDraft>) -> ProductDraft {
        ProductDraft {
            title: "Linen Shirt".to_owned(),
            price: Decimal::from(10),
            description: None,
            image: None,
            slug: None,
            colors: Vec::new(),
            variants,
        }
    }

    #[test]
    fn test_validate_rejects_duplicate_combination() {
        let result = draft(vec![variant("Red", "M"), variant("Red", "M")]).validate();
        assert!(matches!(
            result,
            Err(CatalogError::DuplicateVariant { ref color, ref size }) if color == "Red" && size == "M"
        ));
    }

    #[test]
    fn test_validate_allows_same_color_other_size() {
        assert!(draft(vec![variant("Red", "M"), variant("Red", "L")]).validate().is_ok());
    }

    #[test]
    fn test_validate_price_and_title() {
        let mut d = draft(Vec::new());
        d.price = Decimal::ZERO;
        assert!(matches!(d.validate(), Err(CatalogError::NonPositivePrice(_))));

        let mut d = draft(Vec::new());
        d.title = "   ".to_owned();
        assert_eq!(d.validate(), Err(CatalogError::EmptyTitle));

        let mut d = draft(Vec::new());
        d.title = "x".repeat(MAX_TITLE_LENGTH + 1);
        assert!(matches!(d.validate(), Err(CatalogError::TitleTooLong { .. })));
    }

    #[test]
    fn test_validate_duplicate_explicit_sku() {
        let mut a = variant("Red", "M");
        a.sku = Some(Sku::from("SAME"));
        let mut b = variant("Blue", "M");
        b.sku = Some(Sku::from("SAME"));
        assert_eq!(
            draft(vec![a, b]).validate(),
            Err(CatalogError::DuplicateSku(Sku::from("SAME")))
        );
    }

    #[test]
    fn test_into_document_fills_slug_and_skus() {
        let mut kept = variant("Blue", "L");
        kept.sku = Some(Sku::from("Blue-L-123456"));
        let doc = draft(vec![variant("Red", "M"), kept])
            .into_document(&mut StdRng::seed_from_u64(1))
            .unwrap();

        assert_eq!(doc.slug.as_str(), "linen-shirt");
        assert!(doc.variants[0].sku.as_str().starts_with("Red-M-"));
        assert_eq!(doc.variants[1].sku.as_str(), "Blue-L-123456");
    }

    #[test]
    fn test_into_document_keeps_explicit_slug() {
        let mut d = draft(Vec::new());
        d.slug = Some(Slug::new("custom"));
        let doc = d.into_document(&mut StdRng::seed_from_u64(1)).unwrap();
        assert_eq!(doc.slug.as_str(), "custom");
    }
}
