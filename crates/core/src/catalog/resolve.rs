//! Resolve a shopper's size/color selection against a product's variants.

use rust_decimal::Decimal;

use super::{Product, Variant};
use crate::cart::CartLine;

/// Outcome of matching a (size, color) selection to a variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution<'a> {
    /// Size or color has not been chosen yet.
    Unselected,
    /// Both are chosen but no variant has exactly that combination.
    Unavailable,
    /// The matching variant has no stock.
    OutOfStock {
        variant: &'a Variant,
        unit_price: Decimal,
    },
    /// The matching variant can be added to the cart.
    Available {
        variant: &'a Variant,
        unit_price: Decimal,
        stock: u32,
    },
}

/// Match a selection against the product's variants.
///
/// Only an exact `(size, color)` match counts: a size and a color that each
/// exist in other combinations do not make the pair purchasable.
#[must_use]
pub fn resolve<'a>(product: &'a Product, size: Option<&str>, color: Option<&str>) -> Resolution<'a> {
    let (Some(size), Some(color)) = (
        size.filter(|s| !s.is_empty()),
        color.filter(|c| !c.is_empty()),
    ) else {
        return Resolution::Unselected;
    };

    match product.variant(size, color) {
        None => Resolution::Unavailable,
        Some(variant) if !variant.in_stock() => Resolution::OutOfStock {
            variant,
            unit_price: product.unit_price(variant),
        },
        Some(variant) => Resolution::Available {
            variant,
            unit_price: product.unit_price(variant),
            stock: variant.quantity,
        },
    }
}

impl<'a> Resolution<'a> {
    /// Whether add-to-cart should be enabled.
    #[must_use]
    pub const fn can_add(&self) -> bool {
        matches!(self, Self::Available { .. })
    }

    /// The matched variant, if any.
    #[must_use]
    pub const fn variant(&self) -> Option<&'a Variant> {
        match self {
            Self::OutOfStock { variant, .. } | Self::Available { variant, .. } => Some(*variant),
            Self::Unselected | Self::Unavailable => None,
        }
    }

    /// Units available for the matched variant (0 when nothing matches).
    #[must_use]
    pub const fn stock(&self) -> u32 {
        match self {
            Self::Available { stock, .. } => *stock,
            _ => 0,
        }
    }

    /// Price to show next to the selection.
    #[must_use]
    pub const fn display_price(&self, product: &Product) -> Decimal {
        match self {
            Self::OutOfStock { unit_price, .. } | Self::Available { unit_price, .. } => *unit_price,
            Self::Unselected | Self::Unavailable => product.price,
        }
    }

    /// Call-to-action text for the add-to-cart control.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Unselected => "Select Variant",
            Self::Unavailable => "Unavailable",
            Self::OutOfStock { .. } => "Out of Stock",
            Self::Available { .. } => "Add to Cart",
        }
    }

    /// Build the cart line for this selection.
    ///
    /// The requested quantity is clamped into `1..=stock`. Returns `None`
    /// unless the selection is [`Resolution::Available`].
    #[must_use]
    pub fn cart_line(&self, product: &Product, requested: u32) -> Option<CartLine> {
        let Self::Available {
            variant,
            unit_price,
            stock,
        } = *self
        else {
            return None;
        };

        Some(CartLine {
            product_id: product.id.clone(),
            title: product.title.clone(),
            price: unit_price,
            image: product
                .color_image(&variant.color)
                .map(str::to_owned)
                .or_else(|| product.image.clone()),
            size: variant.size.clone(),
            color: variant.color.clone(),
            sku: variant.sku.clone(),
            quantity: requested.clamp(1, stock),
            slug: product.slug.clone(),
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::catalog::tests::sample_product;

    #[test]
    fn test_out_of_stock_disables_add() {
        let product = sample_product();
        let resolution = resolve(&product, Some("M"), Some("Red"));
        assert!(matches!(resolution, Resolution::OutOfStock { .. }));
        assert!(!resolution.can_add());
        assert_eq!(resolution.stock(), 0);
        assert_eq!(resolution.label(), "Out of Stock");
    }

    #[test]
    fn test_available_applies_override() {
        let product = sample_product();
        let resolution = resolve(&product, Some("M"), Some("Blue"));
        assert!(resolution.can_add());
        assert_eq!(resolution.stock(), 5);
        assert_eq!(resolution.display_price(&product), Decimal::from(12));
    }

    #[test]
    fn test_unselected_when_either_missing() {
        let product = sample_product();
        assert_eq!(resolve(&product, None, Some("Blue")), Resolution::Unselected);
        assert_eq!(resolve(&product, Some("M"), Some("")), Resolution::Unselected);
        assert_eq!(
            resolve(&product, None, None).display_price(&product),
            Decimal::from(10)
        );
    }

    #[test]
    fn test_no_exact_match_is_unavailable() {
        // "L" and "Red" both exist, just never together.
        let product = sample_product();
        let resolution = resolve(&product, Some("L"), Some("Red"));
        assert_eq!(resolution, Resolution::Unavailable);
        assert!(!resolution.can_add());
        assert!(resolution.variant().is_none());
    }

    #[test]
    fn test_cart_line_clamps_quantity() {
        let product = sample_product();
        let resolution = resolve(&product, Some("L"), Some("Blue"));

        let line = resolution.cart_line(&product, 10).unwrap();
        assert_eq!(line.quantity, 2);
        assert_eq!(line.sku.as_str(), "Blue-L-000003");
        assert_eq!(line.price, Decimal::from(10));
        assert_eq!(line.image.as_deref(), Some("https://cdn.example.com/blue.jpg"));

        assert_eq!(resolution.cart_line(&product, 0).unwrap().quantity, 1);
    }

    #[test]
    fn test_cart_line_requires_available() {
        let product = sample_product();
        assert!(resolve(&product, Some("M"), Some("Red")).cart_line(&product, 1).is_none());
    }
}
