//! Cart lines and the ordered cart collection.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{ProductId, Sku, Slug};

/// One chosen variant of one product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    pub product_id: ProductId,
    pub title: String,
    /// Resolved unit price (variant override or product base price).
    pub price: Decimal,
    #[serde(default)]
    pub image: Option<String>,
    pub size: String,
    pub color: String,
    /// Merge key: a cart holds at most one line per SKU.
    pub sku: Sku,
    pub quantity: u32,
    /// Product slug, for linking back to the detail page.
    pub slug: Slug,
}

impl CartLine {
    /// `price × quantity` for this line.
    #[must_use]
    pub fn line_total(&self) -> Decimal {
        self.price * Decimal::from(self.quantity)
    }
}

/// Ordered cart contents.
///
/// Serializes as a plain JSON array of lines, which is also the persisted
/// text format. Deserialized lines are merged through [`Cart::add`], so a
/// parsed cart holds at most one line per SKU and no zero quantities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLine>", into = "Vec<CartLine>")]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Parse a cart from its persisted text.
    ///
    /// # Errors
    ///
    /// Returns an error if the text is not a JSON array of cart lines.
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    /// Serialize the cart to its persisted text.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Add a line, merging by SKU.
    ///
    /// An existing line with the same SKU keeps its position and fields and
    /// has its quantity increased by `line.quantity`. Otherwise the line is
    /// appended. A zero-quantity line is ignored.
    pub fn add(&mut self, line: CartLine) {
        if line.quantity == 0 {
            return;
        }
        match self.lines.iter_mut().find(|l| l.sku == line.sku) {
            Some(existing) => existing.quantity = existing.quantity.saturating_add(line.quantity),
            None => self.lines.push(line),
        }
    }

    /// Remove the line for `sku`. Returns true if a line was removed.
    pub fn remove(&mut self, sku: &str) -> bool {
        let before = self.lines.len();
        self.lines.retain(|l| l.sku.as_str() != sku);
        self.lines.len() != before
    }

    /// Set the quantity of the line for `sku`.
    ///
    /// A quantity below 1 is ignored; removal goes through [`Cart::remove`].
    /// Returns true if a line was changed.
    pub fn update_quantity(&mut self, sku: &str, quantity: u32) -> bool {
        if quantity < 1 {
            return false;
        }
        self.lines
            .iter_mut()
            .find(|l| l.sku.as_str() == sku)
            .is_some_and(|line| {
                line.quantity = quantity;
                true
            })
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `price × quantity` over all lines, computed on each call.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// The line for `sku`, if present.
    #[must_use]
    pub fn get(&self, sku: &str) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.sku.as_str() == sku)
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Consume the cart, returning its lines.
    #[must_use]
    pub fn into_lines(self) -> Vec<CartLine> {
        self.lines
    }

    /// Number of distinct lines (what the cart badge shows).
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Sum of quantities across lines.
    #[must_use]
    pub fn item_count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Returns true if the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        lines.into_iter().collect()
    }
}

impl From<Cart> for Vec<CartLine> {
    fn from(cart: Cart) -> Self {
        cart.lines
    }
}

impl FromIterator<CartLine> for Cart {
    fn from_iter<I: IntoIterator<Item = CartLine>>(iter: I) -> Self {
        let mut cart = Self::new();
        for line in iter {
            cart.add(line);
        }
        cart
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn line(sku: &str, price: i64, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new("prod-1"),
            title: "Linen Shirt".to_owned(),
            price: Decimal::from(price),
            image: None,
            size: "M".to_owned(),
            color: "Red".to_owned(),
            sku: Sku::from(sku),
            quantity,
            slug: Slug::new("linen-shirt"),
        }
    }

    #[test]
    fn test_add_merges_by_sku_in_place() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 1));
        cart.add(line("B", 5, 1));
        cart.add(line("A", 10, 2));

        let skus: Vec<&str> = cart.lines().iter().map(|l| l.sku.as_str()).collect();
        assert_eq!(skus, vec!["A", "B"]);
        assert_eq!(cart.get("A").unwrap().quantity, 3);
        assert_eq!(cart.item_count(), 4);
    }

    #[test]
    fn test_add_ignores_zero_quantity() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 0));
        assert!(cart.is_empty());
    }

    #[test]
    fn test_update_quantity_is_absolute() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 3));
        assert!(cart.update_quantity("A", 5));
        assert_eq!(cart.get("A").unwrap().quantity, 5);
    }

    #[test]
    fn test_update_quantity_below_one_is_ignored() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 3));
        assert!(!cart.update_quantity("A", 0));
        assert_eq!(cart.get("A").unwrap().quantity, 3);
        assert!(!cart.update_quantity("missing", 2));
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 1));
        assert!(!cart.remove("Z"));
        assert_eq!(cart.line_count(), 1);
        assert!(cart.remove("A"));
        assert!(!cart.remove("A"));
    }

    #[test]
    fn test_total_tracks_lines() {
        let mut cart = Cart::new();
        cart.add(line("A", 10, 2));
        cart.add(line("B", 3, 1));
        assert_eq!(cart.total(), Decimal::from(23));
        cart.clear();
        assert_eq!(cart.total(), Decimal::ZERO);
    }

    #[test]
    fn test_json_shape() {
        let cart: Cart = std::iter::once(line("A", 10, 1)).collect();
        let value: serde_json::Value = serde_json::from_str(&cart.to_json().unwrap()).unwrap();
        assert_eq!(value[0]["sku"], "A");
        assert_eq!(value[0]["productId"], "prod-1");
        assert_eq!(value[0]["slug"], "linen-shirt");
    }
}
