//! Local cart commands.
//!
//! # Usage
//!
//! ```bash
//! boutique cart show
//! boutique cart add linen-shirt --size M --color Blue --quantity 2
//! boutique cart update Blue-M-000042 3
//! boutique cart remove Blue-M-000042
//! boutique cart clear
//! ```
//!
//! The cart is kept in `<profile-dir>/cart.json` and survives between runs.
//! Products are looked up in `STOREFRONT_CATALOG_FILE` when set, otherwise
//! in the content store.

use std::path::Path;

use boutique_core::{Cart, CartService, resolve};
use serde_json::json;
use tracing::info;

use super::{CommandError, catalog_provider, print_json};
use crate::file_store::FileCartStore;

fn open(profile_dir: &Path) -> CartService<FileCartStore> {
    let mut service = CartService::new(FileCartStore::new(profile_dir));
    let outcome = service.hydrate();
    tracing::debug!(?outcome, dir = %profile_dir.display(), "Cart loaded");
    service
}

fn render(cart: &Cart) -> serde_json::Value {
    json!({
        "lines": cart,
        "itemCount": cart.item_count(),
        "total": cart.total(),
    })
}

/// Print the cart.
///
/// # Errors
///
/// Returns an error if the output cannot be rendered.
pub fn show(profile_dir: &Path) -> Result<(), CommandError> {
    let service = open(profile_dir);
    print_json(&render(service.cart()))
}

/// Add a variant of a product.
///
/// # Errors
///
/// Returns an error if the product cannot be found or the selection is not
/// purchasable.
pub async fn add(
    profile_dir: &Path,
    slug: &str,
    size: &str,
    color: &str,
    quantity: u32,
) -> Result<(), CommandError> {
    let product = catalog_provider()?.product_by_slug(slug).await?;
    let resolution = resolve(&product, Some(size), Some(color));
    let line = resolution
        .cart_line(&product, quantity)
        .ok_or_else(|| CommandError::NotAddable(resolution.label()))?;

    if line.quantity < quantity {
        tracing::warn!(
            requested = quantity,
            added = line.quantity,
            "Quantity limited to available stock"
        );
    }

    let mut service = open(profile_dir);
    info!(sku = %line.sku, quantity = line.quantity, "Adding to cart");
    service.add_to_cart(line);
    print_json(&render(service.cart()))
}

/// Set a line's quantity. Quantities below 1 are ignored.
///
/// # Errors
///
/// Returns an error if the output cannot be rendered.
pub fn update(profile_dir: &Path, sku: &str, quantity: u32) -> Result<(), CommandError> {
    let mut service = open(profile_dir);
    if quantity == 0 {
        tracing::warn!(%sku, "Quantity must be at least 1, cart unchanged");
    }
    service.update_quantity(sku, quantity);
    print_json(&render(service.cart()))
}

/// Remove a line.
///
/// # Errors
///
/// Returns an error if the output cannot be rendered.
pub fn remove(profile_dir: &Path, sku: &str) -> Result<(), CommandError> {
    let mut service = open(profile_dir);
    service.remove_from_cart(sku);
    print_json(&render(service.cart()))
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the output cannot be rendered.
pub fn clear(profile_dir: &Path) -> Result<(), CommandError> {
    let mut service = open(profile_dir);
    service.clear_cart();
    print_json(&render(service.cart()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use boutique_core::{CART_STORAGE_KEY, CartLine, CartStore, ProductId, Sku, Slug};
    use rust_decimal::Decimal;

    use super::*;

    fn line(sku: &str, quantity: u32) -> CartLine {
        CartLine {
            product_id: ProductId::new("prod-1"),
            title: "Linen Shirt".to_owned(),
            price: Decimal::from(10),
            image: None,
            size: "M".to_owned(),
            color: "Blue".to_owned(),
            sku: Sku::from(sku),
            quantity,
            slug: Slug::new("linen-shirt"),
        }
    }

    #[test]
    fn test_cart_survives_between_runs() {
        let dir = tempfile::tempdir().unwrap();

        let mut first = open(dir.path());
        first.add_to_cart(line("Blue-M-000001", 2));
        drop(first);

        let mut second = open(dir.path());
        assert_eq!(second.cart().get("Blue-M-000001").unwrap().quantity, 2);
        second.update_quantity("Blue-M-000001", 5);
        drop(second);

        let stored = FileCartStore::new(dir.path()).load(CART_STORAGE_KEY).unwrap().unwrap();
        let cart = Cart::from_json(&stored).unwrap();
        assert_eq!(cart.get("Blue-M-000001").unwrap().quantity, 5);
    }

    #[test]
    fn test_clear_writes_empty_cart() {
        let dir = tempfile::tempdir().unwrap();
        let mut service = open(dir.path());
        service.add_to_cart(line("Blue-M-000001", 1));
        service.clear_cart();

        let stored = FileCartStore::new(dir.path()).load(CART_STORAGE_KEY).unwrap();
        assert_eq!(stored.as_deref(), Some("[]"));
    }

    #[test]
    fn test_render_totals() {
        let cart: Cart = [line("A", 2), line("B", 1)].into_iter().collect();
        let value = render(&cart);
        assert_eq!(value["itemCount"], 3);
        assert_eq!(value["lines"][1]["sku"], "B");
    }
}
