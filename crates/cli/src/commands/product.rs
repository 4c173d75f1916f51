//! Catalog management commands.
//!
//! # Usage
//!
//! ```bash
//! boutique product list
//! boutique product show linen-shirt
//! boutique product create --file shirt.yaml
//! boutique product update <id> --file shirt.yaml
//! boutique product delete <id>
//! ```
//!
//! Draft files are YAML (`.yaml`/`.yml`) or JSON. Variants without a `sku`
//! get one generated; the slug is derived from the title when omitted.
//!
//! # Environment Variables
//!
//! - `SANITY_PROJECT_ID`, `SANITY_DATASET`, `SANITY_API_VERSION`
//! - `SANITY_API_TOKEN` - required for create, update and delete

use std::path::Path;

use boutique_core::{Product, ProductDraft, ProductId};
use serde_json::json;
use tracing::info;

use super::{CommandError, catalog_provider, print_json, sanity_client};

/// Read a product draft from a YAML or JSON file.
///
/// # Errors
///
/// Returns an error if the file cannot be read or parsed.
pub fn read_draft(path: &Path) -> Result<ProductDraft, CommandError> {
    let text = std::fs::read_to_string(path).map_err(|source| CommandError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_draft(path, &text)
}

fn parse_draft(path: &Path, text: &str) -> Result<ProductDraft, CommandError> {
    let is_yaml = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("yaml") || e.eq_ignore_ascii_case("yml"));

    let parsed = if is_yaml {
        serde_yaml::from_str(text).map_err(|e| e.to_string())
    } else {
        serde_json::from_str(text).map_err(|e| e.to_string())
    };
    parsed.map_err(|message| CommandError::Parse {
        path: path.to_path_buf(),
        message,
    })
}

fn summary(product: &Product) -> serde_json::Value {
    json!({
        "id": product.id,
        "title": product.title,
        "slug": product.slug,
        "price": product.price,
        "variants": product.variants.len(),
        "stock": product.total_stock(),
    })
}

/// List every product.
///
/// # Errors
///
/// Returns an error if the catalog cannot be read.
pub async fn list() -> Result<(), CommandError> {
    let products = catalog_provider()?.products().await?;
    info!(count = products.len(), "Fetched products");
    print_json(&products.iter().map(summary).collect::<serde_json::Value>())
}

/// Show one product in full.
///
/// # Errors
///
/// Returns an error if the product does not exist or the catalog cannot be read.
pub async fn show(slug: &str) -> Result<(), CommandError> {
    let product = catalog_provider()?.product_by_slug(slug).await?;
    print_json(&serde_json::to_value(&product)?)
}

/// Create a product from a draft file.
///
/// # Errors
///
/// Returns an error if the draft is invalid or the write fails.
pub async fn create(file: &Path) -> Result<(), CommandError> {
    let document = read_draft(file)?.into_document(&mut rand::rng())?;
    let client = sanity_client()?;

    info!(title = %document.title, slug = %document.slug, "Creating product");
    let id = client.create_product(&document).await?;
    info!(%id, "Product created");

    print_json(&json!({ "id": id, "slug": document.slug }))
}

/// Replace a product's fields from a draft file.
///
/// # Errors
///
/// Returns an error if the draft is invalid or the write fails.
pub async fn update(id: &str, file: &Path) -> Result<(), CommandError> {
    let id = ProductId::new(id);
    let document = read_draft(file)?.into_document(&mut rand::rng())?;
    let client = sanity_client()?;

    info!(%id, title = %document.title, "Updating product");
    client.update_product(&id, &document).await?;

    print_json(&json!({ "id": id, "slug": document.slug }))
}

/// Delete a product.
///
/// # Errors
///
/// Returns an error if the write fails.
pub async fn delete(id: &str) -> Result<(), CommandError> {
    let id = ProductId::new(id);
    let client = sanity_client()?;

    info!(%id, "Deleting product");
    client.delete_product(&id).await?;

    print_json(&json!({ "id": id, "deleted": true }))
}
