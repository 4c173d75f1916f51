//! Catalog provider boundary.
//!
//! Routes read products and collections through [`CatalogProvider`] and never
//! talk to the content store directly. [`SanityClient`] is the production
//! implementation; [`InMemoryCatalog`] serves a fixed catalog (fixture files
//! for offline development, and tests).

use std::path::Path;

use async_trait::async_trait;
use boutique_core::{Collection, Product};
use serde::Deserialize;
use thiserror::Error;

use crate::sanity::{SanityClient, SanityError};

/// Errors surfaced by a catalog provider.
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Requested product or collection does not exist.
    #[error("Not found: {0}")]
    NotFound(String),

    /// The content store request failed.
    #[error("Content store error: {0}")]
    Sanity(SanityError),

    /// A catalog fixture could not be loaded.
    #[error("Catalog fixture error: {0}")]
    Fixture(String),
}

impl From<SanityError> for ProviderError {
    fn from(err: SanityError) -> Self {
        match err {
            SanityError::NotFound(what) => Self::NotFound(what),
            other => Self::Sanity(other),
        }
    }
}

/// Read access to products and navigation collections.
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Every listed product.
    async fn products(&self) -> Result<Vec<Product>, ProviderError>;

    /// One product by slug.
    async fn product_by_slug(&self, slug: &str) -> Result<Product, ProviderError>;

    /// Navigation collections.
    async fn collections(&self) -> Result<Vec<Collection>, ProviderError>;
}

#[async_trait]
impl CatalogProvider for SanityClient {
    async fn products(&self) -> Result<Vec<Product>, ProviderError> {
        Ok(self.get_products().await?)
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Product, ProviderError> {
        Ok(self.get_product_by_slug(slug).await?)
    }

    async fn collections(&self) -> Result<Vec<Collection>, ProviderError> {
        Ok(self.get_collections().await?)
    }
}

/// A fixed, in-memory catalog.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InMemoryCatalog {
    #[serde(default)]
    products: Vec<Product>,
    #[serde(default)]
    collections: Vec<Collection>,
}

impl InMemoryCatalog {
    /// Create a catalog from products and collections.
    #[must_use]
    pub const fn new(products: Vec<Product>, collections: Vec<Collection>) -> Self {
        Self {
            products,
            collections,
        }
    }

    /// Load a catalog from a JSON fixture of the form
    /// `{ "products": [...], "collections": [...] }`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| ProviderError::Fixture(format!("{}: {e}", path.display())))?;
        serde_json::from_str(&text)
            .map_err(|e| ProviderError::Fixture(format!("{}: {e}", path.display())))
    }
}

#[async_trait]
impl CatalogProvider for InMemoryCatalog {
    async fn products(&self) -> Result<Vec<Product>, ProviderError> {
        Ok(self.products.clone())
    }

    async fn product_by_slug(&self, slug: &str) -> Result<Product, ProviderError> {
        self.products
            .iter()
            .find(|p| p.slug.as_str() == slug)
            .cloned()
            .ok_or_else(|| ProviderError::NotFound(format!("Product not found: {slug}")))
    }

    async fn collections(&self) -> Result<Vec<Collection>, ProviderError> {
        Ok(self.collections.clone())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn catalog() -> InMemoryCatalog {
        serde_json::from_value(serde_json::json!({
            "products": [{
                "_id": "prod-1",
                "title": "Linen Shirt",
                "price": 10,
                "variants": [{ "size": "M", "color": "Blue", "quantity": 5, "sku": "Blue-M-1" }],
                "slug": "linen-shirt"
            }],
            "collections": [{ "_id": "c1", "name": "Men", "linkTarget": "/products?category=men" }]
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_product_by_slug() {
        let catalog = catalog();
        let product = catalog.product_by_slug("linen-shirt").await.unwrap();
        assert_eq!(product.title, "Linen Shirt");

        let missing = catalog.product_by_slug("nope").await;
        assert!(matches!(missing, Err(ProviderError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_collections() {
        let collections = catalog().collections().await.unwrap();
        assert_eq!(collections[0].link_target, "/products?category=men");
    }

    #[test]
    fn test_sanity_not_found_maps_to_not_found() {
        let err = ProviderError::from(SanityError::NotFound("Product not found: x".to_owned()));
        assert!(matches!(err, ProviderError::NotFound(_)));
        let err = ProviderError::from(SanityError::RateLimited(5));
        assert!(matches!(err, ProviderError::Sanity(_)));
    }

    #[test]
    fn test_missing_fixture_file() {
        let result = InMemoryCatalog::from_file(Path::new("/definitely/not/here.json"));
        assert!(matches!(result, Err(ProviderError::Fixture(_))));
    }
}
