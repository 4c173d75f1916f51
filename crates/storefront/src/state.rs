//! Application state shared across handlers.

use std::sync::Arc;

use crate::catalog::{CatalogProvider, InMemoryCatalog, ProviderError};
use crate::config::{CatalogSource, StorefrontConfig};
use crate::sanity::{SanityClient, SanityError};

/// Error building application state.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("content store client: {0}")]
    Sanity(#[from] SanityError),
    #[error("catalog fixture: {0}")]
    Catalog(#[from] ProviderError),
}

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to
/// the configuration and the catalog provider.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    catalog: Arc<dyn CatalogProvider>,
}

impl AppState {
    /// Create application state around an existing catalog provider.
    #[must_use]
    pub fn new(config: StorefrontConfig, catalog: Arc<dyn CatalogProvider>) -> Self {
        Self {
            inner: Arc::new(AppStateInner { config, catalog }),
        }
    }

    /// Create application state, building the catalog provider the
    /// configuration selects.
    ///
    /// # Errors
    ///
    /// Returns an error if the content store client cannot be built or the
    /// catalog fixture cannot be loaded.
    pub fn from_config(config: StorefrontConfig) -> Result<Self, StateError> {
        let catalog: Arc<dyn CatalogProvider> = match &config.catalog {
            CatalogSource::Sanity(sanity) => Arc::new(SanityClient::new(sanity)?),
            CatalogSource::File(path) => {
                tracing::info!(path = %path.display(), "Serving catalog from fixture");
                Arc::new(InMemoryCatalog::from_file(path)?)
            }
        };
        Ok(Self::new(config, catalog))
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get the catalog provider.
    #[must_use]
    pub fn catalog(&self) -> &dyn CatalogProvider {
        self.inner.catalog.as_ref()
    }
}
