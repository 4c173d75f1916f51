//! CLI subcommand implementations.

pub mod cart;
pub mod product;

use std::path::{Path, PathBuf};

use boutique_core::CatalogError;
use boutique_storefront::catalog::{CatalogProvider, InMemoryCatalog, ProviderError};
use boutique_storefront::config::{ConfigError, SanityConfig};
use boutique_storefront::sanity::{SanityClient, SanityError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Content store request failed.
    #[error("Content store error: {0}")]
    Sanity(#[from] SanityError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] ProviderError),

    /// Product draft failed validation.
    #[error("Invalid product: {0}")]
    Draft(#[from] CatalogError),

    /// Input file could not be read.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Input file could not be parsed.
    #[error("Failed to parse {path}: {message}")]
    Parse { path: PathBuf, message: String },

    /// The selection cannot be added to the cart.
    #[error("Cannot add to cart: {0}")]
    NotAddable(&'static str),

    /// Output could not be rendered.
    #[error("Output error: {0}")]
    Output(#[from] serde_json::Error),
}

/// Connect to the content store using `SANITY_*` environment variables.
///
/// # Errors
///
/// Returns an error if the configuration is missing or invalid.
pub fn sanity_client() -> Result<SanityClient, CommandError> {
    dotenvy::dotenv().ok();
    let config = SanityConfig::from_env()?;
    tracing::debug!(project = %config.project_id, dataset = %config.dataset, "Using content store");
    Ok(SanityClient::new(&config)?)
}

/// Catalog for read-only lookups: the `STOREFRONT_CATALOG_FILE` fixture when
/// set, otherwise the content store.
///
/// # Errors
///
/// Returns an error if the fixture cannot be loaded or the content store is
/// not configured.
pub fn catalog_provider() -> Result<Box<dyn CatalogProvider>, CommandError> {
    dotenvy::dotenv().ok();
    match std::env::var("STOREFRONT_CATALOG_FILE") {
        Ok(path) if !path.is_empty() => {
            tracing::debug!(%path, "Using catalog fixture");
            Ok(Box::new(InMemoryCatalog::from_file(Path::new(&path))?))
        }
        _ => Ok(Box::new(sanity_client()?)),
    }
}

/// Print a JSON value to stdout.
///
/// # Errors
///
/// Returns an error if the value cannot be rendered.
#[allow(clippy::print_stdout)]
pub fn print_json(value: &serde_json::Value) -> Result<(), CommandError> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
