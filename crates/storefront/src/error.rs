//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::catalog::ProviderError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Catalog provider operation failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] ProviderError),

    /// The selection cannot be added to the cart.
    #[error("Cannot add to cart: {0}")]
    NotAddable(String),

    /// The operation exists but is not offered.
    #[error("Not implemented: {0}")]
    NotImplemented(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        // Capture server errors to Sentry
        if matches!(
            self,
            Self::Catalog(ProviderError::Sanity(_) | ProviderError::Fixture(_))
        ) {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        let status = match &self {
            Self::Catalog(ProviderError::NotFound(_)) => StatusCode::NOT_FOUND,
            Self::Catalog(ProviderError::Sanity(_)) => StatusCode::BAD_GATEWAY,
            Self::Catalog(ProviderError::Fixture(_)) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotAddable(_) => StatusCode::CONFLICT,
            Self::NotImplemented(_) => StatusCode::NOT_IMPLEMENTED,
        };

        // Don't expose internal error details to clients
        let message = match &self {
            Self::Catalog(ProviderError::NotFound(what)) => format!("Not found: {what}"),
            Self::Catalog(ProviderError::Sanity(_)) => "External service error".to_string(),
            Self::Catalog(ProviderError::Fixture(_)) => "Internal server error".to_string(),
            _ => self.to_string(),
        };

        (status, message).into_response()
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Add a breadcrumb for shopper actions.
///
/// Breadcrumbs appear in Sentry error reports to show the trail of actions
/// leading up to an error.
///
/// # Example
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("sku", "Blue-M-000042")]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
