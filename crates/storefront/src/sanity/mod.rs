//! Hosted content store client (Sanity HTTP API).
//!
//! # Architecture
//!
//! - GROQ queries over `GET /data/query/{dataset}`, mutations over
//!   `POST /data/mutate/{dataset}`
//! - The content store is source of truth - NO local sync, direct API calls
//! - In-memory caching via `moka` for query responses (60 second TTL);
//!   any successful mutation clears the cache
//!
//! # Example
//!
//! ```rust,ignore
//! use boutique_storefront::sanity::SanityClient;
//!
//! let client = SanityClient::new(&config.sanity)?;
//! let product = client.get_product_by_slug("linen-shirt").await?;
//! ```

mod cache;
pub mod mutations;
pub mod queries;

use std::sync::Arc;
use std::time::Duration;

use boutique_core::catalog::ProductDocument;
use boutique_core::{Collection, Product, ProductId};
use moka::future::Cache;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use tracing::{debug, instrument};
use url::Url;

use crate::config::SanityConfig;
use cache::{CacheKey, CacheValue};

/// Query response TTL.
const CACHE_TTL: Duration = Duration::from_secs(60);

/// Longest response body excerpt included in logs and errors.
const BODY_EXCERPT: usize = 500;

/// Errors that can occur when talking to the content store.
#[derive(Debug, Error)]
pub enum SanityError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success status.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error description from the response body.
        message: String,
    },

    /// JSON parsing failed.
    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured project produced an invalid endpoint URL.
    #[error("Invalid endpoint: {0}")]
    Endpoint(#[from] url::ParseError),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Rate limited by the API.
    #[error("Rate limited, retry after {0} seconds")]
    RateLimited(u64),

    /// A mutation was attempted without an API token.
    #[error("An API token is required for mutations")]
    MissingToken,
}

/// Query response envelope.
#[derive(Debug, Deserialize)]
struct QueryResponse<T> {
    result: Option<T>,
}

/// Error response envelope.
#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    description: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
}

/// Mutation response envelope.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MutateResponse {
    #[serde(default)]
    transaction_id: Option<String>,
    #[serde(default)]
    results: Vec<MutateResult>,
}

#[derive(Debug, Deserialize)]
struct MutateResult {
    id: String,
}

// =============================================================================
// SanityClient
// =============================================================================

/// Client for the content store's query and mutation APIs.
///
/// Products and collections are cached for 60 seconds.
#[derive(Clone)]
pub struct SanityClient {
    inner: Arc<SanityClientInner>,
}

struct SanityClientInner {
    client: reqwest::Client,
    query_url: Url,
    mutate_url: Url,
    token: Option<SecretString>,
    cache: Cache<CacheKey, CacheValue>,
}

impl SanityClient {
    /// Create a new client.
    ///
    /// # Errors
    ///
    /// Returns an error if the project id or dataset produce an invalid URL.
    pub fn new(config: &SanityConfig) -> Result<Self, SanityError> {
        let cache = Cache::builder()
            .max_capacity(1000)
            .time_to_live(CACHE_TTL)
            .build();

        // The CDN only serves reads; writes always go to the live API.
        let query_host = if config.use_cdn {
            "apicdn.sanity.io"
        } else {
            "api.sanity.io"
        };
        let query_url = Url::parse(&format!(
            "https://{}.{query_host}/v{}/data/query/{}",
            config.project_id, config.api_version, config.dataset
        ))?;
        let mutate_url = Url::parse(&format!(
            "https://{}.api.sanity.io/v{}/data/mutate/{}",
            config.project_id, config.api_version, config.dataset
        ))?;

        Ok(Self {
            inner: Arc::new(SanityClientInner {
                client: reqwest::Client::new(),
                query_url,
                mutate_url,
                token: config.token.clone(),
                cache,
            }),
        })
    }

    /// Build the query URL for a GROQ query and its `$name` parameters.
    fn query_url(&self, query: &str, params: &[(&str, serde_json::Value)]) -> Url {
        let mut url = self.inner.query_url.clone();
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("query", query);
            for (name, value) in params {
                pairs.append_pair(&format!("${name}"), &value.to_string());
            }
        }
        url
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.inner.token {
            Some(token) => request.bearer_auth(token.expose_secret()),
            None => request,
        }
    }

    /// Send a request and return the body of a successful response.
    async fn send(&self, request: reqwest::RequestBuilder) -> Result<String, SanityError> {
        let response = self.authorize(request).send().await?;
        let status = response.status();

        if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
            let retry_after = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(SanityError::RateLimited(retry_after));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::error!(
                status = %status,
                body = %excerpt(&body),
                "Content store returned non-success status"
            );
            return Err(SanityError::Api {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        Ok(body)
    }

    /// Execute a GROQ query.
    async fn query<T: DeserializeOwned>(
        &self,
        query: &str,
        params: &[(&str, serde_json::Value)],
    ) -> Result<Option<T>, SanityError> {
        let url = self.query_url(query, params);
        let body = self.send(self.inner.client.get(url)).await?;

        let response: QueryResponse<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %excerpt(&body),
                "Failed to parse content store query response"
            );
            SanityError::Parse(e)
        })?;

        Ok(response.result)
    }

    /// Execute a mutation transaction, returning the affected document ids.
    async fn mutate(&self, body: &serde_json::Value) -> Result<Vec<String>, SanityError> {
        if self.inner.token.is_none() {
            return Err(SanityError::MissingToken);
        }

        let mut url = self.inner.mutate_url.clone();
        url.query_pairs_mut()
            .append_pair("returnIds", "true")
            .append_pair("visibility", "sync");

        let request = self.inner.client.post(url).json(body);
        let text = self.send(request).await?;
        let response: MutateResponse = serde_json::from_str(&text)?;

        debug!(transaction_id = ?response.transaction_id, "Mutation committed");
        self.inner.cache.invalidate_all();

        Ok(response.results.into_iter().map(|r| r.id).collect())
    }

    // =========================================================================
    // Product Methods
    // =========================================================================

    /// Get a product by its slug.
    ///
    /// # Errors
    ///
    /// Returns an error if the product is not found or the API request fails.
    #[instrument(skip(self), fields(slug = %slug))]
    pub async fn get_product_by_slug(&self, slug: &str) -> Result<Product, SanityError> {
        let cache_key = CacheKey::Product(slug.to_owned());

        if let Some(CacheValue::Product(product)) = self.inner.cache.get(&cache_key).await {
            debug!("Cache hit for product");
            return Ok(*product);
        }

        let product: Product = self
            .query(queries::PRODUCT_BY_SLUG, &[("slug", serde_json::json!(slug))])
            .await?
            .ok_or_else(|| SanityError::NotFound(format!("Product not found: {slug}")))?;

        self.inner
            .cache
            .insert(cache_key, CacheValue::Product(Box::new(product.clone())))
            .await;

        Ok(product)
    }

    /// Get every published product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_products(&self) -> Result<Vec<Product>, SanityError> {
        if let Some(CacheValue::Products(products)) = self.inner.cache.get(&CacheKey::Products).await {
            debug!("Cache hit for products");
            return Ok(products);
        }

        let products: Vec<Product> = self
            .query(queries::PRODUCTS, &[])
            .await?
            .unwrap_or_default();

        self.inner
            .cache
            .insert(CacheKey::Products, CacheValue::Products(products.clone()))
            .await;

        Ok(products)
    }

    /// Create a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured or the API request fails.
    #[instrument(skip(self, doc), fields(slug = %doc.slug))]
    pub async fn create_product(&self, doc: &ProductDocument) -> Result<ProductId, SanityError> {
        let ids = self.mutate(&mutations::create(doc)).await?;
        ids.into_iter()
            .next()
            .map(ProductId::new)
            .ok_or_else(|| SanityError::Api {
                status: 200,
                message: "mutation returned no document id".to_owned(),
            })
    }

    /// Replace a product document's fields.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured, the document does not
    /// exist, or the API request fails.
    #[instrument(skip(self, doc), fields(id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        doc: &ProductDocument,
    ) -> Result<(), SanityError> {
        let ids = self.mutate(&mutations::replace(id, doc)).await?;
        if ids.is_empty() {
            return Err(SanityError::NotFound(format!("Product not found: {id}")));
        }
        Ok(())
    }

    /// Delete a product document.
    ///
    /// # Errors
    ///
    /// Returns an error if no token is configured or the API request fails.
    #[instrument(skip(self), fields(id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<(), SanityError> {
        self.mutate(&mutations::delete(id)).await?;
        Ok(())
    }

    // =========================================================================
    // Collection Methods
    // =========================================================================

    /// Get the navigation collections.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn get_collections(&self) -> Result<Vec<Collection>, SanityError> {
        if let Some(CacheValue::Collections(collections)) =
            self.inner.cache.get(&CacheKey::Collections).await
        {
            debug!("Cache hit for collections");
            return Ok(collections);
        }

        let collections: Vec<Collection> = self
            .query(queries::COLLECTIONS, &[])
            .await?
            .unwrap_or_default();

        self.inner
            .cache
            .insert(
                CacheKey::Collections,
                CacheValue::Collections(collections.clone()),
            )
            .await;

        Ok(collections)
    }
}

fn excerpt(body: &str) -> String {
    body.chars().take(BODY_EXCERPT).collect()
}

/// Pull the description out of an error envelope, falling back to the body.
fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorResponse>(body) {
        Ok(ErrorResponse {
            error: ErrorBody {
                description: Some(description),
                ..
            },
        }) => description,
        Ok(ErrorResponse {
            error: ErrorBody {
                kind: Some(kind), ..
            },
        }) => kind,
        _ => body.chars().take(200).collect(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config(use_cdn: bool) -> SanityConfig {
        SanityConfig {
            project_id: "3jc8hsku".to_owned(),
            dataset: "production".to_owned(),
            api_version: "2023-07-30".to_owned(),
            use_cdn,
            token: None,
        }
    }

    #[test]
    fn test_endpoints() {
        let client = SanityClient::new(&config(false)).unwrap();
        assert_eq!(
            client.inner.query_url.as_str(),
            "https://3jc8hsku.api.sanity.io/v2023-07-30/data/query/production"
        );
        assert_eq!(
            client.inner.mutate_url.as_str(),
            "https://3jc8hsku.api.sanity.io/v2023-07-30/data/mutate/production"
        );

        let cdn = SanityClient::new(&config(true)).unwrap();
        assert!(cdn.inner.query_url.as_str().contains("apicdn.sanity.io"));
        assert!(cdn.inner.mutate_url.as_str().contains("://3jc8hsku.api.sanity.io"));
    }

    #[test]
    fn test_query_url_encodes_params_as_json() {
        let client = SanityClient::new(&config(false)).unwrap();
        let url = client.query_url(queries::PRODUCT_BY_SLUG, &[("slug", serde_json::json!("linen-shirt"))]);
        let pairs: Vec<(String, String)> = url.query_pairs().into_owned().collect();
        assert_eq!(pairs[0].0, "query");
        assert_eq!(pairs[1], ("$slug".to_owned(), "\"linen-shirt\"".to_owned()));
    }

    #[test]
    fn test_error_message_prefers_description() {
        let body = r#"{"error":{"description":"param $slug referenced, but not provided","type":"queryParseError"}}"#;
        assert_eq!(error_message(body), "param $slug referenced, but not provided");
        assert_eq!(error_message(r#"{"error":{"type":"forbidden"}}"#), "forbidden");
        assert_eq!(error_message("gateway timeout"), "gateway timeout");
    }

    #[tokio::test]
    async fn test_mutation_without_token_fails_fast() {
        let client = SanityClient::new(&config(false)).unwrap();
        let result = client.delete_product(&ProductId::new("prod-1")).await;
        assert!(matches!(result, Err(SanityError::MissingToken)));
    }

    #[test]
    fn test_error_display() {
        let err = SanityError::RateLimited(60);
        assert_eq!(err.to_string(), "Rate limited, retry after 60 seconds");
        let err = SanityError::Api {
            status: 403,
            message: "forbidden".to_owned(),
        };
        assert_eq!(err.to_string(), "API error (403): forbidden");
    }
}
