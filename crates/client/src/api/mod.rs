//! Inventory backend REST client.
//!
//! # API Reference
//!
//! - Base URL: `STOCKROOM_API_URL`
//! - Authentication: `Authorization: Bearer <token>` on every request
//!
//! | method | path | purpose |
//! |---|---|---|
//! | GET | `/product` | product catalog |
//! | GET | `/colors/allcolors` | color catalog |
//! | GET | `/items/{id}` | one item, product populated |
//! | GET | `/items/check?productId&category&excludeId` | duplicate precheck |
//! | PUT | `/items/{id}` | update an item |

mod types;

use std::future::Future;
use std::sync::Arc;

use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use stockroom_core::{Color, InventoryItem, ItemId, ItemUpdate, Product, ProductId};
use thiserror::Error;
use tracing::instrument;
use url::Url;

use crate::config::ClientConfig;
use crate::session::Session;
use types::{ColorsResponse, ErrorBody, ExistsResponse, ItemResponse, ProductsResponse};

/// Errors that can occur when talking to the inventory backend.
#[derive(Debug, Error)]
pub enum ApiError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// API returned an error response.
    #[error("API error: {status} - {}", .message.as_deref().unwrap_or("no message"))]
    Api { status: u16, message: Option<String> },

    /// Resource not found.
    #[error("Not found: {path}")]
    NotFound { path: String, message: Option<String> },

    /// The backend rejected the bearer token.
    #[error("Unauthorized: session token rejected")]
    Unauthorized { message: Option<String> },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(String),

    /// A request URL could not be built.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// The token contains characters not allowed in a header.
    #[error("Invalid session token format")]
    InvalidToken,
}

impl ApiError {
    /// Message supplied by the backend in its error payload, if any.
    #[must_use]
    pub fn server_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. }
            | Self::NotFound { message, .. }
            | Self::Unauthorized { message } => message.as_deref(),
            _ => None,
        }
    }

    /// Text to show the operator: the server's message, else `fallback`.
    #[must_use]
    pub fn user_message(&self, fallback: &str) -> String {
        self.server_message().unwrap_or(fallback).to_string()
    }
}

/// Operations the item editor needs from the backend.
///
/// [`InventoryClient`] is the HTTP implementation.
pub trait InventoryApi: Send + Sync {
    /// The full product catalog.
    fn products(&self) -> impl Future<Output = Result<Vec<Product>, ApiError>> + Send;

    /// The full color catalog.
    fn colors(&self) -> impl Future<Output = Result<Vec<Color>, ApiError>> + Send;

    /// One item record.
    fn item(&self, id: &ItemId) -> impl Future<Output = Result<InventoryItem, ApiError>> + Send;

    /// Whether another item already uses (`product_id`, `category`).
    fn item_exists(
        &self,
        product_id: &ProductId,
        category: &str,
        exclude: &ItemId,
    ) -> impl Future<Output = Result<bool, ApiError>> + Send;

    /// Replace the editable fields of an item.
    fn update_item(
        &self,
        id: &ItemId,
        update: &ItemUpdate,
    ) -> impl Future<Output = Result<(), ApiError>> + Send;
}

/// Inventory backend API client.
///
/// Cheap to clone; clones share one connection pool.
#[derive(Clone)]
pub struct InventoryClient {
    inner: Arc<InventoryClientInner>,
}

struct InventoryClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl InventoryClient {
    /// Create a client that authenticates as `session`.
    ///
    /// # Errors
    ///
    /// Returns error if the token is not a valid header value or the HTTP
    /// client fails to build.
    pub fn new(config: &ClientConfig, session: &Session) -> Result<Self, ApiError> {
        let mut headers = HeaderMap::new();

        let mut auth_value =
            HeaderValue::from_str(&format!("Bearer {}", session.token().expose_secret()))
                .map_err(|_| ApiError::InvalidToken)?;
        auth_value.set_sensitive(true);
        headers.insert(AUTHORIZATION, auth_value);

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(config.timeout)
            .build()?;

        Ok(Self {
            inner: Arc::new(InventoryClientInner {
                client,
                base_url: config.api_url.clone(),
            }),
        })
    }

    /// Base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Build an absolute URL for `path` under the base URL.
    fn url(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}{path}"))?)
    }

    /// Execute a GET request.
    async fn get<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, ApiError> {
        let response = self.inner.client.get(url).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request, ignoring the response body.
    async fn put<B: serde::Serialize + Sync>(&self, url: Url, body: &B) -> Result<(), ApiError> {
        let response = self.inner.client.put(url).json(body).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Parse error response from the backend.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let path = response.url().path().to_string();

        let message = response
            .json::<ErrorBody>()
            .await
            .ok()
            .and_then(ErrorBody::into_message);

        match status {
            401 | 403 => ApiError::Unauthorized { message },
            404 => ApiError::NotFound { path, message },
            _ => ApiError::Api { status, message },
        }
    }
}

impl InventoryApi for InventoryClient {
    #[instrument(skip(self))]
    async fn products(&self) -> Result<Vec<Product>, ApiError> {
        let response: ProductsResponse = self.get(self.url("/product")?).await?;
        tracing::debug!(count = response.products.len(), "Fetched products");
        Ok(response.products)
    }

    #[instrument(skip(self))]
    async fn colors(&self) -> Result<Vec<Color>, ApiError> {
        let response: ColorsResponse = self.get(self.url("/colors/allcolors")?).await?;
        let colors = response.into_colors();
        tracing::debug!(count = colors.len(), "Fetched colors");
        Ok(colors)
    }

    #[instrument(skip(self), fields(item_id = %id))]
    async fn item(&self, id: &ItemId) -> Result<InventoryItem, ApiError> {
        let mut url = self.url("/items")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Parse("base URL cannot hold a path".to_string()))?
            .push(id.as_str());
        let response: ItemResponse = self.get(url).await?;
        Ok(response.into_item())
    }

    #[instrument(skip(self), fields(product_id = %product_id, exclude = %exclude))]
    async fn item_exists(
        &self,
        product_id: &ProductId,
        category: &str,
        exclude: &ItemId,
    ) -> Result<bool, ApiError> {
        let mut url = self.url("/items/check")?;
        url.query_pairs_mut()
            .append_pair("productId", product_id.as_str())
            .append_pair("category", category)
            .append_pair("excludeId", exclude.as_str());
        let response: ExistsResponse = self.get(url).await?;
        Ok(response.exists)
    }

    #[instrument(skip(self, update), fields(item_id = %id))]
    async fn update_item(&self, id: &ItemId, update: &ItemUpdate) -> Result<(), ApiError> {
        let mut url = self.url("/items")?;
        url.path_segments_mut()
            .map_err(|()| ApiError::Parse("base URL cannot hold a path".to_string()))?
            .push(id.as_str());
        self.put(url, update).await?;
        tracing::info!("Item updated");
        Ok(())
    }
}

impl std::fmt::Debug for InventoryClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::time::Duration;

    use super::*;

    fn client(base: &str) -> InventoryClient {
        let config = ClientConfig {
            api_url: Url::parse(base).unwrap(),
            token: None,
            session_file: ".stockroom-session".into(),
            timeout: Duration::from_secs(5),
            color_threshold: 0.3,
        };
        InventoryClient::new(&config, &Session::new("token").unwrap()).unwrap()
    }

    #[test]
    fn test_url_joins_with_and_without_trailing_slash() {
        assert_eq!(
            client("http://localhost:5000/api").url("/product").unwrap().as_str(),
            "http://localhost:5000/api/product"
        );
        assert_eq!(
            client("http://localhost:5000/api/").url("/product").unwrap().as_str(),
            "http://localhost:5000/api/product"
        );
    }

    #[test]
    fn test_token_with_newline_is_rejected() {
        let config = ClientConfig {
            api_url: Url::parse("http://localhost").unwrap(),
            token: None,
            session_file: ".stockroom-session".into(),
            timeout: Duration::from_secs(5),
            color_threshold: 0.3,
        };
        let session = Session::new("abc\ndef").unwrap();
        assert!(matches!(
            InventoryClient::new(&config, &session),
            Err(ApiError::InvalidToken)
        ));
    }

    #[test]
    fn test_user_message_prefers_server_text() {
        let err = ApiError::Api {
            status: 500,
            message: Some("Database unavailable".to_string()),
        };
        assert_eq!(err.user_message("Failed"), "Database unavailable");

        let err = ApiError::Parse("bad json".to_string());
        assert_eq!(err.user_message("Failed"), "Failed");
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::Api {
            status: 502,
            message: None,
        };
        assert_eq!(err.to_string(), "API error: 502 - no message");

        let err = ApiError::NotFound {
            path: "/items/9".to_string(),
            message: None,
        };
        assert_eq!(err.to_string(), "Not found: /items/9");
    }

    #[test]
    fn test_debug_hides_client_internals() {
        let debug_output = format!("{:?}", client("http://localhost:5000"));
        assert!(debug_output.contains("localhost:5000"));
        assert!(!debug_output.contains("token"));
    }
}
