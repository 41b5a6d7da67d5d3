//! # Shopify Configuration
//!
//! Configuration for the Storefront API.
//! Secrets are loaded from environment variables.

use cart_core::CartError;
use std::env;

/// Storefront API version used when `SHOPIFY_API_VERSION` is unset
pub const DEFAULT_API_VERSION: &str = "2025-07";

/// Storefront API configuration
#[derive(Clone)]
pub struct ShopifyConfig {
    /// Permanent store domain (e.g. "my-shop.myshopify.com")
    pub store_domain: String,

    /// Storefront access token (public, sent as `X-Shopify-Storefront-Access-Token`)
    pub storefront_token: String,

    /// API version (e.g. "2025-07")
    pub api_version: String,

    /// API base URL (for testing/mocking)
    pub api_base_url: String,
}

impl std::fmt::Debug for ShopifyConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ShopifyConfig")
            .field("store_domain", &self.store_domain)
            .field("storefront_token", &"[redacted]")
            .field("api_version", &self.api_version)
            .field("api_base_url", &self.api_base_url)
            .finish()
    }
}

impl ShopifyConfig {
    /// Load configuration from environment variables.
    ///
    /// Required env vars:
    /// - `SHOPIFY_STORE_DOMAIN`
    /// - `SHOPIFY_STOREFRONT_TOKEN`
    ///
    /// Optional: `SHOPIFY_API_VERSION` (defaults to [`DEFAULT_API_VERSION`])
    pub fn from_env() -> Result<Self, CartError> {
        dotenvy::dotenv().ok(); // Load .env file if present

        let store_domain = env::var("SHOPIFY_STORE_DOMAIN").map_err(|_| {
            CartError::Configuration("SHOPIFY_STORE_DOMAIN not set".to_string())
        })?;

        let storefront_token = env::var("SHOPIFY_STOREFRONT_TOKEN").map_err(|_| {
            CartError::Configuration("SHOPIFY_STOREFRONT_TOKEN not set".to_string())
        })?;

        let config = Self::new(store_domain, storefront_token);
        let config = match env::var("SHOPIFY_API_VERSION") {
            Ok(version) if !version.trim().is_empty() => config.with_api_version(version.trim()),
            _ => config,
        };

        config.validate()?;
        Ok(config)
    }

    /// Create config with explicit values
    pub fn new(store_domain: impl Into<String>, storefront_token: impl Into<String>) -> Self {
        let store_domain = store_domain.into().trim().trim_end_matches('/').to_string();
        Self {
            api_base_url: format!("https://{}", store_domain),
            store_domain,
            storefront_token: storefront_token.into(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    /// Check that the values can form a working endpoint
    pub fn validate(&self) -> Result<(), CartError> {
        if self.store_domain.is_empty() {
            return Err(CartError::Configuration(
                "SHOPIFY_STORE_DOMAIN must not be empty".to_string(),
            ));
        }

        if self.store_domain.contains("://") {
            return Err(CartError::Configuration(
                "SHOPIFY_STORE_DOMAIN must be a bare domain, without scheme".to_string(),
            ));
        }

        if self.storefront_token.trim().is_empty() {
            return Err(CartError::Configuration(
                "SHOPIFY_STOREFRONT_TOKEN must not be empty".to_string(),
            ));
        }

        Ok(())
    }

    /// GraphQL endpoint for this store
    pub fn endpoint(&self) -> String {
        format!("{}/api/{}/graphql.json", self.api_base_url, self.api_version)
    }

    /// Builder: set API version
    pub fn with_api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Builder: set custom API base URL (for testing)
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}
