//! # Application State
//!
//! Shared state for the Axum application: the process-wide cart store
//! and the configuration it was built from.

use cart_core::{BoxedCartStorage, CartStore, FileStorage, MemoryStorage};
use cart_shopify::ShopifyCheckoutCreator;
use std::path::PathBuf;
use std::sync::Arc;

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Environment (development, staging, production)
    pub environment: String,
    /// Directory for the persisted cart; in-memory when unset
    pub storage_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Load from environment variables
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        Self {
            host: std::env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: std::env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string()),
            storage_dir: std::env::var("CART_STORAGE_DIR")
                .ok()
                .filter(|dir| !dir.trim().is_empty())
                .map(PathBuf::from),
        }
    }

    /// Get the socket address to bind to
    pub fn socket_addr(&self) -> anyhow::Result<std::net::SocketAddr> {
        format!("{}:{}", self.host, self.port)
            .parse()
            .map_err(|e| anyhow::anyhow!("Invalid socket address {}:{}: {}", self.host, self.port, e))
    }

    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// Storage backend selected by `storage_dir`
    pub fn storage(&self) -> BoxedCartStorage {
        match &self.storage_dir {
            Some(dir) => Arc::new(FileStorage::new(dir.clone())),
            None => Arc::new(MemoryStorage::new()),
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// The cart store (one per process)
    pub cart: Arc<CartStore>,
    /// Application config
    pub config: AppConfig,
}

impl AppState {
    /// Create a new AppState backed by the Shopify Storefront API
    pub fn new() -> anyhow::Result<Self> {
        let config = AppConfig::from_env();

        let creator = ShopifyCheckoutCreator::from_env()
            .map_err(|e| anyhow::anyhow!("Failed to initialize Shopify checkout: {}", e))?;

        let cart = CartStore::open(Arc::new(creator), config.storage())
            .map_err(|e| anyhow::anyhow!("Failed to open cart storage: {}", e))?;

        Ok(Self::with_store(config, cart))
    }

    /// Wrap an already opened store
    pub fn with_store(config: AppConfig, cart: CartStore) -> Self {
        Self {
            cart: Arc::new(cart),
            config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_config_defaults() {
        // Clear env vars for test
        std::env::remove_var("HOST");
        std::env::remove_var("PORT");
        std::env::remove_var("CART_STORAGE_DIR");

        let config = AppConfig::from_env();
        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 8080);
        assert!(config.storage_dir.is_none());
    }

    #[test]
    fn test_socket_addr() {
        let config = AppConfig {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: "test".to_string(),
            storage_dir: None,
        };

        let addr = config.socket_addr().unwrap();
        assert_eq!(addr.to_string(), "0.0.0.0:3000");

        let bad = AppConfig {
            host: "not a host".to_string(),
            ..config
        };
        assert!(bad.socket_addr().is_err());
    }
}
