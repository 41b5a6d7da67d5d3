//! # Cart Error Types
//!
//! Typed error handling for the storefront cart.
//! Fallible cart operations return `Result<T, CartError>`.

use thiserror::Error;

/// Core error type for cart, storage, and checkout operations
#[derive(Debug, Error)]
pub enum CartError {
    /// Configuration errors (missing store domain, token, etc.)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Network/HTTP error communicating with the commerce backend
    #[error("Network error: {0}")]
    Network(String),

    /// Commerce backend returned an error (non-2xx or GraphQL errors)
    #[error("Provider error [{provider}]: {message}")]
    Provider { provider: String, message: String },

    /// Backend accepted the request but rejected the cart lines
    #[error("Checkout rejected: {0}")]
    CheckoutRejected(String),

    /// Rate limited by the commerce backend
    #[error("Rate limited by {provider}, retry after {retry_after_secs} seconds")]
    RateLimited {
        provider: String,
        retry_after_secs: u64,
    },

    /// Reading or writing persisted cart data failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl CartError {
    /// Returns true if this error is retryable
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            CartError::Network(_) | CartError::RateLimited { .. } | CartError::Provider { .. }
        )
    }

    /// Returns the HTTP status code appropriate for this error
    pub fn status_code(&self) -> u16 {
        match self {
            CartError::Configuration(_) => 500,
            CartError::InvalidRequest(_) => 400,
            CartError::Network(_) => 503,
            CartError::Provider { .. } => 502,
            CartError::CheckoutRejected(_) => 422,
            CartError::RateLimited { .. } => 429,
            CartError::Storage(_) => 500,
            CartError::Serialization(_) => 500,
            CartError::Internal(_) => 500,
        }
    }
}

impl From<serde_json::Error> for CartError {
    fn from(err: serde_json::Error) -> Self {
        CartError::Serialization(err.to_string())
    }
}

/// Result type alias for cart operations
pub type CartResult<T> = Result<T, CartError>;
