//! # Checkout Session Creator
//!
//! Port through which the cart hands its items to the commerce backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │               CheckoutSessionCreator (trait)                │
//! │  ├── create_session()                                       │
//! │  └── provider_name()                                        │
//! └─────────────────────────────────────────────────────────────┘
//!                            ▲
//!          ┌─────────────────┴─────────────────┐
//!          │                                   │
//!  ┌───────┴────────┐                 ┌────────┴───────┐
//!  │ ShopifyCheckout│                 │ test doubles   │
//!  │    Creator     │                 │                │
//!  └────────────────┘                 └────────────────┘
//! ```

use crate::error::CartResult;
use crate::item::LineItem;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A remote checkout created from the cart contents
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    /// Remote cart ID, when the backend models checkout as a cart
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cart_id: Option<String>,

    /// URL to redirect the customer to
    pub checkout_url: String,

    /// Provider name (e.g., "shopify")
    pub provider: String,

    pub created_at: DateTime<Utc>,
}

impl CheckoutSession {
    pub fn new(provider: impl Into<String>, checkout_url: impl Into<String>) -> Self {
        Self {
            cart_id: None,
            checkout_url: checkout_url.into(),
            provider: provider.into(),
            created_at: Utc::now(),
        }
    }

    /// Builder: set the remote cart ID
    pub fn with_cart_id(mut self, cart_id: impl Into<String>) -> Self {
        self.cart_id = Some(cart_id.into());
        self
    }
}

/// Creates a hosted checkout for a set of line items.
///
/// Implementations make a single attempt; the cart store decides what a
/// failure means for the UI.
#[async_trait]
pub trait CheckoutSessionCreator: Send + Sync {
    /// Create a checkout session and return its redirect URL.
    ///
    /// # Arguments
    /// * `items` - Snapshot of the cart's line items (never empty when
    ///   called by the store)
    async fn create_session(&self, items: &[LineItem]) -> CartResult<CheckoutSession>;

    /// Get the provider name (for logging).
    fn provider_name(&self) -> &'static str;
}

/// Type alias for a shared checkout creator (dynamic dispatch)
pub type BoxedCheckoutCreator = Arc<dyn CheckoutSessionCreator>;
