//! # Shopify Checkout
//!
//! Creates a Storefront API cart from the local line items with the
//! `cartCreate` mutation and hands back its hosted `checkoutUrl`.

use crate::config::ShopifyConfig;
use crate::queries::{cart_create, CartCreate};
use async_trait::async_trait;
use cart_core::{CartError, CartResult, CheckoutSession, CheckoutSessionCreator, LineItem};
use graphql_client::{GraphQLQuery, QueryBody, Response};
use reqwest::{Client, StatusCode};
use tracing::{debug, error, info, instrument};

const PROVIDER: &str = "shopify";

/// Storefront access token header
pub const STOREFRONT_TOKEN_HEADER: &str = "X-Shopify-Storefront-Access-Token";

/// Checkout creator backed by the Shopify Storefront API.
///
/// Every call creates a fresh remote cart; nothing is cached between calls.
pub struct ShopifyCheckoutCreator {
    config: ShopifyConfig,
    client: Client,
}

impl ShopifyCheckoutCreator {
    /// Create a new Shopify checkout creator
    pub fn new(config: ShopifyConfig) -> CartResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| CartError::Configuration(format!("HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Create from environment variables
    pub fn from_env() -> CartResult<Self> {
        let config = ShopifyConfig::from_env()?;
        Self::new(config)
    }

    pub fn config(&self) -> &ShopifyConfig {
        &self.config
    }

    /// Build the `cartCreate` request body from line items
    fn build_request(items: &[LineItem]) -> QueryBody<cart_create::Variables> {
        let lines = items
            .iter()
            .map(|item| cart_create::CartLineInput {
                merchandise_id: item.variant_id.clone(),
                quantity: Some(i64::from(item.quantity)),
            })
            .collect();

        CartCreate::build_query(cart_create::Variables {
            input: cart_create::CartInput {
                lines: Some(lines),
                note: None,
            },
        })
    }
}

#[async_trait]
impl CheckoutSessionCreator for ShopifyCheckoutCreator {
    #[instrument(skip(self, items), fields(lines = items.len()))]
    async fn create_session(&self, items: &[LineItem]) -> CartResult<CheckoutSession> {
        if items.is_empty() {
            return Err(CartError::InvalidRequest("Cart has no items".to_string()));
        }

        let body = Self::build_request(items);
        let url = self.config.endpoint();

        debug!("Creating Shopify cart: {} lines", items.len());

        let response = self
            .client
            .post(&url)
            .header(STOREFRONT_TOKEN_HEADER, &self.config.storefront_token)
            .json(&body)
            .send()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after_secs = response
                .headers()
                .get("Retry-After")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(1);
            return Err(CartError::RateLimited {
                provider: PROVIDER.to_string(),
                retry_after_secs,
            });
        }

        let text = response
            .text()
            .await
            .map_err(|e| CartError::Network(e.to_string()))?;

        if !status.is_success() {
            error!(status = %status, body = %truncate(&text, 500), "Storefront API error");
            return Err(CartError::Provider {
                provider: PROVIDER.to_string(),
                message: format!("HTTP {}: {}", status, truncate(&text, 200)),
            });
        }

        let response: Response<cart_create::ResponseData> = serde_json::from_str(&text).map_err(|e| {
            error!(error = %e, body = %truncate(&text, 500), "Failed to parse Storefront response");
            CartError::Serialization(format!("Failed to parse Storefront response: {}", e))
        })?;

        if let Some(errors) = response.errors.filter(|errors| !errors.is_empty()) {
            debug!(errors = ?errors, "GraphQL errors in response");
            return Err(CartError::Provider {
                provider: PROVIDER.to_string(),
                message: errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            });
        }

        let payload = response
            .data
            .and_then(|data| data.cart_create)
            .ok_or_else(|| CartError::Serialization("cartCreate returned no payload".to_string()))?;

        if !payload.user_errors.is_empty() {
            return Err(CartError::CheckoutRejected(
                payload
                    .user_errors
                    .into_iter()
                    .map(|e| e.message)
                    .collect::<Vec<_>>()
                    .join("; "),
            ));
        }

        let cart = payload
            .cart
            .ok_or_else(|| CartError::Serialization("cartCreate returned no cart".to_string()))?;

        info!(
            "Created Shopify cart: id={}, quantity={:?}",
            cart.id, cart.total_quantity
        );

        Ok(CheckoutSession::new(PROVIDER, with_channel_param(&cart.checkout_url)).with_cart_id(cart.id))
    }

    fn provider_name(&self) -> &'static str {
        PROVIDER
    }
}

/// Hosted checkout needs `channel=online_store` for headless carts
fn with_channel_param(checkout_url: &str) -> String {
    if checkout_url.contains("channel=") {
        checkout_url.to_string()
    } else if checkout_url.contains('?') {
        format!("{}&channel=online_store", checkout_url)
    } else {
        format!("{}?channel=online_store", checkout_url)
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
