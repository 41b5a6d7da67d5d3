//! # cart-shopify
//!
//! Shopify Storefront checkout for storefront-cart-rs.
//!
//! `ShopifyCheckoutCreator` implements `CheckoutSessionCreator` by running the
//! `CartCreate` mutation (`graphql_client` codegen, see [`queries`]) to create a
//! Storefront API cart from the local line items and returning
//! the hosted checkout URL Shopify assigns to it.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use cart_shopify::ShopifyCheckoutCreator;
//! use cart_core::{CartStore, MemoryStorage};
//! use std::sync::Arc;
//!
//! // Reads SHOPIFY_STORE_DOMAIN / SHOPIFY_STOREFRONT_TOKEN
//! let creator = ShopifyCheckoutCreator::from_env()?;
//!
//! let store = CartStore::open(Arc::new(creator), Arc::new(MemoryStorage::new()))?;
//! let url = store.create_checkout().await;
//! ```

pub mod checkout;
pub mod config;
pub mod queries;

// Re-exports
pub use checkout::{ShopifyCheckoutCreator, STOREFRONT_TOKEN_HEADER};
pub use config::{ShopifyConfig, DEFAULT_API_VERSION};
