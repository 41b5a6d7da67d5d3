//! # cart-core
//!
//! Core types and the cart store for storefront-cart.
//!
//! This crate provides:
//! - `CartStore`, the process-wide cart service (merge-on-add, totals, checkout hand-off)
//! - `LineItem`, `Money`, and `Product` types shared with the UI layer
//! - `CheckoutSessionCreator` trait for commerce backends
//! - `CartStorage` trait with in-memory and file adapters
//! - `CartError` for typed error handling
//!
//! ## Example
//!
//! ```rust,ignore
//! use cart_core::{CartStore, FileStorage, LineItem, Money};
//! use std::sync::Arc;
//!
//! let store = CartStore::open(Arc::new(creator), Arc::new(FileStorage::new("/var/lib/cart")))?;
//!
//! store.add_item(LineItem::new("gid://shopify/ProductVariant/1", Money::parse("10.00", "USD").unwrap(), 1))?;
//!
//! // Redirect the customer when a URL comes back
//! if let Some(url) = store.create_checkout().await {
//!     redirect(url);
//! }
//! ```

pub mod checkout;
pub mod error;
pub mod item;
pub mod money;
pub mod product;
pub mod storage;
pub mod store;

// Re-exports for convenience
pub use checkout::{BoxedCheckoutCreator, CheckoutSession, CheckoutSessionCreator};
pub use error::{CartError, CartResult};
pub use item::{LineItem, ProductRef, SelectedOption};
pub use money::Money;
pub use product::{
    clean_product_title, Product, ProductCatalog, ProductImage, ProductSort, ProductVariant,
};
pub use storage::{BoxedCartStorage, CartStorage, FileStorage, MemoryStorage};
pub use store::{CartState, CartStore, CART_STORAGE_KEY};

pub use rust_decimal::Decimal;
