//! # cart-api
//!
//! HTTP API layer for storefront-cart.
//!
//! This crate provides:
//! - Axum-based HTTP server hosting the process-wide `CartStore`
//! - JSON endpoints the storefront UI uses to read and mutate the cart
//! - Checkout hand-off returning the hosted checkout URL
//!
//! ## Endpoints
//!
//! | Method | Path | Description |
//! |--------|------|-------------|
//! | GET | `/health` | Health check |
//! | GET | `/api/v1/cart` | Cart state and totals |
//! | DELETE | `/api/v1/cart` | Clear cart |
//! | POST | `/api/v1/cart/items` | Add item |
//! | PATCH | `/api/v1/cart/items/{variant_id}` | Update quantity |
//! | DELETE | `/api/v1/cart/items/{variant_id}` | Remove item |
//! | PUT | `/api/v1/cart/open` | Show/hide cart panel |
//! | POST | `/api/v1/cart/checkout` | Create checkout session |

pub mod handlers;
pub mod routes;
pub mod state;

pub use routes::create_router;
pub use state::{AppConfig, AppState};
