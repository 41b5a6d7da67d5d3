//! # storefront-cart
//!
//! Cart service for a headless Shopify storefront.
//!
//! ## Usage
//!
//! ```bash
//! # Set environment variables
//! export SHOPIFY_STORE_DOMAIN=my-shop.myshopify.com
//! export SHOPIFY_STOREFRONT_TOKEN=...
//! export CART_STORAGE_DIR=/var/lib/storefront-cart   # optional
//!
//! # Run the server
//! storefront-cart
//! ```

use cart_api::{routes, state::AppState};
use tracing::{info, Level};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(Level::INFO.into())
                .from_env_lossy(),
        )
        .init();

    // Initialize application state
    let state = AppState::new()?;

    let addr = state.config.socket_addr()?;
    let is_prod = state.config.is_production();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        environment = %state.config.environment,
        "Starting storefront-cart"
    );
    info!(
        items = state.cart.items().len(),
        provider = state.cart.provider_name(),
        storage = ?state.config.storage_dir,
        "Cart ready"
    );

    // Create router
    let app = routes::create_router(state);

    info!("Listening on http://{}", addr);

    if !is_prod {
        info!("Cart: GET http://{}/api/v1/cart", addr);
        info!("Checkout: POST http://{}/api/v1/cart/checkout", addr);
    }

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
