//! # Routes
//!
//! Axum router configuration for the cart API.

use crate::handlers;
use crate::state::AppState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

/// Create the main application router
///
/// Routes:
/// - GET    /health, / - Health check
/// - GET    /api/v1/cart - Cart state and totals
/// - DELETE /api/v1/cart - Clear cart
/// - POST   /api/v1/cart/items - Add item
/// - PATCH  /api/v1/cart/items/{variant_id} - Update quantity
/// - DELETE /api/v1/cart/items/{variant_id} - Remove item
/// - PUT    /api/v1/cart/open - Show/hide cart panel
/// - POST   /api/v1/cart/checkout - Create checkout, returns redirect URL
pub fn create_router(state: AppState) -> Router {
    // The storefront UI is served from another origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let cart_routes = Router::new()
        .route("/", get(handlers::get_cart).delete(handlers::clear_cart))
        .route("/items", post(handlers::add_item))
        .route(
            "/items/{variant_id}",
            patch(handlers::update_quantity).delete(handlers::remove_item),
        )
        .route("/open", put(handlers::set_open))
        .route("/checkout", post(handlers::create_checkout));

    Router::new()
        // Health check at root
        .route("/health", get(handlers::health))
        .route("/", get(handlers::health))
        // API v1
        .nest("/api/v1/cart", cart_routes)
        // Middleware
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        // State
        .with_state(state)
}
