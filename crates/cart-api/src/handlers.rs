//! # Request Handlers
//!
//! Axum request handlers exposing the cart store to the UI layer.
//! Every cart response carries the full state plus derived totals.

use crate::state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use cart_core::{
    CartError, CartResult, CartState, CartStore, Decimal, LineItem, Money, ProductRef,
    SelectedOption,
};
use serde::{Deserialize, Serialize};
use tracing::{info, instrument, warn};

// =============================================================================
// Request/Response Types
// =============================================================================

/// Add item request (a line item; quantity defaults to 1)
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddItemRequest {
    pub variant_id: String,
    #[serde(default)]
    pub product_ref: ProductRef,
    #[serde(default)]
    pub variant_title: String,
    pub unit_price: Money,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub selected_options: Vec<SelectedOption>,
}

fn default_quantity() -> u32 {
    1
}

impl From<AddItemRequest> for LineItem {
    fn from(request: AddItemRequest) -> Self {
        LineItem {
            variant_id: request.variant_id,
            product_ref: request.product_ref,
            variant_title: request.variant_title,
            unit_price: request.unit_price,
            quantity: request.quantity,
            selected_options: request.selected_options,
        }
    }
}

/// Update quantity request; zero or negative removes the item
#[derive(Debug, Deserialize)]
pub struct UpdateQuantityRequest {
    pub quantity: i64,
}

/// Show/hide the cart panel
#[derive(Debug, Deserialize)]
pub struct SetOpenRequest {
    pub open: bool,
}

/// Cart state plus derived totals
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartView {
    #[serde(flatten)]
    pub state: CartState,
    pub total_items: u64,
    pub total_price: Decimal,
}

impl From<CartState> for CartView {
    fn from(state: CartState) -> Self {
        Self {
            total_items: state.total_items(),
            total_price: state.total_price(),
            state,
        }
    }
}

/// Checkout response. `checkout_url` is null when no redirect is available.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub checkout_url: Option<String>,
    pub cart: CartView,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl ErrorResponse {
    pub fn new(error: impl Into<String>, code: u16) -> Self {
        Self {
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }
}

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn cart_error_to_response(err: CartError) -> (StatusCode, Json<ErrorResponse>) {
    let code = err.status_code();
    let response = ErrorResponse::new(err.to_string(), code);
    (
        StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
        Json(response),
    )
}

/// 400 naming the offending field in `details`
fn bad_request(field: &str, message: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(message, 400).with_details(field)),
    )
}

/// Run a persisted cart mutation on the blocking pool.
///
/// File-backed storage writes to disk while the store lock is held.
async fn mutate<F>(state: &AppState, op: F) -> Result<(), (StatusCode, Json<ErrorResponse>)>
where
    F: FnOnce(&CartStore) -> CartResult<()> + Send + 'static,
{
    let cart = state.cart.clone();
    tokio::task::spawn_blocking(move || op(cart.as_ref()))
        .await
        .map_err(|e| CartError::Internal(format!("cart task failed: {}", e)))
        .and_then(|result| result)
        .map_err(cart_error_to_response)
}

fn view(state: &AppState) -> Json<CartView> {
    Json(CartView::from(state.cart.state()))
}

// =============================================================================
// Handlers
// =============================================================================

/// Health check endpoint
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "service": "storefront-cart",
        "provider": state.cart.provider_name(),
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// Current cart with totals
pub async fn get_cart(State(state): State<AppState>) -> Json<CartView> {
    view(&state)
}

/// Add an item (merges with an existing entry for the same variant)
#[instrument(skip(state, request), fields(variant_id = %request.variant_id, quantity = request.quantity))]
pub async fn add_item(
    State(state): State<AppState>,
    Json(request): Json<AddItemRequest>,
) -> ApiResult<CartView> {
    if request.variant_id.trim().is_empty() {
        return Err(bad_request("variantId", "variantId must not be empty"));
    }
    if request.quantity == 0 {
        return Err(bad_request("quantity", "quantity must be at least 1"));
    }

    let item = LineItem::from(request);
    mutate(&state, move |cart| cart.add_item(item)).await?;

    Ok(view(&state))
}

/// Set an item's quantity
#[instrument(skip(state, request), fields(quantity = request.quantity))]
pub async fn update_quantity(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
    Json(request): Json<UpdateQuantityRequest>,
) -> ApiResult<CartView> {
    let quantity = request.quantity;
    mutate(&state, move |cart| cart.update_quantity(&variant_id, quantity)).await?;

    Ok(view(&state))
}

/// Remove an item
#[instrument(skip(state))]
pub async fn remove_item(
    State(state): State<AppState>,
    Path(variant_id): Path<String>,
) -> ApiResult<CartView> {
    mutate(&state, move |cart| cart.remove_item(&variant_id)).await?;

    Ok(view(&state))
}

/// Empty the cart
pub async fn clear_cart(State(state): State<AppState>) -> ApiResult<CartView> {
    mutate(&state, CartStore::clear_cart).await?;
    Ok(view(&state))
}

/// Show or hide the cart panel
pub async fn set_open(
    State(state): State<AppState>,
    Json(request): Json<SetOpenRequest>,
) -> Json<CartView> {
    state.cart.set_open(request.open);
    view(&state)
}

/// Create a hosted checkout for the current cart
#[instrument(skip(state))]
pub async fn create_checkout(State(state): State<AppState>) -> Json<CheckoutResponse> {
    let checkout_url = state.cart.create_checkout().await;

    match &checkout_url {
        Some(url) => info!("Checkout ready: {}", url),
        None => warn!("No checkout URL available"),
    }

    Json(CheckoutResponse {
        checkout_url,
        cart: CartView::from(state.cart.state()),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_bad_request_names_field() {
        let (status, Json(body)) = bad_request("quantity", "quantity must be at least 1");
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body.code, 400);
        assert_eq!(body.details.as_deref(), Some("quantity"));
    }

    #[test]
    fn test_cart_error_conversion() {
        let err = CartError::Storage("disk full".to_string());
        let (status, _json) = cart_error_to_response(err);
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_add_item_request_defaults() {
        let request: AddItemRequest = serde_json::from_str(
            r#"{"variantId":"v1","unitPrice":{"amount":"2.50","currencyCode":"USD"}}"#,
        )
        .unwrap();
        let item: LineItem = request.into();

        assert_eq!(item.quantity, 1);
        assert!(item.selected_options.is_empty());
        assert_eq!(item.unit_price.amount, Decimal::from_str("2.50").unwrap());
    }

    #[test]
    fn test_cart_view_flattens_state() {
        let mut state = CartState::default();
        state.items.push(LineItem::new("v1", Money::parse("3.00", "USD").unwrap(), 2));
        state.is_open = true;

        let json = serde_json::to_value(CartView::from(state)).unwrap();
        assert_eq!(json["totalItems"], 2);
        assert_eq!(json["totalPrice"], "6.00");
        assert_eq!(json["isOpen"], true);
        assert_eq!(json["items"][0]["variantId"], "v1");
    }
}
