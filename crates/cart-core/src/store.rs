//! # Cart Store
//!
//! The single source of truth for what the shopping cart contains.
//!
//! `CartStore` owns a [`CartState`] behind a mutex. Every item mutation is
//! applied, written through the injected [`CartStorage`], and published to
//! subscribers before the lock is released, so the persisted image always
//! matches the latest in-memory state. Only `items` is persisted.
//!
//! ```text
//!  UI ──add/update/remove──▶ CartStore ──save──▶ CartStorage
//!   ▲                           │
//!   └──── watch snapshot ───────┤
//!                               └──create_session──▶ CheckoutSessionCreator
//! ```

use crate::checkout::BoxedCheckoutCreator;
use crate::error::CartResult;
use crate::item::LineItem;
use crate::storage::BoxedCartStorage;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tracing::{debug, error, info, instrument, warn};

/// Storage key the cart items are persisted under
pub const CART_STORAGE_KEY: &str = "storefront-cart";

/// Everything the UI can observe about the cart
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartState {
    /// Line items, unique by variant ID, in insertion order
    pub items: Vec<LineItem>,

    /// Remote cart ID, once a checkout session exists
    pub cart_id: Option<String>,

    /// URL from the last successful checkout creation
    pub checkout_url: Option<String>,

    /// True while a checkout session is being created
    pub is_loading: bool,

    /// Whether the cart panel is shown
    pub is_open: bool,
}

impl CartState {
    /// Sum of quantities
    pub fn total_items(&self) -> u64 {
        self.items.iter().map(|item| u64::from(item.quantity)).sum()
    }

    /// Sum of `unit_price × quantity`. Assumes a single currency.
    pub fn total_price(&self) -> Decimal {
        self.items
            .iter()
            .map(|item| item.unit_price.amount * Decimal::from(item.quantity))
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Find an item by variant ID
    pub fn item(&self, variant_id: &str) -> Option<&LineItem> {
        self.items.iter().find(|item| item.variant_id == variant_id)
    }

    fn apply_add(&mut self, item: LineItem) -> bool {
        if item.quantity == 0 {
            debug!(variant_id = %item.variant_id, "Ignoring add with zero quantity");
            return false;
        }
        match self
            .items
            .iter_mut()
            .find(|existing| existing.variant_id == item.variant_id)
        {
            Some(existing) => {
                existing.quantity = existing.quantity.saturating_add(item.quantity);
            }
            None => self.items.push(item),
        }
        true
    }

    fn apply_update(&mut self, variant_id: &str, quantity: i64) -> bool {
        if quantity <= 0 {
            return self.apply_remove(variant_id);
        }
        let quantity = u32::try_from(quantity).unwrap_or(u32::MAX);
        match self.items.iter_mut().find(|item| item.variant_id == variant_id) {
            Some(item) if item.quantity != quantity => {
                item.quantity = quantity;
                true
            }
            _ => false,
        }
    }

    fn apply_remove(&mut self, variant_id: &str) -> bool {
        let before = self.items.len();
        self.items.retain(|item| item.variant_id != variant_id);
        self.items.len() != before
    }

    fn apply_clear(&mut self) -> bool {
        let changed = !self.items.is_empty() || self.cart_id.is_some() || self.checkout_url.is_some();
        self.items.clear();
        self.cart_id = None;
        self.checkout_url = None;
        changed
    }
}

/// Persisted shape: `{"items": [...]}`
#[derive(Serialize)]
struct PersistedCartRef<'a> {
    items: &'a [LineItem],
}

#[derive(Deserialize)]
struct PersistedCart {
    items: Vec<LineItem>,
}

/// Cart service shared by the whole process.
///
/// Construct once with [`CartStore::open`] and hand out `Arc<CartStore>`.
pub struct CartStore {
    state: Mutex<CartState>,
    updates: watch::Sender<CartState>,
    creator: BoxedCheckoutCreator,
    storage: BoxedCartStorage,
    /// Set while a checkout started by this store awaits the provider.
    /// Independent of `is_loading`, which the UI may also set.
    checkout_running: AtomicBool,
}

impl CartStore {
    /// Open the cart, restoring items persisted under [`CART_STORAGE_KEY`].
    ///
    /// A stored payload that no longer deserializes is discarded with a
    /// warning. Storage read failures are returned.
    pub fn open(creator: BoxedCheckoutCreator, storage: BoxedCartStorage) -> CartResult<Self> {
        let mut state = CartState::default();

        if let Some(raw) = storage.load(CART_STORAGE_KEY)? {
            match serde_json::from_str::<PersistedCart>(&raw) {
                Ok(persisted) => {
                    for item in persisted.items {
                        state.apply_add(item);
                    }
                    info!(items = state.items.len(), "Restored persisted cart");
                }
                Err(e) => {
                    warn!(error = %e, "Discarding unreadable persisted cart");
                }
            }
        }

        let (updates, _) = watch::channel(state.clone());

        Ok(Self {
            state: Mutex::new(state),
            updates,
            creator,
            storage,
            checkout_running: AtomicBool::new(false),
        })
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Snapshot of the full state
    pub fn state(&self) -> CartState {
        self.lock().clone()
    }

    pub fn items(&self) -> Vec<LineItem> {
        self.lock().items.clone()
    }

    pub fn cart_id(&self) -> Option<String> {
        self.lock().cart_id.clone()
    }

    pub fn checkout_url(&self) -> Option<String> {
        self.lock().checkout_url.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.lock().is_loading
    }

    pub fn is_open(&self) -> bool {
        self.lock().is_open
    }

    /// Sum of quantities across all items; 0 when empty
    pub fn total_items(&self) -> u64 {
        self.lock().total_items()
    }

    /// Sum of `unit_price × quantity`; 0 when empty
    pub fn total_price(&self) -> Decimal {
        self.lock().total_price()
    }

    /// Receive a fresh snapshot after every state change
    pub fn subscribe(&self) -> watch::Receiver<CartState> {
        self.updates.subscribe()
    }

    /// Name of the checkout provider behind this store
    pub fn provider_name(&self) -> &'static str {
        self.creator.provider_name()
    }

    // =========================================================================
    // Item mutations (persisted)
    // =========================================================================

    /// Add an item, merging quantities with an existing entry for the same
    /// variant. The existing entry keeps its originally captured price.
    pub fn add_item(&self, item: LineItem) -> CartResult<()> {
        debug!(variant_id = %item.variant_id, quantity = item.quantity, "Adding item");
        self.mutate_items(|state| state.apply_add(item))
    }

    /// Set an item's quantity. Zero or less removes it; unknown IDs are ignored.
    pub fn update_quantity(&self, variant_id: &str, quantity: i64) -> CartResult<()> {
        debug!(variant_id, quantity, "Updating quantity");
        self.mutate_items(|state| state.apply_update(variant_id, quantity))
    }

    /// Remove an item if present
    pub fn remove_item(&self, variant_id: &str) -> CartResult<()> {
        debug!(variant_id, "Removing item");
        self.mutate_items(|state| state.apply_remove(variant_id))
    }

    /// Empty the cart and forget the remote cart and checkout URL
    pub fn clear_cart(&self) -> CartResult<()> {
        info!("Clearing cart");
        self.mutate_items(CartState::apply_clear)
    }

    // =========================================================================
    // Transient setters (never persisted)
    // =========================================================================

    pub fn set_cart_id(&self, cart_id: Option<String>) {
        self.mutate_transient(|state| set_if_changed(&mut state.cart_id, cart_id));
    }

    pub fn set_checkout_url(&self, url: Option<String>) {
        self.mutate_transient(|state| set_if_changed(&mut state.checkout_url, url));
    }

    pub fn set_loading(&self, loading: bool) {
        self.mutate_transient(|state| set_if_changed(&mut state.is_loading, loading));
    }

    pub fn set_open(&self, open: bool) {
        self.mutate_transient(|state| set_if_changed(&mut state.is_open, open));
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Create a hosted checkout for the current items and return its URL.
    ///
    /// Returns `None` when the cart is empty, when another checkout is
    /// already in flight, or when the provider fails. Failures are logged and
    /// leave the previous checkout URL in place. `is_loading` ends up false
    /// on every path except a rejected overlap, where the running checkout
    /// still owns it.
    #[instrument(skip(self), fields(provider = self.creator.provider_name()))]
    pub async fn create_checkout(&self) -> Option<String> {
        let items = {
            let mut state = self.lock();
            let running = self.checkout_running.load(Ordering::SeqCst);
            if state.items.is_empty() {
                debug!("Cart is empty, skipping checkout");
                if !running && set_if_changed(&mut state.is_loading, false) {
                    self.publish(&state);
                }
                return None;
            }
            if running {
                warn!("Checkout already in progress, ignoring request");
                return None;
            }
            self.checkout_running.store(true, Ordering::SeqCst);
            state.is_loading = true;
            self.publish(&state);
            state.items.clone()
        };
        let in_flight = CheckoutInFlight { store: self };

        let result = self.creator.create_session(&items).await;

        let url = match result {
            Ok(session) => {
                info!(
                    items = items.len(),
                    cart_id = ?session.cart_id,
                    "Created checkout session"
                );
                let mut state = self.lock();
                state.checkout_url = Some(session.checkout_url.clone());
                if session.cart_id.is_some() {
                    state.cart_id = session.cart_id;
                }
                Some(session.checkout_url)
            }
            Err(e) => {
                error!(error = %e, retryable = e.is_retryable(), "Failed to create checkout");
                None
            }
        };

        drop(in_flight);
        url
    }

    // =========================================================================
    // Internals
    // =========================================================================

    fn lock(&self) -> MutexGuard<'_, CartState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, state: &CartState) {
        self.updates.send_replace(state.clone());
    }

    fn persist(&self, items: &[LineItem]) -> CartResult<()> {
        let payload = serde_json::to_string(&PersistedCartRef { items })?;
        self.storage.save(CART_STORAGE_KEY, &payload)
    }

    /// Apply an item mutation, then persist and publish while still locked.
    /// The in-memory change stands even when persisting fails.
    fn mutate_items(&self, op: impl FnOnce(&mut CartState) -> bool) -> CartResult<()> {
        let mut state = self.lock();
        let changed = op(&mut state);
        let persisted = self.persist(&state.items);
        if changed {
            self.publish(&state);
        }
        if let Err(ref e) = persisted {
            warn!(error = %e, "Failed to persist cart");
        }
        persisted
    }

    fn mutate_transient(&self, op: impl FnOnce(&mut CartState) -> bool) {
        let mut state = self.lock();
        if op(&mut state) {
            self.publish(&state);
        }
    }
}

/// Resets `is_loading` when a checkout call ends, including when the
/// calling future is dropped mid-flight.
struct CheckoutInFlight<'a> {
    store: &'a CartStore,
}

impl Drop for CheckoutInFlight<'_> {
    fn drop(&mut self) {
        let mut state = self.store.lock();
        self.store.checkout_running.store(false, Ordering::SeqCst);
        state.is_loading = false;
        self.store.publish(&state);
    }
}

fn set_if_changed<T: PartialEq>(slot: &mut T, value: T) -> bool {
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
