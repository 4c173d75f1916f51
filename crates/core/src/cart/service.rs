//! The cart aggregator: in-memory cart plus its persistence lifecycle.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use super::line::{Cart, CartLine};
use super::store::{CART_STORAGE_KEY, CartStore};

/// Hydration lifecycle of a [`CartService`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CartState {
    /// The stored cart has not been read yet. Mutations stay in memory.
    Uninitialized,
    /// Hydration finished. Every mutation is written to the store.
    Ready,
}

/// What [`CartService::hydrate`] found in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Hydration {
    /// A stored cart was restored.
    Restored {
        /// Number of lines read from the store.
        lines: usize,
    },
    /// Nothing was stored under the cart key.
    Missing,
    /// The stored value was unreadable and has been ignored.
    Discarded,
    /// The service was already hydrated; nothing was read.
    AlreadyReady,
}

/// Removals requested before hydration, replayed onto the restored cart.
#[derive(Debug, Default)]
struct PendingRemovals {
    /// The restored cart is dropped entirely.
    cleared: bool,
    skus: Vec<String>,
}

impl PendingRemovals {
    const fn new() -> Self {
        Self {
            cleared: false,
            skus: Vec::new(),
        }
    }

    fn is_empty(&self) -> bool {
        !self.cleared && self.skus.is_empty()
    }

    fn remove(&mut self, sku: &str) {
        if !self.cleared && !self.skus.iter().any(|s| s == sku) {
            self.skus.push(sku.to_owned());
        }
    }

    fn clear(&mut self) {
        self.cleared = true;
        self.skus.clear();
    }

    /// Apply to `cart`, returning whether anything was removed.
    fn apply(self, cart: &mut Cart) -> bool {
        if self.cleared {
            let had_lines = !cart.is_empty();
            cart.clear();
            return had_lines;
        }
        self.skus
            .iter()
            .fold(false, |changed, sku| cart.remove(sku) || changed)
    }
}

/// Owns the shopper's cart and keeps it in sync with a [`CartStore`].
///
/// Construct one per shopper profile, call [`CartService::hydrate`] once at
/// startup, then mutate through the `*_cart` / `update_quantity` methods.
/// Until hydration completes nothing is written, so an empty initial cart can
/// never overwrite a stored one.
///
/// ```
/// use boutique_core::{CartService, CartState, MemoryStore};
///
/// let mut service = CartService::new(MemoryStore::new());
/// assert_eq!(service.state(), CartState::Uninitialized);
/// service.hydrate();
/// assert_eq!(service.state(), CartState::Ready);
/// ```
#[derive(Debug)]
pub struct CartService<S> {
    store: S,
    state: CartState,
    cart: Cart,
    removals: PendingRemovals,
}

impl<S: CartStore> CartService<S> {
    /// Create an uninitialized service with an empty in-memory cart.
    pub const fn new(store: S) -> Self {
        Self {
            store,
            state: CartState::Uninitialized,
            cart: Cart::new(),
            removals: PendingRemovals::new(),
        }
    }

    /// Create a service and hydrate it immediately.
    pub fn hydrated(store: S) -> Self {
        let mut service = Self::new(store);
        service.hydrate();
        service
    }

    /// Read the stored cart and transition to [`CartState::Ready`].
    ///
    /// Runs at most once. Missing or malformed data yields an empty cart and
    /// still transitions to ready. Mutations made before hydration are
    /// replayed onto the restored cart: clears and removals first, then
    /// additions merged by SKU. The result is persisted if it differs from
    /// what was stored. Quantity updates before hydration only reach lines
    /// added in the same period.
    pub fn hydrate(&mut self) -> Hydration {
        if self.state == CartState::Ready {
            return Hydration::AlreadyReady;
        }

        let (restored, outcome) = match self.store.load(CART_STORAGE_KEY) {
            Ok(Some(text)) => match Cart::from_json(&text) {
                Ok(cart) => {
                    let lines = cart.line_count();
                    (cart, Hydration::Restored { lines })
                }
                Err(e) => {
                    warn!(error = %e, "Stored cart is malformed, starting empty");
                    (Cart::new(), Hydration::Discarded)
                }
            },
            Ok(None) => (Cart::new(), Hydration::Missing),
            Err(e) => {
                warn!(error = %e, "Failed to read stored cart, starting empty");
                (Cart::new(), Hydration::Discarded)
            }
        };

        let pending = std::mem::replace(&mut self.cart, restored);
        let removals = std::mem::take(&mut self.removals);
        self.state = CartState::Ready;
        debug!(
            ?outcome,
            pending = pending.line_count(),
            removals = !removals.is_empty(),
            "Cart hydrated"
        );

        let removed = removals.apply(&mut self.cart);
        if removed || !pending.is_empty() {
            for line in pending.into_lines() {
                self.cart.add(line);
            }
            self.persist();
        }

        outcome
    }

    /// Add a fully resolved line, accumulating quantity on an existing SKU.
    ///
    /// Price and stock are not re-validated here.
    pub fn add_to_cart(&mut self, line: CartLine) {
        self.cart.add(line);
        self.persist();
    }

    /// Remove the line for `sku`. No-op if absent.
    pub fn remove_from_cart(&mut self, sku: &str) {
        if self.state == CartState::Uninitialized {
            self.removals.remove(sku);
        }
        if self.cart.remove(sku) {
            self.persist();
        }
    }

    /// Set the quantity for `sku`. Quantities below 1 are ignored.
    pub fn update_quantity(&mut self, sku: &str, quantity: u32) {
        if self.cart.update_quantity(sku, quantity) {
            self.persist();
        }
    }

    /// Empty the cart.
    pub fn clear_cart(&mut self) {
        if self.state == CartState::Uninitialized {
            self.removals.clear();
        }
        self.cart.clear();
        self.persist();
    }

    /// Current total, recomputed from the lines.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.cart.total()
    }

    /// The current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Current lifecycle state.
    #[must_use]
    pub const fn state(&self) -> CartState {
        self.state
    }

    /// The backing store.
    #[must_use]
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Consume the service, returning the backing store.
    #[must_use]
    pub fn into_store(self) -> S {
        self.store
    }

    fn persist(&mut self) {
        if self.state != CartState::Ready {
            return;
        }
        match self.cart.to_json() {
            Ok(text) => {
                if let Err(e) = self.store.save(CART_STORAGE_KEY, &text) {
                    warn!(error = %e, "Failed to persist cart");
                }
            }
            Err(e) => warn!(error = %e, "Failed to serialize cart"),
        }
    }
}
