//! Shopping cart: lines, aggregation rules and persistence.
//!
//! - [`Cart`] holds ordered [`CartLine`]s and applies the merge rules.
//! - [`CartService`] wraps a cart with the hydrate-once lifecycle and writes
//!   every post-hydration mutation to a [`CartStore`].

mod line;
mod service;
mod store;

pub use line::{Cart, CartLine};
pub use service::{CartService, CartState, Hydration};
pub use store::{CART_STORAGE_KEY, CartStore, MemoryStore, StoreError};
