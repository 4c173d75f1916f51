//! Business logic services for storefront.
//!
//! # Services
//!
//! - `session_cart` - Session-backed cart persistence for [`boutique_core::CartService`]

pub mod session_cart;

pub use session_cart::{SessionCartStore, with_cart};
