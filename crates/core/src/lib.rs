//! Boutique Core - catalog and cart domain library.
//!
//! This crate provides the types and rules shared by the Boutique components:
//! - `storefront` - Public-facing JSON storefront
//! - `cli` - Catalog administration and a local cart
//!
//! # Architecture
//!
//! The core crate contains only types, rules and the cart lifecycle. Storage
//! is reached through the [`CartStore`] trait; there are no HTTP clients and
//! no filesystem access here.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, SKUs and slugs
//! - [`catalog`] - Products, variants, admin drafts and variant resolution
//! - [`cart`] - Cart lines, merge rules and the [`CartService`] aggregator

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod types;

pub use cart::{
    CART_STORAGE_KEY, Cart, CartLine, CartService, CartState, CartStore, Hydration, MemoryStore,
    StoreError,
};
pub use catalog::{CatalogError, Collection, Color, Product, ProductDraft, Resolution, Variant, resolve};
pub use types::*;
