//! Core types for the Boutique storefront.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod id;
pub mod price;
pub mod sku;
pub mod slug;

pub use id::*;
pub use price::{CurrencyCode, Price};
pub use sku::Sku;
pub use slug::Slug;
