//! Core types for Shopfront.
//!
//! This module provides type-safe wrappers for catalog concepts.

pub mod id;
pub mod price;

pub use id::{ProductId, ProductIdError};
pub use price::{Price, PriceError};
