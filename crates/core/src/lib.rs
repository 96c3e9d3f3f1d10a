//! Shopfront Core - Shared typed records.
//!
//! This crate provides the value types used by every Shopfront component:
//! - `storefront` - Cart, wishlist and CMS state held for one visitor session
//! - `cli` - Command-line access to the same state on disk
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access, no HTTP
//! clients. Validation happens when a value is constructed, so anything holding
//! a [`ProductId`] or a [`Price`] can trust its shape.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for product identifiers and prices

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
