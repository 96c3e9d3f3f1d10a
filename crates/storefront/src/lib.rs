//! Shopfront storefront state library.
//!
//! Client-side shopping state for a headless storefront:
//!
//! - [`cart`] - cart lines with MOQ and stock bounds
//! - [`wishlist`] - saved products
//! - [`session`] - the per-visitor context owning both stores
//! - [`storage`] and [`persist`] - durable slots and their versioned payloads
//! - [`catalog`] - product rows and their cart/wishlist descriptors
//! - [`cms`] - site settings, content blocks and banners with defaults

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod cms;
pub mod config;
pub mod error;
pub mod events;
pub mod persist;
pub mod session;
pub mod storage;
pub mod wishlist;

pub use error::{Error, Result};
pub use session::Storefront;
