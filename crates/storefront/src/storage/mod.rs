//! Durable storage slots.
//!
//! A slot is a named, string-valued location that survives between sessions on
//! the same device. The cart and the wishlist each own one slot and never read
//! each other's.
//!
//! # Backends
//!
//! - [`MemoryStorage`] - in-process map for tests and headless consumers
//! - [`FileStorage`] - one JSON file per slot inside a data directory

mod file;
mod memory;

pub use file::FileStorage;
pub use memory::MemoryStorage;

use std::fmt::Debug;

use thiserror::Error;

/// Slot holding the serialized cart line list.
pub const CART_SLOT: &str = "cart";

/// Slot holding the serialized wishlist.
pub const WISHLIST_SLOT: &str = "wishlist";

/// Errors that can occur when reading or writing a slot.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Filesystem operation failed.
    #[error("I/O error on slot {key}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// Slot key contains characters outside `[A-Za-z0-9_-]`.
    #[error("invalid slot key: {0:?}")]
    InvalidKey(String),

    /// The in-memory backend lock was poisoned by a panicking writer.
    #[error("storage lock poisoned")]
    Poisoned,
}

/// A string-keyed durable key-value store.
///
/// All methods take `&self` so one backend can be shared between the cart and
/// the wishlist; implementations use interior mutability where they need it.
pub trait SlotStorage: Send + Sync + Debug {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the slot has never been written or was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be read.
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Replace the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Remove the value stored under `key`.
    ///
    /// Returns `Ok(())` even if the slot did not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend cannot be written.
    fn remove(&self, key: &str) -> Result<(), StorageError>;
}

/// Reject keys that could escape a directory or collide after normalization.
pub(crate) fn validate_key(key: &str) -> Result<(), StorageError> {
    let valid = !key.is_empty()
        && key
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'_' || b == b'-');
    if valid {
        Ok(())
    } else {
        Err(StorageError::InvalidKey(key.to_owned()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_key() {
        assert!(validate_key(CART_SLOT).is_ok());
        assert!(validate_key(WISHLIST_SLOT).is_ok());
        assert!(validate_key("cart_v2-backup").is_ok());
        assert!(validate_key("").is_err());
        assert!(validate_key("../cart").is_err());
        assert!(validate_key("cart.json").is_err());
    }
}
