//! Versioned persistence for store slots.
//!
//! # Payload format
//!
//! ```json
//! {"version": 2, "lines": [ ... ]}
//! ```
//!
//! The list field is `lines` for the cart and `items` for the wishlist. A bare
//! JSON array with no envelope is schema version 1, the format written by
//! earlier clients. Decoding only unwraps the envelope; each store owns the
//! record-level migration for the versions it understands.
//!
//! Every write serializes the full list. There are no delta writes.

use std::sync::Arc;

use serde::Serialize;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::storage::{SlotStorage, StorageError};

/// Schema version written by this library.
pub const CURRENT_VERSION: u64 = 2;

/// Schema version of an unversioned bare array.
pub const LEGACY_VERSION: u64 = 1;

const VERSION_FIELD: &str = "version";

/// Errors that can occur when decoding or encoding a slot payload.
#[derive(Debug, Error)]
pub enum PersistError {
    /// The payload is not valid JSON.
    #[error("payload is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload is JSON but not a list or an envelope.
    #[error("malformed payload: {0}")]
    Malformed(&'static str),

    /// The payload was written by a newer schema.
    #[error("unsupported schema version {0} (latest known is {CURRENT_VERSION})")]
    UnsupportedVersion(u64),

    /// The slot backend failed.
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// A payload with its envelope removed.
#[derive(Debug, Clone, PartialEq)]
pub struct Decoded {
    /// Schema version the records were written with.
    pub version: u64,
    /// Raw records, not yet validated.
    pub records: Vec<Value>,
}

impl Decoded {
    /// Whether the records were written by an older schema.
    #[must_use]
    pub const fn is_outdated(&self) -> bool {
        self.version < CURRENT_VERSION
    }
}

/// Unwrap a stored payload into raw records.
///
/// # Errors
///
/// Returns `PersistError::Json` for unparseable text, `PersistError::Malformed`
/// when the JSON has the wrong shape, and `PersistError::UnsupportedVersion`
/// when the envelope version is newer than [`CURRENT_VERSION`].
pub fn decode(raw: &str, field: &str) -> Result<Decoded, PersistError> {
    match serde_json::from_str::<Value>(raw)? {
        Value::Array(records) => Ok(Decoded {
            version: LEGACY_VERSION,
            records,
        }),
        Value::Object(mut envelope) => {
            let version = envelope
                .get(VERSION_FIELD)
                .and_then(Value::as_u64)
                .ok_or(PersistError::Malformed("envelope has no numeric version"))?;
            if version > CURRENT_VERSION || version < LEGACY_VERSION {
                return Err(PersistError::UnsupportedVersion(version));
            }
            match envelope.remove(field) {
                Some(Value::Array(records)) => Ok(Decoded { version, records }),
                Some(_) => Err(PersistError::Malformed("envelope list field is not an array")),
                None => Err(PersistError::Malformed("envelope is missing its list field")),
            }
        }
        _ => Err(PersistError::Malformed("payload is neither a list nor an envelope")),
    }
}

/// Serialize `items` into a current-version envelope.
///
/// # Errors
///
/// Returns `PersistError::Json` if an item fails to serialize.
pub fn encode<T: Serialize>(field: &str, items: &[T]) -> Result<String, PersistError> {
    let mut envelope = Map::new();
    envelope.insert(VERSION_FIELD.to_owned(), Value::from(CURRENT_VERSION));
    envelope.insert(field.to_owned(), serde_json::to_value(items)?);
    Ok(serde_json::to_string(&Value::Object(envelope))?)
}

/// One named slot plus the list field used inside its envelope.
#[derive(Debug, Clone)]
pub struct Slot {
    storage: Arc<dyn SlotStorage>,
    key: &'static str,
    field: &'static str,
}

impl Slot {
    /// Bind a slot key on `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn SlotStorage>, key: &'static str, field: &'static str) -> Self {
        Self {
            storage,
            key,
            field,
        }
    }

    /// Slot key.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        self.key
    }

    /// Read and unwrap the stored payload.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails or the payload cannot be decoded.
    pub fn read(&self) -> Result<Option<Decoded>, PersistError> {
        self.storage
            .get(self.key)?
            .map(|raw| decode(&raw, self.field))
            .transpose()
    }

    /// Replace the stored payload with the full `items` list.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the backend fails.
    pub fn write<T: Serialize>(&self, items: &[T]) -> Result<(), PersistError> {
        let payload = encode(self.field, items)?;
        self.storage.set(self.key, &payload)?;
        Ok(())
    }

    /// Remove the stored payload.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails.
    pub fn clear(&self) -> Result<(), PersistError> {
        self.storage.remove(self.key)?;
        Ok(())
    }
}
