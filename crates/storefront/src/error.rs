//! Crate-level error type.
//!
//! Store operations do not return errors; this type collects the failures that
//! surface from configuration, storage setup, the catalog and the CMS, so that
//! callers such as the CLI can use a single `Result`.

use thiserror::Error;

use crate::catalog::CatalogError;
use crate::cms::CmsError;
use crate::config::ConfigError;
use crate::persist::PersistError;
use crate::storage::StorageError;

/// Storefront library error.
#[derive(Debug, Error)]
pub enum Error {
    /// Configuration could not be loaded.
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    /// Slot storage failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// A stored payload could not be decoded.
    #[error("Persistence error: {0}")]
    Persist(#[from] PersistError),

    /// Catalog lookup failed.
    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    /// CMS data could not be fetched.
    #[error("CMS error: {0}")]
    Cms(#[from] CmsError),
}

/// Result type alias for storefront operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_error() {
        let err: Error = StorageError::InvalidKey("../cart".to_string()).into();
        assert!(matches!(err, Error::Storage(_)));
        assert!(err.to_string().starts_with("Storage error:"));
    }

    #[test]
    fn test_from_config_error() {
        let err: Error = ConfigError::MissingEnvVar("SHOPFRONT_CMS_API_KEY".to_string()).into();
        assert_eq!(
            err.to_string(),
            "Config error: Missing environment variable: SHOPFRONT_CMS_API_KEY"
        );
    }
}
