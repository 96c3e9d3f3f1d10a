//! Integration tests for Shopfront.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_persistence` - cart round trips and legacy migration over file slots
//! - `wishlist_persistence` - wishlist round trips over file slots
//! - `session_catalog` - catalog products flowing into a session
//! - `cms_file_source` - CMS resolution from a YAML snapshot
//!
//! Every test works in its own [`ScratchDir`], so tests can run in parallel.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use shopfront_storefront::storage::{FileStorage, SlotStorage};
use tempfile::TempDir;

/// A unique temporary directory, removed when dropped.
#[derive(Debug)]
pub struct ScratchDir {
    dir: TempDir,
}

impl ScratchDir {
    /// Create a fresh directory under the system temp dir.
    ///
    /// # Panics
    ///
    /// Panics if the directory cannot be created.
    #[must_use]
    pub fn new(label: &str) -> Self {
        let dir = tempfile::Builder::new()
            .prefix(&format!("shopfront-{label}-"))
            .tempdir()
            .expect("failed to create scratch dir");
        Self { dir }
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// File-backed slot storage rooted in this directory.
    ///
    /// # Panics
    ///
    /// Panics if the storage cannot be opened.
    #[must_use]
    pub fn storage(&self) -> Arc<dyn SlotStorage> {
        Arc::new(FileStorage::open(self.path()).expect("failed to open file storage"))
    }

    /// Write `contents` to `name` inside the directory and return its path.
    ///
    /// # Panics
    ///
    /// Panics if the file cannot be written.
    #[must_use]
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.path().join(name);
        std::fs::write(&path, contents).expect("failed to write scratch file");
        path
    }

    /// Read `name` inside the directory, `None` if it does not exist.
    #[must_use]
    pub fn read(&self, name: &str) -> Option<String> {
        std::fs::read_to_string(self.path().join(name)).ok()
    }
}
