//! Per-visitor session context.

use std::path::Path;
use std::sync::Arc;

use crate::cart::CartStore;
use crate::storage::{FileStorage, SlotStorage, StorageError};
use crate::wishlist::WishlistStore;

/// Cart and wishlist for one visitor session.
///
/// Both stores are loaded from storage before [`Storefront::open`] returns, so
/// every handle obtained from a `Storefront` reflects the persisted state.
#[derive(Debug)]
pub struct Storefront {
    cart: CartStore,
    wishlist: WishlistStore,
}

impl Storefront {
    /// Open a session over `storage`, loading the cart and the wishlist.
    #[must_use]
    pub fn open(storage: Arc<dyn SlotStorage>) -> Self {
        let cart = CartStore::load(Arc::clone(&storage));
        let wishlist = WishlistStore::load(storage);
        tracing::debug!(
            cart_lines = cart.lines().len(),
            wishlist_items = wishlist.count(),
            "Storefront session opened"
        );
        Self { cart, wishlist }
    }

    /// Open a session backed by slot files in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Io` if the directory cannot be created.
    pub fn open_dir(dir: &Path) -> Result<Self, StorageError> {
        let storage = FileStorage::open(dir)?;
        Ok(Self::open(Arc::new(storage)))
    }

    /// The cart.
    #[must_use]
    pub const fn cart(&self) -> &CartStore {
        &self.cart
    }

    /// The cart, for mutation.
    pub const fn cart_mut(&mut self) -> &mut CartStore {
        &mut self.cart
    }

    /// The wishlist.
    #[must_use]
    pub const fn wishlist(&self) -> &WishlistStore {
        &self.wishlist
    }

    /// The wishlist, for mutation.
    pub const fn wishlist_mut(&mut self) -> &mut WishlistStore {
        &mut self.wishlist
    }
}
