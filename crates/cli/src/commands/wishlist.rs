//! Wishlist commands.

use serde::Serialize;
use serde_json::json;
use shopfront_core::ProductId;
use shopfront_storefront::catalog::Catalog;
use shopfront_storefront::wishlist::{WishlistItem, WishlistStore};

use super::CommandResult;

#[derive(Serialize)]
struct WishlistView<'a> {
    items: &'a [WishlistItem],
    count: usize,
}

/// Saved items.
pub fn list(wishlist: &WishlistStore) -> CommandResult {
    Ok(serde_json::to_value(WishlistView {
        items: wishlist.items(),
        count: wishlist.count(),
    })?)
}

/// Save a catalog product. Saving twice leaves the first entry in place.
pub fn add(wishlist: &mut WishlistStore, catalog: &Catalog, product: ProductId) -> CommandResult {
    let item = catalog.require(product)?.to_wishlist_item();
    if !wishlist.add(item) {
        tracing::info!(%product, "Already in wishlist");
    }
    list(wishlist)
}

/// Remove a saved item.
pub fn remove(wishlist: &mut WishlistStore, id: &str) -> CommandResult {
    wishlist.remove(id);
    list(wishlist)
}

/// Whether an item is saved.
pub fn contains(wishlist: &WishlistStore, id: &str) -> CommandResult {
    Ok(json!({ "id": id, "contains": wishlist.contains(id) }))
}

/// Remove every saved item.
pub fn clear(wishlist: &mut WishlistStore) -> CommandResult {
    wishlist.clear();
    tracing::info!("Wishlist cleared");
    list(wishlist)
}
