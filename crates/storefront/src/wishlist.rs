//! Visitor wishlist state.
//!
//! A deduplicated list of saved products. Unlike the cart there are no
//! quantities and no version-specific migration: stored records are decoded
//! one by one and any record that does not decode is skipped.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use shopfront_core::Price;
use tokio::sync::broadcast;
use tracing::instrument;

use crate::events::{EventBus, WishlistEvent};
use crate::persist::Slot;
use crate::storage::{SlotStorage, WISHLIST_SLOT};

/// List field inside the wishlist envelope.
const ITEMS_FIELD: &str = "items";

/// A saved product reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WishlistItem {
    pub id: String,
    pub name: String,
    pub price: Price,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub original_price: Option<Price>,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub slug: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub review_count: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub origin: Option<String>,
    #[serde(default)]
    pub in_stock: bool,
}

/// Saved products for one visitor session.
#[derive(Debug)]
pub struct WishlistStore {
    slot: Slot,
    items: Vec<WishlistItem>,
    events: EventBus<WishlistEvent>,
}

impl WishlistStore {
    /// Load the wishlist from its slot on `storage`.
    ///
    /// Stored records that do not decode are logged and skipped. A payload
    /// that is not readable at all is logged and the wishlist starts empty;
    /// the slot is left untouched until the first mutation overwrites it.
    #[must_use]
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<dyn SlotStorage>) -> Self {
        let mut store = Self {
            slot: Slot::new(storage, WISHLIST_SLOT, ITEMS_FIELD),
            items: Vec::new(),
            events: EventBus::new(),
        };

        match store.slot.read() {
            Ok(None) => {}
            Ok(Some(decoded)) => {
                store.items = dedupe(decode_items(decoded.records));
                tracing::debug!(items = store.items.len(), "Wishlist loaded");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to read stored wishlist, starting empty");
            }
        }

        store
    }

    /// Saved items, in the order they were added.
    #[must_use]
    pub fn items(&self) -> &[WishlistItem] {
        &self.items
    }

    /// Number of saved items.
    #[must_use]
    pub fn count(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing is saved.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Whether an item with this id is saved.
    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.items.iter().any(|i| i.id == id)
    }

    /// Subscribe to wishlist events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<WishlistEvent> {
        self.events.subscribe()
    }

    /// Save `item` unless an item with the same id is already saved.
    ///
    /// The first saved copy wins; later metadata is ignored. Returns whether
    /// the item was inserted.
    #[instrument(skip(self, item), fields(id = %item.id))]
    pub fn add(&mut self, item: WishlistItem) -> bool {
        if self.contains(&item.id) {
            return false;
        }
        self.items.push(item);
        tracing::debug!("Wishlist item added");
        self.commit();
        true
    }

    /// Remove the item with this id. Does nothing if there is none.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: &str) {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() != before {
            tracing::debug!("Wishlist item removed");
            self.commit();
        }
    }

    /// Remove every item.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.items.clear();
        self.commit();
    }

    fn commit(&self) {
        if let Err(e) = self.slot.write(&self.items) {
            tracing::error!(error = %e, slot = self.slot.key(), "Failed to persist wishlist");
        }
        self.events.publish(WishlistEvent::Updated {
            count: self.count(),
        });
    }
}

fn decode_items(records: Vec<Value>) -> Vec<WishlistItem> {
    records
        .into_iter()
        .enumerate()
        .filter_map(|(index, record)| match serde_json::from_value(record) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(index, error = %e, "Skipping unreadable stored wishlist item");
                None
            }
        })
        .collect()
}

fn dedupe(items: Vec<WishlistItem>) -> Vec<WishlistItem> {
    let mut unique: Vec<WishlistItem> = Vec::with_capacity(items.len());
    for item in items {
        if unique.iter().any(|i| i.id == item.id) {
            tracing::warn!(id = %item.id, "Ignoring duplicate stored wishlist item");
        } else {
            unique.push(item);
        }
    }
    unique
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::persist::{self, CURRENT_VERSION};
    use crate::storage::MemoryStorage;

    fn item(id: &str, name: &str) -> WishlistItem {
        WishlistItem {
            id: id.to_string(),
            name: name.to_string(),
            price: Price::new(Decimal::from(12)).unwrap(),
            original_price: None,
            image: "/img/item.jpg".to_string(),
            slug: id.to_string(),
            rating: Some(4.5),
            review_count: Some(18),
            badge: None,
            notes: None,
            origin: Some("Tamale".to_string()),
            in_stock: true,
        }
    }

    fn empty_wishlist() -> (Arc<MemoryStorage>, WishlistStore) {
        let storage = Arc::new(MemoryStorage::new());
        let wishlist = WishlistStore::load(storage.clone());
        (storage, wishlist)
    }

    #[test]
    fn test_add_and_contains() {
        let (_, mut wishlist) = empty_wishlist();
        assert!(wishlist.add(item("p1", "Shea Butter")));
        assert!(wishlist.contains("p1"));
        assert!(!wishlist.contains("p2"));
        assert_eq!(wishlist.count(), 1);
    }

    #[test]
    fn test_first_write_wins() {
        let (_, mut wishlist) = empty_wishlist();
        assert!(wishlist.add(item("p1", "Shea Butter")));
        assert!(!wishlist.add(item("p1", "Renamed")));

        assert_eq!(wishlist.count(), 1);
        assert_eq!(wishlist.items()[0].name, "Shea Butter");
    }

    #[test]
    fn test_remove_is_idempotent() {
        let (storage, mut wishlist) = empty_wishlist();
        wishlist.add(item("p1", "Shea Butter"));
        wishlist.add(item("p2", "Black Soap"));

        wishlist.remove("p1");
        let stored = storage.get(WISHLIST_SLOT).unwrap();
        wishlist.remove("p1");

        assert_eq!(wishlist.count(), 1);
        assert_eq!(storage.get(WISHLIST_SLOT).unwrap(), stored);
    }

    #[test]
    fn test_clear() {
        let (storage, mut wishlist) = empty_wishlist();
        wishlist.add(item("p1", "Shea Butter"));
        wishlist.clear();
        assert!(wishlist.is_empty());

        let raw = storage.get(WISHLIST_SLOT).unwrap().unwrap();
        let decoded = persist::decode(&raw, ITEMS_FIELD).unwrap();
        assert_eq!(decoded.version, CURRENT_VERSION);
        assert!(decoded.records.is_empty());
    }

    #[test]
    fn test_events() {
        let (_, mut wishlist) = empty_wishlist();
        let mut events = wishlist.subscribe();

        wishlist.add(item("p1", "Shea Butter"));
        wishlist.add(item("p1", "Shea Butter"));
        wishlist.remove("missing");

        assert_eq!(
            events.try_recv().unwrap(),
            WishlistEvent::Updated { count: 1 }
        );
        assert!(events.try_recv().is_err());
    }

    #[test]
    fn test_reload_round_trip() {
        let (storage, mut wishlist) = empty_wishlist();
        wishlist.add(item("p1", "Shea Butter"));
        wishlist.add(item("p2", "Black Soap"));

        let reloaded = WishlistStore::load(storage);
        assert_eq!(reloaded.items(), wishlist.items());
    }

    #[test]
    fn test_load_legacy_array() {
        let legacy = r#"[{"id":"p1","name":"Shea Butter","price":12,"image":"","slug":"p1","inStock":true,"reviewCount":3}]"#;
        let storage = Arc::new(MemoryStorage::with_slot(WISHLIST_SLOT, legacy));

        let wishlist = WishlistStore::load(storage.clone());
        assert_eq!(wishlist.count(), 1);
        assert_eq!(wishlist.items()[0].review_count, Some(3));
        // No migration write for the wishlist
        assert_eq!(storage.get(WISHLIST_SLOT).unwrap().as_deref(), Some(legacy));
    }

    #[test]
    fn test_load_malformed_starts_empty_without_clearing() {
        let storage = Arc::new(MemoryStorage::with_slot(WISHLIST_SLOT, "not json"));
        let wishlist = WishlistStore::load(storage.clone());
        assert!(wishlist.is_empty());
        assert_eq!(
            storage.get(WISHLIST_SLOT).unwrap().as_deref(),
            Some("not json")
        );
    }

    #[test]
    fn test_load_skips_bad_records() {
        let payload = r#"{"version":2,"items":[
            {"id":"p1","name":"A","price":1},
            {"id":"p2"},
            {"id":"p3","name":"C","price":null},
            {"id":"p4","name":"D","price":-5},
            {"id":"p5","name":"E","price":"7.50"}
        ]}"#;
        let storage = Arc::new(MemoryStorage::with_slot(WISHLIST_SLOT, payload));
        let wishlist = WishlistStore::load(storage);

        let ids: Vec<&str> = wishlist.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p5"]);
    }

    #[test]
    fn test_bad_record_does_not_cost_good_items_on_next_write() {
        let legacy = r#"[{"id":"p1","name":"Shea Butter","price":12},{"id":"p2","name":"Black Soap","price":null}]"#;
        let storage = Arc::new(MemoryStorage::with_slot(WISHLIST_SLOT, legacy));

        let mut wishlist = WishlistStore::load(storage.clone());
        assert!(wishlist.add(item("p3", "Baobab Oil")));

        let reloaded = WishlistStore::load(storage);
        let ids: Vec<&str> = reloaded.items().iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["p1", "p3"]);
    }

    #[test]
    fn test_load_dedupes() {
        let payload = r#"[{"id":"p1","name":"A","price":1},{"id":"p1","name":"B","price":2}]"#;
        let storage = Arc::new(MemoryStorage::with_slot(WISHLIST_SLOT, payload));
        let wishlist = WishlistStore::load(storage);
        assert_eq!(wishlist.count(), 1);
        assert_eq!(wishlist.items()[0].name, "A");
    }
}
