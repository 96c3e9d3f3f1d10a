//! Visitor cart state.
//!
//! [`CartStore`] owns the cart lines for one session, enforces the quantity
//! bounds of every line, and writes the full list to its durable slot after
//! every mutation.
//!
//! # Quantity rules
//!
//! - A line always holds `moq <= quantity <= max_stock` (when the cap allows it).
//! - Adding to an existing line raises its quantity up to the stock cap.
//! - Setting a quantity below the line's MOQ removes the line.
//!
//! Invalid input is normalized, never rejected: there are no errors to handle
//! at call sites. Authoritative validation happens at checkout.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut cart = CartStore::load(storage);
//! let mut events = cart.subscribe();
//!
//! cart.add(item, None);
//! assert_eq!(events.try_recv()?, CartEvent::Updated { count: 1, subtotal });
//! assert_eq!(events.try_recv()?, CartEvent::OpenRequested);
//! ```

mod line;
mod migrate;

pub use line::{CartItem, CartLine, DEFAULT_MAX_STOCK, DEFAULT_MOQ, clamp_quantity};
pub use migrate::{Migrated, migrate};

use std::sync::Arc;

use rust_decimal::Decimal;
use shopfront_core::ProductId;
use tokio::sync::broadcast;
use tracing::instrument;

use crate::events::{CartEvent, EventBus};
use crate::persist::{PersistError, Slot};
use crate::storage::{CART_SLOT, SlotStorage};

/// List field inside the cart envelope.
const LINES_FIELD: &str = "lines";

/// Cart lines for one visitor session.
///
/// Constructed only through [`CartStore::load`], so nothing can write the slot
/// before the stored cart has been read.
#[derive(Debug)]
pub struct CartStore {
    slot: Slot,
    lines: Vec<CartLine>,
    open: bool,
    events: EventBus<CartEvent>,
}

impl CartStore {
    /// Load the cart from its slot on `storage`.
    ///
    /// Data that cannot be decoded is discarded and the slot cleared. A failed
    /// read leaves the slot as it is and the cart starts empty. Stored lines that
    /// fail validation are dropped, and if anything was dropped or repaired
    /// the cleaned list is written back before this returns.
    #[must_use]
    #[instrument(skip(storage))]
    pub fn load(storage: Arc<dyn SlotStorage>) -> Self {
        let mut store = Self {
            slot: Slot::new(storage, CART_SLOT, LINES_FIELD),
            lines: Vec::new(),
            open: false,
            events: EventBus::new(),
        };

        match store.slot.read() {
            Ok(None) => {}
            Ok(Some(decoded)) => {
                let outdated = decoded.is_outdated();
                let migrated = migrate(decoded);
                let rewrite = outdated || migrated.changed();
                tracing::debug!(
                    lines = migrated.lines.len(),
                    dropped = migrated.dropped,
                    repaired = migrated.repaired,
                    "Cart loaded"
                );
                store.lines = migrated.lines;
                if rewrite {
                    store.persist();
                }
            }
            Err(PersistError::Storage(e)) => {
                tracing::error!(error = %e, "Failed to read cart slot, starting empty");
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to decode stored cart, starting empty");
                if let Err(e) = store.slot.clear() {
                    tracing::error!(error = %e, "Failed to clear unreadable cart slot");
                }
            }
        }

        store
    }

    /// Current lines, in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Look up a line by identity.
    #[must_use]
    pub fn get(&self, id: ProductId, variant_key: Option<&str>) -> Option<&CartLine> {
        self.lines.iter().find(|l| l.matches(id, variant_key))
    }

    /// Whether the cart has no lines.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of quantities across all lines.
    #[must_use]
    pub fn count(&self) -> u64 {
        self.lines.iter().map(|l| u64::from(l.quantity)).sum()
    }

    /// Sum of price times quantity across all lines.
    #[must_use]
    pub fn subtotal(&self) -> Decimal {
        self.lines.iter().map(CartLine::line_total).sum()
    }

    /// Whether the cart panel should be shown.
    #[must_use]
    pub const fn is_open(&self) -> bool {
        self.open
    }

    /// Show or hide the cart panel.
    pub const fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Subscribe to cart events.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<CartEvent> {
        self.events.subscribe()
    }

    /// Add `requested` units of `item`.
    ///
    /// `None` requests the item's MOQ. An existing line with the same identity
    /// grows by `requested`, capped at its stock and never shrinking. A new line
    /// is appended otherwise. Either way the cart panel is opened and
    /// [`CartEvent::OpenRequested`] is published.
    #[instrument(skip(self, item), fields(id = %item.id, variant = ?item.variant_key))]
    pub fn add(&mut self, item: CartItem, requested: Option<u32>) {
        let requested = requested.unwrap_or_else(|| item.effective_moq()).max(1);

        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|l| l.matches(item.id, item.variant_key.as_deref()))
        {
            let grown = u64::from(line.quantity) + u64::from(requested);
            let capped = grown.min(u64::from(line.max_stock));
            line.quantity = u32::try_from(capped)
                .unwrap_or(line.max_stock)
                .max(line.quantity);
            tracing::debug!(quantity = line.quantity, "Cart line increased");
        } else {
            let line = item.into_line(requested);
            tracing::debug!(quantity = line.quantity, "Cart line added");
            self.lines.push(line);
        }

        self.commit();
        self.open = true;
        self.events.publish(CartEvent::OpenRequested);
    }

    /// Remove the line with this identity. Does nothing if there is none.
    #[instrument(skip(self))]
    pub fn remove(&mut self, id: ProductId, variant_key: Option<&str>) {
        let before = self.lines.len();
        self.lines.retain(|l| !l.matches(id, variant_key));
        if self.lines.len() != before {
            tracing::debug!("Cart line removed");
            self.commit();
        }
    }

    /// Set the quantity of the line with this identity.
    ///
    /// A quantity below the line's MOQ (including zero and negatives) removes
    /// the line. Anything else is clamped into `[moq, max_stock]`. Does nothing
    /// if there is no such line.
    #[instrument(skip(self))]
    pub fn set_quantity(&mut self, id: ProductId, variant_key: Option<&str>, quantity: i64) {
        let Some(index) = self.lines.iter().position(|l| l.matches(id, variant_key)) else {
            return;
        };
        let Some(line) = self.lines.get_mut(index) else {
            return;
        };

        if quantity < i64::from(line.moq) {
            tracing::debug!(moq = line.moq, "Quantity below MOQ, removing cart line");
            self.lines.remove(index);
            self.commit();
            return;
        }

        let requested = u64::try_from(quantity).unwrap_or(0);
        let clamped = clamp_quantity(requested, line.moq, line.max_stock);
        if clamped != line.quantity {
            line.quantity = clamped;
            tracing::debug!(quantity = clamped, "Cart line quantity set");
            self.commit();
        }
    }

    /// Remove every line.
    #[instrument(skip(self))]
    pub fn clear(&mut self) {
        self.lines.clear();
        self.commit();
    }

    /// Persist the full list, then publish the new aggregates.
    fn commit(&self) {
        self.persist();
        self.events.publish(CartEvent::Updated {
            count: self.count(),
            subtotal: self.subtotal(),
        });
    }

    fn persist(&self) {
        if let Err(e) = self.slot.write(&self.lines) {
            tracing::error!(error = %e, slot = self.slot.key(), "Failed to persist cart");
        }
    }
}
