//! Store change notifications.
//!
//! Stores publish events after a mutation has been applied and persisted.
//! Consumers subscribe with `subscribe()` on the store; a store with no
//! subscribers behaves exactly the same.

use rust_decimal::Decimal;
use tokio::sync::broadcast;

/// Buffered events per subscriber before the oldest are dropped.
pub const EVENT_CAPACITY: usize = 64;

/// Events published by the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CartEvent {
    /// The line list changed and has been persisted.
    Updated {
        /// Sum of line quantities after the change.
        count: u64,
        /// Sum of price times quantity after the change.
        subtotal: Decimal,
    },
    /// An item was added; the UI should present the cart panel.
    OpenRequested,
}

/// Events published by the wishlist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WishlistEvent {
    /// The item list changed and has been persisted.
    Updated {
        /// Number of saved items after the change.
        count: usize,
    },
}

/// Broadcast sender shared by a store and its subscribers.
#[derive(Debug, Clone)]
pub struct EventBus<E> {
    sender: broadcast::Sender<E>,
}

impl<E: Clone> EventBus<E> {
    /// Create a bus with [`EVENT_CAPACITY`] slots.
    #[must_use]
    pub fn new() -> Self {
        let (sender, _) = broadcast::channel(EVENT_CAPACITY);
        Self { sender }
    }

    /// Subscribe to events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }

    /// Publish an event. Having no subscribers is not an error.
    pub fn publish(&self, event: E) {
        let _ = self.sender.send(event);
    }
}

impl<E: Clone> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_without_subscribers() {
        let bus = EventBus::<CartEvent>::new();
        bus.publish(CartEvent::OpenRequested);
    }

    #[test]
    fn test_subscriber_receives_in_order() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        bus.publish(WishlistEvent::Updated { count: 1 });
        bus.publish(WishlistEvent::Updated { count: 2 });

        assert_eq!(rx.try_recv().unwrap(), WishlistEvent::Updated { count: 1 });
        assert_eq!(rx.try_recv().unwrap(), WishlistEvent::Updated { count: 2 });
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_late_subscriber_misses_earlier_events() {
        let bus = EventBus::new();
        bus.publish(CartEvent::OpenRequested);
        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }
}
