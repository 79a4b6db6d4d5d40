//! Room-based broadcast registry.
//!
//! A room is a named broadcast channel. Subscribers join a room and receive
//! every event published to it afterwards. Each room has a bounded buffer:
//! a subscriber that falls more than `capacity` events behind skips the
//! oldest ones, and publishing never waits for subscribers.
//!
//! # Example
//!
//! ```ignore
//! let rooms = RoomBroadcaster::<SlotBooked>::new(256);
//!
//! let mut rx = rooms.join(&resource_room(resource_id)).await;
//! rooms.publish(&resource_room(resource_id), event).await;
//!
//! while let Ok(event) = rx.recv().await {
//!     // forward to the client
//! }
//! ```

use slotbook_core::notifier::{SlotBooked, SlotNotifier};
use slotbook_core::types::ResourceId;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use tokio::sync::{RwLock, broadcast};
use tracing::debug;

/// Room key for subscribers watching a resource.
#[must_use]
pub fn resource_room(resource_id: ResourceId) -> String {
    format!("resource-{resource_id}")
}

/// Type alias for the rooms map to reduce complexity.
type RoomsMap<E> = Arc<RwLock<HashMap<String, broadcast::Sender<E>>>>;

/// Registry of rooms, each a bounded broadcast channel.
///
/// Clones share the same rooms.
pub struct RoomBroadcaster<E>
where
    E: Clone + Send + 'static,
{
    /// Map of room name → broadcast channel
    rooms: RoomsMap<E>,
    /// Per-room buffer size
    capacity: usize,
}

impl<E> RoomBroadcaster<E>
where
    E: Clone + Send + Sync + 'static,
{
    /// Buffer size used by [`Default`].
    pub const DEFAULT_CAPACITY: usize = 256;

    /// Create a registry whose rooms buffer up to `capacity` events.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Arc::new(RwLock::new(HashMap::new())),
            capacity: capacity.max(1),
        }
    }

    /// Join `room`, creating it if needed.
    ///
    /// Dropping the receiver leaves the room.
    pub async fn join(&self, room: &str) -> broadcast::Receiver<E> {
        let mut rooms = self.rooms.write().await;
        rooms
            .entry(room.to_string())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver `event` to the current members of `room`.
    ///
    /// Returns how many subscribers it was delivered to. A room without
    /// subscribers drops the event and is not created.
    pub async fn publish(&self, room: &str, event: E) -> usize {
        let rooms = self.rooms.read().await;
        rooms
            .get(room)
            .and_then(|sender| sender.send(event).ok())
            .unwrap_or(0)
    }

    /// Remove `room` if nobody is subscribed to it any more.
    pub async fn leave(&self, room: &str) {
        let mut rooms = self.rooms.write().await;
        if rooms.get(room).is_some_and(|s| s.receiver_count() == 0) {
            rooms.remove(room);
            debug!(room, "Removed empty room");
        }
    }

    /// Remove every room without subscribers.
    pub async fn prune(&self) {
        self.rooms
            .write()
            .await
            .retain(|_, sender| sender.receiver_count() > 0);
    }

    /// Number of rooms currently registered.
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Number of subscribers in `room`.
    pub async fn subscriber_count(&self, room: &str) -> usize {
        self.rooms
            .read()
            .await
            .get(room)
            .map_or(0, broadcast::Sender::receiver_count)
    }
}

impl<E> Default for RoomBroadcaster<E>
where
    E: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new(Self::DEFAULT_CAPACITY)
    }
}

impl<E> Clone for RoomBroadcaster<E>
where
    E: Clone + Send + 'static,
{
    fn clone(&self) -> Self {
        Self {
            rooms: Arc::clone(&self.rooms),
            capacity: self.capacity,
        }
    }
}

impl SlotNotifier for RoomBroadcaster<SlotBooked> {
    fn publish(&self, event: SlotBooked) -> Pin<Box<dyn Future<Output = ()> + Send + '_>> {
        Box::pin(async move {
            let room = resource_room(event.resource_id);
            let delivered = Self::publish(self, &room, event).await;
            metrics::counter!("slotbook_slot_notifications_total").increment(1);
            debug!(room = %room, delivered, "Published slot-booked event");
        })
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)] // Test code
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use slotbook_core::types::BookingCode;

    fn slot_booked(resource_id: ResourceId, start_time: &str) -> SlotBooked {
        SlotBooked {
            resource_id,
            date: NaiveDate::from_ymd_opt(2025, 1, 2).unwrap(),
            start_time: start_time.to_string(),
            booking_code: BookingCode::new("BK1TEST"),
        }
    }

    #[tokio::test]
    async fn test_publish_reaches_every_member() {
        let rooms = RoomBroadcaster::<String>::default();
        let mut rx1 = rooms.join("room").await;
        let mut rx2 = rooms.join("room").await;

        assert_eq!(rooms.publish("room", "Message".to_string()).await, 2);

        assert_eq!(rx1.recv().await.unwrap(), "Message");
        assert_eq!(rx2.recv().await.unwrap(), "Message");
    }

    #[tokio::test]
    async fn test_room_isolation() {
        let rooms = RoomBroadcaster::<String>::default();
        let mut rx_a = rooms.join("a").await;
        let mut rx_b = rooms.join("b").await;

        rooms.publish("a", "MessageA".to_string()).await;

        assert_eq!(rx_a.recv().await.unwrap(), "MessageA");
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_to_empty_room_is_dropped() {
        let rooms = RoomBroadcaster::<String>::default();
        assert_eq!(rooms.publish("nobody", "lost".to_string()).await, 0);
        assert_eq!(rooms.room_count().await, 0);
    }

    #[tokio::test]
    async fn test_leave_and_prune_remove_empty_rooms() {
        let rooms = RoomBroadcaster::<String>::default();
        let rx = rooms.join("a").await;
        let _kept = rooms.join("b").await;

        rooms.leave("a").await;
        assert_eq!(rooms.room_count().await, 2);

        drop(rx);
        rooms.leave("a").await;
        assert_eq!(rooms.room_count().await, 1);

        rooms.prune().await;
        assert_eq!(rooms.subscriber_count("b").await, 1);
    }

    #[tokio::test]
    async fn test_slow_subscriber_lags_without_blocking_publish() {
        let rooms = RoomBroadcaster::<u32>::new(2);
        let mut rx = rooms.join("room").await;

        for n in 0..5 {
            rooms.publish("room", n).await;
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(3))
        ));
        assert_eq!(rx.recv().await.unwrap(), 3);
        assert_eq!(rx.recv().await.unwrap(), 4);
    }

    #[tokio::test]
    async fn test_notifier_routes_by_resource_in_publish_order() {
        let rooms = RoomBroadcaster::<SlotBooked>::default();
        let watched = ResourceId::new();
        let mut rx = rooms.join(&resource_room(watched)).await;
        let mut other = rooms.join(&resource_room(ResourceId::new())).await;

        SlotNotifier::publish(&rooms, slot_booked(watched, "09:00")).await;
        SlotNotifier::publish(&rooms, slot_booked(watched, "11:00")).await;

        assert_eq!(rx.recv().await.unwrap().start_time, "09:00");
        assert_eq!(rx.recv().await.unwrap().start_time, "11:00");
        assert!(other.try_recv().is_err());
    }
}
