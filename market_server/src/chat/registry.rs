use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use log::trace;
use market_engine::db_types::OrderId;
use tokio::sync::mpsc;

use super::events::ChatEvent;

pub type ConnId = u64;

/// The in-memory room membership map: order id -> live connections.
///
/// Cloning is cheap; every session and handler shares the same map. Membership is per connection,
/// not per user, so one user with two tabs open holds two entries and both receive broadcasts.
#[derive(Clone, Default)]
pub struct ChatRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

#[derive(Default)]
struct RegistryInner {
    next_id: ConnId,
    rooms: HashMap<OrderId, HashMap<ConnId, mpsc::UnboundedSender<ChatEvent>>>,
}

impl ChatRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a connection to an order's room and return its id with the event receiver to drain.
    pub fn join(&self, order_id: &OrderId) -> (ConnId, mpsc::UnboundedReceiver<ChatEvent>) {
        let (tx, rx) = mpsc::unbounded_channel();
        let mut inner = self.lock();
        inner.next_id += 1;
        let conn_id = inner.next_id;
        inner.rooms.entry(order_id.clone()).or_default().insert(conn_id, tx);
        trace!("🗨️ Connection {conn_id} joined room for order [{order_id}]");
        (conn_id, rx)
    }

    /// Remove a connection. Empty rooms are dropped from the map.
    pub fn leave(&self, order_id: &OrderId, conn_id: ConnId) {
        let mut inner = self.lock();
        if let Some(room) = inner.rooms.get_mut(order_id) {
            room.remove(&conn_id);
            if room.is_empty() {
                inner.rooms.remove(order_id);
            }
        }
        trace!("🗨️ Connection {conn_id} left room for order [{order_id}]");
    }

    /// Fan an event out to every live member of the room, the originator included. Returns the
    /// number of connections the event was queued for.
    pub fn broadcast(&self, order_id: &OrderId, event: &ChatEvent) -> usize {
        let inner = self.lock();
        match inner.rooms.get(order_id) {
            Some(room) => room.values().filter(|tx| tx.send(event.clone()).is_ok()).count(),
            None => 0,
        }
    }

    pub fn member_count(&self, order_id: &OrderId) -> usize {
        self.lock().rooms.get(order_id).map(HashMap::len).unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

#[cfg(test)]
mod test {
    use chrono::Utc;
    use market_engine::db_types::{ChatMessage, OrderId};

    use super::ChatRegistry;
    use crate::chat::ChatEvent;

    fn message(text: &str) -> ChatEvent {
        ChatEvent::Message(ChatMessage {
            id: "m1".into(),
            order_id: "ord-1".into(),
            sender_id: "alice".into(),
            text: text.into(),
            created_at: Utc::now(),
        })
    }

    #[tokio::test]
    async fn broadcasts_reach_every_member_including_the_sender() {
        let registry = ChatRegistry::new();
        let order = OrderId::from("ord-1");
        let (_id_a, mut rx_a) = registry.join(&order);
        let (_id_b, mut rx_b) = registry.join(&order);
        assert_eq!(registry.member_count(&order), 2);

        let delivered = registry.broadcast(&order, &message("hello"));
        assert_eq!(delivered, 2);
        assert!(matches!(rx_a.recv().await, Some(ChatEvent::Message(m)) if m.text == "hello"));
        assert!(matches!(rx_b.recv().await, Some(ChatEvent::Message(m)) if m.text == "hello"));
    }

    #[tokio::test]
    async fn rooms_are_isolated() {
        let registry = ChatRegistry::new();
        let (_id, mut rx) = registry.join(&OrderId::from("ord-1"));
        let delivered = registry.broadcast(&OrderId::from("ord-2"), &message("wrong room"));
        assert_eq!(delivered, 0);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn leaving_prunes_the_room() {
        let registry = ChatRegistry::new();
        let order = OrderId::from("ord-1");
        let (id_a, _rx_a) = registry.join(&order);
        let (id_b, _rx_b) = registry.join(&order);
        registry.leave(&order, id_a);
        assert_eq!(registry.member_count(&order), 1);
        registry.leave(&order, id_b);
        assert_eq!(registry.member_count(&order), 0);
    }
}
