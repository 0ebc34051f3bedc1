use std::collections::{HashMap, HashSet};

use axum::body::Bytes;
use axum::extract::ws::Message;
use tokio::sync::{mpsc, RwLock};
use unitwatch_core::types::{EntityId, Timestamp};

/// Channel sender half for pushing messages to a WebSocket connection.
pub type WsSender = mpsc::UnboundedSender<Message>;

/// Metadata for a single WebSocket connection.
pub struct WsConnection {
    /// The unit this connection subscribes to. A subscriber is attached to
    /// exactly one unit at a time.
    pub unit_id: EntityId,
    /// Channel sender for outbound messages to this connection.
    pub sender: WsSender,
    /// When this connection was established.
    pub connected_at: Timestamp,
}

/// Manages per-unit readiness subscriptions.
///
/// Thread-safe via interior `RwLock`; designed to be wrapped in `Arc` and
/// shared across the application. Per-unit bookkeeping exists only while
/// that unit has at least one subscriber.
pub struct ReadinessWsManager {
    connections: RwLock<HashMap<String, WsConnection>>,
    /// unit id -> ids of connections subscribed to it.
    units: RwLock<HashMap<EntityId, HashSet<String>>>,
}

impl ReadinessWsManager {
    /// Create a new, empty subscription manager.
    pub fn new() -> Self {
        Self {
            connections: RwLock::new(HashMap::new()),
            units: RwLock::new(HashMap::new()),
        }
    }

    /// Register a new subscriber for a unit.
    ///
    /// Returns the receiver half of the message channel so the caller can
    /// forward messages to the WebSocket sink. When `initial` is given it
    /// is enqueued before the connection becomes visible to broadcasts, so
    /// the subscriber observes the initial snapshot first.
    pub async fn add(
        &self,
        conn_id: String,
        unit_id: EntityId,
        initial: Option<Message>,
    ) -> mpsc::UnboundedReceiver<Message> {
        let (tx, rx) = mpsc::unbounded_channel();
        if let Some(snapshot) = initial {
            // Channel is fresh; the send cannot fail.
            let _ = tx.send(snapshot);
        }

        let conn = WsConnection {
            unit_id: unit_id.clone(),
            sender: tx,
            connected_at: chrono::Utc::now(),
        };

        let mut conns = self.connections.write().await;
        let mut units = self.units.write().await;
        if let Some(previous) = conns.insert(conn_id.clone(), conn) {
            // Re-used id: detach the replaced connection from its unit.
            Self::detach_from_unit(&mut units, &previous.unit_id, &conn_id);
        }
        units.entry(unit_id).or_default().insert(conn_id);
        rx
    }

    /// Remove a connection by its ID, dropping the per-unit bookkeeping
    /// when the last subscriber detaches.
    pub async fn remove(&self, conn_id: &str) {
        let mut conns = self.connections.write().await;
        let mut units = self.units.write().await;
        if let Some(conn) = conns.remove(conn_id) {
            Self::detach_from_unit(&mut units, &conn.unit_id, conn_id);
        }
    }

    fn detach_from_unit(
        units: &mut HashMap<EntityId, HashSet<String>>,
        unit_id: &str,
        conn_id: &str,
    ) {
        if let Some(subscribers) = units.get_mut(unit_id) {
            subscribers.remove(conn_id);
            if subscribers.is_empty() {
                units.remove(unit_id);
            }
        }
    }

    /// Whether a unit currently has any subscribers.
    pub async fn has_subscribers(&self, unit_id: &str) -> bool {
        self.units.read().await.contains_key(unit_id)
    }

    /// Number of subscribers attached to a unit.
    pub async fn subscriber_count(&self, unit_id: &str) -> usize {
        self.units
            .read()
            .await
            .get(unit_id)
            .map_or(0, |subscribers| subscribers.len())
    }

    /// Send a message to one connection. Returns `false` if the connection
    /// is unknown or its channel is closed.
    pub async fn send_to(&self, conn_id: &str, message: Message) -> bool {
        self.connections
            .read()
            .await
            .get(conn_id)
            .is_some_and(|conn| conn.sender.send(message).is_ok())
    }

    /// Push an identical message to every subscriber of a unit.
    ///
    /// Subscribers whose channels are closed are detached in the same
    /// pass; one dead subscriber never aborts delivery to the others.
    /// Returns the number of subscribers the message was delivered to.
    pub async fn broadcast_to_unit(&self, unit_id: &str, message: Message) -> usize {
        let subscriber_ids: Vec<String> = self
            .units
            .read()
            .await
            .get(unit_id)
            .map(|subscribers| subscribers.iter().cloned().collect())
            .unwrap_or_default();

        let mut delivered = 0;
        let mut dead = Vec::new();
        {
            let conns = self.connections.read().await;
            for conn_id in &subscriber_ids {
                match conns.get(conn_id) {
                    Some(conn) if conn.sender.send(message.clone()).is_ok() => delivered += 1,
                    Some(_) => dead.push(conn_id.clone()),
                    None => {}
                }
            }
        }

        for conn_id in dead {
            tracing::debug!(conn_id = %conn_id, unit_id, "Pruning dead readiness subscriber");
            self.remove(&conn_id).await;
        }

        delivered
    }

    /// Return the current number of active connections across all units.
    pub async fn connection_count(&self) -> usize {
        self.connections.read().await.len()
    }

    /// Send a Ping frame to every connected client.
    ///
    /// Used by the heartbeat task to keep connections alive and detect
    /// stale ones.
    pub async fn ping_all(&self) {
        let conns = self.connections.read().await;
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Ping(Bytes::new()));
        }
    }

    /// Send a Close frame to every connection, then clear all bookkeeping.
    ///
    /// Used during graceful shutdown to notify all clients before the
    /// server stops accepting new connections.
    pub async fn shutdown_all(&self) {
        let mut conns = self.connections.write().await;
        let mut units = self.units.write().await;
        let count = conns.len();
        for conn in conns.values() {
            let _ = conn.sender.send(Message::Close(None));
        }
        conns.clear();
        units.clear();
        tracing::info!(count, "Closed all readiness WebSocket connections");
    }
}

impl Default for ReadinessWsManager {
    fn default() -> Self {
        Self::new()
    }
}
