//! Connection registry: the authoritative map of live WebSocket connections.
//!
//! Presence is derived from this map. A user is online exactly while at
//! least one of their connections is registered; nothing is stored about
//! users who are offline.

use std::collections::{BTreeSet, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::{Mutex, mpsc};

use crate::domain::value_object::{ConnectionId, UserId};

/// Channel used to hand outbound frames to a connection's writer task.
pub type FrameSender = mpsc::Sender<String>;

/// Capacity of each connection's outbound frame queue. A connection that
/// falls this far behind is evicted rather than allowed to stall the
/// broadcast path.
pub const SEND_QUEUE_CAPACITY: usize = 64;

/// Create the outbound frame queue for one connection.
pub fn frame_channel() -> (FrameSender, mpsc::Receiver<String>) {
    mpsc::channel(SEND_QUEUE_CAPACITY)
}

/// A connection removed from the registry, together with the presence
/// list as it stands after the removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OfflineNotice {
    pub user_id: UserId,
    pub online_users: Vec<UserId>,
}

struct ConnectionEntry {
    user_id: UserId,
    sender: FrameSender,
}

/// Registry of live connections, keyed by connection id.
pub struct ConnectionRegistry {
    connections: Mutex<HashMap<ConnectionId, ConnectionEntry>>,
    next_connection_id: AtomicU64,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self {
            connections: Mutex::new(HashMap::new()),
            next_connection_id: AtomicU64::new(1),
        }
    }

    /// Add a connection for `user_id` and return its fresh connection id.
    pub async fn register(&self, user_id: UserId, sender: FrameSender) -> ConnectionId {
        let connection_id =
            ConnectionId::new(self.next_connection_id.fetch_add(1, Ordering::Relaxed));
        self.connections
            .lock()
            .await
            .insert(connection_id, ConnectionEntry { user_id, sender });
        tracing::debug!(
            "Registered connection {} for user {}",
            connection_id.value(),
            user_id.value()
        );
        connection_id
    }

    /// Remove a connection and return the user it belonged to.
    ///
    /// Returns `None` when the connection is not registered (any more), so
    /// a second unregister of the same connection is a no-op.
    pub async fn unregister(&self, connection_id: ConnectionId) -> Option<UserId> {
        let removed = self.connections.lock().await.remove(&connection_id);
        if let Some(entry) = &removed {
            tracing::debug!(
                "Unregistered connection {} of user {}",
                connection_id.value(),
                entry.user_id.value()
            );
        }
        removed.map(|entry| entry.user_id)
    }

    /// User ids of all live connections, one entry per connection.
    /// A user with two open tabs appears twice.
    pub async fn user_ids(&self) -> Vec<UserId> {
        self.connections
            .lock()
            .await
            .values()
            .map(|entry| entry.user_id)
            .collect()
    }

    /// Distinct online user ids in ascending order.
    pub async fn present_user_ids(&self) -> Vec<UserId> {
        Self::present_of(&*self.connections.lock().await)
    }

    pub async fn is_present(&self, user_id: UserId) -> bool {
        self.connections
            .lock()
            .await
            .values()
            .any(|entry| entry.user_id == user_id)
    }

    pub async fn connection_count(&self) -> usize {
        self.connections.lock().await.len()
    }

    /// Queue `frame` on every live connection.
    ///
    /// Delivery never awaits the sockets: the frame is pushed onto each
    /// connection's bounded queue with `try_send`. Connections whose queue
    /// is full, or whose receiver is gone, are removed, and one
    /// [`OfflineNotice`] per removed connection is returned so the caller
    /// can announce the departure.
    pub async fn broadcast(&self, frame: &str) -> Vec<OfflineNotice> {
        let mut connections = self.connections.lock().await;

        let mut evicted: Vec<(ConnectionId, UserId)> = Vec::new();
        for (connection_id, entry) in connections.iter() {
            if let Err(err) = entry.sender.try_send(frame.to_string()) {
                match err {
                    mpsc::error::TrySendError::Full(_) => tracing::warn!(
                        "Send queue of connection {} (user {}) is full, evicting",
                        connection_id.value(),
                        entry.user_id.value()
                    ),
                    mpsc::error::TrySendError::Closed(_) => tracing::debug!(
                        "Send channel of connection {} (user {}) is closed, removing",
                        connection_id.value(),
                        entry.user_id.value()
                    ),
                }
                evicted.push((*connection_id, entry.user_id));
            }
        }

        for (connection_id, _) in &evicted {
            connections.remove(connection_id);
        }

        let online_users = Self::present_of(&connections);
        evicted
            .into_iter()
            .map(|(_, user_id)| OfflineNotice {
                user_id,
                online_users: online_users.clone(),
            })
            .collect()
    }

    fn present_of(connections: &HashMap<ConnectionId, ConnectionEntry>) -> Vec<UserId> {
        connections
            .values()
            .map(|entry| entry.user_id)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

impl Default for ConnectionRegistry {
    fn default() -> Self {
        Self::new()
    }
}
