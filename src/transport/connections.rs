//! Connection registry for joined participants

use std::collections::HashMap;

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::protocol::ServerMessage;

/// Outbound handle for one client connection
#[derive(Debug, Clone)]
pub struct Connection {
    pub id: Uuid,
    sender: mpsc::UnboundedSender<String>,
}

impl Connection {
    /// Create a handle and the receiver its writer drains
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (sender, rx) = mpsc::unbounded_channel();
        let conn = Self {
            id: Uuid::new_v4(),
            sender,
        };
        (conn, rx)
    }

    /// Queue a message. Returns false if the writer is gone.
    pub fn send(&self, msg: &ServerMessage) -> bool {
        self.sender.send(msg.to_string()).is_ok()
    }
}

/// Joined connections by participant name
#[derive(Debug, Default)]
pub struct ConnectionManager {
    connections: RwLock<HashMap<String, Connection>>,
}

impl ConnectionManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a connection to a participant name
    pub fn register(&self, name: &str, conn: Connection) {
        debug!("Registered connection {} as {}", conn.id, name);
        self.connections.write().insert(name.to_string(), conn);
    }

    /// Remove the binding if it still belongs to `conn_id`
    pub fn unregister(&self, name: &str, conn_id: Uuid) -> bool {
        let mut connections = self.connections.write();
        match connections.get(name) {
            Some(conn) if conn.id == conn_id => {
                connections.remove(name);
                true
            }
            _ => false,
        }
    }

    /// Send a message to every joined participant
    pub fn broadcast(&self, msg: &ServerMessage) {
        let line = msg.to_string();
        for (name, conn) in self.connections.read().iter() {
            if conn.sender.send(line.clone()).is_err() {
                warn!("Failed to broadcast to {}", name);
            }
        }
    }

    pub fn count(&self) -> usize {
        self.connections.read().len()
    }
}
