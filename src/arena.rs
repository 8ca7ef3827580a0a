//! Shared arena state
//!
//! Wraps the session in a single mutex. Every mutation and the enqueueing of
//! the broadcasts it produced happen inside one critical section, so each
//! peer sees messages in the order the state changed.

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ActionRejection, AdmissionError, StartError};
use crate::protocol::ServerMessage;
use crate::session::{ActionRequest, Broadcast, Session, SessionSnapshot};
use crate::transport::{Connection, ConnectionManager};

/// Session snapshot plus connection count, for the operator console
#[derive(Debug, Clone, Serialize)]
pub struct ArenaStatus {
    #[serde(flatten)]
    pub session: SessionSnapshot,
    pub connections: usize,
}

/// The battle session and the connections attached to it
#[derive(Debug)]
pub struct Arena {
    session: Mutex<Session>,
    connections: ConnectionManager,
}

impl Arena {
    pub fn new(session: Session) -> Self {
        Self {
            session: Mutex::new(session),
            connections: ConnectionManager::new(),
        }
    }

    /// Admit `name` on `conn`. Replies to the connection either way.
    ///
    /// Returns the name the connection is now bound to.
    pub fn join(
        &self,
        conn: &Connection,
        name: &str,
        archetype: &str,
    ) -> Result<String, AdmissionError> {
        let mut session = self.session.lock();
        match session.admit(name, archetype) {
            Ok(broadcasts) => {
                let name = name.trim().to_string();
                self.connections.register(&name, conn.clone());
                conn.send(&ServerMessage::JoinSuccess);
                self.dispatch(broadcasts);
                Ok(name)
            }
            Err(err) => {
                info!("Rejected join from {}: {}", name, err);
                conn.send(&ServerMessage::JoinRejected(err.to_string()));
                Err(err)
            }
        }
    }

    /// Submit an action on behalf of the participant bound to the connection
    pub fn submit(&self, bound: &str, request: ActionRequest) -> Result<(), ActionRejection> {
        if request.actor != bound {
            warn!(
                "Illegal action from {}: tried to act as {}",
                bound, request.actor
            );
            return Err(ActionRejection::NotYourParticipant);
        }

        let mut session = self.session.lock();
        match session.submit_action(request) {
            Ok(broadcasts) => {
                self.dispatch(broadcasts);
                Ok(())
            }
            Err(err) => {
                warn!("Illegal action from {}: {}", bound, err);
                Err(err)
            }
        }
    }

    /// A bound connection went away
    pub fn depart(&self, name: &str, conn: &Connection) {
        let mut session = self.session.lock();
        if !self.connections.unregister(name, conn.id) {
            debug!("Stale departure for {} ignored", name);
            return;
        }
        info!("{} disconnected", name);
        let broadcasts = session.handle_departure(name);
        self.dispatch(broadcasts);
    }

    /// Start a match from the operator console
    pub fn start(&self) -> Result<SessionSnapshot, StartError> {
        let mut session = self.session.lock();
        let broadcasts = session.start_match()?;
        self.dispatch(broadcasts);
        Ok(session.snapshot())
    }

    pub fn status(&self) -> ArenaStatus {
        let session = self.session.lock();
        ArenaStatus {
            session: session.snapshot(),
            connections: self.connections.count(),
        }
    }

    /// Enqueue broadcasts to every joined connection. Caller holds the session lock.
    fn dispatch(&self, broadcasts: Vec<Broadcast>) {
        for broadcast in broadcasts {
            self.connections.broadcast(&ServerMessage::from(broadcast));
        }
    }
}
