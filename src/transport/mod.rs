//! Game transport: newline-delimited TCP
//!
//! One task per connection. Each task selects over its outbound queue, the
//! next inbound line, and the shutdown signal.

mod connections;

use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::arena::Arena;
use crate::error::AdmissionError;
use crate::protocol::{self, ClientCommand, ServerMessage};

pub use connections::{Connection, ConnectionManager};

/// Pause after a failed accept, e.g. while out of file descriptors
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Accept game connections until shutdown is signalled
pub async fn serve(
    listener: TcpListener,
    arena: Arc<Arena>,
    shutdown: watch::Receiver<bool>,
) {
    let listener = &listener;
    accept_loop(move || listener.accept(), arena, shutdown).await;
}

/// Accept errors are logged and retried; the listener only stops on shutdown
async fn accept_loop<F, Fut>(mut accept: F, arena: Arc<Arena>, mut shutdown: watch::Receiver<bool>)
where
    F: FnMut() -> Fut,
    Fut: Future<Output = io::Result<(TcpStream, SocketAddr)>>,
{
    loop {
        tokio::select! {
            accepted = accept() => match accepted {
                Ok((stream, peer)) => {
                    debug!("Accepted game connection from {}", peer);
                    tokio::spawn(handle_connection(stream, arena.clone(), shutdown.clone()));
                }
                Err(err) => {
                    warn!("Accept failed: {}", err);
                    tokio::select! {
                        _ = tokio::time::sleep(ACCEPT_BACKOFF) => {}
                        _ = shutdown.changed() => break,
                    }
                }
            },
            _ = shutdown.changed() => break,
        }
    }
    info!("Game listener stopped");
}

/// Per-connection protocol state
struct ClientState {
    conn: Connection,
    /// Name bound by a successful `JOIN`
    bound: Option<String>,
}

impl ClientState {
    /// Apply one inbound line to the arena
    fn handle_line(&mut self, arena: &Arena, line: &str) {
        let command = match protocol::parse_line(line) {
            Ok(command) => command,
            Err(err) => {
                debug!("Ignoring line from {}: {}", self.conn.id, err);
                return;
            }
        };

        match command {
            ClientCommand::Join { name, archetype } => {
                if self.bound.is_some() {
                    self.conn.send(&ServerMessage::JoinRejected(
                        AdmissionError::AlreadyJoined.to_string(),
                    ));
                    return;
                }
                if let Ok(name) = arena.join(&self.conn, &name, &archetype) {
                    self.bound = Some(name);
                }
            }
            ClientCommand::Action(request) => match &self.bound {
                // Rejections are logged by the arena
                Some(bound) => {
                    let _ = arena.submit(bound, request);
                }
                None => warn!(
                    "Illegal action from unjoined connection {} as {}",
                    self.conn.id, request.actor
                ),
            },
        }
    }
}

async fn handle_connection(stream: TcpStream, arena: Arc<Arena>, mut shutdown: watch::Receiver<bool>) {
    let peer = stream
        .peer_addr()
        .map(|a| a.to_string())
        .unwrap_or_else(|_| "unknown".to_string());
    let (reader, mut writer) = stream.into_split();
    let mut lines = BufReader::new(reader).lines();

    let (conn, mut rx) = Connection::new();
    let mut state = ClientState { conn, bound: None };
    info!("Client connected: {} ({})", state.conn.id, peer);

    loop {
        tokio::select! {
            Some(msg) = rx.recv() => {
                let mut out = msg.into_bytes();
                out.push(b'\n');
                if let Err(err) = writer.write_all(&out).await {
                    warn!("Write to {} failed: {}", peer, err);
                    break;
                }
            }
            result = lines.next_line() => {
                match result {
                    Ok(Some(line)) => {
                        let line = line.trim_end_matches('\r');
                        if !line.trim().is_empty() {
                            state.handle_line(&arena, line);
                        }
                    }
                    Ok(None) => break,
                    Err(err) => {
                        debug!("Read from {} failed: {}", peer, err);
                        break;
                    }
                }
            }
            _ = shutdown.changed() => break,
        }
    }

    if let Some(name) = &state.bound {
        arena.depart(name, &state.conn);
    }
    info!("Client disconnected: {} ({})", state.conn.id, peer);
}
