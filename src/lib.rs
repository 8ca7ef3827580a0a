//! arenad - turn-based arena battle server
//!
//! Participants connect over a newline-delimited TCP protocol, join a lobby,
//! and fight simultaneous-turn matches. An HTTP operator console inspects the
//! session and starts matches.

pub mod api;
pub mod arena;
pub mod catalog;
pub mod combat;
pub mod config;
pub mod error;
pub mod protocol;
pub mod session;
pub mod transport;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use arena::Arena;
use catalog::Catalog;
use combat::{BonusSource, SeededBonus};
use session::Session;

pub use config::Config;

/// Signals a running server to stop
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    tx: Arc<watch::Sender<bool>>,
}

impl ShutdownHandle {
    pub fn shutdown(&self) {
        let _ = self.tx.send(true);
    }
}

/// The arenad server instance
pub struct Server {
    config: Config,
    arena: Arc<Arena>,
    game_listener: TcpListener,
    api_listener: TcpListener,
    shutdown_tx: Arc<watch::Sender<bool>>,
    shutdown_rx: watch::Receiver<bool>,
}

impl Server {
    /// Build the session and bind both listeners
    pub async fn bind(config: Config) -> Result<Self> {
        config.validate()?;

        let catalog = Arc::new(Catalog::standard()?);
        let bonus: Box<dyn BonusSource> = match config.seed {
            Some(seed) => {
                info!("Using seeded pierce bonus ({})", seed);
                Box::new(SeededBonus::new(seed))
            }
            None => Box::new(SeededBonus::from_entropy()),
        };
        let session = Session::new(catalog, bonus).with_max_participants(config.max_participants);

        let game_listener = TcpListener::bind(config.game_addr).await?;
        let api_listener = TcpListener::bind(config.api_addr).await?;
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        Ok(Self {
            config,
            arena: Arc::new(Arena::new(session)),
            game_listener,
            api_listener,
            shutdown_tx: Arc::new(shutdown_tx),
            shutdown_rx,
        })
    }

    /// Get the shared arena
    pub fn arena(&self) -> Arc<Arena> {
        self.arena.clone()
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Bound game address (resolves port 0)
    pub fn game_addr(&self) -> Result<SocketAddr> {
        Ok(self.game_listener.local_addr()?)
    }

    /// Bound operator console address
    pub fn api_addr(&self) -> Result<SocketAddr> {
        Ok(self.api_listener.local_addr()?)
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            tx: self.shutdown_tx.clone(),
        }
    }

    /// Run both listeners until shutdown
    pub async fn run(self) -> Result<()> {
        info!("arenad game listener on {}", self.game_addr()?);
        info!("arenad operator console on {}", self.api_addr()?);

        let router = api::router(self.arena.clone());
        let mut api_shutdown = self.shutdown_rx.clone();
        let api_listener = self.api_listener;
        let api = async move {
            axum::serve(api_listener, router)
                .with_graceful_shutdown(async move {
                    api_shutdown.changed().await.ok();
                })
                .await
        };

        let game = transport::serve(self.game_listener, self.arena, self.shutdown_rx);

        let (api_result, ()) = tokio::join!(api, game);
        api_result?;

        info!("arenad shutdown complete");
        Ok(())
    }
}
