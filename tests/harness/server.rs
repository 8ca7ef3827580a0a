//! TestServer - in-process end-to-end harness
//!
//! Binds both listeners on port 0 so parallel tests never collide, and
//! runs the server on the test's runtime.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use arenad::arena::Arena;
use arenad::{Config, Server, ShutdownHandle};
use reqwest::Client;
use tokio::task::JoinHandle;

use super::client::TestClient;

/// Seed used unless a test asks for another
pub const TEST_SEED: u64 = 7;

pub struct TestServer {
    pub game_addr: SocketAddr,
    pub api_addr: SocketAddr,
    pub client: Client,
    arena: Arc<Arena>,
    shutdown: ShutdownHandle,
    task: Option<JoinHandle<Result<()>>>,
}

impl TestServer {
    /// Start a server with default limits and a fixed seed
    pub async fn start() -> Result<Self> {
        Self::start_with(|_| {}).await
    }

    /// Start a server after adjusting the config
    pub async fn start_with(adjust: impl FnOnce(&mut Config)) -> Result<Self> {
        let mut config = Config {
            game_addr: "127.0.0.1:0".parse()?,
            api_addr: "127.0.0.1:0".parse()?,
            seed: Some(TEST_SEED),
            ..Config::default()
        };
        adjust(&mut config);

        let server = Server::bind(config).await?;
        let game_addr = server.game_addr()?;
        let api_addr = server.api_addr()?;
        let arena = server.arena();
        let shutdown = server.shutdown_handle();
        let task = Some(tokio::spawn(server.run()));

        let client = Client::builder().timeout(Duration::from_secs(5)).build()?;

        Ok(Self {
            game_addr,
            api_addr,
            client,
            arena,
            shutdown,
            task,
        })
    }

    /// Direct access to the shared arena
    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.api_addr)
    }

    /// GET an operator endpoint
    pub async fn get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .get(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// POST an operator endpoint with no body
    pub async fn post(&self, path: &str) -> Result<reqwest::Response> {
        Ok(self
            .client
            .post(format!("{}{}", self.base_url(), path))
            .send()
            .await?)
    }

    /// Start the match through the operator console
    pub async fn start_match(&self) -> Result<serde_json::Value> {
        let resp = self.post("/session/start").await?;
        anyhow::ensure!(resp.status().is_success(), "start failed: {}", resp.status());
        Ok(resp.json().await?)
    }

    /// Open a game connection without joining
    pub async fn connect(&self) -> Result<TestClient> {
        TestClient::connect(self.game_addr).await
    }

    /// Connect and join, consuming the `JOIN_SUCCESS` reply
    pub async fn join(&self, name: &str, archetype: &str) -> Result<TestClient> {
        let mut client = self.connect().await?;
        client.send(&format!("JOIN|{}|{}", name, archetype)).await?;
        client.expect("JOIN_SUCCESS").await?;
        Ok(client)
    }

    /// Join everyone, start the match, and consume the start messages
    pub async fn start_battle(&self, members: &[(&str, &str)]) -> Result<Vec<TestClient>> {
        let mut clients = Vec::new();
        for (name, archetype) in members {
            clients.push(self.join(name, archetype).await?);
        }
        self.start_match().await?;
        for client in &mut clients {
            client.expect("START_TURN").await?;
        }
        Ok(clients)
    }

    /// Stop the server and wait for it to exit
    pub async fn stop(mut self) -> Result<()> {
        self.shutdown.shutdown();
        if let Some(task) = self.task.take() {
            task.await??;
        }
        Ok(())
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.shutdown();
    }
}
