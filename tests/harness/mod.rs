//! Integration Test Harness
//!
//! - `TestServer` - Runs an in-process arenad on random ports
//! - `TestClient` - Line protocol client over raw TCP
//!
//! # Example
//!
//! ```rust,ignore
//! use harness::TestServer;
//!
//! #[tokio::test]
//! async fn test_join() {
//!     let server = TestServer::start().await.unwrap();
//!
//!     let mut alice = server.join("alice", "Mage").await.unwrap();
//!     let lobby = alice.expect("LOBBY_UPDATE").await.unwrap();
//!     assert_eq!(lobby, vec!["alice,Mage"]);
//! }
//! ```

mod client;
mod server;

pub use client::TestClient;
pub use server::TestServer;
