//! TestClient - line protocol client over raw TCP

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{bail, Result};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::TcpStream;

pub struct TestClient {
    lines: Lines<BufReader<OwnedReadHalf>>,
    write: OwnedWriteHalf,
}

impl TestClient {
    pub async fn connect(addr: SocketAddr) -> Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        let (read, write) = stream.into_split();
        Ok(Self {
            lines: BufReader::new(read).lines(),
            write,
        })
    }

    /// Send one raw line
    pub async fn send(&mut self, line: &str) -> Result<()> {
        self.write.write_all(line.as_bytes()).await?;
        self.write.write_all(b"\n").await?;
        Ok(())
    }

    /// Send `ACTION|name|kind|target|skill`
    pub async fn action(&mut self, name: &str, kind: &str, target: &str, skill: &str) -> Result<()> {
        self.send(&format!("ACTION|{}|{}|{}|{}", name, kind, target, skill))
            .await
    }

    /// Receive the next line
    pub async fn recv_timeout(&mut self, timeout: Duration) -> Result<String> {
        match tokio::time::timeout(timeout, self.lines.next_line()).await {
            Ok(Ok(Some(line))) => Ok(line),
            Ok(Ok(None)) => bail!("Connection closed"),
            Ok(Err(e)) => bail!("Read error: {}", e),
            Err(_) => bail!("Timeout waiting for line"),
        }
    }

    /// Wait for a message with the given tag, returning its fields
    pub async fn expect(&mut self, tag: &str) -> Result<Vec<String>> {
        self.expect_timeout(tag, Duration::from_secs(5)).await
    }

    /// Wait for a message with the given tag with timeout
    pub async fn expect_timeout(&mut self, tag: &str, timeout: Duration) -> Result<Vec<String>> {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                bail!("Timeout waiting for message '{}'", tag);
            }

            let line = self.recv_timeout(remaining).await?;
            let mut fields = line.split('|').map(str::to_string);
            if fields.next().as_deref() == Some(tag) {
                return Ok(fields.collect());
            }
            // Skip messages we aren't waiting for
        }
    }

    /// Collect pending lines until the connection goes quiet
    pub async fn drain(&mut self) -> Vec<String> {
        let mut lines = Vec::new();
        while let Ok(line) = self.recv_timeout(Duration::from_millis(100)).await {
            lines.push(line);
        }
        lines
    }

    /// Close the write half, which the server sees as a disconnect
    pub async fn close(mut self) -> Result<()> {
        self.write.shutdown().await?;
        Ok(())
    }
}
