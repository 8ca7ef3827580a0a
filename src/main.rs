//! arenad - turn-based arena battle server

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Result;
use arenad::config::Overrides;
use arenad::{Config, Server};
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "arenad")]
#[command(about = "Turn-based arena battle server")]
struct Args {
    /// Config file (default: arenad.toml if present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Game protocol listen address
    #[arg(long)]
    game_addr: Option<SocketAddr>,

    /// Operator console listen address
    #[arg(long)]
    api_addr: Option<SocketAddr>,

    /// Seed for reproducible matches
    #[arg(long)]
    seed: Option<u64>,

    /// Emit logs as JSON
    #[arg(long)]
    log_json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "arenad=info,tower_http=debug".into());
    if args.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let overrides = Overrides {
        game_addr: args.game_addr,
        api_addr: args.api_addr,
        seed: args.seed,
    };
    let config = Config::load(args.config.as_deref(), overrides)?;

    let server = Server::bind(config).await?;
    let shutdown = server.shutdown_handle();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Received Ctrl-C, shutting down");
            shutdown.shutdown();
        }
    });

    server.run().await?;

    Ok(())
}
