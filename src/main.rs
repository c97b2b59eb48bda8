//! linebookd - Coloring book page generation daemon

use std::net::SocketAddr;

use anyhow::Result;
use clap::Parser;
use linebookd::{Config, Server};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Coloring book page generation daemon
#[derive(Parser, Debug)]
#[command(name = "linebookd", version, about = "Generate coloring book pages")]
struct Args {
    /// Address to listen on
    #[arg(short, long, default_value = "127.0.0.1:8080")]
    bind: SocketAddr,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linebookd=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();
    let config = Config {
        bind_addr: args.bind,
    };

    let server = Server::new(config);
    server.run().await?;

    Ok(())
}
