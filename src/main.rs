//! docmerge server binary
//!
//! Configuration comes from the environment (a `.env` file is loaded first),
//! with `--port` and `--bind` taking precedence.

use clap::Parser;
use docmerge::{Config, MergeService, api};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Fetch remote PDF documents concurrently and serve them merged.
#[derive(Parser, Debug)]
#[command(name = "docmerge", version, about)]
struct Cli {
    /// Port to listen on (overrides PORT)
    #[arg(short, long)]
    port: Option<u16>,

    /// Full address to listen on (overrides --port and PORT)
    #[arg(long, env = "DOCMERGE_BIND_ADDRESS")]
    bind: Option<SocketAddr>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // A missing .env file is fine; the process environment still applies.
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    if let Ok(path) = dotenv {
        tracing::debug!(path = %path.display(), "Loaded environment file");
    }

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(port) = cli.port {
        config.server.api.bind_address.set_port(port);
    }
    if let Some(bind) = cli.bind {
        config.server.api.bind_address = bind;
    }

    match &config.report.base_url {
        Some(base_url) => tracing::info!(base_url = %base_url, "Report merging enabled"),
        None => tracing::warn!("BASE_URL is not set, GET /report/:id will answer 503"),
    }

    let config = Arc::new(config);
    let service = Arc::new(MergeService::new((*config).clone())?);

    api::run_until_signal(service, config).await?;
    Ok(())
}
