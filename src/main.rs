//! RUPX faucet server binary.

use anyhow::Context;
use clap::Parser;
use rupx_faucet::FaucetConfig;
use rupx_faucet::bootstrap::build_router;
use std::net::SocketAddr;
use std::path::PathBuf;
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// RUPX test-network faucet.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// `.env` file to load before reading the environment
    #[arg(long)]
    env_file: Option<PathBuf>,

    /// Listen address (overrides FAUCET_LISTEN_ADDR)
    #[arg(long)]
    listen: Option<SocketAddr>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

async fn shutdown_signal() {
    if let Err(e) = signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let dotenv = match &args.env_file {
        Some(path) => dotenvy::from_path(path)
            .with_context(|| format!("loading {}", path.display()))
            .map(|()| Some(path.clone())),
        None => Ok(dotenvy::dotenv().ok()),
    }?;

    init_tracing();
    if let Some(path) = dotenv {
        info!(path = %path.display(), "Loaded environment file");
    }

    let mut config = FaucetConfig::from_env()?;
    if let Some(listen) = args.listen {
        config.listen_addr = listen;
    }

    info!(
        version = env!("CARGO_PKG_VERSION"),
        rpc_url = %config.rpc_url,
        faucet_address = %config.faucet_address,
        amount_wei = config.amount_wei,
        cooldown_secs = config.cooldown.as_secs(),
        "Starting RUPX faucet"
    );

    let router = build_router(&config).await?;

    let listener = TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    info!(addr = %config.listen_addr, "Listening");

    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await
    .context("server error")?;

    info!("Faucet stopped");
    Ok(())
}
