use std::net::SocketAddr;

use anyhow::Context;
use clap::Parser;
use tech_directory::app::{router, AppState};
use tech_directory::config::AppConfig;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "tech-directory")]
#[command(about = "Technician directory - roster search behind a session gate")]
#[command(version)]
struct Args {
    #[arg(long, env = "PORT", default_value_t = 3000, help = "Port to listen on")]
    port: u16,

    #[arg(long, env = "BIND_ADDR", default_value = "0.0.0.0", help = "Address to bind")]
    bind: std::net::IpAddr,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATASTORE_URL and the keys
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("tech_directory=info,tower_http=info")),
        )
        .init();

    let args = Args::parse();

    let config = AppConfig::from_env().context("invalid configuration")?;
    tracing::info!("Starting technician directory in {:?} mode", config.environment);

    let state = AppState::from_config(config).context("failed to initialize service clients")?;
    let app = router(state);

    let addr = SocketAddr::new(args.bind, args.port);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;

    tracing::info!("Technician directory listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("Shutdown signal received");
}
