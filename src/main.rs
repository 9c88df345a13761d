// ABOUTME: Entry point for the gatehouse binary.
// ABOUTME: Loads .env, parses CLI arguments, validates configuration, wires dependencies, and serves HTTP.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gatehouse_auth::UpstreamAuthHandler;
use gatehouse_server::{AppState, ServerConfig, create_router};

const DEFAULT_LOG_FILTER: &str = "gatehouse=debug,gatehouse_server=debug,gatehouse_auth=debug,tower_http=debug";

/// HTTP API bootstrap relaying /api/auth/* to an external auth service.
#[derive(Debug, Parser)]
#[command(name = "gatehouse", version, about)]
struct Cli {
    /// Dotenv file loaded before reading the environment. A missing file is ignored.
    #[arg(long, default_value = ".env")]
    env_file: PathBuf,

    /// Listen port, overriding PORT.
    #[arg(long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Load the env file first so RUST_LOG set there takes effect.
    let env_file = dotenvy::from_path(&cli.env_file);

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    match env_file {
        Ok(()) => tracing::debug!(path = %cli.env_file.display(), "loaded environment file"),
        Err(e) if e.not_found() => {
            tracing::debug!(path = %cli.env_file.display(), "no environment file")
        }
        Err(e) => {
            eprintln!("failed to load {}: {}", cli.env_file.display(), e);
            return ExitCode::FAILURE;
        }
    }

    let mut config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("{}", err);
            return ExitCode::FAILURE;
        }
    };
    if let Some(port) = cli.port {
        config.port = port;
    }

    match run(config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = ?err, "gatehouse stopped with an error");
            ExitCode::FAILURE
        }
    }
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!(?config, "gatehouse starting up");

    let auth = UpstreamAuthHandler::new(config.auth_upstream.clone())
        .context("failed to build the auth upstream client")?;
    let state = Arc::new(
        AppState::new(Arc::new(auth)).with_trusted_origins(config.trusted_origins.clone()),
    );
    let app = create_router(state);

    let bind = config.bind();
    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("failed to listen on {}", bind))?;

    tracing::info!(
        address = %config.public_base_url(),
        docs = %format!("{}/docs", config.public_base_url()),
        "gatehouse listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("gatehouse shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "cannot listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
