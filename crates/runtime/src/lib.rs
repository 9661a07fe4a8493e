//! Process-level plumbing shared by the OffRamp binaries: tracing setup,
//! service wiring and the HTTP server loop.

use anyhow::{Context, Result};
use offramp_config::AppConfig;
use offramp_gateway::{create_router, GatewayState};
use sqlx::SqlitePool;
use tokio::net::TcpListener;
use tracing::info;

pub mod telemetry {
    use anyhow::Result;
    use tracing::Level;
    use tracing_subscriber::{fmt::SubscriberBuilder, EnvFilter};

    /// Install the global subscriber; `RUST_LOG` overrides the `info` default.
    pub fn init_tracing() -> Result<()> {
        let env_filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        let subscriber = SubscriberBuilder::default()
            .with_max_level(Level::INFO)
            .with_env_filter(env_filter)
            .finish();

        tracing::subscriber::set_global_default(subscriber)
            .map_err(|error| anyhow::anyhow!("failed to set tracing subscriber: {error}"))
    }
}

/// Everything a command needs once configuration is loaded.
#[derive(Clone)]
pub struct BackendServices {
    pub db_pool: SqlitePool,
    pub state: GatewayState,
}

impl BackendServices {
    /// Open the database, run migrations and build the gateway services.
    pub async fn initialise(config: &AppConfig) -> Result<Self> {
        let state = GatewayState::from_config(config)
            .await
            .context("failed to build gateway state")?;

        info!(
            auth = state.auth_service.is_configured(),
            veganswap = state.veganswap.is_configured(),
            openrouter = state.openrouter.is_configured(),
            dishes = state.catalog.dishes().len(),
            "backend services ready"
        );

        Ok(Self {
            db_pool: state.pool.clone(),
            state,
        })
    }
}

/// Serve the HTTP API on `http.address:http.port` until a shutdown signal arrives.
pub async fn serve(config: &AppConfig, services: BackendServices) -> Result<()> {
    let address = format!("{}:{}", config.http.address, config.http.port);
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind http listener on {address}"))?;

    info!(%address, "http server listening");

    axum::serve(listener, create_router(services.state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("http server error")?;

    info!("backend shut down");
    Ok(())
}

/// Resolves on ctrl-c, or SIGTERM on unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::warn!(?error, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::warn!(?error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => info!("ctrl-c received, shutting down"),
        _ = terminate => info!("SIGTERM received, shutting down"),
    }
}
