use std::{future::IntoFuture, time::Duration};

use anyhow::Context;
use tokio::{net::TcpListener, sync::watch};
use tracing_subscriber::EnvFilter;

use purchase_order_server::{AppState, app, config::Config, db, session};

const SESSION_CLEANUP_PERIOD: Duration = Duration::from_secs(60 * 60);
const POOL_CLOSE_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("purchase_order_server=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env().context("invalid configuration")?;
    let addr = config.server_addr();
    let grace = config.shutdown_grace;

    let pool = db::init_db_pool(&config).await?;
    let state = AppState::initialize(config, pool.clone()).await?;
    let cleanup = session::spawn_expired_session_cleanup(state.sessions.clone(), SESSION_CLEANUP_PERIOD);

    tracing::info!(environment = %state.config.environment, "Starting server on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    let (stop_tx, mut stop_rx) = watch::channel(false);
    let server = axum::serve(listener, app(state))
        .with_graceful_shutdown(async move {
            let _ = stop_rx.changed().await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => result?,
        () = shutdown_signal() => {
            tracing::info!("Shutting down gracefully...");
            let _ = stop_tx.send(true);
            match tokio::time::timeout(grace, &mut server).await {
                Ok(result) => result?,
                Err(_) => tracing::warn!(?grace, "In-flight requests still running after grace period"),
            }
        }
    }

    cleanup.abort();
    if !db::close_pool(&pool, POOL_CLOSE_TIMEOUT).await {
        tracing::warn!("Database connections still in use; exiting without waiting");
    }
    tracing::info!("Server closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "failed to listen for ctrl-c");
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
                tracing::error!(%error, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
