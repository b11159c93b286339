//! Server lifecycle
//!
//! Binds the listener, serves the router, and on SIGINT/SIGTERM stops
//! accepting connections while in-flight requests get a bounded grace
//! period to finish.

use std::future::{Future, IntoFuture};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use crate::api::{create_router, AppState};
use crate::config::Config;

/// Time in-flight requests get after a shutdown signal
pub const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Run the server until a termination signal arrives
pub async fn run(config: Config) -> anyhow::Result<()> {
    if let Some(parent) = config.event_log_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create log directory {}", parent.display())
            })?;
        }
    }

    let bind_addr = config.bind_addr();
    let admin_user = config.admin_username.clone();
    let state = Arc::new(AppState::from_config(config)?);
    let app = create_router(state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", bind_addr))?;
    tracing::info!(addr = %bind_addr, admin_user = %admin_user, "starting server, admin page at /admin");

    serve(listener, app, shutdown_signal(), SHUTDOWN_GRACE).await
}

/// Serve `app` until `signal` resolves, then drain for at most `grace`
pub async fn serve<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    grace: Duration,
) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let draining = Arc::new(Notify::new());
    let notify = Arc::clone(&draining);

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            signal.await;
            tracing::info!("shutdown requested, draining in-flight requests");
            notify.notify_one();
        })
        .into_future();

    let deadline = async {
        draining.notified().await;
        tokio::time::sleep(grace).await;
    };

    tokio::select! {
        result = server => result.context("server error")?,
        _ = deadline => {
            tracing::warn!(grace_secs = grace.as_secs(), "grace period elapsed, forcing shutdown");
        }
    }

    tracing::info!("server stopped");
    Ok(())
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
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
}
