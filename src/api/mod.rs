//! HTTP surface for the consolidation pipeline.
//! Rows travel as JSON arrays of cells; column meaning is positional.

pub mod handlers;
pub mod response;
pub mod state;

use std::future::IntoFuture;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::DefaultBodyLimit;
use axum::routing::{delete, get, post};
use axum::Router;
use tokio::time::Duration;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::platform::blocking::run_blocking;
use state::{open_store, AppState};

pub fn router(state: Arc<AppState>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/healthz", get(handlers::healthz))
        .route("/data", get(handlers::get_data))
        .route("/count", get(handlers::get_count))
        .route("/search", get(handlers::search))
        .route("/filter", get(handlers::filter))
        .route("/uploads", get(handlers::list_uploads))
        .route("/upload-multiple", post(handlers::upload_multiple))
        .route("/delete-all", delete(handlers::delete_all))
        .route("/export", get(handlers::export_all))
        .route("/export-filtered", post(handlers::export_filtered))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .try_init();
}

pub async fn serve(config: AppConfig) -> Result<()> {
    let store = config.store.clone();
    let repo = run_blocking(move || open_store(&store)).await??;
    let state = Arc::new(AppState::new(repo, config.limits));
    let app = router(state.clone(), config.max_body_bytes);

    let listener = tokio::net::TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("failed to bind {}", config.bind))?;
    tracing::info!(bind = %config.bind, "meter consolidator listening");

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
    let server = axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        })
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => {
            result.context("server failed")?;
        }
        _ = shutdown_signal() => {
            tracing::info!("shutting down");
            let _ = shutdown_tx.send(());
            tokio::time::timeout(Duration::from_secs(10), &mut server)
                .await
                .context("server shutdown timed out")?
                .context("server failed")?;
        }
    }

    let repo = state.repo.clone();
    let rows = run_blocking(move || repo.count()).await??;
    tracing::info!(rows, "store closed");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };
    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };
    #[cfg(unix)]
    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
    #[cfg(not(unix))]
    ctrl_c.await;
}
