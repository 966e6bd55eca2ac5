//! HTTP server assembly: router, middleware, listener, shutdown.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::config::ServerConfig;
use crate::contacts::{ContactRepository, contact_routes};
use crate::error::Result;
use crate::store::{ContactStore, LibSqlBackend};

/// Contact routes wrapped in CORS (any origin) and request tracing.
pub fn app(store: Arc<dyn ContactStore>) -> Router {
    contact_routes(ContactRepository::new(store))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Serve `app` on `listener` until `shutdown` resolves.
pub async fn serve<F>(listener: TcpListener, app: Router, shutdown: F) -> Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;
    Ok(())
}

/// Open the store, bind the listener, and serve until Ctrl-C or SIGTERM.
pub async fn run(config: ServerConfig) -> Result<()> {
    let store: Arc<dyn ContactStore> = Arc::new(LibSqlBackend::open(&config.store).await?);
    info!(store = %config.store.describe(), "Contact store ready");

    let addr = config.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!(%addr, "Server is running");

    serve(listener, app(store), shutdown_signal()).await?;
    info!("Server stopped");
    Ok(())
}

/// Resolves on the first Ctrl-C or, on Unix, SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::warn!(error = %e, "Failed to listen for SIGTERM");
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
    info!("Shutdown signal received");
}
