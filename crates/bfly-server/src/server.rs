use std::sync::Arc;

use bfly_store::JsonFileStore;
use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::error::ServerResult;
use crate::router::build_router;
use crate::state::AppState;

/// Butterfly API server.
pub struct ButterflyServer {
    config: ServerConfig,
    state: AppState,
}

impl ButterflyServer {
    /// Load the store named by `config`.
    ///
    /// Fails if the store file is malformed; the server must not start
    /// without a valid store.
    pub fn open(config: ServerConfig) -> ServerResult<Self> {
        let store = JsonFileStore::open(&config.db_path)?;
        Ok(Self::with_state(config, AppState::with_store(Arc::new(store))))
    }

    pub fn with_state(config: ServerConfig, state: AppState) -> Self {
        Self { config, state }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        build_router(self.state.clone())
    }

    /// Serve requests until Ctrl-C.
    pub async fn serve(self) -> ServerResult<()> {
        let app = build_router(self.state);
        let listener = TcpListener::bind(&self.config.bind_addr).await?;
        tracing::info!(
            "Butterfly API started at http://{}",
            listener.local_addr()?
        );
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        tracing::info!("Butterfly API stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
}
