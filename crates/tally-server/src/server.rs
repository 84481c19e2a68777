use std::sync::Arc;

use tally_engine::Roster;
use tally_store::{open_store, DocumentStore};
use tokio::net::TcpListener;

use crate::config::TallyConfig;
use crate::error::{ServerError, ServerResult};
use crate::handler::SharedRoster;
use crate::router::{build_router, build_traced_router};

/// Tally HTTP server.
pub struct TallyServer {
    config: TallyConfig,
    roster: SharedRoster,
}

impl TallyServer {
    /// Open the configured store and build the server.
    pub fn new(config: TallyConfig) -> ServerResult<Self> {
        let store = open_store(&config.storage)?;
        Ok(Self::with_store(config, store))
    }

    /// Build the server over an already-open store.
    pub fn with_store(config: TallyConfig, store: Box<dyn DocumentStore>) -> Self {
        let roster = Arc::new(Roster::new(store, config.policy.clone()));
        Self { config, roster }
    }

    pub fn config(&self) -> &TallyConfig {
        &self.config
    }

    pub fn roster(&self) -> &SharedRoster {
        &self.roster
    }

    /// Build the router (useful for testing).
    pub fn router(&self) -> axum::Router {
        if self.config.server.trace_requests {
            build_traced_router(Arc::clone(&self.roster))
        } else {
            build_router(Arc::clone(&self.roster))
        }
    }

    /// Start serving requests.
    pub async fn serve(self) -> ServerResult<()> {
        let app = self.router();
        let listener = TcpListener::bind(&self.config.server.bind_addr).await?;
        tracing::info!(
            addr = %self.config.server.bind_addr,
            store = %self.roster.store().describe(),
            "tally server listening"
        );
        if self.roster.store().is_read_only() {
            tracing::warn!("store is read-only; mutations will not be persisted");
        }
        axum::serve(listener, app)
            .await
            .map_err(|e| ServerError::Internal(e.to_string()))
    }
}
