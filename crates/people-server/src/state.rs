//! Shared application state.

use people_core::{RequestContext, Result, ServiceConfig};
use people_runtime::orchestrator::HttpOrchestrator;
use people_store::SqliteStore;
use tokio_util::sync::CancellationToken;

/// Shared application state accessible from all route handlers.
pub struct AppState {
    pub config: ServiceConfig,
    pub store: SqliteStore,
    pub orchestrator: HttpOrchestrator,
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(config: ServiceConfig, store: SqliteStore, orchestrator: HttpOrchestrator) -> Self {
        Self {
            config,
            store,
            orchestrator,
            shutdown: CancellationToken::new(),
        }
    }

    /// Open the store and wire the prediction clients described by `config`.
    pub fn from_config(config: ServiceConfig) -> Result<Self> {
        let store = SqliteStore::open(&config.database_path)?;
        let orchestrator = HttpOrchestrator::from_urls(reqwest::Client::new(), &config.predictors);
        Ok(Self::new(config, store, orchestrator))
    }

    /// Root token; cancelling it aborts every in-flight request context.
    pub fn shutdown_token(&self) -> CancellationToken {
        self.shutdown.clone()
    }

    /// Fresh context for one request.
    pub fn request_context(&self) -> RequestContext {
        RequestContext::child_of(&self.shutdown)
    }
}
