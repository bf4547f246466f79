//! Shared application state

use anyhow::Result;
use commentlens_classifiers::{FusionOrchestrator, PerspectiveClient, ToxicityService};
use commentlens_store::{CommentStore, MemoryCommentStore, RestCommentStore};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tracing::{info, warn};

use crate::batch::BatchCoordinator;
use crate::config::ServiceConfig;

/// Application state shared across all requests
#[derive(Clone)]
pub struct AppState {
    /// Loaded configuration
    pub config: Arc<ServiceConfig>,

    /// Batch coordinator, which owns the fusion orchestrator and the store
    pub coordinator: BatchCoordinator,

    /// Prometheus metrics handle for rendering
    pub metrics_handle: PrometheusHandle,
}

impl AppState {
    /// Initialize application state from configuration
    pub fn new(config: ServiceConfig, metrics_handle: PrometheusHandle) -> Result<Self> {
        info!("Initializing application state");

        let perspective: Arc<dyn ToxicityService> =
            Arc::new(PerspectiveClient::new(config.perspective.clone())?);
        let fusion = FusionOrchestrator::new(perspective)?;
        let store = Self::build_store(&config)?;

        Ok(Self::from_parts(config, fusion, store, metrics_handle))
    }

    /// Assemble state from already-built components
    pub fn from_parts(
        config: ServiceConfig,
        fusion: FusionOrchestrator,
        store: Arc<dyn CommentStore>,
        metrics_handle: PrometheusHandle,
    ) -> Self {
        let fusion = fusion.with_max_themes(config.analysis.max_themes);
        let coordinator = BatchCoordinator::new(fusion, store)
            .with_sync_limit(config.analysis.sync_batch_limit);

        Self {
            config: Arc::new(config),
            coordinator,
            metrics_handle,
        }
    }

    fn build_store(config: &ServiceConfig) -> Result<Arc<dyn CommentStore>> {
        if config.store.is_configured() {
            Ok(Arc::new(RestCommentStore::new(config.store.clone())?))
        } else {
            warn!("Store URL or service role key missing, using in-memory comment store");
            Ok(Arc::new(MemoryCommentStore::new()))
        }
    }

    pub fn fusion(&self) -> &FusionOrchestrator {
        self.coordinator.fusion()
    }

    pub fn store(&self) -> &dyn CommentStore {
        self.coordinator.store()
    }
}
