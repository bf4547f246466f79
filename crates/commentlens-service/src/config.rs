//! Service configuration
//!
//! Loaded from a YAML file when present, then overridden by command line
//! flags and their environment fallbacks.

use crate::batch::DEFAULT_SYNC_BATCH_LIMIT;
use crate::cli::Cli;
use commentlens_classifiers::config::DEFAULT_MAX_THEMES;
use commentlens_classifiers::PerspectiveConfig;
use commentlens_core::{Error, Result};
use commentlens_store::StoreConfig;
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ServiceConfig {
    /// External toxicity service
    #[serde(default)]
    pub perspective: PerspectiveConfig,

    /// Comment store; the in-memory store is used when unconfigured
    #[serde(default)]
    pub store: StoreConfig,

    #[serde(default)]
    pub analysis: AnalysisConfig,
}

impl ServiceConfig {
    /// Load configuration from file and CLI overrides
    pub fn load(config_path: &str, cli: &Cli) -> anyhow::Result<Self> {
        let mut config = if Path::new(config_path).exists() {
            let content = std::fs::read_to_string(config_path)?;
            Self::from_yaml(&content)?
        } else {
            Self::default()
        };

        config.apply_overrides(cli);
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        serde_yaml::from_str(content).map_err(|e| Error::config(format!("Invalid config: {e}")))
    }

    /// Flags and environment take precedence over the file
    pub fn apply_overrides(&mut self, cli: &Cli) {
        if let Some(key) = &cli.perspective_api_key {
            self.perspective.api_key = Some(key.clone());
        }

        if let Some(url) = &cli.store_url {
            self.store.url = Some(url.clone());
        }

        if let Some(key) = &cli.store_key {
            self.store.service_key = Some(key.clone());
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.analysis.max_themes == 0 {
            return Err(Error::config("analysis.max_themes must be at least 1"));
        }
        if self.perspective.timeout_secs == 0 {
            return Err(Error::config("perspective.timeout_secs must be at least 1"));
        }
        Ok(())
    }
}

/// Analysis tuning
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Themes kept per comment
    #[serde(default = "default_max_themes")]
    pub max_themes: usize,

    /// Batches larger than this are processed in the background
    #[serde(default = "default_sync_batch_limit")]
    pub sync_batch_limit: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_themes: default_max_themes(),
            sync_batch_limit: default_sync_batch_limit(),
        }
    }
}

fn default_max_themes() -> usize {
    DEFAULT_MAX_THEMES
}

fn default_sync_batch_limit() -> usize {
    DEFAULT_SYNC_BATCH_LIMIT
}
