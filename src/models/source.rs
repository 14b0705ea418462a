//! Model weight resolution
//!
//! Scripted backbone modules are resolved either from a local weights
//! directory or from the Hugging Face Hub. Hub downloads happen once and are
//! cached by `hf-hub` afterwards.

use std::path::PathBuf;

use hf_hub::api::sync::Api;
use tch::Device;
use tracing::info;

use super::backend::Backend;
use crate::utils::error::{PipelineError, Result};

/// Default Hub repository holding the exported TorchScript backbones
pub const DEFAULT_HUB_REPO: &str = "plantsearch/vision-backbones";

/// Configuration for model loading
#[derive(Debug, Clone)]
pub struct ModelConfig {
    /// Local directory containing the scripted modules. Takes precedence
    /// over the Hub when set.
    pub weights_dir: Option<PathBuf>,
    /// Hub repository to pull scripted modules from
    pub hub_repo: String,
    /// Device to load the model on
    pub device: Device,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            weights_dir: None,
            hub_repo: DEFAULT_HUB_REPO.to_string(),
            device: Device::Cpu,
        }
    }
}

impl ModelConfig {
    /// Use a local weights directory instead of the Hub
    pub fn with_weights_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.weights_dir = Some(dir.into());
        self
    }

    /// Use a different Hub repository
    pub fn with_hub_repo(mut self, repo: &str) -> Self {
        self.hub_repo = repo.to_string();
        self
    }
}

/// Resolve the scripted module file for a backend.
///
/// Local directory first when configured; otherwise the Hub, which downloads
/// the file on first use and serves the cached copy afterwards.
pub fn resolve(backend: Backend, config: &ModelConfig) -> Result<PathBuf> {
    let filename = backend.weights_filename();

    if let Some(dir) = &config.weights_dir {
        let path = dir.join(filename);
        if !path.exists() {
            return Err(PipelineError::Model(format!(
                "Weights for '{}' not found at {:?}",
                backend, path
            )));
        }
        return Ok(path);
    }

    info!(
        "Resolving '{}' weights from hub repo '{}' (first use downloads, then cached)",
        backend, config.hub_repo
    );
    let api = Api::new()?;
    let path = api.model(config.hub_repo.clone()).get(filename)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ModelConfig::default();
        assert!(config.weights_dir.is_none());
        assert_eq!(config.hub_repo, DEFAULT_HUB_REPO);
        assert_eq!(config.device, Device::Cpu);
    }

    #[test]
    fn test_missing_local_weights_is_model_error() {
        let config = ModelConfig::default().with_weights_dir("/nonexistent/weights");
        let err = resolve(Backend::Dino, &config).unwrap_err();
        assert!(matches!(err, PipelineError::Model(_)));
    }

    #[test]
    fn test_weights_filenames_are_distinct() {
        let mut names: Vec<_> = Backend::ALL.iter().map(|b| b.weights_filename()).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Backend::ALL.len());
    }
}
