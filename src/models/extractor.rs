//! Feature extraction through a loaded backbone
//!
//! `FeatureExtractor` is the stateful dispatcher: it owns one loaded
//! TorchScript module and produces feature tensors for images. The backend
//! name is validated before any weight file is resolved, so an unsupported
//! name never triggers a download.

use image::DynamicImage;
use tch::{CModule, Tensor};
use tracing::{debug, info};

use super::backend::Backend;
use super::preprocess::{preprocess, Preprocessed};
use super::source::{self, ModelConfig};
use crate::utils::error::Result;

/// Stateful feature extractor for one pretrained backbone
#[derive(Debug)]
pub struct FeatureExtractor {
    backend: Backend,
    module: CModule,
}

impl FeatureExtractor {
    /// Load the backbone for `backend` and put it in evaluation mode.
    ///
    /// The load is one-time and potentially slow: the scripted module may
    /// be downloaded from the Hub on first use.
    pub fn new(backend: Backend, config: &ModelConfig) -> Result<Self> {
        let path = source::resolve(backend, config)?;
        info!("Loading '{}' from {:?}", backend, path);

        let mut module = CModule::load_on_device(&path, config.device)?;
        module.set_eval();

        Ok(Self { backend, module })
    }

    /// Parse a backend name and load the corresponding backbone.
    ///
    /// The name check happens first, so `resnet152` fails before any
    /// model I/O is attempted.
    pub fn from_name(name: &str, config: &ModelConfig) -> Result<Self> {
        let backend = Backend::parse(name)?;
        Self::new(backend, config)
    }

    /// The backend this extractor dispatches to
    pub fn backend(&self) -> Backend {
        self.backend
    }

    /// Resize and normalize an image into the backend-specific input
    /// representation.
    pub fn preprocess(&self, image: &DynamicImage) -> Result<Preprocessed> {
        preprocess(self.backend, image)
    }

    /// Run preprocessing and a no-grad forward pass.
    ///
    /// - Convolutional backends return the raw rank-4 feature map with a
    ///   batch dimension of 1.
    /// - Transformer backends return the last hidden state.
    /// - CLIP computes its image-tower features under an additional no-grad
    ///   scope and returns the pooled embedding.
    pub fn extract_features(&self, image: &DynamicImage) -> Result<Tensor> {
        let preprocessed = self.preprocess(image)?;

        let output = match preprocessed {
            Preprocessed::Dense(tensor) => {
                let batched = tensor.unsqueeze(0);
                tch::no_grad(|| self.module.forward_ts(&[batched]))?
            }
            Preprocessed::Bundle(inputs) => {
                if self.backend == Backend::Clip {
                    tch::no_grad(|| {
                        self.module
                            .method_ts("get_image_features", &[inputs.pixel_values])
                    })?
                } else {
                    tch::no_grad(|| self.module.forward_ts(&[inputs.pixel_values]))?
                }
            }
        };

        debug!("'{}' produced features with shape {:?}", self.backend, output.size());
        Ok(output)
    }

    /// Flatten a feature tensor into a plain vector for storage
    pub fn features_to_vec(features: &Tensor) -> Result<Vec<f32>> {
        let flat = features.flatten(0, -1).to_kind(tch::Kind::Float);
        Vec::<f32>::try_from(&flat).map_err(Into::into)
    }
}
