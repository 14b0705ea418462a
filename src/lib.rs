//! # plantsearch
//!
//! A data pipeline for a plant-species visual-search system: it loads a
//! plant image dataset, applies preprocessing and augmentation, extracts
//! features through pretrained vision backbones (EfficientNet, DenseNet,
//! Swin Transformer, DINO, CLIP, ResNet), optionally persists records to
//! MongoDB and produces a deterministic train/test split.
//!
//! Pretrained models are opaque TorchScript modules executed through
//! libtorch; this crate dispatches between them by name and reconciles
//! their differing input/output conventions.
//!
//! ## Modules
//!
//! - `dataset`: Loading, preprocessing, augmentation, encoding and splitting
//! - `models`: Backend dispatch and pretrained feature extraction
//! - `storage`: MongoDB document store and the serialized artifact
//! - `pipeline`: Sequential end-to-end orchestration
//! - `utils`: Logging and error types
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use plantsearch::models::{Backend, FeatureExtractor, ModelConfig};
//!
//! let extractor = FeatureExtractor::from_name("efficientnet", &ModelConfig::default())?;
//! let image = image::open("leaf.jpg")?;
//! let features = extractor.extract_features(&image)?;
//! ```

pub mod dataset;
pub mod models;
pub mod pipeline;
pub mod storage;
pub mod utils;

// Re-export commonly used items for convenience
pub use dataset::augmentation::{AugmentationConfig, Augmenter};
pub use dataset::loader::{ImageSample, PlantDataset};
pub use dataset::split::{SplitConfig, TrainTestSplit};
pub use models::{Backend, FeatureExtractor, ModelConfig, MODEL_INPUT_SIZE};
pub use pipeline::{Pipeline, PipelineConfig, PipelineReport};
pub use storage::{ImageDocument, ImageStore, ProcessedDataset};
pub use utils::error::{PipelineError, Result};
