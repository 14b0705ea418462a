//! Pretrained vision backbones for feature extraction
//!
//! This module provides functionality for:
//! - Selecting a pretrained backbone by name (`Backend`)
//! - Backend-specific preprocessing (resize + normalization)
//! - Running a no-grad forward pass to obtain feature tensors
//!
//! All model numerics live in TorchScript modules executed through libtorch;
//! this crate only dispatches between them and reconciles their differing
//! input/output conventions.

pub mod backend;
pub mod extractor;
pub mod preprocess;
pub mod source;

// Re-export main types for convenience
pub use backend::{Backend, Normalization};
pub use extractor::FeatureExtractor;
pub use preprocess::{EncodedInputs, Preprocessed};
pub use source::ModelConfig;

/// Input edge length expected by every supported backbone
pub const MODEL_INPUT_SIZE: u32 = 224;
