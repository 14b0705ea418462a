//! Dataset module for plant species data handling
//!
//! This module provides functionality for:
//! - Loading the plant species dataset from disk (class-per-directory layout)
//! - Fetching the dataset repository from the Hugging Face Hub
//! - Basic preprocessing (resize + scale) and data augmentation
//! - One-hot label encoding
//! - Deterministic train/test splitting

pub mod augmentation;
pub mod encode;
pub mod hub;
pub mod loader;
pub mod preprocess;
pub mod split;

// Re-export main types for convenience
pub use augmentation::{AugmentationConfig, Augmenter};
pub use encode::one_hot;
pub use loader::{DatasetStats, ImageSample, PlantDataset};
pub use preprocess::{preprocess_basic, ProcessedImage};
pub use split::{SplitConfig, TrainTestSplit};

/// Default fraction of samples held out for testing
pub const DEFAULT_TEST_FRACTION: f64 = 0.2;

/// Default seed for reproducible shuffling and splitting
pub const DEFAULT_SEED: u64 = 42;
