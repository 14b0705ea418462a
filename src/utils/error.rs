//! Error Handling Module
//!
//! Defines custom error types for the plantsearch pipeline.
//! Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for pipeline operations
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Backend name not in the supported set. This is the one fatal,
    /// non-skippable error in the pipeline.
    #[error("Unsupported backend '{0}' (expected one of: efficientnet, densenet, swin_transformer, dino, clip, resnet)")]
    UnsupportedBackend(String),

    /// Error loading or decoding an image
    #[error("Failed to load image at '{0}': {1}")]
    ImageLoad(PathBuf, String),

    /// Error with dataset operations
    #[error("Dataset error: {0}")]
    Dataset(String),

    /// Error loading or running a pretrained model
    #[error("Model error: {0}")]
    Model(String),

    /// Error talking to the document store
    #[error("Storage error: {0}")]
    Storage(String),

    /// Invalid input to a processing step
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Error resolving a file from the Hugging Face Hub
    #[error("Hub error: {0}")]
    Hub(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl From<tch::TchError> for PipelineError {
    fn from(e: tch::TchError) -> Self {
        PipelineError::Model(e.to_string())
    }
}

impl From<image::ImageError> for PipelineError {
    fn from(e: image::ImageError) -> Self {
        PipelineError::InvalidInput(e.to_string())
    }
}

impl From<mongodb::error::Error> for PipelineError {
    fn from(e: mongodb::error::Error) -> Self {
        PipelineError::Storage(e.to_string())
    }
}

impl From<hf_hub::api::sync::ApiError> for PipelineError {
    fn from(e: hf_hub::api::sync::ApiError) -> Self {
        PipelineError::Hub(e.to_string())
    }
}

impl From<bincode::Error> for PipelineError {
    fn from(e: bincode::Error) -> Self {
        PipelineError::Serialization(e.to_string())
    }
}

/// Convenience Result type for pipeline operations
pub type Result<T> = std::result::Result<T, PipelineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_backend_display() {
        let err = PipelineError::UnsupportedBackend("resnet152".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("resnet152"));
        assert!(msg.contains("efficientnet"));
    }

    #[test]
    fn test_image_load_error_display() {
        let path = PathBuf::from("/data/leaf.jpg");
        let err = PipelineError::ImageLoad(path, "truncated file".to_string());
        assert!(format!("{}", err).contains("leaf.jpg"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: PipelineError = io.into();
        assert!(matches!(err, PipelineError::Io(_)));
    }
}
