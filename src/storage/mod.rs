//! Persistence: MongoDB document store and the serialized dataset artifact.

pub mod artifact;
pub mod mongo;

pub use artifact::ProcessedDataset;
pub use mongo::{ImageDocument, ImageStore};
