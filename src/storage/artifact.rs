//! Serialized dataset artifact
//!
//! The final output of the pipeline: the four split arrays written to a
//! single binary file with bincode.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::dataset::split::TrainTestSplit;
use crate::utils::error::Result;

/// Default artifact filename
pub const DEFAULT_ARTIFACT_PATH: &str = "processed_dataset.bin";

/// The processed dataset: feature rows and one-hot labels, already split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedDataset {
    pub x_train: Vec<Vec<f32>>,
    pub x_test: Vec<Vec<f32>>,
    pub y_train: Vec<Vec<f32>>,
    pub y_test: Vec<Vec<f32>>,
}

impl From<TrainTestSplit> for ProcessedDataset {
    fn from(split: TrainTestSplit) -> Self {
        Self {
            x_train: split.x_train,
            x_test: split.x_test,
            y_train: split.y_train,
            y_test: split.y_test,
        }
    }
}

impl ProcessedDataset {
    /// Write the artifact to disk
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let writer = BufWriter::new(File::create(path)?);
        bincode::serialize_into(writer, self)?;

        info!(
            "Saved processed dataset to {:?} (train: {}, test: {})",
            path,
            self.x_train.len(),
            self.x_test.len()
        );
        Ok(())
    }

    /// Read an artifact back from disk
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path.as_ref())?);
        let dataset = bincode::deserialize_from(reader)?;
        Ok(dataset)
    }
}
