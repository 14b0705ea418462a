//! End-to-end pipeline orchestration
//!
//! Runs the processing steps sequentially over the whole dataset:
//! decode, augment, preprocess, encode, extract features, optionally persist
//! to MongoDB, then split and save the artifact. Every per-sample step is
//! best-effort: failures are logged and the sample is skipped. The only
//! fatal configuration error is an unsupported backend name, raised before
//! any data is touched.

use std::path::PathBuf;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};

use crate::dataset::augmentation::Augmenter;
use crate::dataset::encode::one_hot;
use crate::dataset::loader::{ImageSample, PlantDataset};
use crate::dataset::preprocess::preprocess_basic;
use crate::dataset::split::{SplitConfig, TrainTestSplit};
use crate::dataset::DEFAULT_SEED;
use crate::models::{Backend, FeatureExtractor, ModelConfig};
use crate::storage::artifact::{ProcessedDataset, DEFAULT_ARTIFACT_PATH};
use crate::storage::mongo::{ImageDocument, ImageStore};
use crate::utils::error::Result;
use crate::utils::logging::ProgressLogger;

/// Configuration for a full pipeline run
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Root directory of the dataset (class-per-directory layout)
    pub data_dir: PathBuf,
    /// Backbone used for feature extraction
    pub backend: Backend,
    /// Model loading configuration
    pub model: ModelConfig,
    /// Apply random augmentation before preprocessing
    pub augment: bool,
    /// Train/test split configuration
    pub split: SplitConfig,
    /// MongoDB connection string; `None` disables persistence
    pub mongo_uri: Option<String>,
    /// Output path for the serialized dataset artifact
    pub artifact_path: PathBuf,
    /// Seed for the augmentation RNG
    pub seed: u64,
}

impl PipelineConfig {
    /// Default configuration for a given dataset directory and backend
    pub fn new<P: Into<PathBuf>>(data_dir: P, backend: Backend) -> Self {
        Self {
            data_dir: data_dir.into(),
            backend,
            model: ModelConfig::default(),
            augment: false,
            split: SplitConfig::default(),
            mongo_uri: None,
            artifact_path: PathBuf::from(DEFAULT_ARTIFACT_PATH),
            seed: DEFAULT_SEED,
        }
    }
}

/// Summary of a pipeline run
#[derive(Debug, Clone)]
pub struct PipelineReport {
    /// Samples found in the dataset
    pub total: usize,
    /// Samples that made it through every step
    pub processed: usize,
    /// Samples skipped because of a per-sample failure
    pub skipped: usize,
    /// Documents written to the store (0 when persistence is disabled)
    pub stored: usize,
    /// Training rows in the artifact
    pub train_size: usize,
    /// Test rows in the artifact
    pub test_size: usize,
}

/// The sequential processing pipeline
pub struct Pipeline {
    config: PipelineConfig,
    extractor: FeatureExtractor,
}

impl Pipeline {
    /// Build the pipeline, loading the configured backbone.
    ///
    /// Fails fast on an unsupported backend or unloadable weights; nothing
    /// else is fatal.
    pub fn new(config: PipelineConfig) -> Result<Self> {
        let extractor = FeatureExtractor::new(config.backend, &config.model)?;
        Ok(Self { config, extractor })
    }

    /// Run every step over the dataset and write the artifact.
    pub fn run(&self) -> Result<PipelineReport> {
        let dataset = PlantDataset::new(&self.config.data_dir)?;
        let num_classes = dataset.num_classes();
        info!("{}", dataset.stats());

        let store = match &self.config.mongo_uri {
            Some(uri) => Some(ImageStore::connect(uri)?),
            None => None,
        };

        let augmenter = if self.config.augment {
            Augmenter::with_defaults()
        } else {
            Augmenter::no_augmentation()
        };
        let mut rng = ChaCha8Rng::seed_from_u64(self.config.seed);

        let mut features: Vec<Vec<f32>> = Vec::new();
        let mut labels: Vec<Vec<f32>> = Vec::new();
        let mut documents: Vec<ImageDocument> = Vec::new();
        let mut skipped = 0usize;

        let mut progress = ProgressLogger::new("Feature extraction", dataset.len());

        for sample in &dataset.samples {
            match self.process_sample(&dataset, sample, num_classes, &augmenter, &mut rng) {
                Ok((feature_vec, label, document)) => {
                    features.push(feature_vec);
                    labels.push(label);
                    if store.is_some() {
                        documents.push(document);
                    }
                }
                Err(e) => {
                    warn!("Skipping sample {:?}: {}", sample.path, e);
                    skipped += 1;
                }
            }
            progress.increment();
        }
        progress.finish();

        let stored = match &store {
            Some(store) => store.insert_many(&documents)?,
            None => 0,
        };

        let split = TrainTestSplit::new(features, labels, &self.config.split)?;
        let train_size = split.train_size();
        let test_size = split.test_size();
        info!("Train size: {}, Test size: {}", train_size, test_size);

        ProcessedDataset::from(split).save(&self.config.artifact_path)?;

        Ok(PipelineReport {
            total: dataset.len(),
            processed: dataset.len() - skipped,
            skipped,
            stored,
            train_size,
            test_size,
        })
    }

    /// Run one sample through every per-sample step
    fn process_sample(
        &self,
        dataset: &PlantDataset,
        sample: &ImageSample,
        num_classes: usize,
        augmenter: &Augmenter,
        rng: &mut ChaCha8Rng,
    ) -> Result<(Vec<f32>, Vec<f32>, ImageDocument)> {
        let image = dataset.load_image(sample)?;
        let image = augmenter.augment(image, rng);

        let processed = preprocess_basic(&image)?;
        let label = one_hot(sample.label, num_classes)?;

        let feature_tensor = self.extractor.extract_features(&image)?;
        let feature_vec = FeatureExtractor::features_to_vec(&feature_tensor)?;

        let document = ImageDocument {
            image_path: sample.path.to_string_lossy().into_owned(),
            processed_image: processed.to_nested(),
            features: feature_vec.clone(),
            label: label.clone(),
        };

        Ok((feature_vec, label, document))
    }
}
