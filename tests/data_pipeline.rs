//! End-to-end tests for the data path: dataset loading, preprocessing,
//! encoding, splitting and the saved artifact. Model inference itself is
//! covered by ignored tests that need scripted backbone weights.

use std::path::PathBuf;

use plantsearch::dataset::encode::one_hot;
use plantsearch::dataset::preprocess::preprocess_basic;
use plantsearch::dataset::split::{SplitConfig, TrainTestSplit};
use plantsearch::models::{Backend, FeatureExtractor, ModelConfig};
use plantsearch::pipeline::{Pipeline, PipelineConfig};
use plantsearch::storage::ProcessedDataset;
use plantsearch::PlantDataset;

/// Build a small two-class dataset on disk
fn create_dataset(name: &str, per_class: usize) -> PathBuf {
    let root = std::env::temp_dir().join(name);
    let _ = std::fs::remove_dir_all(&root);

    for (class_idx, class) in ["daisy", "dandelion"].iter().enumerate() {
        let dir = root.join(class);
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..per_class {
            let mut img = image::RgbImage::new(32, 32);
            for pixel in img.pixels_mut() {
                *pixel = image::Rgb([class_idx as u8 * 100, i as u8, 50]);
            }
            img.save(dir.join(format!("img_{}.png", i))).unwrap();
        }
    }
    root
}

#[test]
fn data_path_from_disk_to_artifact() {
    let root = create_dataset("plantsearch_e2e_data", 10);
    let dataset = PlantDataset::new(&root).unwrap();
    assert_eq!(dataset.len(), 20);
    assert_eq!(dataset.num_classes(), 2);

    // Preprocess every image and one-hot encode its label
    let mut features = Vec::new();
    let mut labels = Vec::new();
    for sample in &dataset.samples {
        let image = dataset.load_image(sample).unwrap();
        let processed = preprocess_basic(&image).unwrap();
        assert_eq!(processed.len(), 3 * 224 * 224);

        features.push(processed.data);
        labels.push(one_hot(sample.label, dataset.num_classes()).unwrap());
    }

    // 80/20 split, then save and reload the artifact
    let split = TrainTestSplit::new(features, labels, &SplitConfig::default()).unwrap();
    assert_eq!(split.train_size(), 16);
    assert_eq!(split.test_size(), 4);

    let artifact_path = std::env::temp_dir().join("plantsearch_e2e_artifact.bin");
    let dataset_artifact = ProcessedDataset::from(split);
    dataset_artifact.save(&artifact_path).unwrap();

    let loaded = ProcessedDataset::load(&artifact_path).unwrap();
    assert_eq!(loaded.x_train.len(), 16);
    assert_eq!(loaded.x_test.len(), 4);
    assert_eq!(loaded.y_train[0].len(), 2);

    std::fs::remove_file(&artifact_path).unwrap();
    std::fs::remove_dir_all(&root).unwrap();
}

#[test]
fn unsupported_backend_is_fatal_before_any_work() {
    let err = Backend::parse("resnet152").unwrap_err();
    assert!(matches!(
        err,
        plantsearch::PipelineError::UnsupportedBackend(_)
    ));

    // Same check through the extractor entry point, with no weights around
    let config = ModelConfig::default().with_weights_dir("/nonexistent");
    assert!(FeatureExtractor::from_name("resnet152", &config).is_err());
}

#[test]
#[ignore = "requires scripted backbone weights (set PLANTSEARCH_WEIGHTS_DIR)"]
fn full_pipeline_with_efficientnet() {
    let root = create_dataset("plantsearch_e2e_full", 5);
    let weights_dir =
        std::env::var("PLANTSEARCH_WEIGHTS_DIR").unwrap_or_else(|_| "weights".to_string());

    let mut config = PipelineConfig::new(&root, Backend::EfficientNet);
    config.model = ModelConfig::default().with_weights_dir(weights_dir);
    config.artifact_path = std::env::temp_dir().join("plantsearch_e2e_full.bin");

    let pipeline = Pipeline::new(config.clone()).unwrap();
    let report = pipeline.run().unwrap();

    assert_eq!(report.total, 10);
    assert_eq!(report.skipped, 0);
    assert_eq!(report.train_size + report.test_size, report.processed);

    // One sample through the extractor: rank-4 feature map, batch dim 1
    let extractor = FeatureExtractor::new(Backend::EfficientNet, &config.model).unwrap();
    let dataset = PlantDataset::new(&root).unwrap();
    let image = dataset.load_image(&dataset.samples[0]).unwrap();
    let features = extractor.extract_features(&image).unwrap();
    assert_eq!(features.dim(), 4);
    assert_eq!(features.size()[0], 1);

    std::fs::remove_file(&config.artifact_path).unwrap();
    std::fs::remove_dir_all(&root).unwrap();
}
