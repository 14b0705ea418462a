//! Plant species dataset loader
//!
//! Loads the dataset from a class-per-directory tree on disk. Images are
//! decoded lazily; the loader only indexes paths and labels up front.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageReader};
use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::utils::error::{PipelineError, Result};

/// A single image sample with its label and metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageSample {
    /// Path to the image file
    pub path: PathBuf,
    /// Class label index
    pub label: usize,
    /// Class name (directory name)
    pub class_name: String,
    /// Unique sample ID
    pub id: usize,
}

/// Plant species dataset with lazy image loading
#[derive(Debug)]
pub struct PlantDataset {
    /// Root directory of the dataset
    pub root_dir: PathBuf,
    /// All samples in the dataset
    pub samples: Vec<ImageSample>,
    /// Mapping from class name to label index
    pub class_to_idx: HashMap<String, usize>,
    /// Mapping from label index to class name
    pub idx_to_class: HashMap<usize, String>,
}

impl PlantDataset {
    /// Create a dataset from a directory structured as one subdirectory per
    /// class:
    ///
    /// ```text
    /// root_dir/
    /// ├── species_a/
    /// │   ├── image1.jpg
    /// │   └── image2.jpg
    /// └── species_b/
    ///     └── ...
    /// ```
    pub fn new<P: AsRef<Path>>(root_dir: P) -> Result<Self> {
        let root_dir = root_dir.as_ref().to_path_buf();
        info!("Loading plant species dataset from: {:?}", root_dir);

        if !root_dir.exists() {
            return Err(PipelineError::Dataset(format!(
                "Dataset directory does not exist: {:?}",
                root_dir
            )));
        }

        let mut class_dirs: Vec<String> = Vec::new();
        for entry in std::fs::read_dir(&root_dir)? {
            let entry = entry?;
            if entry.file_type()?.is_dir() {
                if let Some(name) = entry.file_name().to_str() {
                    class_dirs.push(name.to_string());
                }
            }
        }
        class_dirs.sort();

        if class_dirs.is_empty() {
            return Err(PipelineError::Dataset(format!(
                "No class directories found under {:?}",
                root_dir
            )));
        }

        info!("Found {} classes", class_dirs.len());

        let class_to_idx: HashMap<String, usize> = class_dirs
            .iter()
            .enumerate()
            .map(|(idx, name)| (name.clone(), idx))
            .collect();

        let idx_to_class: HashMap<usize, String> = class_dirs
            .iter()
            .enumerate()
            .map(|(idx, name)| (idx, name.clone()))
            .collect();

        let mut samples = Vec::new();
        let mut sample_id: usize = 0;

        for class_name in &class_dirs {
            let class_dir = root_dir.join(class_name);
            let label = class_to_idx[class_name];

            for entry in WalkDir::new(&class_dir)
                .min_depth(1)
                .max_depth(1)
                .into_iter()
                .filter_map(|e| e.ok())
            {
                let path = entry.path().to_path_buf();

                if let Some(ext) = path.extension() {
                    let ext = ext.to_string_lossy().to_lowercase();
                    if ["jpg", "jpeg", "png", "bmp"].contains(&ext.as_str()) {
                        samples.push(ImageSample {
                            path,
                            label,
                            class_name: class_name.clone(),
                            id: sample_id,
                        });
                        sample_id += 1;
                    }
                }
            }

            debug!("Indexed class '{}' (label {})", class_name, label);
        }

        info!("Indexed {} total samples", samples.len());

        Ok(Self {
            root_dir,
            samples,
            class_to_idx,
            idx_to_class,
        })
    }

    /// Number of samples in the dataset
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// Check if the dataset is empty
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Number of classes
    pub fn num_classes(&self) -> usize {
        self.class_to_idx.len()
    }

    /// Decode an image from disk
    pub fn load_image(&self, sample: &ImageSample) -> Result<DynamicImage> {
        let img = ImageReader::open(&sample.path)
            .map_err(|e| PipelineError::ImageLoad(sample.path.clone(), e.to_string()))?
            .decode()
            .map_err(|e| PipelineError::ImageLoad(sample.path.clone(), e.to_string()))?;
        Ok(img)
    }

    /// Shuffle the samples in place with a given seed
    pub fn shuffle(&mut self, seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.samples.shuffle(&mut rng);
    }

    /// Statistics about the dataset
    pub fn stats(&self) -> DatasetStats {
        let mut class_counts = vec![0usize; self.num_classes()];
        for sample in &self.samples {
            class_counts[sample.label] += 1;
        }

        DatasetStats {
            total_samples: self.samples.len(),
            num_classes: self.num_classes(),
            class_counts,
            class_names: self.idx_to_class.clone(),
        }
    }
}

/// Statistics about the dataset
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatasetStats {
    pub total_samples: usize,
    pub num_classes: usize,
    pub class_counts: Vec<usize>,
    pub class_names: HashMap<usize, String>,
}

impl std::fmt::Display for DatasetStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "Dataset statistics:")?;
        writeln!(f, "  Total samples: {}", self.total_samples)?;
        writeln!(f, "  Number of classes: {}", self.num_classes)?;

        let mut sorted: Vec<_> = self.class_names.iter().collect();
        sorted.sort_by_key(|(idx, _)| *idx);

        for (idx, name) in sorted {
            writeln!(f, "    {:3}. {:30} {:5}", idx, name, self.class_counts[*idx])?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_sample_creation() {
        let sample = ImageSample {
            path: PathBuf::from("/test/image.jpg"),
            label: 1,
            class_name: "species_b".to_string(),
            id: 42,
        };

        assert_eq!(sample.label, 1);
        assert_eq!(sample.id, 42);
    }

    #[test]
    fn test_missing_directory_is_dataset_error() {
        let err = PlantDataset::new("/nonexistent/dataset").unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(_)));
    }

    #[test]
    fn test_loads_class_per_directory_layout() {
        let root = std::env::temp_dir().join("plantsearch_loader_test");
        let _ = std::fs::remove_dir_all(&root);

        for class in ["fern", "moss"] {
            let dir = root.join(class);
            std::fs::create_dir_all(&dir).unwrap();
            for i in 0..3 {
                let img = image::RgbImage::new(8, 8);
                img.save(dir.join(format!("img_{}.png", i))).unwrap();
            }
            // Non-image files are skipped
            std::fs::write(dir.join("notes.txt"), "not an image").unwrap();
        }

        let dataset = PlantDataset::new(&root).unwrap();
        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.class_to_idx["fern"], 0);
        assert_eq!(dataset.class_to_idx["moss"], 1);

        let stats = dataset.stats();
        assert_eq!(stats.class_counts, vec![3, 3]);

        let img = dataset.load_image(&dataset.samples[0]).unwrap();
        assert_eq!(img.width(), 8);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_shuffle_is_deterministic() {
        let root = std::env::temp_dir().join("plantsearch_shuffle_test");
        let _ = std::fs::remove_dir_all(&root);

        let dir = root.join("only_class");
        std::fs::create_dir_all(&dir).unwrap();
        for i in 0..10 {
            let img = image::RgbImage::new(4, 4);
            img.save(dir.join(format!("img_{}.png", i))).unwrap();
        }

        let mut a = PlantDataset::new(&root).unwrap();
        let mut b = PlantDataset::new(&root).unwrap();
        a.shuffle(7);
        b.shuffle(7);

        let ids_a: Vec<_> = a.samples.iter().map(|s| s.id).collect();
        let ids_b: Vec<_> = b.samples.iter().map(|s| s.id).collect();
        assert_eq!(ids_a, ids_b);

        std::fs::remove_dir_all(&root).unwrap();
    }
}
