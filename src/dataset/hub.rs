//! Dataset download from the Hugging Face Hub
//!
//! Mirrors the original dataset source: the plant species demo dataset is a
//! Hub dataset repository. Files are listed through the repo info endpoint
//! and fetched into the hf-hub cache, then materialized into the local
//! class-per-directory layout that `loader` expects.

use std::path::{Path, PathBuf};

use hf_hub::api::sync::Api;
use hf_hub::{Repo, RepoType};
use tracing::{info, warn};

use crate::utils::error::{PipelineError, Result};

/// Default dataset repository on the Hub
pub const DEFAULT_DATASET_REPO: &str = "nsarker/plantspecies-demo";

/// Image file extensions recognized inside the dataset repo
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// Leading split directories found in Hub dataset repos. Stripped during
/// materialization so class folders land directly under the output
/// directory, the layout `loader` expects.
const SPLIT_PREFIXES: [&str; 4] = ["train", "test", "validation", "valid"];

/// Download all image files of a Hub dataset repository into `output_dir`.
///
/// Repo paths like `train/fern/leaf_001.jpg` become `fern/leaf_001.jpg` on
/// disk: the split prefix is dropped because the pipeline performs its own
/// train/test split downstream.
///
/// Returns the number of files fetched. Individual file failures are logged
/// and skipped; an empty result is an error.
pub fn fetch_dataset(repo_name: &str, output_dir: &Path) -> Result<usize> {
    info!("Fetching dataset '{}' from the Hub", repo_name);

    let api = Api::new()?;
    let repo = api.repo(Repo::new(repo_name.to_string(), RepoType::Dataset));

    let repo_info = repo.info()?;
    let image_files: Vec<String> = repo_info
        .siblings
        .into_iter()
        .map(|s| s.rfilename)
        .filter(|name| is_image_file(name))
        .collect();

    if image_files.is_empty() {
        return Err(PipelineError::Hub(format!(
            "Dataset repo '{}' contains no image files",
            repo_name
        )));
    }

    info!("Dataset lists {} image files", image_files.len());

    let mut fetched = 0usize;
    for filename in &image_files {
        match repo.get(filename) {
            Ok(cached) => {
                let target = output_dir.join(target_relative_path(filename));
                if let Some(parent) = target.parent() {
                    std::fs::create_dir_all(parent)?;
                }
                std::fs::copy(&cached, &target)?;
                fetched += 1;
            }
            Err(e) => {
                warn!("Skipping '{}': {}", filename, e);
            }
        }
    }

    if fetched == 0 {
        return Err(PipelineError::Hub(format!(
            "Failed to fetch any file from '{}'",
            repo_name
        )));
    }

    info!("Fetched {} files into {:?}", fetched, output_dir);
    Ok(fetched)
}

/// Default local directory for the fetched dataset
pub fn default_data_dir() -> PathBuf {
    PathBuf::from("data/plantspecies")
}

/// Map a repo file path to its location under the output directory,
/// dropping a leading split component when present.
fn target_relative_path(rfilename: &str) -> PathBuf {
    let path = Path::new(rfilename);
    let mut components = path.components();

    if let Some(first) = components.next() {
        if let Some(name) = first.as_os_str().to_str() {
            if SPLIT_PREFIXES.contains(&name.to_lowercase().as_str()) {
                let rest: PathBuf = components.collect();
                if !rest.as_os_str().is_empty() {
                    return rest;
                }
            }
        }
    }

    path.to_path_buf()
}

fn is_image_file(name: &str) -> bool {
    Path::new(name)
        .extension()
        .map(|ext| {
            let ext = ext.to_string_lossy().to_lowercase();
            IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_image_file() {
        assert!(is_image_file("train/fern/leaf_001.jpg"));
        assert!(is_image_file("moss/sample.PNG"));
        assert!(!is_image_file("README.md"));
        assert!(!is_image_file("dataset_infos.json"));
        assert!(!is_image_file("no_extension"));
    }

    #[test]
    fn test_split_prefix_is_stripped() {
        assert_eq!(
            target_relative_path("train/fern/leaf_001.jpg"),
            PathBuf::from("fern/leaf_001.jpg")
        );
        assert_eq!(
            target_relative_path("Test/moss/leaf_002.jpg"),
            PathBuf::from("moss/leaf_002.jpg")
        );
        assert_eq!(
            target_relative_path("validation/fern/leaf_003.jpg"),
            PathBuf::from("fern/leaf_003.jpg")
        );

        // Paths without a split prefix pass through unchanged
        assert_eq!(
            target_relative_path("fern/leaf_004.jpg"),
            PathBuf::from("fern/leaf_004.jpg")
        );
        // A bare file named after a split keeps its name
        assert_eq!(target_relative_path("train"), PathBuf::from("train"));
    }

    #[test]
    fn test_fetched_layout_is_loadable() {
        use crate::dataset::loader::PlantDataset;

        // Materialize files the way fetch_dataset does, from repo paths
        // carrying a split prefix
        let out = std::env::temp_dir().join("plantsearch_hub_layout_test");
        let _ = std::fs::remove_dir_all(&out);

        let rfilenames = [
            "train/fern/leaf_000.png",
            "train/fern/leaf_001.png",
            "train/moss/leaf_000.png",
            "test/moss/leaf_001.png",
        ];
        for rfilename in rfilenames {
            let target = out.join(target_relative_path(rfilename));
            std::fs::create_dir_all(target.parent().unwrap()).unwrap();
            image::RgbImage::new(8, 8).save(&target).unwrap();
        }

        // The loader sees class directories, not the split directory
        let dataset = PlantDataset::new(&out).unwrap();
        assert_eq!(dataset.num_classes(), 2);
        assert_eq!(dataset.len(), 4);
        assert!(dataset.class_to_idx.contains_key("fern"));
        assert!(dataset.class_to_idx.contains_key("moss"));

        std::fs::remove_dir_all(&out).unwrap();
    }

    #[test]
    fn test_default_data_dir() {
        assert_eq!(default_data_dir(), PathBuf::from("data/plantspecies"));
    }

    #[test]
    #[ignore = "requires network access to the Hugging Face Hub"]
    fn test_fetch_dataset_end_to_end() {
        let out = std::env::temp_dir().join("plantsearch_hub_test");
        let fetched = fetch_dataset(DEFAULT_DATASET_REPO, &out).unwrap();
        assert!(fetched > 0);
        std::fs::remove_dir_all(&out).unwrap();
    }
}
