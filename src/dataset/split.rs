//! Deterministic train/test splitting
//!
//! Splits feature vectors and their one-hot labels into train and test
//! portions. The split is reproducible through a fixed ChaCha8 seed and can
//! optionally be stratified to preserve class balance.

use rand::prelude::*;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::encode::argmax;
use super::{DEFAULT_SEED, DEFAULT_TEST_FRACTION};
use crate::utils::error::{PipelineError, Result};

/// Configuration for train/test splitting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplitConfig {
    /// Fraction of samples held out for testing
    pub test_fraction: f64,
    /// Random seed for reproducibility
    pub seed: u64,
    /// Preserve class balance between train and test
    pub stratified: bool,
}

impl Default for SplitConfig {
    fn default() -> Self {
        Self {
            test_fraction: DEFAULT_TEST_FRACTION,
            seed: DEFAULT_SEED,
            stratified: false,
        }
    }
}

impl SplitConfig {
    /// Create a new split configuration, validating the test fraction
    pub fn new(test_fraction: f64, seed: u64) -> Result<Self> {
        if !(0.0..1.0).contains(&test_fraction) || test_fraction == 0.0 {
            return Err(PipelineError::InvalidInput(
                "Test fraction must be in (0.0, 1.0)".to_string(),
            ));
        }

        Ok(Self {
            test_fraction,
            seed,
            stratified: false,
        })
    }

    pub fn stratified(mut self) -> Self {
        self.stratified = true;
        self
    }
}

/// The four arrays produced by the split
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrainTestSplit {
    pub x_train: Vec<Vec<f32>>,
    pub x_test: Vec<Vec<f32>>,
    pub y_train: Vec<Vec<f32>>,
    pub y_test: Vec<Vec<f32>>,
}

impl TrainTestSplit {
    /// Split paired feature/label rows according to `config`.
    ///
    /// `features[i]` corresponds to `labels[i]`; the pairing is preserved
    /// through the shuffle.
    pub fn new(
        features: Vec<Vec<f32>>,
        labels: Vec<Vec<f32>>,
        config: &SplitConfig,
    ) -> Result<Self> {
        if features.len() != labels.len() {
            return Err(PipelineError::Dataset(format!(
                "Feature/label length mismatch: {} vs {}",
                features.len(),
                labels.len()
            )));
        }
        if features.is_empty() {
            return Err(PipelineError::Dataset(
                "No samples provided for splitting".to_string(),
            ));
        }

        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let mut pairs: Vec<(Vec<f32>, Vec<f32>)> =
            features.into_iter().zip(labels).collect();

        let (train, test) = if config.stratified {
            Self::stratified_split(pairs, config, &mut rng)
        } else {
            pairs.shuffle(&mut rng);
            let n_test = Self::test_count(pairs.len(), config.test_fraction);
            let train = pairs.split_off(n_test);
            (train, pairs)
        };

        let (x_train, y_train): (Vec<_>, Vec<_>) = train.into_iter().unzip();
        let (x_test, y_test): (Vec<_>, Vec<_>) = test.into_iter().unzip();

        Ok(Self {
            x_train,
            x_test,
            y_train,
            y_test,
        })
    }

    /// Split each class proportionally, then merge and reshuffle
    fn stratified_split(
        pairs: Vec<(Vec<f32>, Vec<f32>)>,
        config: &SplitConfig,
        rng: &mut ChaCha8Rng,
    ) -> (Vec<(Vec<f32>, Vec<f32>)>, Vec<(Vec<f32>, Vec<f32>)>) {
        let mut by_class: HashMap<usize, Vec<(Vec<f32>, Vec<f32>)>> = HashMap::new();
        for pair in pairs {
            let class = argmax(&pair.1).unwrap_or(0);
            by_class.entry(class).or_default().push(pair);
        }

        let mut train = Vec::new();
        let mut test = Vec::new();

        let mut classes: Vec<_> = by_class.into_iter().collect();
        classes.sort_by_key(|(class, _)| *class);

        for (_, mut class_pairs) in classes {
            class_pairs.shuffle(rng);
            let n_test = Self::test_count(class_pairs.len(), config.test_fraction);
            let class_train = class_pairs.split_off(n_test);
            train.extend(class_train);
            test.extend(class_pairs);
        }

        train.shuffle(rng);
        test.shuffle(rng);

        (train, test)
    }

    fn test_count(total: usize, fraction: f64) -> usize {
        ((total as f64 * fraction).round() as usize).min(total)
    }

    /// Number of training samples
    pub fn train_size(&self) -> usize {
        self.x_train.len()
    }

    /// Number of test samples
    pub fn test_size(&self) -> usize {
        self.x_test.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::encode::one_hot;

    fn create_test_data(per_class: usize) -> (Vec<Vec<f32>>, Vec<Vec<f32>>) {
        let mut features = Vec::new();
        let mut labels = Vec::new();
        for class in 0..2 {
            for i in 0..per_class {
                features.push(vec![class as f32, i as f32]);
                labels.push(one_hot(class, 2).unwrap());
            }
        }
        (features, labels)
    }

    #[test]
    fn test_default_fraction_splits_80_20() {
        let (features, labels) = create_test_data(50);
        let split = TrainTestSplit::new(features, labels, &SplitConfig::default()).unwrap();

        assert_eq!(split.train_size(), 80);
        assert_eq!(split.test_size(), 20);
        assert_eq!(split.y_train.len(), 80);
        assert_eq!(split.y_test.len(), 20);
    }

    #[test]
    fn test_split_is_deterministic() {
        let (features, labels) = create_test_data(25);
        let config = SplitConfig::default();

        let a = TrainTestSplit::new(features.clone(), labels.clone(), &config).unwrap();
        let b = TrainTestSplit::new(features, labels, &config).unwrap();

        assert_eq!(a.x_train, b.x_train);
        assert_eq!(a.x_test, b.x_test);
        assert_eq!(a.y_train, b.y_train);
        assert_eq!(a.y_test, b.y_test);
    }

    #[test]
    fn test_stratified_preserves_class_balance() {
        let (features, labels) = create_test_data(50);
        let config = SplitConfig::new(0.2, 42).unwrap().stratified();
        let split = TrainTestSplit::new(features, labels, &config).unwrap();

        let test_class_1 = split
            .y_test
            .iter()
            .filter(|l| argmax(l) == Some(1))
            .count();
        assert_eq!(test_class_1, 10);
        assert_eq!(split.test_size(), 20);
    }

    #[test]
    fn test_pairing_preserved_through_shuffle() {
        let (features, labels) = create_test_data(30);
        let split = TrainTestSplit::new(features, labels, &SplitConfig::default()).unwrap();

        // Feature rows encode their class in the first element
        for (x, y) in split.x_train.iter().zip(&split.y_train) {
            assert_eq!(x[0] as usize, argmax(y).unwrap());
        }
        for (x, y) in split.x_test.iter().zip(&split.y_test) {
            assert_eq!(x[0] as usize, argmax(y).unwrap());
        }
    }

    #[test]
    fn test_invalid_inputs_rejected() {
        assert!(SplitConfig::new(0.0, 42).is_err());
        assert!(SplitConfig::new(1.0, 42).is_err());

        let err = TrainTestSplit::new(vec![], vec![], &SplitConfig::default()).unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(_)));

        let err = TrainTestSplit::new(
            vec![vec![1.0]],
            vec![],
            &SplitConfig::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PipelineError::Dataset(_)));
    }
}
