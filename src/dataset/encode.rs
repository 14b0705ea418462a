//! One-hot label encoding

use crate::utils::error::{PipelineError, Result};

/// One-hot encode a class label into a binary vector of length
/// `num_classes`.
pub fn one_hot(label: usize, num_classes: usize) -> Result<Vec<f32>> {
    if num_classes == 0 {
        return Err(PipelineError::InvalidInput(
            "num_classes must be at least 1".to_string(),
        ));
    }
    if label >= num_classes {
        return Err(PipelineError::InvalidInput(format!(
            "Label {} out of range for {} classes",
            label, num_classes
        )));
    }

    let mut encoded = vec![0.0f32; num_classes];
    encoded[label] = 1.0;
    Ok(encoded)
}

/// Recover the class index from a one-hot vector
pub fn argmax(encoded: &[f32]) -> Option<usize> {
    encoded
        .iter()
        .enumerate()
        .max_by(|a, b| a.1.total_cmp(b.1))
        .map(|(idx, _)| idx)
}
