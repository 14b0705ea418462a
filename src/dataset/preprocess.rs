//! Basic image preprocessing
//!
//! The pipeline's first step: resize every image to 224x224 and scale pixel
//! values to [0, 1]. This is separate from the backend-specific model
//! preprocessing in `models::preprocess`; the result here is what gets
//! persisted to the document store.

use image::DynamicImage;
use serde::{Deserialize, Serialize};

use crate::models::MODEL_INPUT_SIZE;
use crate::utils::error::{PipelineError, Result};

/// A preprocessed image: CHW float data scaled to [0, 1]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessedImage {
    /// Pixel data in CHW order, length `3 * height * width`
    pub data: Vec<f32>,
    /// Image width after resizing
    pub width: u32,
    /// Image height after resizing
    pub height: u32,
}

impl ProcessedImage {
    /// Expected element count for the given dimensions
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Expand the flat CHW buffer into a nested `[channel][row][col]` array,
    /// the shape stored in the document store.
    pub fn to_nested(&self) -> Vec<Vec<Vec<f32>>> {
        let (w, h) = (self.width as usize, self.height as usize);
        let mut nested = Vec::with_capacity(3);
        for c in 0..3 {
            let mut rows = Vec::with_capacity(h);
            for y in 0..h {
                let start = c * h * w + y * w;
                rows.push(self.data[start..start + w].to_vec());
            }
            nested.push(rows);
        }
        nested
    }
}

/// Resize an image to 224x224 and scale pixel values to [0, 1].
///
/// Degenerate input (a zero-sized image) is rejected with an explicit error;
/// the pipeline boundary logs it and skips the sample.
pub fn preprocess_basic(image: &DynamicImage) -> Result<ProcessedImage> {
    if image.width() == 0 || image.height() == 0 {
        return Err(PipelineError::InvalidInput(format!(
            "Cannot preprocess a {}x{} image",
            image.width(),
            image.height()
        )));
    }

    let resized = image.resize_exact(
        MODEL_INPUT_SIZE,
        MODEL_INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let rgb = resized.to_rgb8();

    let size = MODEL_INPUT_SIZE as usize;
    let mut data = vec![0.0f32; 3 * size * size];

    for y in 0..size {
        for x in 0..size {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                data[c * size * size + y * size + x] = pixel[c] as f32 / 255.0;
            }
        }
    }

    Ok(ProcessedImage {
        data,
        width: MODEL_INPUT_SIZE,
        height: MODEL_INPUT_SIZE,
    })
}
