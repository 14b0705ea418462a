//! Backend-specific image preprocessing
//!
//! Every backbone expects 224x224 input; the representations differ:
//! convolutional backends take a dense CHW tensor, transformer backends a
//! structured bundle of already-batched pixel values (mirroring the
//! `pixel_values` output of their feature extractors).

use image::DynamicImage;
use tch::Tensor;

use super::backend::Backend;
use super::MODEL_INPUT_SIZE;
use crate::utils::error::{PipelineError, Result};

/// Preprocessed representation handed to a backbone
#[derive(Debug)]
pub enum Preprocessed {
    /// Dense CHW tensor `[3, 224, 224]` for convolutional backends
    Dense(Tensor),
    /// Tensor bundle for transformer backends
    Bundle(EncodedInputs),
}

/// Structured inputs for transformer backbones
#[derive(Debug)]
pub struct EncodedInputs {
    /// Batched pixel values `[1, 3, 224, 224]`
    pub pixel_values: Tensor,
}

/// Resize an image to the model input size and apply the backend's
/// normalization, producing the backend-specific representation.
pub fn preprocess(backend: Backend, image: &DynamicImage) -> Result<Preprocessed> {
    let tensor = to_normalized_tensor(backend, image)?;

    if backend.is_convolutional() {
        Ok(Preprocessed::Dense(tensor))
    } else {
        Ok(Preprocessed::Bundle(EncodedInputs {
            pixel_values: tensor.unsqueeze(0),
        }))
    }
}

/// Convert an image to a normalized CHW float tensor `[3, 224, 224]`
fn to_normalized_tensor(backend: Backend, image: &DynamicImage) -> Result<Tensor> {
    let (width, height) = (image.width(), image.height());
    if width == 0 || height == 0 {
        return Err(PipelineError::InvalidInput(format!(
            "Cannot preprocess a {}x{} image",
            width, height
        )));
    }

    let resized = image.resize_exact(
        MODEL_INPUT_SIZE,
        MODEL_INPUT_SIZE,
        image::imageops::FilterType::Triangle,
    );
    let rgb = resized.to_rgb8();

    let size = MODEL_INPUT_SIZE as usize;
    let norm = backend.normalization();
    let mut data = vec![0.0f32; 3 * size * size];

    // CHW layout
    for y in 0..size {
        for x in 0..size {
            let pixel = rgb.get_pixel(x as u32, y as u32);
            for c in 0..3 {
                data[c * size * size + y * size + x] = norm.apply(pixel[c], c);
            }
        }
    }

    Ok(Tensor::from_slice(&data).view([3, size as i64, size as i64]))
}
