//! Backend identifiers and their preprocessing conventions
//!
//! Each backend names one pretrained vision model. Parsing is
//! case-insensitive and an unrecognized name is rejected before any
//! weights are touched.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::utils::error::{PipelineError, Result};

/// ImageNet channel means, used by most backbones after 1/255 scaling
const IMAGENET_MEAN: [f32; 3] = [0.485, 0.456, 0.406];
/// ImageNet channel standard deviations
const IMAGENET_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// CLIP's own channel statistics (openai/clip-vit-base-patch32)
const CLIP_MEAN: [f32; 3] = [0.481_454_66, 0.457_827_5, 0.408_210_73];
const CLIP_STD: [f32; 3] = [0.268_629_54, 0.261_302_58, 0.275_777_11];

/// A pretrained vision backbone selectable by name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Backend {
    /// EfficientNet-B0 convolutional feature extractor (no classifier head)
    EfficientNet,
    /// DenseNet-121 convolutional feature extractor (no classifier head)
    DenseNet,
    /// Swin Transformer (microsoft/swin-base-patch4-window7-224)
    SwinTransformer,
    /// DINO ViT-Base self-supervised transformer (facebook/dino-vitb16)
    Dino,
    /// CLIP two-tower model, image tower only (openai/clip-vit-base-patch32)
    Clip,
    /// ResNet-50 convolutional backbone
    ResNet,
}

impl Backend {
    /// All supported backends, in dispatch order
    pub const ALL: [Backend; 6] = [
        Backend::EfficientNet,
        Backend::DenseNet,
        Backend::SwinTransformer,
        Backend::Dino,
        Backend::Clip,
        Backend::ResNet,
    ];

    /// Parse a backend identifier. Case-insensitive; an unknown name is a
    /// configuration error and never falls back to a default.
    pub fn parse(name: &str) -> Result<Self> {
        match name.to_lowercase().as_str() {
            "efficientnet" => Ok(Backend::EfficientNet),
            "densenet" => Ok(Backend::DenseNet),
            "swin_transformer" => Ok(Backend::SwinTransformer),
            "dino" => Ok(Backend::Dino),
            "clip" => Ok(Backend::Clip),
            "resnet" => Ok(Backend::ResNet),
            _ => Err(PipelineError::UnsupportedBackend(name.to_string())),
        }
    }

    /// Canonical lowercase name for this backend
    pub fn name(&self) -> &'static str {
        match self {
            Backend::EfficientNet => "efficientnet",
            Backend::DenseNet => "densenet",
            Backend::SwinTransformer => "swin_transformer",
            Backend::Dino => "dino",
            Backend::Clip => "clip",
            Backend::ResNet => "resnet",
        }
    }

    /// Whether this backend is a convolutional network. Convolutional
    /// backends take a dense CHW tensor and return a rank-4 feature map;
    /// transformer backends take a batched tensor bundle and return hidden
    /// states.
    pub fn is_convolutional(&self) -> bool {
        matches!(
            self,
            Backend::EfficientNet | Backend::DenseNet | Backend::ResNet
        )
    }

    /// Filename of the scripted module for this backend
    pub fn weights_filename(&self) -> &'static str {
        match self {
            Backend::EfficientNet => "efficientnet_b0.pt",
            Backend::DenseNet => "densenet121.pt",
            Backend::SwinTransformer => "swin_base_patch4_window7_224.pt",
            Backend::Dino => "dino_vitb16.pt",
            Backend::Clip => "clip_vit_base_patch32.pt",
            Backend::ResNet => "resnet50.pt",
        }
    }

    /// Preprocessing constants for this backend
    pub fn normalization(&self) -> Normalization {
        match self {
            // Keras-style EfficientNet folds normalization into the model,
            // so the input stays in raw 0-255 range.
            Backend::EfficientNet => Normalization {
                rescale: 1.0,
                mean: [0.0; 3],
                std: [1.0; 3],
            },
            Backend::DenseNet | Backend::SwinTransformer | Backend::Dino => Normalization {
                rescale: 1.0 / 255.0,
                mean: IMAGENET_MEAN,
                std: IMAGENET_STD,
            },
            Backend::Clip => Normalization {
                rescale: 1.0 / 255.0,
                mean: CLIP_MEAN,
                std: CLIP_STD,
            },
            // Plain ToTensor scaling, no channel statistics
            Backend::ResNet => Normalization {
                rescale: 1.0 / 255.0,
                mean: [0.0; 3],
                std: [1.0; 3],
            },
        }
    }
}

impl FromStr for Backend {
    type Err = PipelineError;

    fn from_str(s: &str) -> Result<Self> {
        Backend::parse(s)
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Per-backend input normalization: pixel values are multiplied by
/// `rescale`, then shifted and scaled per channel
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Normalization {
    pub rescale: f32,
    pub mean: [f32; 3],
    pub std: [f32; 3],
}

impl Normalization {
    /// Apply to a single channel value in 0-255 range
    pub fn apply(&self, value: u8, channel: usize) -> f32 {
        (value as f32 * self.rescale - self.mean[channel]) / self.std[channel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_case_insensitive() {
        assert_eq!(Backend::parse("efficientnet").unwrap(), Backend::EfficientNet);
        assert_eq!(Backend::parse("EfficientNet").unwrap(), Backend::EfficientNet);
        assert_eq!(Backend::parse("SWIN_TRANSFORMER").unwrap(), Backend::SwinTransformer);
        assert_eq!(Backend::parse("Dino").unwrap(), Backend::Dino);
        assert_eq!(Backend::parse("CLIP").unwrap(), Backend::Clip);
        assert_eq!(Backend::parse("resnet").unwrap(), Backend::ResNet);
    }

    #[test]
    fn test_parse_unknown_name_fails() {
        let err = Backend::parse("resnet152").unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedBackend(_)));

        assert!(Backend::parse("").is_err());
        assert!(Backend::parse("vgg16").is_err());
    }

    #[test]
    fn test_roundtrip_names() {
        for backend in Backend::ALL {
            assert_eq!(Backend::parse(backend.name()).unwrap(), backend);
        }
    }

    #[test]
    fn test_convolutional_classification() {
        assert!(Backend::EfficientNet.is_convolutional());
        assert!(Backend::DenseNet.is_convolutional());
        assert!(Backend::ResNet.is_convolutional());
        assert!(!Backend::SwinTransformer.is_convolutional());
        assert!(!Backend::Dino.is_convolutional());
        assert!(!Backend::Clip.is_convolutional());
    }

    #[test]
    fn test_efficientnet_keeps_raw_range() {
        let norm = Backend::EfficientNet.normalization();
        assert_eq!(norm.apply(255, 0), 255.0);
        assert_eq!(norm.apply(0, 2), 0.0);
    }

    #[test]
    fn test_clip_normalization_statistics() {
        let norm = Backend::Clip.normalization();
        // A mid-gray pixel lands close to zero after CLIP normalization
        let v = norm.apply(122, 0);
        assert!(v.abs() < 0.1, "got {}", v);
    }

    #[test]
    fn test_resnet_scales_to_unit_range() {
        let norm = Backend::ResNet.normalization();
        assert_eq!(norm.apply(255, 1), 1.0);
        assert_eq!(norm.apply(0, 1), 0.0);
    }
}
