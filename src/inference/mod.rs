//! Inference module: from uploaded bytes to a diagnosis
//!
//! This module provides:
//! - Image preprocessing (format check, decode, 256×256 resize, NHWC tensor)
//! - The argmax decision rule and catalog resolution
//! - The pipeline tying both to a `Classifier`

pub mod pipeline;
pub mod predictor;
pub mod preprocess;

// Re-export main types for convenience
pub use pipeline::{Diagnosis, ImageInfo, Outcome, Pipeline, MISSING_IMAGE_WARNING};
pub use predictor::{argmax, PredictionResult, Predictor};
pub use preprocess::{ChannelOrder, DecodedImage, PixelScaling, PreprocessConfig};
