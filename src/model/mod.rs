//! Model module: the classifier seam and its Burn implementation
//!
//! This module provides:
//! - `ImageTensor`, the channels-last input handed to a classifier
//! - the `Classifier` trait the inference pipeline depends on
//! - the CNN architecture and the loader that restores it from a record file
//!
//! The pipeline only sees `dyn Classifier`, so tests can swap in a stub that
//! returns fixed scores.

pub mod cnn;
pub mod loader;

use crate::utils::error::{CropDiseaseError, Result};

// Re-export main types for convenience
pub use cnn::{LeafClassifier, LeafClassifierConfig};
pub use loader::{load_classifier, BurnClassifier, DEFAULT_MODEL_PATH};

/// A dense image batch in `[batch, height, width, channels]` layout
#[derive(Debug, Clone, PartialEq)]
pub struct ImageTensor {
    data: Vec<f32>,
    shape: [usize; 4],
}

impl ImageTensor {
    /// Wrap raw values, checking they fill the shape exactly
    pub fn new(data: Vec<f32>, shape: [usize; 4]) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if data.len() != expected {
            return Err(CropDiseaseError::InvalidInput(format!(
                "tensor of shape {:?} needs {} values, got {}",
                shape,
                expected,
                data.len()
            )));
        }
        Ok(Self { data, shape })
    }

    pub fn shape(&self) -> [usize; 4] {
        self.shape
    }

    pub fn batch_size(&self) -> usize {
        self.shape[0]
    }

    pub fn height(&self) -> usize {
        self.shape[1]
    }

    pub fn width(&self) -> usize {
        self.shape[2]
    }

    pub fn channels(&self) -> usize {
        self.shape[3]
    }

    pub fn data(&self) -> &[f32] {
        &self.data
    }

    /// Value at `(batch, y, x, channel)`
    #[cfg(test)]
    pub(crate) fn get(&self, b: usize, y: usize, x: usize, c: usize) -> Option<f32> {
        let [batch, height, width, channels] = self.shape;
        if b >= batch || y >= height || x >= width || c >= channels {
            return None;
        }
        let idx = ((b * height + y) * width + x) * channels + c;
        self.data.get(idx).copied()
    }
}

/// A pretrained image classifier
///
/// Implementations must be safe to share between request handlers.
pub trait Classifier: Send + Sync {
    /// Number of classes in the output score vector
    fn num_classes(&self) -> usize;

    /// Score every class for a single-image batch
    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>>;

    /// Short description for logs and the health endpoint
    fn describe(&self) -> String {
        format!("classifier ({} classes)", self.num_classes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_tensor_shape_check() {
        assert!(ImageTensor::new(vec![0.0; 12], [1, 2, 2, 3]).is_ok());
        assert!(ImageTensor::new(vec![0.0; 11], [1, 2, 2, 3]).is_err());
    }

    #[test]
    fn test_image_tensor_indexing_is_channels_last() {
        let data: Vec<f32> = (0..12).map(|v| v as f32).collect();
        let tensor = ImageTensor::new(data, [1, 2, 2, 3]).unwrap();

        assert_eq!(tensor.get(0, 0, 0, 0), Some(0.0));
        assert_eq!(tensor.get(0, 0, 0, 2), Some(2.0));
        assert_eq!(tensor.get(0, 0, 1, 0), Some(3.0));
        assert_eq!(tensor.get(0, 1, 1, 2), Some(11.0));
        assert_eq!(tensor.get(0, 2, 0, 0), None);
        assert_eq!(tensor.height(), 2);
        assert_eq!(tensor.channels(), 3);
    }
}
