//! The request pipeline: upload bytes in, diagnosis out.
//!
//! guard → decode → resize/tensorize → classify → catalog lookup

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use super::predictor::{PredictionResult, Predictor};
use super::preprocess::{decode_image, preprocess, PreprocessConfig};
use crate::catalog::DiseaseCatalog;
use crate::model::Classifier;
use crate::utils::error::Result;

/// Shown when "Detect Disease" is pressed without an image
pub const MISSING_IMAGE_WARNING: &str = "Please upload a crop leaf image for detection.";

/// Facts about the upload itself
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    /// Width in pixels, before resizing
    pub width: u32,
    /// Height in pixels, before resizing
    pub height: u32,
    pub mime_type: String,
    pub size_bytes: usize,
}

/// Successful result of one pipeline run
#[derive(Debug, Clone, Serialize)]
pub struct Diagnosis {
    pub image: ImageInfo,
    pub prediction: PredictionResult,
    pub inference_time_ms: f64,
}

/// What a pipeline run produced
#[derive(Debug, Clone)]
pub enum Outcome {
    /// No image was supplied; nothing was decoded or classified
    MissingImage,
    Diagnosed(Diagnosis),
}

impl Outcome {
    pub fn diagnosis(&self) -> Option<&Diagnosis> {
        match self {
            Outcome::Diagnosed(diagnosis) => Some(diagnosis),
            Outcome::MissingImage => None,
        }
    }
}

/// Inference pipeline shared by the web handlers and the CLI
#[derive(Clone)]
pub struct Pipeline {
    predictor: Predictor,
    preprocess: PreprocessConfig,
}

impl Pipeline {
    pub fn new(
        classifier: Arc<dyn Classifier>,
        catalog: Arc<DiseaseCatalog>,
        preprocess: PreprocessConfig,
    ) -> Result<Self> {
        Ok(Self {
            predictor: Predictor::new(classifier, catalog)?,
            preprocess,
        })
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        self.predictor.catalog()
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.predictor.classifier()
    }

    pub fn preprocess_config(&self) -> &PreprocessConfig {
        &self.preprocess
    }

    /// Run one detection
    ///
    /// `None` or an empty buffer yields `Outcome::MissingImage`.
    pub fn run(&self, upload: Option<&[u8]>) -> Result<Outcome> {
        let bytes = match upload {
            Some(bytes) if !bytes.is_empty() => bytes,
            _ => {
                warn!("Detection requested without an image");
                return Ok(Outcome::MissingImage);
            }
        };

        let decoded = decode_image(bytes)?;
        let (width, height) = decoded.dimensions();
        info!(
            "Decoded {} upload: {}x{} ({} bytes)",
            decoded.mime_type(),
            width,
            height,
            bytes.len()
        );

        let input = preprocess(&decoded.image, &self.preprocess)?;
        debug!(
            "Model input: {}x{}x{} ({:?}, {:?})",
            input.height(),
            input.width(),
            input.channels(),
            self.preprocess.channel_order,
            self.preprocess.scaling
        );
        let (prediction, elapsed) = self.predictor.predict(&input)?;
        let inference_time_ms = elapsed.as_secs_f64() * 1000.0;

        info!(
            "Predicted {} (class {}) in {:.2}ms",
            prediction.label, prediction.class_index, inference_time_ms
        );

        Ok(Outcome::Diagnosed(Diagnosis {
            image: ImageInfo {
                width,
                height,
                mime_type: decoded.mime_type().to_string(),
                size_bytes: bytes.len(),
            },
            prediction,
            inference_time_ms,
        }))
    }
}
