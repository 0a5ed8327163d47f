//! # Crop Disease Detection
//!
//! Diagnoses crop leaf diseases from a photo. An uploaded JPEG or PNG is
//! decoded, resized to 256x256 and fed to a pretrained Burn CNN; the top
//! class is mapped to a `<Crop>-<Condition>` label and a treatment advisory.
//!
//! ## Modules
//!
//! - `catalog`: The ordered class labels and their advisories
//! - `model`: CNN architecture, the `Classifier` trait and model loading
//! - `inference`: Preprocessing, argmax prediction and the detection pipeline
//! - `server`: HTML upload page and JSON API built with axum
//! - `config`: Server settings
//! - `utils`: Errors, logging and small helpers
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use crop_disease_detection::{load_classifier, DiseaseCatalog, Pipeline, PreprocessConfig};
//!
//! let catalog = Arc::new(DiseaseCatalog::builtin());
//! let classifier = Arc::new(load_classifier(model_path, catalog.len())?);
//! let pipeline = Pipeline::new(classifier, catalog, PreprocessConfig::default())?;
//! let outcome = pipeline.run(Some(&bytes))?;
//! ```

pub mod backend;
pub mod catalog;
pub mod config;
pub mod inference;
pub mod model;
pub mod server;
pub mod utils;

// Re-export commonly used items for convenience
pub use catalog::{DiseaseCatalog, DiseaseEntry};
pub use config::ServerConfig;
pub use inference::{Diagnosis, Outcome, Pipeline, PredictionResult, Predictor, PreprocessConfig};
pub use model::{load_classifier, BurnClassifier, Classifier, ImageTensor};
pub use server::build_router;
pub use utils::error::{CropDiseaseError, Result};

/// Number of classes in the built-in catalog
pub const NUM_CLASSES: usize = 14;

/// Side of the square image the model expects
pub const IMAGE_SIZE: u32 = 256;

/// Version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
