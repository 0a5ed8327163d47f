//! Server configuration
//!
//! Defaults live here; the CLI overrides them from flags or `CROP_DISEASE_*`
//! environment variables.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::inference::PreprocessConfig;
use crate::model::DEFAULT_MODEL_PATH;
use crate::utils::error::{CropDiseaseError, Result};

/// Default upload limit, 200 MiB
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 200 * 1024 * 1024;

/// Server configuration
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Model record file
    pub model_path: PathBuf,
    /// Optional JSON catalog replacing the built-in classes
    pub catalog_path: Option<PathBuf>,
    /// Largest accepted request body
    pub max_upload_bytes: usize,
    /// How uploads are turned into model input
    pub preprocess: PreprocessConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8501,
            model_path: PathBuf::from(DEFAULT_MODEL_PATH),
            catalog_path: None,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            preprocess: PreprocessConfig::default(),
        }
    }
}

impl ServerConfig {
    /// `host:port` string to bind
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.max_upload_bytes == 0 {
            return Err(CropDiseaseError::Config(
                "max_upload_bytes must be greater than zero".to_string(),
            ));
        }
        if self.preprocess.image_size == 0 {
            return Err(CropDiseaseError::Config(
                "image_size must be greater than zero".to_string(),
            ));
        }
        if self.host.trim().is_empty() {
            return Err(CropDiseaseError::Config("host must not be empty".to_string()));
        }
        Ok(())
    }
}
