//! Error Handling Module
//!
//! Defines the error type shared by the catalog, model loader, inference
//! pipeline and HTTP layer. Uses thiserror for ergonomic error definitions.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for crop disease detection
#[derive(Error, Debug)]
pub enum CropDiseaseError {
    /// The upload is not one of the accepted image formats
    #[error("Unsupported image format: {0}. Please upload a JPEG or PNG image")]
    UnsupportedFormat(String),

    /// The upload looked like an image but could not be decoded
    #[error("Failed to decode image: {0}")]
    ImageDecode(String),

    /// The model file could not be restored
    #[error("Failed to load model from '{path}': {reason}")]
    ModelLoad { path: PathBuf, reason: String },

    /// Classifier output space and catalog disagree
    #[error("Classifier produces {model} classes but the catalog has {catalog} entries")]
    ClassCountMismatch { model: usize, catalog: usize },

    /// The classifier selected an index the catalog does not know
    #[error("Predicted class index {0} has no catalog entry")]
    UnknownClass(usize),

    /// Error during the forward pass or reading its output
    #[error("Inference error: {0}")]
    Inference(String),

    /// Malformed catalog definition
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Path not found
    #[error("Path not found: {0}")]
    PathNotFound(PathBuf),
}

impl CropDiseaseError {
    /// Whether the error was caused by what the user uploaded rather than by the service
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            CropDiseaseError::UnsupportedFormat(_)
                | CropDiseaseError::ImageDecode(_)
                | CropDiseaseError::InvalidInput(_)
        )
    }
}

/// Convenience Result type for crop disease detection
pub type Result<T> = std::result::Result<T, CropDiseaseError>;

/// Extension trait for turning foreign errors and `None` into a `CropDiseaseError`
///
/// `variant` is any `FnOnce(String) -> CropDiseaseError`, usually a tuple
/// variant such as `CropDiseaseError::Inference`.
pub trait ResultExt<T> {
    /// Wrap the error message in `variant`
    fn or_error<V>(self, variant: V) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError;

    /// Wrap `"<msg>: <error>"` in `variant`
    fn context<V>(self, variant: V, msg: &str) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError;
}

impl<T, E: std::fmt::Display> ResultExt<T> for std::result::Result<T, E> {
    fn or_error<V>(self, variant: V) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError,
    {
        self.map_err(|e| variant(e.to_string()))
    }

    fn context<V>(self, variant: V, msg: &str) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError,
    {
        self.map_err(|e| variant(format!("{}: {}", msg, e)))
    }
}

impl<T> ResultExt<T> for Option<T> {
    fn or_error<V>(self, variant: V) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError,
    {
        self.ok_or_else(|| variant("value missing".to_string()))
    }

    fn context<V>(self, variant: V, msg: &str) -> Result<T>
    where
        V: FnOnce(String) -> CropDiseaseError,
    {
        self.ok_or_else(|| variant(msg.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = CropDiseaseError::UnknownClass(20);
        assert_eq!(
            format!("{}", err),
            "Predicted class index 20 has no catalog entry"
        );
    }

    #[test]
    fn test_model_load_error_mentions_path() {
        let err = CropDiseaseError::ModelLoad {
            path: PathBuf::from("/models/leaf.mpk"),
            reason: "file not found".to_string(),
        };
        assert!(format!("{}", err).contains("leaf.mpk"));
    }

    #[test]
    fn test_user_errors() {
        assert!(CropDiseaseError::ImageDecode("truncated".into()).is_user_error());
        assert!(CropDiseaseError::UnsupportedFormat("gif".into()).is_user_error());
        assert!(!CropDiseaseError::UnknownClass(99).is_user_error());
        assert!(!CropDiseaseError::Inference("nan".into()).is_user_error());
    }

    #[test]
    fn test_result_context() {
        let result: std::result::Result<i32, std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "file not found",
        ));

        let err = result
            .context(CropDiseaseError::Inference, "reading scores")
            .unwrap_err();
        assert!(matches!(&err, CropDiseaseError::Inference(msg) if msg == "reading scores: file not found"));
    }

    #[test]
    fn test_or_error_with_struct_variant() {
        let result: std::result::Result<(), String> = Err("bad header".to_string());
        let err = result
            .or_error(|reason| CropDiseaseError::ModelLoad {
                path: PathBuf::from("leaf.mpk"),
                reason,
            })
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Failed to load model from 'leaf.mpk': bad header"
        );
    }

    #[test]
    fn test_option_context() {
        let missing: Option<usize> = None;
        let err = missing
            .context(CropDiseaseError::Inference, "no scores")
            .unwrap_err();
        assert!(matches!(err, CropDiseaseError::Inference(msg) if msg == "no scores"));

        assert_eq!(Some(3).or_error(CropDiseaseError::Inference).unwrap(), 3);
    }
}
