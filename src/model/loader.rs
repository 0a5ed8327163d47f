//! Restores the pretrained classifier from disk and adapts it to the
//! `Classifier` trait.
//!
//! The model artifact is a Burn `CompactRecorder` record (`.mpk`). An optional
//! sidecar `<model>.json` holds the `LeafClassifierConfig` the record was
//! trained with; without it the default architecture is assumed.

use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Instant;

use burn::config::Config;
use burn::module::Module;
use burn::record::CompactRecorder;
use burn::tensor::{backend::Backend, Tensor, TensorData};
use tracing::{debug, info};

use super::cnn::{LeafClassifier, LeafClassifierConfig};
use super::{Classifier, ImageTensor};
use crate::utils::error::{CropDiseaseError, Result, ResultExt};

/// Where the model artifact is expected when no path is configured
pub const DEFAULT_MODEL_PATH: &str = "model/crop_disease_detection_model.mpk";

/// File extension `CompactRecorder` reads and writes
pub const RECORD_EXTENSION: &str = "mpk";

/// A Burn `LeafClassifier` behind the `Classifier` trait
pub struct BurnClassifier<B: Backend> {
    // Forward passes are serialised; one in-flight prediction at a time
    model: Mutex<LeafClassifier<B>>,
    device: B::Device,
    num_classes: usize,
}

impl<B: Backend> BurnClassifier<B> {
    pub fn new(model: LeafClassifier<B>, device: B::Device) -> Self {
        let num_classes = model.num_classes();
        Self {
            model: Mutex::new(model),
            device,
            num_classes,
        }
    }

    /// Restore a classifier from a record file
    ///
    /// `default_num_classes` is used when no config sidecar is present.
    pub fn load(path: &Path, default_num_classes: usize, device: &B::Device) -> Result<Self> {
        let record_path = record_path(path);
        if !record_path.exists() {
            return Err(CropDiseaseError::ModelLoad {
                path: record_path,
                reason: "file not found".to_string(),
            });
        }

        let config = model_config(&record_path, default_num_classes)?;
        debug!("Model config: {:?}", config);

        let start = Instant::now();
        let model = LeafClassifier::<B>::new(&config, device)
            .load_file(record_path.clone(), &CompactRecorder::new(), device)
            .or_error(|reason| CropDiseaseError::ModelLoad {
                path: record_path.clone(),
                reason,
            })?;

        info!(
            "Loaded model {:?} ({} classes) in {:.1}ms",
            record_path,
            config.num_classes,
            start.elapsed().as_secs_f64() * 1000.0
        );

        Ok(Self::new(model, device.clone()))
    }
}

impl<B: Backend> Classifier for BurnClassifier<B> {
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn predict(&self, input: &ImageTensor) -> Result<Vec<f32>> {
        if input.batch_size() != 1 {
            return Err(CropDiseaseError::InvalidInput(format!(
                "expected a batch of one image, got {}",
                input.batch_size()
            )));
        }

        let data = TensorData::new(input.data().to_vec(), input.shape());
        let tensor = Tensor::<B, 4>::from_data(data, &self.device);

        let model = self
            .model
            .lock()
            .context(CropDiseaseError::Inference, "classifier lock")?;
        let probs = model.forward_softmax(tensor);

        probs
            .into_data()
            .to_vec::<f32>()
            .map_err(|e| format!("{:?}", e))
            .context(CropDiseaseError::Inference, "reading classifier output")
    }

    fn describe(&self) -> String {
        format!("LeafClassifier CNN ({} classes)", self.num_classes)
    }
}

/// Load the classifier on the compiled-in backend's default device
pub fn load_classifier(
    path: &Path,
    default_num_classes: usize,
) -> Result<BurnClassifier<crate::backend::InferenceBackend>> {
    let device = crate::backend::default_device();
    BurnClassifier::load(path, default_num_classes, &device)
}

/// Path the recorder will actually read for `path`
pub fn record_path(path: &Path) -> PathBuf {
    path.with_extension(RECORD_EXTENSION)
}

/// Path of the optional config sidecar for a record file
pub fn config_path(path: &Path) -> PathBuf {
    path.with_extension("json")
}

fn model_config(record_path: &Path, default_num_classes: usize) -> Result<LeafClassifierConfig> {
    let sidecar = config_path(record_path);
    if sidecar.exists() {
        LeafClassifierConfig::load(&sidecar).context(
            |reason| CropDiseaseError::ModelLoad {
                path: sidecar.clone(),
                reason,
            },
            "invalid model config",
        )
    } else {
        Ok(LeafClassifierConfig::new().with_num_classes(default_num_classes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::InferenceBackend;

    type TestBackend = InferenceBackend;

    fn small_model(num_classes: usize) -> (LeafClassifierConfig, LeafClassifier<TestBackend>) {
        let device = Default::default();
        let config = LeafClassifierConfig::new()
            .with_base_filters(4)
            .with_num_classes(num_classes);
        let model = LeafClassifier::new(&config, &device);
        (config, model)
    }

    #[test]
    fn test_record_path_uses_mpk_extension() {
        assert_eq!(
            record_path(Path::new("model/leaf")),
            PathBuf::from("model/leaf.mpk")
        );
        assert_eq!(
            record_path(Path::new("model/leaf.mpk")),
            PathBuf::from("model/leaf.mpk")
        );
        assert_eq!(
            config_path(Path::new("model/leaf.mpk")),
            PathBuf::from("model/leaf.json")
        );
    }

    #[test]
    fn test_predict_returns_one_score_per_class() {
        let (_, model) = small_model(14);
        let classifier = BurnClassifier::new(model, Default::default());

        let input = ImageTensor::new(vec![0.5; 32 * 32 * 3], [1, 32, 32, 3]).unwrap();
        let scores = classifier.predict(&input).unwrap();

        assert_eq!(scores.len(), 14);
        assert_eq!(classifier.num_classes(), 14);
    }

    #[test]
    fn test_predict_rejects_batches() {
        let (_, model) = small_model(3);
        let classifier = BurnClassifier::new(model, Default::default());

        let input = ImageTensor::new(vec![0.0; 2 * 8 * 8 * 3], [2, 8, 8, 3]).unwrap();
        assert!(matches!(
            classifier.predict(&input),
            Err(CropDiseaseError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_missing_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = load_classifier(&dir.path().join("absent.mpk"), 14);
        assert!(matches!(result, Err(CropDiseaseError::ModelLoad { .. })));
    }

    #[test]
    fn test_saved_model_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.mpk");

        let (config, model) = small_model(6);
        config.save(config_path(&path)).unwrap();
        model
            .save_file(path.clone(), &CompactRecorder::new())
            .unwrap();

        // Sidecar wins over the default class count
        let classifier = load_classifier(&path, 14).unwrap();
        assert_eq!(classifier.num_classes(), 6);

        let input = ImageTensor::new(vec![1.0; 16 * 16 * 3], [1, 16, 16, 3]).unwrap();
        assert_eq!(classifier.predict(&input).unwrap().len(), 6);
    }

    #[test]
    fn test_corrupt_files_are_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.mpk");
        std::fs::write(&path, b"not a record").unwrap();

        match load_classifier(&path, 14) {
            Err(CropDiseaseError::ModelLoad { path: failed, .. }) => assert_eq!(failed, path),
            _ => panic!("corrupt record must fail to load"),
        }

        std::fs::write(config_path(&path), b"{ broken").unwrap();
        match load_classifier(&path, 14) {
            Err(CropDiseaseError::ModelLoad { path: failed, reason }) => {
                assert_eq!(failed, config_path(&path));
                assert!(reason.starts_with("invalid model config: "));
            }
            _ => panic!("corrupt config must fail to load"),
        }
    }
}
