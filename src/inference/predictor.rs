//! Turns classifier scores into a catalog entry.
//!
//! The decision rule is a plain argmax: no threshold, no top-k.

use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::debug;

use crate::catalog::{DiseaseCatalog, DiseaseEntry};
use crate::model::{Classifier, ImageTensor};
use crate::utils::error::{CropDiseaseError, Result, ResultExt};

/// Index of the highest score
///
/// Ties go to the lowest index. NaN scores are skipped; `None` when no score
/// is comparable.
pub fn argmax(scores: &[f32]) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;

    for (idx, &score) in scores.iter().enumerate() {
        if score.is_nan() {
            continue;
        }
        match best {
            Some((_, top)) if score <= top => {}
            _ => best = Some((idx, score)),
        }
    }

    best.map(|(idx, _)| idx)
}

/// The predicted class and its advice
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionResult {
    /// Position of the class in the catalog
    pub class_index: usize,
    pub label: String,
    pub crop: String,
    pub condition: String,
    pub healthy: bool,
    /// `"<Crop> leaf is healthy"` or `"<Crop> leaf infected with <Condition>"`
    pub headline: String,
    pub advisory: String,
}

impl PredictionResult {
    pub fn from_entry(class_index: usize, entry: &DiseaseEntry) -> Self {
        Self {
            class_index,
            label: entry.label.clone(),
            crop: entry.crop.clone(),
            condition: entry.condition.clone(),
            healthy: entry.is_healthy(),
            headline: entry.headline(),
            advisory: entry.advisory.clone(),
        }
    }
}

/// Runs the classifier and resolves its decision against the catalog
#[derive(Clone)]
pub struct Predictor {
    classifier: Arc<dyn Classifier>,
    catalog: Arc<DiseaseCatalog>,
}

impl Predictor {
    /// Pair a classifier with the catalog describing its output space
    ///
    /// Fails when the two disagree on the number of classes.
    pub fn new(classifier: Arc<dyn Classifier>, catalog: Arc<DiseaseCatalog>) -> Result<Self> {
        if classifier.num_classes() != catalog.len() {
            return Err(CropDiseaseError::ClassCountMismatch {
                model: classifier.num_classes(),
                catalog: catalog.len(),
            });
        }
        Ok(Self {
            classifier,
            catalog,
        })
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    pub fn classifier(&self) -> &dyn Classifier {
        self.classifier.as_ref()
    }

    /// Classify one preprocessed image
    pub fn predict(&self, input: &ImageTensor) -> Result<(PredictionResult, Duration)> {
        let start = Instant::now();
        let scores = self.classifier.predict(input)?;
        let elapsed = start.elapsed();

        let class_index = argmax(&scores).context(
            CropDiseaseError::Inference,
            "classifier returned no comparable scores",
        )?;
        debug!("Scores: {:?} -> class {}", scores, class_index);

        let entry = self
            .catalog
            .get(class_index)
            .ok_or(CropDiseaseError::UnknownClass(class_index))?;

        Ok((PredictionResult::from_entry(class_index, entry), elapsed))
    }
}
