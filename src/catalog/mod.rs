//! Disease catalog: the class labels the classifier can produce, each paired
//! with its treatment advisory.
//!
//! Labels have the form `"<Crop>-<Condition>"` (e.g. `"Apple-Apple_scab"`,
//! `"Blueberry-healthy"`). The position of an entry in the catalog is the class
//! index the classifier emits for it, so label and advice can never drift apart.
//!
//! The built-in catalog covers 14 classes. A replacement can be loaded from a
//! JSON file holding an array of `{ "label": ..., "advisory": ... }` objects.

mod advisories;

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::utils::error::{CropDiseaseError, Result};

pub use advisories::BUILTIN_ENTRIES;

/// Separator between crop and condition inside a label
pub const LABEL_SEPARATOR: char = '-';

/// Marker that identifies a healthy condition
pub const HEALTHY_MARKER: &str = "healthy";

/// One class the classifier can predict
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DiseaseEntry {
    /// Full label, e.g. `"Corn-Common_rust"`
    pub label: String,
    /// Crop part of the label, e.g. `"Corn"`
    pub crop: String,
    /// Condition part of the label, e.g. `"Common_rust"`
    pub condition: String,
    /// Treatment recommendation shown to the user
    pub advisory: String,
}

impl DiseaseEntry {
    /// Build an entry, splitting the label into crop and condition
    pub fn new(label: &str, advisory: &str) -> Result<Self> {
        let (crop, condition) = split_label(label)?;

        if advisory.trim().is_empty() {
            return Err(CropDiseaseError::Catalog(format!(
                "label '{}' has an empty advisory",
                label
            )));
        }

        Ok(Self {
            label: label.to_string(),
            crop: crop.to_string(),
            condition: condition.to_string(),
            advisory: advisory.to_string(),
        })
    }

    /// Whether this class represents a healthy plant
    pub fn is_healthy(&self) -> bool {
        self.condition.contains(HEALTHY_MARKER)
    }

    /// One-line diagnosis, e.g. `"Apple leaf infected with Apple_scab"`
    pub fn headline(&self) -> String {
        if self.is_healthy() {
            format!("{} leaf is {}", self.crop, HEALTHY_MARKER)
        } else {
            format!("{} leaf infected with {}", self.crop, self.condition)
        }
    }
}

/// Split a label on its first separator into `(crop, condition)`
pub fn split_label(label: &str) -> Result<(&str, &str)> {
    match label.split_once(LABEL_SEPARATOR) {
        Some((crop, condition)) if !crop.is_empty() && !condition.is_empty() => {
            Ok((crop, condition))
        }
        _ => Err(CropDiseaseError::Catalog(format!(
            "label '{}' is not of the form <Crop>{}<Condition>",
            label, LABEL_SEPARATOR
        ))),
    }
}

/// On-disk form of a catalog entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogRecord {
    pub label: String,
    pub advisory: String,
}

/// Immutable, ordered set of disease classes
#[derive(Debug, Clone)]
pub struct DiseaseCatalog {
    entries: Vec<DiseaseEntry>,
}

impl DiseaseCatalog {
    /// The 14-class catalog the bundled model was trained on
    ///
    /// # Panics
    ///
    /// Only if `BUILTIN_ENTRIES` itself is malformed; the catalog tests
    /// exercise this constructor.
    pub fn builtin() -> Self {
        Self::from_pairs(BUILTIN_ENTRIES.iter().copied())
            .expect("built-in catalog entries are well-formed")
    }

    /// Build a catalog from `(label, advisory)` pairs, in class-index order
    pub fn from_pairs<'a, I>(pairs: I) -> Result<Self>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut seen = HashSet::new();
        let mut entries = Vec::new();

        for (label, advisory) in pairs {
            if !seen.insert(label) {
                return Err(CropDiseaseError::Catalog(format!(
                    "duplicate label '{}'",
                    label
                )));
            }
            entries.push(DiseaseEntry::new(label, advisory)?);
        }

        if entries.is_empty() {
            return Err(CropDiseaseError::Catalog(
                "catalog must contain at least one class".to_string(),
            ));
        }

        Ok(Self { entries })
    }

    /// Parse a JSON array of `{label, advisory}` records
    pub fn from_json(json: &str) -> Result<Self> {
        let records: Vec<CatalogRecord> = serde_json::from_str(json)?;
        Self::from_pairs(
            records
                .iter()
                .map(|r| (r.label.as_str(), r.advisory.as_str())),
        )
    }

    /// Load a catalog file
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CropDiseaseError::PathNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    /// Number of classes
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the catalog has no classes (never true for a validated catalog)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry for a class index
    pub fn get(&self, index: usize) -> Option<&DiseaseEntry> {
        self.entries.get(index)
    }

    /// Look up an entry by its full label
    pub fn by_label(&self, label: &str) -> Option<&DiseaseEntry> {
        self.index_of(label).and_then(|index| self.entries.get(index))
    }

    /// Class index of a label
    pub fn index_of(&self, label: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.label == label)
    }

    /// Advisory text for a label
    pub fn advisory(&self, label: &str) -> Option<&str> {
        self.by_label(label).map(|e| e.advisory.as_str())
    }

    /// Iterate entries in class-index order
    pub fn iter(&self) -> impl Iterator<Item = &DiseaseEntry> {
        self.entries.iter()
    }
}

impl Default for DiseaseCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}
