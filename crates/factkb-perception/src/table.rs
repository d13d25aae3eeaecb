//! [`TableClassifierBank`] – a classifier bank backed by precomputed scores.
//!
//! Training and feature extraction happen offline; what reaches the
//! knowledge base is, per perceptual predicate, the positive-class
//! probability the trained classifier assigned to each object.  The table
//! answers `run_classifier(i, o)` with `(p, 1 − p)`, or with
//! [`Confidence::NO_INFORMATION`] when no score was recorded for the object.
//!
//! # File format
//!
//! ```json
//! {
//!   "max_objects": 32,
//!   "predicates": ["red", "heavy"],
//!   "scores": {
//!     "red":   { "0": 0.92, "7": 0.10 },
//!     "heavy": { "7": 0.65 }
//!   }
//! }
//! ```
//!
//! `max_objects` defaults to [`DEFAULT_MAX_OBJECTS`].  Scores for a predicate
//! missing from `predicates` are rejected.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use factkb_types::{Confidence, KbError};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::classifier::ClassifierBank;

/// Object count used when a table does not specify one.
pub const DEFAULT_MAX_OBJECTS: usize = 32;

fn default_max_objects() -> usize {
    DEFAULT_MAX_OBJECTS
}

#[derive(Debug, Serialize, Deserialize)]
struct TableFile {
    #[serde(default = "default_max_objects")]
    max_objects: usize,
    #[serde(default)]
    predicates: Vec<String>,
    #[serde(default)]
    scores: HashMap<String, HashMap<usize, f64>>,
}

/// Classifier bank that looks scores up in an in-memory table.
///
/// # Example
///
/// ```
/// use factkb_perception::{ClassifierBank, TableClassifierBank};
///
/// let mut bank = TableClassifierBank::new(vec!["red".into(), "heavy".into()], 8);
/// bank.set_score(1, 3, 0.8).unwrap();
///
/// let c = bank.run_classifier(1, 3).unwrap();
/// assert!((c.positive - 0.8).abs() < 1e-12);
/// assert!(bank.run_classifier(0, 3).unwrap().is_no_information());
/// ```
#[derive(Debug, Clone)]
pub struct TableClassifierBank {
    predicates: Vec<String>,
    max_objects: usize,
    /// `scores[i]` holds the positive probabilities for `predicates[i]`.
    scores: Vec<HashMap<usize, f64>>,
}

impl TableClassifierBank {
    /// Create a bank with no recorded scores.
    pub fn new(predicates: Vec<String>, max_objects: usize) -> Self {
        let scores = vec![HashMap::new(); predicates.len()];
        Self {
            predicates,
            max_objects,
            scores,
        }
    }

    /// Create a bank with no perceptual predicates.
    pub fn empty(max_objects: usize) -> Self {
        Self::new(Vec::new(), max_objects)
    }

    /// Record the positive probability of `predicate_index` for
    /// `object_index`, clamped to `[0, 1]`.  Replaces any previous score.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Classifier`] when either index is out of range.
    pub fn set_score(
        &mut self,
        predicate_index: usize,
        object_index: usize,
        positive: f64,
    ) -> Result<(), KbError> {
        self.check_indices(predicate_index, object_index)?;
        self.scores[predicate_index].insert(object_index, positive.clamp(0.0, 1.0));
        Ok(())
    }

    /// Parse a table from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Config`] on invalid JSON or when `scores` names a
    /// predicate absent from `predicates`, and [`KbError::Classifier`] when a
    /// score's object index is outside `[0, max_objects)`.
    pub fn from_json_str(raw: &str) -> Result<Self, KbError> {
        let file: TableFile = serde_json::from_str(raw)
            .map_err(|e| KbError::Config(format!("failed to parse classifier table: {e}")))?;

        let mut bank = Self::new(file.predicates, file.max_objects);
        for (predicate, by_object) in file.scores {
            let predicate_index = bank
                .predicates
                .iter()
                .position(|p| *p == predicate)
                .ok_or_else(|| {
                    KbError::Config(format!(
                        "classifier table scores unknown predicate '{predicate}'"
                    ))
                })?;
            for (object_index, positive) in by_object {
                bank.set_score(predicate_index, object_index, positive)?;
            }
        }
        Ok(bank)
    }

    /// Read and parse a JSON table file.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Io`] when the file cannot be read, otherwise as
    /// [`from_json_str`][Self::from_json_str].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KbError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| KbError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let bank = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            predicates = bank.predicates.len(),
            max_objects = bank.max_objects,
            "classifier table loaded"
        );
        Ok(bank)
    }

    /// Override the object bound, e.g. from configuration.
    pub fn with_max_objects(mut self, max_objects: usize) -> Self {
        self.max_objects = max_objects;
        self
    }

    fn check_indices(&self, predicate_index: usize, object_index: usize) -> Result<(), KbError> {
        if predicate_index >= self.predicates.len() {
            return Err(KbError::Classifier {
                predicate_index,
                details: format!("bank has {} classifiers", self.predicates.len()),
            });
        }
        if object_index >= self.max_objects {
            return Err(KbError::Classifier {
                predicate_index,
                details: format!(
                    "object index {object_index} is outside [0, {})",
                    self.max_objects
                ),
            });
        }
        Ok(())
    }
}

impl ClassifierBank for TableClassifierBank {
    fn predicates(&self) -> &[String] {
        &self.predicates
    }

    fn max_objects(&self) -> usize {
        self.max_objects
    }

    fn run_classifier(
        &self,
        predicate_index: usize,
        object_index: usize,
    ) -> Result<Confidence, KbError> {
        self.check_indices(predicate_index, object_index)?;
        Ok(self.scores[predicate_index]
            .get(&object_index)
            .map(|&p| Confidence::from_positive(p))
            .unwrap_or(Confidence::NO_INFORMATION))
    }
}
