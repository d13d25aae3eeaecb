//! [`ClassifierBank`] – learned unary predicates.
//!
//! A bank owns an ordered list of perceptual predicate symbols.  Order is
//! significant: classifiers are addressed by their position in that list,
//! so [`PerceptualIndex`] snapshots the list once and turns symbol lookup
//! into a hash lookup instead of a linear search per query.

use std::collections::HashMap;

use factkb_types::{Confidence, KbError};

// ────────────────────────────────────────────────────────────────────────────
// ClassifierBank trait
// ────────────────────────────────────────────────────────────────────────────

/// Collaborator contract for a bank of trained perceptual classifiers.
pub trait ClassifierBank {
    /// Perceptual predicate symbols, in classifier order.
    fn predicates(&self) -> &[String];

    /// Number of addressable objects; valid object indices are
    /// `0..max_objects()`.
    fn max_objects(&self) -> usize;

    /// Run classifier `predicate_index` on object `object_index`.
    ///
    /// A confident answer sums to `1.0`.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Classifier`] when either index is outside the
    /// bank's range.
    fn run_classifier(
        &self,
        predicate_index: usize,
        object_index: usize,
    ) -> Result<Confidence, KbError>;
}

impl<B: ClassifierBank + ?Sized> ClassifierBank for Box<B> {
    fn predicates(&self) -> &[String] {
        (**self).predicates()
    }

    fn max_objects(&self) -> usize {
        (**self).max_objects()
    }

    fn run_classifier(
        &self,
        predicate_index: usize,
        object_index: usize,
    ) -> Result<Confidence, KbError> {
        (**self).run_classifier(predicate_index, object_index)
    }
}

// ────────────────────────────────────────────────────────────────────────────
// PerceptualIndex
// ────────────────────────────────────────────────────────────────────────────

/// Predicate symbol → classifier handle, assigned once from a bank's
/// predicate list.
///
/// If a symbol appears more than once in the list, its first position wins.
///
/// ```
/// use factkb_perception::classifier::PerceptualIndex;
///
/// let index = PerceptualIndex::new(&["red".to_string(), "heavy".to_string()]);
/// assert_eq!(index.index_of("heavy"), Some(1));
/// assert_eq!(index.index_of("blue"), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct PerceptualIndex {
    order: Vec<String>,
    handles: HashMap<String, usize>,
}

impl PerceptualIndex {
    /// Build the index from an ordered predicate list.
    pub fn new(predicates: &[String]) -> Self {
        let mut handles = HashMap::with_capacity(predicates.len());
        for (i, p) in predicates.iter().enumerate() {
            handles.entry(p.clone()).or_insert(i);
        }
        Self {
            order: predicates.to_vec(),
            handles,
        }
    }

    /// Build the index from a bank's current predicate list.
    pub fn from_bank<B: ClassifierBank + ?Sized>(bank: &B) -> Self {
        Self::new(bank.predicates())
    }

    /// The classifier handle for `predicate`, if it is perceptual.
    pub fn index_of(&self, predicate: &str) -> Option<usize> {
        self.handles.get(predicate).copied()
    }

    /// Returns `true` when `predicate` is perceptual.
    pub fn contains(&self, predicate: &str) -> bool {
        self.handles.contains_key(predicate)
    }

    /// Predicates in classifier order.
    pub fn predicates(&self) -> &[String] {
        &self.order
    }

    /// Number of predicates in the list.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the bank has no perceptual predicates.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
