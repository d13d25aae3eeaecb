//! Hybrid fact-query engine.
//!
//! A [`KnowledgeBase`] answers a ground query `predicate(arg_1, ..., arg_N)`
//! with a [`Confidence`] pair.  The predicate decides the path:
//!
//! 1. **Static** – the predicate appears in the static fact set.  The answer
//!    is [`Confidence::TRUE`] when the exact tuple is stored and
//!    [`Confidence::FALSE`] otherwise.
//! 2. **Perceptual** – the predicate is one of the classifier bank's
//!    predicates.  The query must be unary with an `oidx_<n>` argument; the
//!    bank's answer for `(predicate handle, n)` is returned verbatim.
//! 3. **Unknown** – neither.  The answer is [`Confidence::FALSE`].
//!
//! A malformed perceptual query (wrong arity, bad object reference) is an
//! error, never a silent "false".
//!
//! # Example
//!
//! ```rust
//! use factkb_memory::StaticFactStore;
//! use factkb_perception::TableClassifierBank;
//! use factkb_runtime::KnowledgeBase;
//! use factkb_types::{Confidence, Fact};
//!
//! let mut store = StaticFactStore::new();
//! store.insert_expanded(Fact::new("beside", ["block1", "block2"]), true);
//!
//! let mut bank = TableClassifierBank::new(vec!["red".into()], 32);
//! bank.set_score(0, 7, 0.9).unwrap();
//!
//! let kb = KnowledgeBase::from_parts(store, bank);
//! assert_eq!(kb.query(&Fact::new("beside", ["block2", "block1"])).unwrap(), Confidence::TRUE);
//! assert_eq!(kb.query(&Fact::new("beside", ["block1", "block3"])).unwrap(), Confidence::FALSE);
//! assert!((kb.query(&Fact::new("red", ["oidx_7"])).unwrap().positive - 0.9).abs() < 1e-12);
//! assert_eq!(kb.query(&Fact::new("blue", ["oidx_7"])).unwrap(), Confidence::FALSE);
//! assert!(kb.query(&Fact::new("red", ["block1"])).is_err());
//! ```

use std::path::{Path, PathBuf};

use factkb_kernel::{Ontology, SymbolOntology};
use factkb_memory::{load_fact_file, LoadReport, StaticFactStore};
use factkb_perception::table::DEFAULT_MAX_OBJECTS;
use factkb_perception::{decode_object_ref, ClassifierBank, PerceptualIndex, TableClassifierBank};
use factkb_types::{Confidence, Fact, KbError, PredicateKind};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

// ─────────────────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────────────────

/// Inputs needed to build a file-backed [`KnowledgeBase`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct KnowledgeBaseConfig {
    /// Static fact file.
    pub facts_path: PathBuf,
    /// Ontology TOML file used to validate the facts.
    pub ontology_path: PathBuf,
    /// Classifier score table.  When `None`, no predicate is perceptual.
    pub classifier_table_path: Option<PathBuf>,
    /// Object references decode to indices in `[0, max_objects)`.
    pub max_objects: usize,
}

impl Default for KnowledgeBaseConfig {
    fn default() -> Self {
        Self {
            facts_path: PathBuf::from("facts.txt"),
            ontology_path: PathBuf::from("ontology.toml"),
            classifier_table_path: None,
            max_objects: DEFAULT_MAX_OBJECTS,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// KnowledgeBase
// ─────────────────────────────────────────────────────────────────────────────

/// Static fact store plus a bound classifier bank.
///
/// Construct with [`KnowledgeBase::open`] (fact file + ontology + bank),
/// [`KnowledgeBase::from_config`], or [`KnowledgeBase::from_parts`].
/// Query with [`query`][KnowledgeBase::query]; mutate the static facts with
/// [`add_static_fact`][KnowledgeBase::add_static_fact] and
/// [`remove_static_fact`][KnowledgeBase::remove_static_fact].
pub struct KnowledgeBase<B> {
    store: StaticFactStore,
    bank: B,
    perceptual: PerceptualIndex,
    load_report: LoadReport,
}

impl<B: ClassifierBank> KnowledgeBase<B> {
    /// Load static facts from `facts_path`, validated against `ontology`, and
    /// bind to `bank`.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Io`] when the fact file cannot be read and
    /// [`KbError::UnknownSymbol`] when a fact mentions an undeclared symbol.
    /// Lines with a wrong parenthesis count are skipped, not errors; see
    /// [`load_report`][Self::load_report].
    pub fn open<O: Ontology + ?Sized>(
        facts_path: impl AsRef<Path>,
        ontology: &O,
        bank: B,
    ) -> Result<Self, KbError> {
        let (store, report) = load_fact_file(facts_path, ontology)?;
        let mut kb = Self::from_parts(store, bank);
        kb.load_report = report;
        Ok(kb)
    }

    /// Bind an already populated store to `bank`.
    pub fn from_parts(store: StaticFactStore, bank: B) -> Self {
        let perceptual = PerceptualIndex::from_bank(&bank);
        for predicate in perceptual.predicates() {
            if store.has_predicate(predicate) {
                warn!(
                    predicate = %predicate,
                    "predicate is both static and perceptual; static facts take precedence"
                );
            }
        }
        Self {
            store,
            bank,
            perceptual,
            load_report: LoadReport::default(),
        }
    }

    /// Which dispatch path `predicate` takes.
    pub fn predicate_kind(&self, predicate: &str) -> PredicateKind {
        if self.store.has_predicate(predicate) {
            PredicateKind::Static
        } else if let Some(index) = self.perceptual.index_of(predicate) {
            PredicateKind::Perceptual { index }
        } else {
            PredicateKind::Unknown
        }
    }

    /// Answer a ground query.
    ///
    /// # Errors
    ///
    /// For a perceptual predicate, returns [`KbError::MalformedQuery`] when
    /// the query is not unary or its argument is not an `oidx_<n>` reference
    /// with `n < max_objects`, and propagates [`KbError::Classifier`] from the
    /// bank.  Static and unknown predicates never fail.
    #[instrument(level = "debug", skip_all, fields(query = %fact))]
    pub fn query(&self, fact: &Fact) -> Result<Confidence, KbError> {
        match self.predicate_kind(fact.predicate()) {
            PredicateKind::Static => {
                let answer = if self.store.contains(fact) {
                    Confidence::TRUE
                } else {
                    Confidence::FALSE
                };
                debug!(%answer, "static lookup");
                Ok(answer)
            }
            PredicateKind::Perceptual { index } => {
                let malformed = |reason: String| KbError::MalformedQuery {
                    query: fact.to_string(),
                    reason,
                };
                let [object] = fact.args() else {
                    return Err(malformed(format!(
                        "perceptual predicate '{}' takes 1 argument, got {}",
                        fact.predicate(),
                        fact.arity()
                    )));
                };
                let object_index = decode_object_ref(object, self.bank.max_objects())
                    .map_err(|e| malformed(e.to_string()))?;
                let answer = self.bank.run_classifier(index, object_index)?;
                debug!(classifier = index, object = object_index, %answer, "perceptual lookup");
                Ok(answer)
            }
            PredicateKind::Unknown => {
                debug!("unknown predicate; closed-world false");
                Ok(Confidence::FALSE)
            }
        }
    }

    /// Parse `text` in fact grammar and [`query`][Self::query] it.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::MalformedFact`] when `text` does not parse, and
    /// otherwise as [`query`][Self::query].
    pub fn query_text(&self, text: &str) -> Result<Confidence, KbError> {
        let fact: Fact = text.parse()?;
        self.query(&fact)
    }

    /// Insert `fact` into the static fact set and register its predicate as
    /// static.  Adding a fact that is already stored is a no-op.
    ///
    /// The fact is stored exactly as given; it is neither validated against
    /// an ontology nor expanded over permutations.
    pub fn add_static_fact(&mut self, fact: Fact) {
        if self.perceptual.contains(fact.predicate()) && !self.store.has_predicate(fact.predicate()) {
            warn!(
                predicate = %fact.predicate(),
                "static fact shadows a perceptual predicate"
            );
        }
        let label = fact.to_string();
        if self.store.add(fact) {
            debug!(fact = %label, "static fact added");
        }
    }

    /// Remove exactly `fact` from the static fact set.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::FactNotFound`] when `fact` is not stored.
    pub fn remove_static_fact(&mut self, fact: &Fact) -> Result<(), KbError> {
        self.store.remove(fact)?;
        debug!(fact = %fact, "static fact removed");
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Introspection
    // -------------------------------------------------------------------------

    /// Number of stored static fact tuples.
    pub fn static_fact_count(&self) -> usize {
        self.store.len()
    }

    /// Stored static facts in no particular order.
    pub fn static_facts(&self) -> impl Iterator<Item = &Fact> {
        self.store.facts()
    }

    /// Static predicates in no particular order.
    pub fn static_predicates(&self) -> impl Iterator<Item = &str> {
        self.store.predicates()
    }

    /// Perceptual predicates in classifier order.
    pub fn perceptual_predicates(&self) -> &[String] {
        self.perceptual.predicates()
    }

    /// Summary of the fact file load; empty for [`from_parts`][Self::from_parts].
    pub fn load_report(&self) -> &LoadReport {
        &self.load_report
    }

    /// The bound classifier bank.
    pub fn bank(&self) -> &B {
        &self.bank
    }
}

impl KnowledgeBase<TableClassifierBank> {
    /// Build a knowledge base entirely from files named in `config`.
    ///
    /// # Errors
    ///
    /// Returns the first ontology, classifier table or fact file error.
    pub fn from_config(config: &KnowledgeBaseConfig) -> Result<Self, KbError> {
        let ontology = SymbolOntology::load(&config.ontology_path)?;
        let bank = match &config.classifier_table_path {
            Some(path) => TableClassifierBank::load(path)?.with_max_objects(config.max_objects),
            None => TableClassifierBank::empty(config.max_objects),
        };
        let kb = Self::open(&config.facts_path, &ontology, bank)?;
        info!(
            static_facts = kb.static_fact_count(),
            perceptual_predicates = kb.perceptual_predicates().len(),
            "knowledge base ready"
        );
        Ok(kb)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
