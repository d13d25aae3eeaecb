//! [`Ontology`] – the schema every fact must conform to.
//!
//! Before a fact enters the static fact set, call [`Ontology::validate`] to
//! verify that its predicate and every argument are declared symbols.  If the
//! check fails a [`KbError::UnknownSymbol`] names the offending symbol and
//! the role it played, and the fact must not be stored.
//!
//! # File format
//!
//! [`SymbolOntology::load`] reads TOML of the form:
//!
//! ```toml
//! symbols = ["on", "beside", "block1", "block2"]
//! commutative = ["beside"]
//! ```
//!
//! Predicates listed under `commutative` are declared symbols as well.

use std::collections::HashSet;
use std::fs;
use std::path::Path;

use factkb_types::{Fact, KbError, SymbolRole};
use serde::Deserialize;
use tracing::info;

// ────────────────────────────────────────────────────────────────────────────
// Ontology trait
// ────────────────────────────────────────────────────────────────────────────

/// Collaborator contract consumed by the fact loader.
///
/// Predicates and arguments share one namespace: object identifiers such as
/// `block1` are declared exactly like predicate names.
pub trait Ontology {
    /// Return `true` when `symbol` is declared.
    fn contains(&self, symbol: &str) -> bool;

    /// Return `true` when every permutation of `predicate`'s arguments
    /// denotes the same fact.
    fn is_commutative(&self, predicate: &str) -> bool;

    /// Return `Ok(())` when every symbol of `fact` is declared, or the first
    /// [`KbError::UnknownSymbol`] otherwise.  The predicate is checked before
    /// the arguments, and arguments in order.
    fn validate(&self, fact: &Fact) -> Result<(), KbError> {
        if !self.contains(fact.predicate()) {
            return Err(KbError::UnknownSymbol {
                symbol: fact.predicate().to_string(),
                role: SymbolRole::Predicate,
            });
        }
        for (position, arg) in fact.args().iter().enumerate() {
            if !self.contains(arg) {
                return Err(KbError::UnknownSymbol {
                    symbol: arg.clone(),
                    role: SymbolRole::Argument { position },
                });
            }
        }
        Ok(())
    }
}

// ────────────────────────────────────────────────────────────────────────────
// SymbolOntology
// ────────────────────────────────────────────────────────────────────────────

/// A flat symbol table with a commutativity marker per predicate.
///
/// # Example
///
/// ```
/// use factkb_kernel::ontology::{Ontology, SymbolOntology};
/// use factkb_types::Fact;
///
/// let mut onto = SymbolOntology::new();
/// onto.declare("block1");
/// onto.declare("block2");
/// onto.mark_commutative("beside");
///
/// assert!(onto.is_commutative("beside"));
/// assert!(onto.validate(&Fact::new("beside", ["block1", "block2"])).is_ok());
/// assert!(onto.validate(&Fact::new("beside", ["block1", "block9"])).is_err());
/// ```
#[derive(Debug, Default, Clone)]
pub struct SymbolOntology {
    symbols: HashSet<String>,
    commutative: HashSet<String>,
}

#[derive(Deserialize)]
struct OntologyFile {
    #[serde(default)]
    symbols: Vec<String>,
    #[serde(default)]
    commutative: Vec<String>,
}

impl SymbolOntology {
    /// Create an empty ontology with no symbols.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `symbol`.  Duplicate declarations are silently ignored.
    pub fn declare(&mut self, symbol: &str) {
        self.symbols.insert(symbol.to_string());
    }

    /// Declare `predicate` and mark it commutative.
    pub fn mark_commutative(&mut self, predicate: &str) {
        self.declare(predicate);
        self.commutative.insert(predicate.to_string());
    }

    /// Parse an ontology from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Config`] when the text is not valid ontology TOML.
    pub fn from_toml_str(raw: &str) -> Result<Self, KbError> {
        let file: OntologyFile = toml::from_str(raw)
            .map_err(|e| KbError::Config(format!("failed to parse ontology: {e}")))?;
        let mut onto = Self::new();
        for symbol in &file.symbols {
            onto.declare(symbol);
        }
        for predicate in &file.commutative {
            onto.mark_commutative(predicate);
        }
        Ok(onto)
    }

    /// Read and parse an ontology TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::Io`] when the file cannot be read and
    /// [`KbError::Config`] when it cannot be parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, KbError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| KbError::Io {
            path: path.display().to_string(),
            details: e.to_string(),
        })?;
        let onto = Self::from_toml_str(&raw)?;
        info!(
            path = %path.display(),
            symbols = onto.len(),
            commutative = onto.commutative.len(),
            "ontology loaded"
        );
        Ok(onto)
    }

    /// Number of declared symbols.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    /// Returns `true` if no symbols are declared.
    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl Ontology for SymbolOntology {
    fn contains(&self, symbol: &str) -> bool {
        self.symbols.contains(symbol)
    }

    fn is_commutative(&self, predicate: &str) -> bool {
        self.commutative.contains(predicate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks_world() -> SymbolOntology {
        let mut onto = SymbolOntology::new();
        for s in ["on", "block1", "block2", "block3"] {
            onto.declare(s);
        }
        onto.mark_commutative("beside");
        onto
    }

    // ── declare / mark_commutative ───────────────────────────────────────────

    #[test]
    fn declared_symbols_are_contained() {
        let onto = blocks_world();
        assert!(onto.contains("on"));
        assert!(onto.contains("block3"));
        assert!(!onto.contains("block4"));
    }

    #[test]
    fn mark_commutative_also_declares() {
        let onto = blocks_world();
        assert!(onto.contains("beside"));
        assert!(onto.is_commutative("beside"));
        assert!(!onto.is_commutative("on"));
    }

    #[test]
    fn duplicate_declare_is_idempotent() {
        let mut onto = SymbolOntology::new();
        onto.declare("a");
        onto.declare("a");
        assert_eq!(onto.len(), 1);
        assert!(!onto.is_empty());
    }

    // ── validate ─────────────────────────────────────────────────────────────

    #[test]
    fn validate_accepts_known_symbols() {
        let onto = blocks_world();
        assert!(onto.validate(&Fact::new("on", ["block1", "block2"])).is_ok());
        assert!(onto.validate(&Fact::new("on", Vec::<String>::new())).is_ok());
    }

    #[test]
    fn validate_reports_unknown_predicate() {
        let onto = blocks_world();
        let err = onto
            .validate(&Fact::new("under", ["block1"]))
            .unwrap_err();
        assert_eq!(
            err,
            KbError::UnknownSymbol {
                symbol: "under".to_string(),
                role: SymbolRole::Predicate,
            }
        );
    }

    #[test]
    fn validate_reports_first_unknown_argument() {
        let onto = blocks_world();
        let err = onto
            .validate(&Fact::new("on", ["block1", "table", "floor"]))
            .unwrap_err();
        assert_eq!(
            err,
            KbError::UnknownSymbol {
                symbol: "table".to_string(),
                role: SymbolRole::Argument { position: 1 },
            }
        );
    }

    // ── TOML loading ─────────────────────────────────────────────────────────

    #[test]
    fn from_toml_str_reads_both_tables() {
        let onto = SymbolOntology::from_toml_str(
            r#"
            symbols = ["on", "block1"]
            commutative = ["beside"]
            "#,
        )
        .unwrap();
        assert!(onto.contains("on"));
        assert!(onto.contains("block1"));
        assert!(onto.contains("beside"));
        assert!(onto.is_commutative("beside"));
        assert_eq!(onto.len(), 3);
    }

    #[test]
    fn from_toml_str_rejects_garbage() {
        let result = SymbolOntology::from_toml_str("symbols = 12");
        assert!(matches!(result, Err(KbError::Config(_))));
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let path = dir.path().join("ontology.toml");
        std::fs::write(&path, "symbols = [\"a\"]\n").expect("write");
        let onto = SymbolOntology::load(&path).expect("load");
        assert!(onto.contains("a"));
    }

    #[test]
    fn load_missing_file_is_io_error() {
        let dir = tempfile::tempdir().expect("tmp dir");
        let result = SymbolOntology::load(dir.path().join("absent.toml"));
        assert!(matches!(result, Err(KbError::Io { .. })));
    }
}
