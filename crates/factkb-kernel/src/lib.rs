//! `factkb-kernel` – the Ontology boundary.
//!
//! The kernel does not answer queries; it decides which symbols exist and
//! which predicates are symmetric, and rejects facts that mention anything
//! else.
//!
//! # Modules
//!
//! - [`ontology`] – the [`Ontology`][ontology::Ontology] collaborator
//!   contract (symbol membership, commutativity, fact validation) and
//!   [`SymbolOntology`][ontology::SymbolOntology], an in-memory
//!   implementation that can be declared programmatically or loaded from a
//!   TOML file.

pub mod ontology;

pub use ontology::{Ontology, SymbolOntology};
