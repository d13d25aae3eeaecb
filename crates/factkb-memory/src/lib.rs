//! `factkb-memory` – the static half of the Knowledge Base.
//!
//! Holds the explicit extension of every non-perceptual predicate under the
//! closed-world assumption: a fact that is not stored is false.
//!
//! # Modules
//!
//! - [`static_facts`] – [`StaticFactStore`][static_facts::StaticFactStore]:
//!   the static fact set and static predicate set, with commutative
//!   expansion of facts over all distinct argument permutations.
//! - [`fact_file`] – the line-oriented fact file loader.  Lines with a
//!   wrong parenthesis count are logged and skipped; symbols unknown to the
//!   [`Ontology`][factkb_kernel::Ontology] abort the load.

pub mod fact_file;
pub mod static_facts;

pub use fact_file::{load_fact_file, parse_facts, LoadReport, SkippedLine};
pub use static_facts::{distinct_permutations, StaticFactStore};
