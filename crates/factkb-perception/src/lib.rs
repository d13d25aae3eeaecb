//! `factkb-perception` – the Perceptual Classifier Bank boundary.
//!
//! Turns unary perceptual predicates (`red`, `heavy`, `rattles`) applied to
//! encoded object references into classifier confidences.
//!
//! # Modules
//!
//! - [`classifier`] – the [`ClassifierBank`][classifier::ClassifierBank]
//!   collaborator contract and [`PerceptualIndex`][classifier::PerceptualIndex],
//!   which maps each perceptual predicate to the stable integer handle the
//!   bank uses to address its classifiers.
//! - [`object_ref`] – decoding and encoding of `oidx_<n>` object references.
//! - [`table`] – [`TableClassifierBank`][table::TableClassifierBank]: a
//!   bank backed by a precomputed score table, loadable from JSON.

pub mod classifier;
pub mod object_ref;
pub mod table;

pub use classifier::{ClassifierBank, PerceptualIndex};
pub use object_ref::{decode_object_ref, encode_object_ref, ObjectRefError, OBJECT_REF_PREFIX};
pub use table::TableClassifierBank;
