//! `factkb-runtime` – the Query Resolver.
//!
//! Reconciles the two truth models of the knowledge base behind one query
//! interface: exact set membership for static facts and classifier
//! confidences for perceptual predicates.
//!
//! # Modules
//!
//! - [`knowledge_base`] – [`KnowledgeBase`][knowledge_base::KnowledgeBase]:
//!   loads the static facts, binds to a
//!   [`ClassifierBank`][factkb_perception::ClassifierBank], and answers
//!   ground queries with a [`Confidence`][factkb_types::Confidence] pair.
//!   Dispatch precedence is static, then perceptual, then unknown
//!   (closed-world false).
//! - [`shared`] – [`SharedKnowledgeBase`][shared::SharedKnowledgeBase]: a
//!   cloneable handle guarding a knowledge base with a read-write lock so
//!   several threads may query while another mutates.
//! - [`telemetry`] – [`init_tracing`][telemetry::init_tracing]:
//!   initialises the global `tracing` subscriber with an optional OTLP span
//!   exporter.  Set `OTEL_EXPORTER_OTLP_ENDPOINT` to enable live trace export.

pub mod knowledge_base;
pub mod shared;
pub mod telemetry;

pub use knowledge_base::{KnowledgeBase, KnowledgeBaseConfig};
pub use shared::SharedKnowledgeBase;
pub use telemetry::{init_tracing, LogFormat, SpanFlusher, TracerProviderGuard};
