//! Fact file loader.
//!
//! One fact per line in the grammar `predicate(arg1, ..., argN)`:
//!
//! ```text
//! # comment lines start with '#'
//! on(block1, block2)
//! beside(block1, block3)
//! door_open()
//! ```
//!
//! Blank lines and lines starting with `#` (after trimming) are ignored.  A
//! line without exactly one `(` and one `)` is logged at `warn` level,
//! recorded in the [`LoadReport`] and skipped; the rest of the file still
//! loads.  Every other line is split into a predicate and its arguments as
//! written, so a stray character ends up inside a symbol.  A symbol unknown
//! to the [`Ontology`] aborts the whole load and no store is returned.
//!
//! A leading `*` on the predicate (`*beside(a, b)`) marks that one fact as
//! commutative even when the ontology does not.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use factkb_kernel::Ontology;
use factkb_types::{Fact, KbError};
use serde::Serialize;
use tracing::{info, warn};

use crate::static_facts::StaticFactStore;

/// A line the loader could not read as a fact.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedLine {
    /// One-based line number.
    pub line_number: usize,
    /// The trimmed line text.
    pub text: String,
    pub reason: String,
}

/// Summary of one load.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadReport {
    /// Physical lines read, including blanks and comments.
    pub lines_read: usize,
    /// Facts accepted from the file, before commutative expansion.
    pub facts_declared: usize,
    /// Fact tuples in the resulting store, after expansion.
    pub facts_stored: usize,
    pub skipped: Vec<SkippedLine>,
}

/// Load the fact file at `path`, validating every fact against `ontology`.
///
/// # Errors
///
/// Returns [`KbError::Io`] when the file cannot be opened or read, and
/// [`KbError::UnknownSymbol`] for the first fact mentioning an undeclared
/// symbol.
pub fn load_fact_file<O: Ontology + ?Sized>(
    path: impl AsRef<Path>,
    ontology: &O,
) -> Result<(StaticFactStore, LoadReport), KbError> {
    let path = path.as_ref();
    let source = path.display().to_string();
    let file = File::open(path).map_err(|e| KbError::Io {
        path: source.clone(),
        details: e.to_string(),
    })?;
    parse_facts(BufReader::new(file), ontology, &source)
}

/// Parse facts from any buffered reader.  `source` names the input in logs
/// and I/O errors.
///
/// # Errors
///
/// As [`load_fact_file`].
pub fn parse_facts<R: BufRead, O: Ontology + ?Sized>(
    reader: R,
    ontology: &O,
    source: &str,
) -> Result<(StaticFactStore, LoadReport), KbError> {
    let mut store = StaticFactStore::new();
    let mut report = LoadReport::default();

    for (i, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| KbError::Io {
            path: source.to_string(),
            details: e.to_string(),
        })?;
        let line_number = i + 1;
        report.lines_read = line_number;

        let text = line.trim();
        if text.is_empty() || text.starts_with('#') {
            continue;
        }

        let Some(parsed) = split_fact_line(text) else {
            let reason = "expected exactly one '(' and one ')'".to_string();
            warn!(source, line = line_number, text, %reason, "unreadable fact; skipping line");
            report.skipped.push(SkippedLine {
                line_number,
                text: text.to_string(),
                reason,
            });
            continue;
        };

        ontology.validate(&parsed.fact)?;
        let commutative = parsed.starred || ontology.is_commutative(parsed.fact.predicate());
        store.insert_expanded(parsed.fact, commutative);
        report.facts_declared += 1;
    }

    report.facts_stored = store.len();
    info!(
        source,
        declared = report.facts_declared,
        stored = report.facts_stored,
        skipped = report.skipped.len(),
        "static facts loaded"
    );
    Ok((store, report))
}

struct FactLine {
    fact: Fact,
    starred: bool,
}

/// Split `predicate(arg1, ..., argN)` at its parentheses.  Returns `None`
/// only for a wrong parenthesis count; symbols are not checked here.
fn split_fact_line(text: &str) -> Option<FactLine> {
    if text.matches('(').count() != 1 || text.matches(')').count() != 1 {
        return None;
    }
    let (head, rest) = text.split_once('(')?;
    let head = head.trim();
    let (predicate, starred) = match head.strip_prefix('*') {
        Some(stripped) => (stripped.trim_start(), true),
        None => (head, false),
    };

    let rest = rest.trim();
    let inner = rest.strip_suffix(')').unwrap_or(rest).trim();
    let args: Vec<&str> = if inner.is_empty() {
        Vec::new()
    } else {
        inner.split(',').map(str::trim).collect()
    };

    Some(FactLine {
        fact: Fact::new(predicate, args),
        starred,
    })
}
