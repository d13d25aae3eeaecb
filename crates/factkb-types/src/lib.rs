//! `factkb-types` – shared vocabulary of the factkb workspace.
//!
//! Every crate in the workspace speaks in terms of the types defined here:
//!
//! - [`Fact`] – a ground tuple `predicate(arg_1, ..., arg_N)` of opaque
//!   symbols with structural equality and hashing.
//! - [`Confidence`] – the `(positive, negative)` answer to a query.
//! - [`PredicateKind`] – which dispatch path a predicate symbol takes.
//! - [`KbError`] – the workspace-wide error type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ─────────────────────────────────────────────────────────────────────────────
// Fact
// ─────────────────────────────────────────────────────────────────────────────

/// An immutable ground fact `(predicate, arg_1, ..., arg_N)`.
///
/// Equality and hashing are order-sensitive over the whole tuple, so
/// `beside(a, b)` and `beside(b, a)` are different facts, and so are facts
/// that share a predicate but differ in arity.
///
/// [`FromStr`] accepts the query text form, a stricter cousin of the
/// fact-file grammar that rejects empty symbols and trailing text:
///
/// ```
/// use factkb_types::Fact;
///
/// let fact: Fact = "beside( block1 , block2 )".parse().unwrap();
/// assert_eq!(fact.predicate(), "beside");
/// assert_eq!(fact.args(), ["block1", "block2"]);
/// assert_eq!(fact.to_string(), "beside(block1, block2)");
///
/// let nullary: Fact = "raining()".parse().unwrap();
/// assert_eq!(nullary.arity(), 0);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Fact {
    predicate: String,
    args: Vec<String>,
}

impl Fact {
    /// Build a fact from a predicate symbol and its arguments in order.
    pub fn new<P, I, A>(predicate: P, args: I) -> Self
    where
        P: Into<String>,
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        Self {
            predicate: predicate.into(),
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// The predicate symbol.
    pub fn predicate(&self) -> &str {
        &self.predicate
    }

    /// The argument symbols in order.
    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.args.len()
    }

    /// Return a fact with the same predicate and the given argument order.
    pub fn with_args(&self, args: Vec<String>) -> Self {
        Self {
            predicate: self.predicate.clone(),
            args,
        }
    }
}

impl fmt::Display for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.predicate, self.args.join(", "))
    }
}

impl FromStr for Fact {
    type Err = KbError;

    /// Parse `predicate(arg1, ..., argN)`.
    ///
    /// Whitespace around the predicate, the parentheses and each argument is
    /// ignored.  Exactly one `(` and one `)` must be present, the `)` must
    /// close the text, and neither the predicate nor any argument may be
    /// empty.  `pred()` parses to a nullary fact.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let text = s.trim();
        let malformed = |reason: &str| KbError::MalformedFact {
            text: text.to_string(),
            reason: reason.to_string(),
        };

        if text.matches('(').count() != 1 || text.matches(')').count() != 1 {
            return Err(malformed("expected exactly one '(' and one ')'"));
        }
        let (predicate, rest) = text
            .split_once('(')
            .ok_or_else(|| malformed("missing '('"))?;
        let predicate = predicate.trim();
        if predicate.is_empty() {
            return Err(malformed("missing predicate name"));
        }
        let inner = rest
            .trim_end()
            .strip_suffix(')')
            .ok_or_else(|| malformed("')' must close the fact"))?
            .trim();

        let args = if inner.is_empty() {
            Vec::new()
        } else {
            inner
                .split(',')
                .map(str::trim)
                .map(|a| {
                    if a.is_empty() {
                        Err(malformed("empty argument"))
                    } else {
                        Ok(a.to_string())
                    }
                })
                .collect::<Result<Vec<_>, _>>()?
        };

        Ok(Fact::new(predicate, args))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Confidence
// ─────────────────────────────────────────────────────────────────────────────

/// Answer to a query: belief that the fact holds and belief that it does not.
///
/// Both values are in `[0, 1]`.  A confident answer sums to `1.0`; the
/// all-zero pair [`Confidence::NO_INFORMATION`] marks a degenerate answer
/// where no evidence was available.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Confidence {
    pub positive: f64,
    pub negative: f64,
}

impl Confidence {
    /// Certainly true.
    pub const TRUE: Confidence = Confidence {
        positive: 1.0,
        negative: 0.0,
    };
    /// Certainly false.
    pub const FALSE: Confidence = Confidence {
        positive: 0.0,
        negative: 1.0,
    };
    /// No evidence either way.
    pub const NO_INFORMATION: Confidence = Confidence {
        positive: 0.0,
        negative: 0.0,
    };

    /// Build `(p, 1 - p)` from a positive probability, clamped to `[0, 1]`.
    pub fn from_positive(positive: f64) -> Self {
        let p = positive.clamp(0.0, 1.0);
        Self {
            positive: p,
            negative: 1.0 - p,
        }
    }

    /// Return `true` for the all-zero sentinel.
    pub fn is_no_information(&self) -> bool {
        self.positive == 0.0 && self.negative == 0.0
    }

    /// `(positive, negative)` as a tuple.
    pub fn as_pair(&self) -> (f64, f64) {
        (self.positive, self.negative)
    }
}

impl From<Confidence> for (f64, f64) {
    fn from(c: Confidence) -> Self {
        c.as_pair()
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.positive, self.negative)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dispatch classification
// ─────────────────────────────────────────────────────────────────────────────

/// How a query predicate is answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateKind {
    /// Enumerated in the static fact set; answered by membership.
    Static,
    /// Backed by the classifier at `index` in the perceptual predicate list.
    Perceptual { index: usize },
    /// Known to neither; answered false under the closed-world assumption.
    Unknown,
}

/// Where an offending symbol appeared inside a fact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolRole {
    Predicate,
    /// Zero-based argument position.
    Argument { position: usize },
}

impl fmt::Display for SymbolRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SymbolRole::Predicate => write!(f, "predicate"),
            SymbolRole::Argument { position } => write!(f, "argument #{position}"),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Global error type spanning ontology validation, malformed input, missing
/// facts and I/O.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KbError {
    #[error("Ontology Violation: unknown {role} symbol '{symbol}'")]
    UnknownSymbol { symbol: String, role: SymbolRole },

    #[error("Malformed Fact '{text}': {reason}")]
    MalformedFact { text: String, reason: String },

    #[error("Malformed Query {query}: {reason}")]
    MalformedQuery { query: String, reason: String },

    #[error("Fact Not Found: {0}")]
    FactNotFound(Fact),

    #[error("Classifier Error for predicate index {predicate_index}: {details}")]
    Classifier {
        predicate_index: usize,
        details: String,
    },

    #[error("I/O Error on {path}: {details}")]
    Io { path: String, details: String },

    #[error("Configuration Error: {0}")]
    Config(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    // ── Fact ────────────────────────────────────────────────────────────────

    #[test]
    fn fact_equality_is_order_sensitive() {
        let ab = Fact::new("beside", ["a", "b"]);
        let ba = Fact::new("beside", ["b", "a"]);
        assert_ne!(ab, ba);
        assert_eq!(ab, Fact::new("beside", ["a", "b"]));
    }

    #[test]
    fn facts_with_different_arity_are_distinct() {
        let mut set = HashSet::new();
        set.insert(Fact::new("p", ["a"]));
        set.insert(Fact::new("p", ["a", "a"]));
        set.insert(Fact::new("p", Vec::<String>::new()));
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn parse_strips_whitespace_everywhere() {
        let fact: Fact = "  owns ( alice ,bob )  ".parse().unwrap();
        assert_eq!(fact, Fact::new("owns", ["alice", "bob"]));
    }

    #[test]
    fn parse_empty_parens_is_nullary() {
        let fact: Fact = "door_open()".parse().unwrap();
        assert_eq!(fact.predicate(), "door_open");
        assert!(fact.args().is_empty());
    }

    #[test]
    fn parse_rejects_paren_count() {
        assert!(matches!(
            "p(a(b)".parse::<Fact>(),
            Err(KbError::MalformedFact { .. })
        ));
        assert!(matches!(
            "p a, b".parse::<Fact>(),
            Err(KbError::MalformedFact { .. })
        ));
        assert!(matches!(
            "p(a))".parse::<Fact>(),
            Err(KbError::MalformedFact { .. })
        ));
    }

    #[test]
    fn parse_rejects_trailing_text_and_empty_parts() {
        assert!("p(a) extra".parse::<Fact>().is_err());
        assert!(")p(a".parse::<Fact>().is_err());
        assert!("(a, b)".parse::<Fact>().is_err());
        assert!("p(a,,b)".parse::<Fact>().is_err());
        assert!("p(a, )".parse::<Fact>().is_err());
    }

    #[test]
    fn display_matches_file_grammar() {
        let fact = Fact::new("beside", ["block1", "block2"]);
        assert_eq!(fact.to_string(), "beside(block1, block2)");
        let back: Fact = fact.to_string().parse().unwrap();
        assert_eq!(back, fact);
    }

    #[test]
    fn with_args_keeps_predicate() {
        let fact = Fact::new("beside", ["a", "b"]);
        let swapped = fact.with_args(vec!["b".into(), "a".into()]);
        assert_eq!(swapped.predicate(), "beside");
        assert_eq!(swapped.args(), ["b", "a"]);
    }

    // ── Confidence ──────────────────────────────────────────────────────────

    #[test]
    fn from_positive_sums_to_one() {
        let c = Confidence::from_positive(0.75);
        assert!((c.positive + c.negative - 1.0).abs() < 1e-12);
        assert!((c.negative - 0.25).abs() < 1e-12);
    }

    #[test]
    fn from_positive_clamps() {
        assert_eq!(Confidence::from_positive(1.7), Confidence::TRUE);
        assert_eq!(Confidence::from_positive(-0.2), Confidence::FALSE);
    }

    #[test]
    fn no_information_sentinel() {
        assert!(Confidence::NO_INFORMATION.is_no_information());
        assert!(!Confidence::FALSE.is_no_information());
        assert_eq!(Confidence::NO_INFORMATION.as_pair(), (0.0, 0.0));
    }

    // ── KbError ─────────────────────────────────────────────────────────────

    #[test]
    fn kb_error_display() {
        let err = KbError::UnknownSymbol {
            symbol: "blok1".to_string(),
            role: SymbolRole::Argument { position: 0 },
        };
        let msg = err.to_string();
        assert!(msg.contains("blok1"));
        assert!(msg.contains("argument #0"));

        let err = KbError::FactNotFound(Fact::new("on", ["a", "b"]));
        assert!(err.to_string().contains("on(a, b)"));
    }

    #[test]
    fn kb_error_serialization_roundtrip() {
        let err = KbError::MalformedQuery {
            query: "red(box)".to_string(),
            reason: "bad object reference".to_string(),
        };
        let json = serde_json::to_string(&err).unwrap();
        let back: KbError = serde_json::from_str(&json).unwrap();
        assert_eq!(err, back);
    }
}
