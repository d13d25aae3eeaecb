//! Static fact set.
//!
//! ## Model
//!
//! The store keeps two sets:
//!
//! * the **fact set** – every ground [`Fact`] known to hold, compared as an
//!   order-sensitive tuple;
//! * the **predicate set** – every predicate symbol that has been stored at
//!   least once.  A predicate in this set is answered by membership; a
//!   predicate outside it is not the store's business.
//!
//! ### Commutative expansion
//!
//! A fact over a commutative predicate is stored once per distinct
//! permutation of its arguments, so `beside(a, b)` also stores
//! `beside(b, a)`.  With `k` distinct arguments that is `k!` tuples; repeated
//! arguments collapse permutations that would be identical.
//!
//! # Example
//!
//! ```rust
//! use factkb_memory::static_facts::StaticFactStore;
//! use factkb_types::Fact;
//!
//! let mut store = StaticFactStore::new();
//! store.insert_expanded(Fact::new("beside", ["block1", "block2"]), true);
//!
//! assert!(store.contains(&Fact::new("beside", ["block2", "block1"])));
//! assert_eq!(store.len(), 2);
//! assert!(store.has_predicate("beside"));
//! ```

use std::collections::HashSet;

use factkb_types::{Fact, KbError};

// ─────────────────────────────────────────────────────────────────────────────
// Permutations
// ─────────────────────────────────────────────────────────────────────────────

/// Every distinct ordering of `args`, in lexicographic order.
///
/// Duplicate arguments do not produce duplicate orderings, so `[a, a, b]`
/// yields three permutations rather than six.  An empty slice yields one
/// empty permutation.
pub fn distinct_permutations(args: &[String]) -> Vec<Vec<String>> {
    let mut current = args.to_vec();
    current.sort();
    let mut out = vec![current.clone()];
    while next_permutation(&mut current) {
        out.push(current.clone());
    }
    out
}

/// Advance `items` to the next lexicographic permutation in place.
/// Returns `false` (leaving `items` untouched) when it is already the last.
fn next_permutation<T: Ord>(items: &mut [T]) -> bool {
    if items.len() < 2 {
        return false;
    }
    let mut pivot = items.len() - 1;
    while pivot > 0 && items[pivot - 1] >= items[pivot] {
        pivot -= 1;
    }
    if pivot == 0 {
        return false;
    }
    let mut successor = items.len() - 1;
    while items[successor] <= items[pivot - 1] {
        successor -= 1;
    }
    items.swap(pivot - 1, successor);
    items[pivot..].reverse();
    true
}

// ─────────────────────────────────────────────────────────────────────────────
// StaticFactStore
// ─────────────────────────────────────────────────────────────────────────────

/// The static fact set plus the set of predicates it enumerates.
#[derive(Debug, Default, Clone)]
pub struct StaticFactStore {
    facts: HashSet<Fact>,
    predicates: HashSet<String>,
}

impl StaticFactStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `fact`, or every distinct permutation of its arguments when
    /// `commutative` is set, and register its predicate.
    ///
    /// Returns the number of tuples that were not already present.
    pub fn insert_expanded(&mut self, fact: Fact, commutative: bool) -> usize {
        self.predicates.insert(fact.predicate().to_string());
        if !commutative || fact.arity() < 2 {
            return usize::from(self.facts.insert(fact));
        }
        distinct_permutations(fact.args())
            .into_iter()
            .map(|args| fact.with_args(args))
            .filter(|f| self.facts.insert(f.clone()))
            .count()
    }

    /// Store exactly `fact` and register its predicate.  Adding a fact that
    /// is already present is a no-op.
    ///
    /// Returns `true` when the fact was newly stored.
    pub fn add(&mut self, fact: Fact) -> bool {
        self.insert_expanded(fact, false) == 1
    }

    /// Remove exactly `fact`.
    ///
    /// Other permutations of a commutative fact are left in place, and the
    /// predicate stays registered even when its last fact is removed.
    ///
    /// # Errors
    ///
    /// Returns [`KbError::FactNotFound`] when `fact` is not stored.
    pub fn remove(&mut self, fact: &Fact) -> Result<(), KbError> {
        if self.facts.remove(fact) {
            Ok(())
        } else {
            Err(KbError::FactNotFound(fact.clone()))
        }
    }

    /// Returns `true` when exactly this tuple is stored.
    pub fn contains(&self, fact: &Fact) -> bool {
        self.facts.contains(fact)
    }

    /// Returns `true` when `predicate` is in the static predicate set.
    pub fn has_predicate(&self, predicate: &str) -> bool {
        self.predicates.contains(predicate)
    }

    /// Iterate over stored facts in no particular order.
    pub fn facts(&self) -> impl Iterator<Item = &Fact> {
        self.facts.iter()
    }

    /// Iterate over registered predicates in no particular order.
    pub fn predicates(&self) -> impl Iterator<Item = &str> {
        self.predicates.iter().map(String::as_str)
    }

    /// Number of stored fact tuples.
    pub fn len(&self) -> usize {
        self.facts.len()
    }

    /// Returns `true` if no facts are stored.
    pub fn is_empty(&self) -> bool {
        self.facts.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
