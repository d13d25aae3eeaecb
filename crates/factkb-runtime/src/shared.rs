//! [`SharedKnowledgeBase`] – a knowledge base safe to share across threads.
//!
//! [`KnowledgeBase`] itself assumes a single owner.  Wrap it here when
//! several threads query while another adds or removes facts: queries take
//! the read lock, mutations take the write lock.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use factkb_perception::ClassifierBank;
use factkb_types::{Confidence, Fact, KbError, PredicateKind};

use crate::knowledge_base::KnowledgeBase;

/// Cloneable handle to a read-write locked [`KnowledgeBase`].
///
/// Every mutation is a single set operation, so a lock poisoned by a
/// panicking holder still guards a consistent store and is recovered rather
/// than propagated.
pub struct SharedKnowledgeBase<B> {
    inner: Arc<RwLock<KnowledgeBase<B>>>,
}

impl<B> Clone for SharedKnowledgeBase<B> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<B: ClassifierBank> SharedKnowledgeBase<B> {
    /// Take ownership of `kb`.
    pub fn new(kb: KnowledgeBase<B>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(kb)),
        }
    }

    /// See [`KnowledgeBase::query`].
    pub fn query(&self, fact: &Fact) -> Result<Confidence, KbError> {
        self.read().query(fact)
    }

    /// See [`KnowledgeBase::predicate_kind`].
    pub fn predicate_kind(&self, predicate: &str) -> PredicateKind {
        self.read().predicate_kind(predicate)
    }

    /// See [`KnowledgeBase::add_static_fact`].
    pub fn add_static_fact(&self, fact: Fact) {
        self.write().add_static_fact(fact);
    }

    /// See [`KnowledgeBase::remove_static_fact`].
    pub fn remove_static_fact(&self, fact: &Fact) -> Result<(), KbError> {
        self.write().remove_static_fact(fact)
    }

    /// Hold the read lock, e.g. to run several queries against one snapshot.
    pub fn read(&self) -> RwLockReadGuard<'_, KnowledgeBase<B>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Hold the write lock.
    pub fn write(&self) -> RwLockWriteGuard<'_, KnowledgeBase<B>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use factkb_memory::StaticFactStore;
    use factkb_perception::TableClassifierBank;
    use std::thread;

    fn shared() -> SharedKnowledgeBase<TableClassifierBank> {
        let mut store = StaticFactStore::new();
        store.add(Fact::new("on", ["block1", "block2"]));
        let mut bank = TableClassifierBank::new(vec!["red".into()], 8);
        bank.set_score(0, 2, 0.6).unwrap();
        SharedKnowledgeBase::new(KnowledgeBase::from_parts(store, bank))
    }

    #[test]
    fn clones_see_the_same_facts() {
        let a = shared();
        let b = a.clone();
        let fact = Fact::new("holding", ["robot", "mug"]);
        a.add_static_fact(fact.clone());
        assert_eq!(b.query(&fact).unwrap(), Confidence::TRUE);
        assert_eq!(b.predicate_kind("holding"), PredicateKind::Static);
        b.remove_static_fact(&fact).unwrap();
        assert_eq!(a.query(&fact).unwrap(), Confidence::FALSE);
    }

    #[test]
    fn remove_missing_fact_is_error() {
        let kb = shared();
        let fact = Fact::new("on", ["block2", "block1"]);
        assert!(matches!(
            kb.remove_static_fact(&fact),
            Err(KbError::FactNotFound(_))
        ));
    }

    #[test]
    fn concurrent_readers_with_a_writer() {
        let kb = shared();
        let writer = {
            let kb = kb.clone();
            thread::spawn(move || {
                for i in 0..100 {
                    kb.add_static_fact(Fact::new("seen", [format!("obj{i}")]));
                }
            })
        };
        let readers: Vec<_> = (0..4)
            .map(|_| {
                let kb = kb.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        assert_eq!(
                            kb.query(&Fact::new("on", ["block1", "block2"])).unwrap(),
                            Confidence::TRUE
                        );
                        let red = kb.query(&Fact::new("red", ["oidx_2"])).unwrap();
                        assert!((red.positive - 0.6).abs() < 1e-12);
                    }
                })
            })
            .collect();

        writer.join().unwrap();
        for r in readers {
            r.join().unwrap();
        }
        assert_eq!(kb.read().static_fact_count(), 101);
    }
}
