//! Read-only matching logic
//!
//! A [`Predicate`] tests one condition against one object, optionally
//! through a single slot indirection. A [`Selector`] composes predicates into
//! a query over the whole container, or over the distinguished root only.

use crate::container::Container;
use crate::object::Object;
use automat_types::{Reference, Symbol, TagList};
use serde::{Deserialize, Serialize};

/// The condition a predicate checks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum PredicateKind {
    /// Always satisfied
    MatchAll,
    /// Object carries every listed tag (negated: carries none of them)
    TagSet(TagList),
    /// Named counter is present and equal to zero
    CounterZero(Symbol),
    /// Named slot holds a binding
    IsBound(Symbol),
}

/// One condition evaluated against one object
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Predicate {
    pub kind: PredicateKind,
    #[serde(default)]
    pub negated: bool,
    /// Evaluate against the object bound in this slot instead of the subject
    #[serde(default)]
    pub in_slot: Option<Symbol>,
}

impl Predicate {
    pub fn new(kind: PredicateKind) -> Self {
        Self {
            kind,
            negated: false,
            in_slot: None,
        }
    }

    pub fn match_all() -> Self {
        Self::new(PredicateKind::MatchAll)
    }

    pub fn tags<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Self::new(PredicateKind::TagSet(tags.into_iter().collect()))
    }

    pub fn counter_zero(counter: impl Into<Symbol>) -> Self {
        Self::new(PredicateKind::CounterZero(counter.into()))
    }

    pub fn is_bound(slot: impl Into<Symbol>) -> Self {
        Self::new(PredicateKind::IsBound(slot.into()))
    }

    /// Invert the predicate
    ///
    /// For tag sets the inverse of "subset" is "disjoint", not "not subset".
    pub fn negate(mut self) -> Self {
        self.negated = !self.negated;
        self
    }

    pub fn through(mut self, slot: impl Into<Symbol>) -> Self {
        self.in_slot = Some(slot.into());
        self
    }

    /// Evaluate against `object`, resolving slot indirection through `container`
    pub fn matches(&self, object: &Object, container: &Container) -> bool {
        match &self.in_slot {
            None => self.matches_subject(object),
            Some(slot) => match object.binding(slot).and_then(|r| container.get(r)) {
                Some(subject) => self.matches_subject(subject),
                // Indirection failure is not invertible.
                None => false,
            },
        }
    }

    fn matches_subject(&self, subject: &Object) -> bool {
        match &self.kind {
            PredicateKind::MatchAll => true,
            PredicateKind::TagSet(tags) => {
                if self.negated {
                    tags.is_disjoint(subject.tags())
                } else {
                    tags.is_subset(subject.tags())
                }
            }
            PredicateKind::CounterZero(counter) => match subject.counter(counter) {
                Some(value) => (value == 0) != self.negated,
                None => false,
            },
            PredicateKind::IsBound(slot) => subject.binding(slot).is_some() != self.negated,
        }
    }
}

/// Conjunction of predicates; the empty list matches everything
pub fn matches_all(predicates: &[Predicate], object: &Object, container: &Container) -> bool {
    predicates.iter().all(|p| p.matches(object, container))
}

/// Which objects an actuator considers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// Every live object
    All,
    /// Every live object satisfying all predicates
    Filter(Vec<Predicate>),
    /// The root object, if it exists and satisfies all predicates
    Root(Vec<Predicate>),
}

impl Selector {
    pub fn filter(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Selector::Filter(predicates.into_iter().collect())
    }

    pub fn root(predicates: impl IntoIterator<Item = Predicate>) -> Self {
        Selector::Root(predicates.into_iter().collect())
    }

    /// Shorthand for `Filter([TagSet(tags)])`
    pub fn tagged<I, S>(tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Symbol>,
    {
        Selector::Filter(vec![Predicate::tags(tags)])
    }

    pub fn is_all(&self) -> bool {
        matches!(self, Selector::All)
    }

    pub fn predicates(&self) -> &[Predicate] {
        match self {
            Selector::All => &[],
            Selector::Filter(predicates) | Selector::Root(predicates) => predicates,
        }
    }

    /// Whether `object` would be yielded by this selector right now
    pub fn admits(&self, object: &Object, container: &Container) -> bool {
        match self {
            Selector::All => true,
            Selector::Filter(predicates) => matches_all(predicates, object, container),
            Selector::Root(predicates) => {
                container.root() == Some(object.id()) && matches_all(predicates, object, container)
            }
        }
    }

    /// Whether the object at `reference` would be yielded; stale references never are
    pub fn admits_ref(&self, reference: Reference, container: &Container) -> bool {
        container
            .get(reference)
            .is_some_and(|object| self.admits(object, container))
    }
}
