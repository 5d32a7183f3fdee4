//! Immutable object values
//!
//! An object is never mutated in place. Every change produces a new value
//! carrying the same reference, which the container then substitutes for
//! the old one.

use automat_types::{CounterDict, Reference, Symbol, TagList};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One entity in the simulated graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Object {
    id: Reference,
    tags: TagList,
    counters: CounterDict,
    bindings: BTreeMap<Symbol, Reference>,
    slots: BTreeSet<Symbol>,
}

impl Object {
    /// Create an unbound object that has not been inserted into a container yet
    pub fn new(tags: TagList, counters: CounterDict, slots: BTreeSet<Symbol>) -> Self {
        Self {
            id: Reference::UNASSIGNED,
            tags,
            counters,
            bindings: BTreeMap::new(),
            slots,
        }
    }

    pub fn id(&self) -> Reference {
        self.id
    }

    pub fn tags(&self) -> &TagList {
        &self.tags
    }

    pub fn counters(&self) -> &CounterDict {
        &self.counters
    }

    pub fn counter(&self, name: &str) -> Option<i64> {
        self.counters.get(name).copied()
    }

    pub fn bindings(&self) -> &BTreeMap<Symbol, Reference> {
        &self.bindings
    }

    pub fn binding(&self, slot: &str) -> Option<Reference> {
        self.bindings.get(slot).copied()
    }

    pub fn slots(&self) -> &BTreeSet<Symbol> {
        &self.slots
    }

    pub fn declares_slot(&self, slot: &str) -> bool {
        self.slots.contains(slot)
    }

    /// Copy of this object carrying the given reference
    pub(crate) fn stamped(&self, id: Reference) -> Object {
        Object {
            id,
            ..self.clone()
        }
    }

    pub fn with_tags_set(&self, tags: &TagList) -> Object {
        Object {
            tags: self.tags.union(tags),
            ..self.clone()
        }
    }

    pub fn with_tags_unset(&self, tags: &TagList) -> Object {
        Object {
            tags: self.tags.difference(tags),
            ..self.clone()
        }
    }

    /// Copy with `counter` set to `value`
    pub fn with_counter(&self, counter: &Symbol, value: i64) -> Object {
        let mut counters = self.counters.clone();
        counters.insert(counter.clone(), value);
        Object {
            counters,
            ..self.clone()
        }
    }

    pub fn with_binding(&self, slot: &Symbol, target: Reference) -> Object {
        let mut bindings = self.bindings.clone();
        bindings.insert(slot.clone(), target);
        Object {
            bindings,
            ..self.clone()
        }
    }

    pub fn without_binding(&self, slot: &str) -> Object {
        let mut bindings = self.bindings.clone();
        bindings.remove(slot);
        Object {
            bindings,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell() -> Object {
        let mut counters = CounterDict::new();
        counters.insert(Symbol::new("age"), 3);
        Object::new(
            ["cell"].into_iter().collect(),
            counters,
            [Symbol::new("neighbor")].into_iter().collect(),
        )
    }

    #[test]
    fn test_updates_leave_original_untouched() {
        let original = cell();
        let changed = original
            .with_tags_set(&["alive"].into_iter().collect())
            .with_counter(&Symbol::new("age"), 4);

        assert!(!original.tags().contains("alive"));
        assert_eq!(original.counter("age"), Some(3));
        assert!(changed.tags().contains("alive"));
        assert_eq!(changed.counter("age"), Some(4));
    }

    #[test]
    fn test_binding_round_trip() {
        let object = cell().with_binding(&Symbol::new("neighbor"), Reference::new(7));
        assert_eq!(object.binding("neighbor"), Some(Reference::new(7)));
        assert_eq!(object.without_binding("neighbor").binding("neighbor"), None);
        assert!(object.declares_slot("neighbor"));
        assert!(!object.declares_slot("parent"));
    }

    #[test]
    fn test_new_object_is_unassigned() {
        assert!(!cell().id().is_assigned());
        assert_eq!(cell().stamped(Reference::new(5)).id(), Reference::new(5));
    }
}
