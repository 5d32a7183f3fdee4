//! Shared value types for automat
//!
//! This crate provides the small vocabulary used across the automat
//! kernel: symbols, tag sets, counter maps and object references.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::btree_set;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::ops::Deref;

/// Identifier for tags, slots, counters, concepts and every other named
/// thing in a model.
///
/// The kernel does not distinguish between those uses; callers are
/// responsible for putting the right symbol in the right position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(pub String);

impl Symbol {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Symbol {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl Deref for Symbol {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for Symbol {
    fn from(name: &str) -> Self {
        Symbol(name.to_string())
    }
}

impl From<String> for Symbol {
    fn from(name: String) -> Self {
        Symbol(name)
    }
}

impl From<&Symbol> for Symbol {
    fn from(symbol: &Symbol) -> Self {
        symbol.clone()
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Named integer attributes of an object
pub type CounterDict = BTreeMap<Symbol, i64>;

/// Set of tag symbols
///
/// Duplicates collapse and insertion order is irrelevant. All comparison
/// operations are set operations.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagList(BTreeSet<Symbol>);

impl TagList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, tag: impl Into<Symbol>) -> bool {
        self.0.insert(tag.into())
    }

    pub fn remove(&mut self, tag: &str) -> bool {
        self.0.remove(tag)
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.contains(tag)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_set::Iter<'_, Symbol> {
        self.0.iter()
    }

    /// Every tag of `self` is also in `other`
    pub fn is_subset(&self, other: &TagList) -> bool {
        self.0.is_subset(&other.0)
    }

    /// `self` and `other` share no tag
    pub fn is_disjoint(&self, other: &TagList) -> bool {
        self.0.is_disjoint(&other.0)
    }

    pub fn union(&self, other: &TagList) -> TagList {
        TagList(self.0.union(&other.0).cloned().collect())
    }

    pub fn difference(&self, other: &TagList) -> TagList {
        TagList(self.0.difference(&other.0).cloned().collect())
    }
}

impl<S: Into<Symbol>> FromIterator<S> for TagList {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        TagList(iter.into_iter().map(Into::into).collect())
    }
}

impl<'a> IntoIterator for &'a TagList {
    type Item = &'a Symbol;
    type IntoIter = btree_set::Iter<'a, Symbol>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for TagList {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, tag) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", tag)?;
        }
        f.write_str("}")
    }
}

/// Opaque handle to an object held by a container
///
/// References are allocated in increasing order by the container and are
/// never reused, so a stale reference simply resolves to nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(pub u64);

impl Reference {
    /// Placeholder carried by objects that have not been inserted yet
    pub const UNASSIGNED: Reference = Reference(0);

    pub fn new(id: u64) -> Self {
        Self(id)
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }

    pub fn is_assigned(&self) -> bool {
        self.0 != 0
    }
}

impl From<u64> for Reference {
    fn from(id: u64) -> Self {
        Reference(id)
    }
}

impl From<Reference> for u64 {
    fn from(reference: Reference) -> Self {
        reference.0
    }
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
