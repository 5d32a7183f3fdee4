//! Object container
//!
//! The container is the exclusive owner of every object in a simulation.
//! It allocates references, stores the current value behind each one and
//! answers selector queries. All mutation goes through [`Container::insert`]
//! and [`Container::update`], which replace whole object values.

use crate::object::Object;
use crate::predicate::Selector;
use crate::rng::SimRng;
use automat_types::Reference;
use std::collections::BTreeMap;

/// Reference-indexed object store
#[derive(Debug, Clone)]
pub struct Container {
    /// Current object values, ordered by reference so scans are reproducible
    objects: BTreeMap<Reference, Object>,
    /// Last reference handed out
    last_allocated: u64,
    /// Object scoped by `Selector::Root`
    root: Option<Reference>,
}

impl Default for Container {
    fn default() -> Self {
        Self::new()
    }
}

impl Container {
    /// Create an empty container
    pub fn new() -> Self {
        Self {
            objects: BTreeMap::new(),
            last_allocated: 0,
            root: None,
        }
    }

    /// Store a copy of `object` under a freshly allocated reference
    pub fn insert(&mut self, object: Object) -> Reference {
        self.last_allocated += 1;
        let reference = Reference::new(self.last_allocated);
        self.objects.insert(reference, object.stamped(reference));
        reference
    }

    /// Replace the value stored at `object.id()`
    ///
    /// Returns false and stores nothing if the reference is not live.
    pub fn update(&mut self, object: Object) -> bool {
        match self.objects.get_mut(&object.id()) {
            Some(slot) => {
                *slot = object;
                true
            }
            None => false,
        }
    }

    pub fn exists(&self, reference: Reference) -> bool {
        self.objects.contains_key(&reference)
    }

    pub fn get(&self, reference: Reference) -> Option<&Object> {
        self.objects.get(&reference)
    }

    /// Every live reference, in allocation order
    pub fn select_all(&self) -> Vec<Reference> {
        self.objects.keys().copied().collect()
    }

    /// References yielded by `selector`, in allocation order
    pub fn select(&self, selector: &Selector) -> Vec<Reference> {
        match selector {
            Selector::All => self.select_all(),
            Selector::Filter(_) => self
                .objects
                .values()
                .filter(|object| selector.admits(object, self))
                .map(Object::id)
                .collect(),
            Selector::Root(_) => self
                .root
                .filter(|root| selector.admits_ref(*root, self))
                .into_iter()
                .collect(),
        }
    }

    /// References yielded by `selector`, shuffled by `rng`
    pub fn select_shuffled(&self, selector: &Selector, rng: &mut SimRng) -> Vec<Reference> {
        let mut selected = self.select(selector);
        rng.shuffle(&mut selected);
        selected
    }

    /// Drop one object; its reference is never handed out again
    pub fn remove(&mut self, reference: Reference) -> Option<Object> {
        if self.root == Some(reference) {
            self.root = None;
        }
        self.objects.remove(&reference)
    }

    /// Drop every object and reset the allocator
    pub fn remove_all(&mut self) {
        self.objects.clear();
        self.last_allocated = 0;
        self.root = None;
    }

    pub fn set_root(&mut self, reference: Reference) {
        self.root = Some(reference);
    }

    pub fn root(&self) -> Option<Reference> {
        self.root
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    /// Iterate over live objects in allocation order
    pub fn iter(&self) -> impl Iterator<Item = &Object> {
        self.objects.values()
    }
}
