//! State changes and the guard/apply protocol
//!
//! Applying an actuator is a two-phase affair. First every modifier's guard
//! ([`Modifier::can_apply`]) is checked against the current container; only
//! if all of them pass is each modifier applied ([`Modifier::apply`]). This
//! keeps an actuator from ever partially applying its modifier list.

use crate::container::Container;
use crate::object::Object;
use automat_types::{Reference, Symbol, TagList};
use serde::{Deserialize, Serialize};

/// Which of the two objects in an actuator evaluation is the base
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The object matched by the actuator's selector
    This,
    /// The interaction partner matched by the combined selector
    Other,
}

/// Object a modifier acts on, relative to the current evaluation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifierTarget {
    pub role: Role,
    /// Follow this binding from the base object
    #[serde(default)]
    pub slot: Option<Symbol>,
}

impl ModifierTarget {
    pub fn this() -> Self {
        Self {
            role: Role::This,
            slot: None,
        }
    }

    pub fn other() -> Self {
        Self {
            role: Role::Other,
            slot: None,
        }
    }

    pub fn via(mut self, slot: impl Into<Symbol>) -> Self {
        self.slot = Some(slot.into());
        self
    }

    /// Resolve the current value of the target object
    ///
    /// # Panics
    ///
    /// Panics if the role is [`Role::Other`] and no partner is given. Pairwise
    /// targets are only ever evaluated by pairwise dispatch.
    pub fn resolve<'c>(
        &self,
        this: Reference,
        other: Option<Reference>,
        container: &'c Container,
    ) -> Option<&'c Object> {
        let base = match self.role {
            Role::This => this,
            Role::Other => match other {
                Some(other) => other,
                None => {
                    panic!("modifier targets the interaction partner outside pairwise dispatch")
                }
            },
        };
        let base = container.get(base)?;
        match &self.slot {
            None => Some(base),
            Some(slot) => container.get(base.binding(slot)?),
        }
    }
}

/// The change a modifier makes to its target
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    Nothing,
    SetTags(TagList),
    UnsetTags(TagList),
    Inc(Symbol),
    Dec(Symbol),
    Clear(Symbol),
    /// Bind the slot on the target to the object reached by the inner target
    Bind {
        slot: Symbol,
        target: ModifierTarget,
    },
    Unbind(Symbol),
}

/// One state-change instruction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Modifier {
    pub target: ModifierTarget,
    pub action: Action,
}

impl Modifier {
    pub fn new(target: ModifierTarget, action: Action) -> Self {
        Self { target, action }
    }

    /// Modifier acting on the matched object itself
    pub fn on_this(action: Action) -> Self {
        Self::new(ModifierTarget::this(), action)
    }

    /// Modifier acting on the interaction partner
    pub fn on_other(action: Action) -> Self {
        Self::new(ModifierTarget::other(), action)
    }

    /// Check the structural precondition for this modifier
    pub fn can_apply(
        &self,
        this: Reference,
        other: Option<Reference>,
        container: &Container,
    ) -> bool {
        let Some(target) = self.target.resolve(this, other, container) else {
            return false;
        };
        match &self.action {
            Action::Nothing | Action::SetTags(_) | Action::UnsetTags(_) => true,
            Action::Inc(counter) => target
                .counter(counter)
                .is_some_and(|value| value.checked_add(1).is_some()),
            Action::Clear(counter) => target.counter(counter).is_some(),
            Action::Dec(counter) => target.counter(counter).is_some_and(|value| value > 0),
            Action::Bind { slot, target: bind } => {
                target.declares_slot(slot) && bind.resolve(this, other, container).is_some()
            }
            Action::Unbind(slot) => target.declares_slot(slot),
        }
    }

    /// Apply this modifier and write the result back into the container
    ///
    /// Returns the new value of the target object.
    ///
    /// # Panics
    ///
    /// Panics if the guard does not hold; dispatch must call
    /// [`Modifier::can_apply`] for the whole group first.
    pub fn apply(
        &self,
        this: Reference,
        other: Option<Reference>,
        container: &mut Container,
    ) -> Object {
        let updated = self
            .updated_target(this, other, container)
            .unwrap_or_else(|| {
                panic!("modifier {:?} applied without a passing guard", self.action)
            });
        container.update(updated.clone());
        updated
    }

    fn updated_target(
        &self,
        this: Reference,
        other: Option<Reference>,
        container: &Container,
    ) -> Option<Object> {
        let target = self.target.resolve(this, other, container)?;
        let updated = match &self.action {
            Action::Nothing => target.clone(),
            Action::SetTags(tags) => target.with_tags_set(tags),
            Action::UnsetTags(tags) => target.with_tags_unset(tags),
            Action::Inc(counter) => {
                let value = target.counter(counter)?.checked_add(1)?;
                target.with_counter(counter, value)
            }
            Action::Dec(counter) => {
                let value = target.counter(counter).filter(|value| *value > 0)?;
                target.with_counter(counter, value - 1)
            }
            Action::Clear(counter) => {
                target.counter(counter)?;
                target.with_counter(counter, 0)
            }
            Action::Bind { slot, target: bind } => {
                if !target.declares_slot(slot) {
                    return None;
                }
                let bound = bind.resolve(this, other, container)?.id();
                target.with_binding(slot, bound)
            }
            Action::Unbind(slot) => {
                if !target.declares_slot(slot) {
                    return None;
                }
                target.without_binding(slot)
            }
        };
        Some(updated)
    }
}

/// Guard a whole modifier group
pub fn can_apply_all(
    modifiers: &[Modifier],
    this: Reference,
    other: Option<Reference>,
    container: &Container,
) -> bool {
    modifiers.iter().all(|m| m.can_apply(this, other, container))
}

/// Apply a modifier group as one unit
///
/// Earlier modifiers can change what later ones see (two `Dec` on a counter
/// at 1, or an `Unbind` followed by a slot target), so each guard is checked
/// again right before its modifier runs. If one fails, every change the group
/// made is rolled back and false is returned.
pub fn apply_all(
    modifiers: &[Modifier],
    this: Reference,
    other: Option<Reference>,
    container: &mut Container,
) -> bool {
    let mut journal: Vec<Object> = Vec::with_capacity(modifiers.len());
    for modifier in modifiers {
        let previous = match modifier.target.resolve(this, other, container) {
            Some(previous) if modifier.can_apply(this, other, container) => Some(previous.clone()),
            _ => None,
        };
        let Some(previous) = previous else {
            for previous in journal.into_iter().rev() {
                container.update(previous);
            }
            return false;
        };
        journal.push(previous);
        modifier.apply(this, other, container);
    }
    true
}
