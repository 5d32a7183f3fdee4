//! Actuators: declarative rules applied once per step

use crate::modifier::Modifier;
use crate::predicate::Selector;
use automat_types::Symbol;
use serde::{Deserialize, Serialize};

/// One rule of a model
///
/// A unary actuator applies its modifiers to every object its selector
/// yields. With a combined selector it becomes pairwise: modifiers are
/// applied to pairs drawn from both selections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actuator {
    /// Label used in logs
    #[serde(default)]
    pub name: Option<Symbol>,
    pub selector: Selector,
    /// Selector for the interaction partner
    #[serde(default)]
    pub combined: Option<Selector>,
    /// Applied as one atomic group per object or pair
    #[serde(default)]
    pub modifiers: Vec<Modifier>,
    /// Raised to the trap handler when the actuator fires
    #[serde(default)]
    pub traps: Vec<Symbol>,
    /// Forwarded to the observer when the actuator fires
    #[serde(default)]
    pub notifications: Vec<Symbol>,
    /// Halts the engine at the end of a step in which it fired
    #[serde(default)]
    pub halts: bool,
}

impl Actuator {
    /// Unary actuator over `selector`
    pub fn new(selector: Selector) -> Self {
        Self {
            name: None,
            selector,
            combined: None,
            modifiers: Vec::new(),
            traps: Vec::new(),
            notifications: Vec::new(),
            halts: false,
        }
    }

    /// Pairwise actuator over `selector` × `combined`
    pub fn pairwise(selector: Selector, combined: Selector) -> Self {
        Self {
            combined: Some(combined),
            ..Self::new(selector)
        }
    }

    pub fn named(mut self, name: impl Into<Symbol>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn modifier(mut self, modifier: Modifier) -> Self {
        self.modifiers.push(modifier);
        self
    }

    pub fn trap(mut self, trap: impl Into<Symbol>) -> Self {
        self.traps.push(trap.into());
        self
    }

    pub fn notify(mut self, notification: impl Into<Symbol>) -> Self {
        self.notifications.push(notification.into());
        self
    }

    pub fn halting(mut self) -> Self {
        self.halts = true;
        self
    }

    pub fn is_pairwise(&self) -> bool {
        self.combined.is_some()
    }

    /// Name for log output
    pub fn label(&self) -> &str {
        self.name.as_ref().map(Symbol::as_str).unwrap_or("<anonymous>")
    }
}
