//! Model description handed to the engine
//!
//! A model is produced by the language front end, which is not part of this
//! crate. Every type here is serde-enabled so a model can also arrive as
//! JSON or any other serde format.

use crate::actuator::Actuator;
use crate::probe::Measure;
use automat_types::{CounterDict, Symbol, TagList};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// Instantiation template
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concept {
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub counters: CounterDict,
    #[serde(default)]
    pub slots: BTreeSet<Symbol>,
}

impl Concept {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<Symbol>) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_counter(mut self, counter: impl Into<Symbol>, initial: i64) -> Self {
        self.counters.insert(counter.into(), initial);
        self
    }

    pub fn with_slot(mut self, slot: impl Into<Symbol>) -> Self {
        self.slots.insert(slot.into());
        self
    }
}

/// Per-instance overrides applied on top of a concept
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Initializers {
    #[serde(default)]
    pub tags: TagList,
    #[serde(default)]
    pub counters: CounterDict,
    /// Slot name → instance name, resolved once the whole world exists
    #[serde(default)]
    pub bindings: BTreeMap<Symbol, Symbol>,
}

impl Initializers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tag(mut self, tag: impl Into<Symbol>) -> Self {
        self.tags.insert(tag);
        self
    }

    pub fn with_counter(mut self, counter: impl Into<Symbol>, value: i64) -> Self {
        self.counters.insert(counter.into(), value);
        self
    }

    pub fn with_binding(mut self, slot: impl Into<Symbol>, instance: impl Into<Symbol>) -> Self {
        self.bindings.insert(slot.into(), instance.into());
        self
    }
}

fn one() -> usize {
    1
}

/// One entry of a world's instance graph
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub concept: Symbol,
    #[serde(default)]
    pub name: Option<Symbol>,
    #[serde(default = "one")]
    pub count: usize,
    #[serde(default)]
    pub init: Initializers,
}

impl InstanceSpec {
    pub fn new(concept: impl Into<Symbol>) -> Self {
        Self {
            concept: concept.into(),
            name: None,
            count: 1,
            init: Initializers::default(),
        }
    }

    pub fn named(mut self, name: impl Into<Symbol>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn times(mut self, count: usize) -> Self {
        self.count = count;
        self
    }

    pub fn init(mut self, init: Initializers) -> Self {
        self.init = init;
        self
    }
}

/// Named initial configuration of a simulation
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct World {
    /// Instance that `Selector::Root` scopes to
    #[serde(default)]
    pub root: Option<Symbol>,
    #[serde(default)]
    pub instances: Vec<InstanceSpec>,
}

impl World {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_root(mut self, instance: impl Into<Symbol>) -> Self {
        self.root = Some(instance.into());
        self
    }

    pub fn instance(mut self, spec: InstanceSpec) -> Self {
        self.instances.push(spec);
        self
    }
}

/// Fully validated model: concepts, rules, measures and worlds
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Model {
    #[serde(default)]
    pub concepts: BTreeMap<Symbol, Concept>,
    #[serde(default)]
    pub actuators: Vec<Actuator>,
    #[serde(default)]
    pub measures: Vec<Measure>,
    #[serde(default)]
    pub worlds: BTreeMap<Symbol, World>,
}

impl Model {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn concept(mut self, name: impl Into<Symbol>, concept: Concept) -> Self {
        self.concepts.insert(name.into(), concept);
        self
    }

    pub fn actuator(mut self, actuator: Actuator) -> Self {
        self.actuators.push(actuator);
        self
    }

    pub fn measure(mut self, measure: Measure) -> Self {
        self.measures.push(measure);
        self
    }

    pub fn world(mut self, name: impl Into<Symbol>, world: World) -> Self {
        self.worlds.insert(name.into(), world);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_from_json() {
        let json = r#"{
            "concepts": {
                "cell": {"counters": {"age": 0}, "slots": ["neighbor"]}
            },
            "worlds": {
                "main": {
                    "instances": [
                        {"concept": "cell", "name": "a"},
                        {"concept": "cell", "count": 3}
                    ]
                }
            }
        }"#;
        let model: Model = serde_json::from_str(json).unwrap();

        let cell = &model.concepts["cell"];
        assert_eq!(cell.counters.get("age"), Some(&0));
        assert!(cell.slots.contains("neighbor"));

        let world = &model.worlds["main"];
        assert_eq!(world.instances[0].count, 1);
        assert_eq!(world.instances[0].name, Some(Symbol::new("a")));
        assert_eq!(world.instances[1].count, 3);
        assert!(model.actuators.is_empty());
    }

    #[test]
    fn test_builders_match_json() {
        let built = Model::new()
            .concept("cell", Concept::new().with_counter("age", 0).with_slot("neighbor"))
            .world(
                "main",
                World::new()
                    .instance(InstanceSpec::new("cell").named("a"))
                    .instance(InstanceSpec::new("cell").times(3)),
            );
        let json = serde_json::to_string(&built).unwrap();
        let parsed: Model = serde_json::from_str(&json).unwrap();
        assert_eq!(built, parsed);
    }
}
