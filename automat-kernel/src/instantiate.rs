//! Building container contents from a model's instance graph

use crate::container::Container;
use crate::error::{ModelError, ModelResult};
use crate::model::{Initializers, Model, World};
use crate::object::Object;
use automat_types::{Reference, Symbol};
use std::collections::BTreeMap;

/// Instance name → references created under that name
pub type InstanceTable = BTreeMap<Symbol, Vec<Reference>>;

/// Create one object of `concept` and insert it into `container`
///
/// Initializer bindings are not resolved here since they name other
/// instances; see [`instantiate_graph`].
pub fn instantiate(
    model: &Model,
    container: &mut Container,
    concept_name: &Symbol,
    init: &Initializers,
) -> ModelResult<Reference> {
    let concept = model
        .concepts
        .get(concept_name)
        .ok_or_else(|| ModelError::UnknownConcept(concept_name.clone()))?;

    let mut tags = concept.tags.union(&init.tags);
    tags.insert(concept_name);

    let mut counters = concept.counters.clone();
    counters.extend(init.counters.iter().map(|(k, v)| (k.clone(), *v)));

    Ok(container.insert(Object::new(tags, counters, concept.slots.clone())))
}

/// Instantiate every instance of `world`, then wire up bindings and the root
///
/// Errors are collected across the whole world rather than stopping at the
/// first one. The container may hold a partial world when errors are
/// returned.
pub fn instantiate_graph(
    model: &Model,
    container: &mut Container,
    world: &World,
) -> Result<InstanceTable, Vec<ModelError>> {
    let mut errors = Vec::new();
    let mut table = InstanceTable::new();
    let mut pending: Vec<(Reference, &Symbol, &Initializers)> = Vec::new();

    for spec in &world.instances {
        for _ in 0..spec.count {
            match instantiate(model, container, &spec.concept, &spec.init) {
                Ok(reference) => {
                    if let Some(name) = &spec.name {
                        table.entry(name.clone()).or_default().push(reference);
                    }
                    if !spec.init.bindings.is_empty() {
                        pending.push((reference, &spec.concept, &spec.init));
                    }
                }
                Err(error) => {
                    errors.push(error);
                    // The remaining copies would fail the same way.
                    break;
                }
            }
        }
    }

    for (reference, concept, init) in pending {
        for (slot, instance) in &init.bindings {
            if let Err(error) = bind_initial(container, &table, reference, concept, slot, instance)
            {
                errors.push(error);
            }
        }
    }

    if let Some(root) = &world.root {
        match lookup_unique(&table, root) {
            Ok(reference) => container.set_root(reference),
            Err(error) => errors.push(error),
        }
    }

    if errors.is_empty() {
        Ok(table)
    } else {
        Err(errors)
    }
}

pub(crate) fn bind_initial(
    container: &mut Container,
    table: &InstanceTable,
    reference: Reference,
    concept: &Symbol,
    slot: &Symbol,
    instance: &Symbol,
) -> ModelResult<()> {
    let Some(object) = container.get(reference) else {
        return Ok(());
    };
    if !object.declares_slot(slot) {
        return Err(ModelError::UndeclaredSlot {
            concept: concept.clone(),
            slot: slot.clone(),
        });
    }
    let target = lookup_unique(table, instance)?;
    let bound = object.with_binding(slot, target);
    container.update(bound);
    Ok(())
}

fn lookup_unique(table: &InstanceTable, name: &Symbol) -> ModelResult<Reference> {
    match table.get(name).map(Vec::as_slice) {
        Some([reference]) => Ok(*reference),
        Some(references) if !references.is_empty() => Err(ModelError::AmbiguousInstance {
            name: name.clone(),
            count: references.len(),
        }),
        _ => Err(ModelError::UnknownInstance(name.clone())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Concept, InstanceSpec};

    fn model() -> Model {
        Model::new()
            .concept(
                "cell",
                Concept::new()
                    .with_tag("living")
                    .with_counter("age", 0)
                    .with_counter("energy", 10)
                    .with_slot("neighbor"),
            )
            .concept("world", Concept::new())
    }

    #[test]
    fn test_instantiate_merges_concept_and_initializers() {
        let model = model();
        let mut container = Container::new();
        let init = Initializers::new()
            .with_tag("hero")
            .with_counter("energy", 3)
            .with_counter("gold", 1);

        let reference = instantiate(&model, &mut container, &Symbol::new("cell"), &init).unwrap();
        let object = container.get(reference).unwrap();

        assert!(object.tags().contains("cell"));
        assert!(object.tags().contains("living"));
        assert!(object.tags().contains("hero"));
        assert_eq!(object.counter("age"), Some(0));
        assert_eq!(object.counter("energy"), Some(3));
        assert_eq!(object.counter("gold"), Some(1));
        assert!(object.declares_slot("neighbor"));
        assert!(object.bindings().is_empty());
    }

    #[test]
    fn test_instantiate_unknown_concept() {
        let mut container = Container::new();
        let result = instantiate(
            &model(),
            &mut container,
            &Symbol::new("ghost"),
            &Initializers::new(),
        );
        assert_eq!(result, Err(ModelError::UnknownConcept(Symbol::new("ghost"))));
        assert!(container.is_empty());
    }

    #[test]
    fn test_graph_with_counts_names_and_bindings() {
        let world = World::new()
            .with_root("w")
            .instance(InstanceSpec::new("world").named("w"))
            .instance(
                InstanceSpec::new("cell")
                    .named("a")
                    .init(Initializers::new().with_binding("neighbor", "b")),
            )
            .instance(InstanceSpec::new("cell").named("b"))
            .instance(InstanceSpec::new("cell").times(3));
        let mut container = Container::new();

        let table = instantiate_graph(&model(), &mut container, &world).unwrap();

        assert_eq!(container.len(), 6);
        let a = table["a"][0];
        let b = table["b"][0];
        // Forward reference from a to b resolved after b was created.
        assert_eq!(container.get(a).unwrap().binding("neighbor"), Some(b));
        assert_eq!(container.root(), Some(table["w"][0]));
    }

    #[test]
    fn test_graph_collects_every_error() {
        let world = World::new()
            .with_root("nowhere")
            .instance(InstanceSpec::new("ghost"))
            .instance(
                InstanceSpec::new("cell")
                    .init(Initializers::new().with_binding("parent", "a")),
            )
            .instance(
                InstanceSpec::new("cell")
                    .init(Initializers::new().with_binding("neighbor", "pair")),
            )
            .instance(InstanceSpec::new("cell").named("pair").times(2))
            .instance(InstanceSpec::new("phantom").times(4));
        let mut container = Container::new();

        let errors = instantiate_graph(&model(), &mut container, &world).unwrap_err();

        assert_eq!(
            errors,
            vec![
                ModelError::UnknownConcept(Symbol::new("ghost")),
                ModelError::UnknownConcept(Symbol::new("phantom")),
                ModelError::UndeclaredSlot {
                    concept: Symbol::new("cell"),
                    slot: Symbol::new("parent"),
                },
                ModelError::AmbiguousInstance {
                    name: Symbol::new("pair"),
                    count: 2,
                },
                ModelError::UnknownInstance(Symbol::new("nowhere")),
            ]
        );
    }
}
