//! Unary and pairwise actuator dispatch

use crate::actuator::Actuator;
use crate::container::Container;
use crate::modifier::{apply_all, can_apply_all};
use crate::predicate::Selector;
use crate::rng::SimRng;
use automat_types::Reference;

/// Run one actuator against the container
///
/// Returns how many times the modifier group was applied: once per object
/// for unary actuators, once per pair for pairwise ones.
pub(crate) fn dispatch(actuator: &Actuator, container: &mut Container, rng: &mut SimRng) -> usize {
    match &actuator.combined {
        None => unary(actuator, container, rng),
        Some(combined) => pairwise(actuator, combined, container, rng),
    }
}

fn unary(actuator: &Actuator, container: &mut Container, rng: &mut SimRng) -> usize {
    let mut applied = 0;
    for this in container.select_shuffled(&actuator.selector, rng) {
        if !container.exists(this) {
            continue;
        }
        if fire(actuator, this, None, container) {
            applied += 1;
        }
    }
    applied
}

/// Cartesian interaction between the two selections
///
/// Both sets are resolved once up front. After a successful interaction the
/// `this` object is re-checked against the selector; once it stops matching
/// it has been consumed and the scan moves on to the next `this`. The other
/// set is never re-filtered: an `other` that changed meanwhile only drops out
/// if its guards fail.
fn pairwise(
    actuator: &Actuator,
    combined: &Selector,
    container: &mut Container,
    rng: &mut SimRng,
) -> usize {
    let this_set = container.select_shuffled(&actuator.selector, rng);
    let other_set = container.select_shuffled(combined, rng);

    let mut applied = 0;
    for this in this_set {
        if !container.exists(this) {
            continue;
        }
        for &other in &other_set {
            if this == other || !container.exists(other) {
                continue;
            }
            if !fire(actuator, this, Some(other), container) {
                continue;
            }
            applied += 1;
            if !actuator.selector.is_all() && !actuator.selector.admits_ref(this, container) {
                break;
            }
        }
    }
    applied
}

fn fire(
    actuator: &Actuator,
    this: Reference,
    other: Option<Reference>,
    container: &mut Container,
) -> bool {
    if !can_apply_all(&actuator.modifiers, this, other, container) {
        return false;
    }
    let applied = apply_all(&actuator.modifiers, this, other, container);
    if applied {
        tracing::trace!(
            actuator = actuator.label(),
            this = %this,
            other = ?other.map(|r| r.as_u64()),
            "applied"
        );
    }
    applied
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::{Action, Modifier};
    use crate::object::Object;
    use automat_types::{CounterDict, Symbol};
    use std::collections::BTreeSet;

    fn insert(container: &mut Container, tags: &[&str], counters: &[(&str, i64)]) -> Reference {
        let counters: CounterDict = counters
            .iter()
            .map(|(name, value)| (Symbol::new(*name), *value))
            .collect();
        container.insert(Object::new(
            tags.iter().copied().collect(),
            counters,
            [Symbol::new("partner")].into_iter().collect::<BTreeSet<_>>(),
        ))
    }

    #[test]
    fn test_unary_skips_objects_failing_any_guard() {
        let mut container = Container::new();
        let full = insert(&mut container, &["cell"], &[("food", 2), ("age", 0)]);
        let empty = insert(&mut container, &["cell"], &[("food", 0), ("age", 0)]);
        let actuator = Actuator::new(Selector::tagged(["cell"]))
            .modifier(Modifier::on_this(Action::Inc(Symbol::new("age"))))
            .modifier(Modifier::on_this(Action::Dec(Symbol::new("food"))));

        let applied = dispatch(&actuator, &mut container, &mut SimRng::new(1));

        assert_eq!(applied, 1);
        assert_eq!(container.get(full).unwrap().counter("age"), Some(1));
        assert_eq!(container.get(full).unwrap().counter("food"), Some(1));
        // Inc alone would have passed; nothing of the group is visible.
        assert_eq!(container.get(empty).unwrap().counter("age"), Some(0));
        assert_eq!(container.get(empty).unwrap().counter("food"), Some(0));
    }

    #[test]
    fn test_pairwise_never_pairs_an_object_with_itself() {
        let mut container = Container::new();
        let only = insert(&mut container, &["cell"], &[("met", 0)]);
        let actuator = Actuator::pairwise(Selector::tagged(["cell"]), Selector::tagged(["cell"]))
            .modifier(Modifier::on_this(Action::Inc(Symbol::new("met"))));

        let applied = dispatch(&actuator, &mut container, &mut SimRng::new(1));

        assert_eq!(applied, 0);
        assert_eq!(container.get(only).unwrap().counter("met"), Some(0));
    }

    #[test]
    fn test_pairwise_early_exit_consumes_this() {
        for seed in 0..16 {
            let mut container = Container::new();
            let eater = insert(&mut container, &["hungry"], &[]);
            let b = insert(&mut container, &["food"], &[("eaten", 0)]);
            let c = insert(&mut container, &["food"], &[("eaten", 0)]);
            let actuator =
                Actuator::pairwise(Selector::tagged(["hungry"]), Selector::tagged(["food"]))
                    .modifier(Modifier::on_this(Action::UnsetTags(
                        ["hungry"].into_iter().collect(),
                    )))
                    .modifier(Modifier::on_other(Action::Inc(Symbol::new("eaten"))));

            let applied = dispatch(&actuator, &mut container, &mut SimRng::new(seed));

            assert_eq!(applied, 1);
            let eaten = container.get(b).unwrap().counter("eaten").unwrap()
                + container.get(c).unwrap().counter("eaten").unwrap();
            assert_eq!(eaten, 1);
            assert!(!container.get(eater).unwrap().tags().contains("hungry"));
        }
    }

    #[test]
    fn test_pairwise_all_selector_never_exits_early() {
        let mut container = Container::new();
        let a = insert(&mut container, &["cell"], &[("met", 0)]);
        insert(&mut container, &["cell"], &[("met", 0)]);
        insert(&mut container, &["cell"], &[("met", 0)]);
        let actuator = Actuator::pairwise(Selector::All, Selector::tagged(["cell"]))
            .modifier(Modifier::on_this(Action::Inc(Symbol::new("met"))));

        let applied = dispatch(&actuator, &mut container, &mut SimRng::new(5));

        // Every ordered pair of distinct objects interacts.
        assert_eq!(applied, 6);
        assert_eq!(container.get(a).unwrap().counter("met"), Some(2));
    }

    #[test]
    fn test_pairwise_other_set_is_not_refiltered() {
        let mut container = Container::new();
        let first = insert(&mut container, &["hunter"], &[("meals", 0)]);
        let second = insert(&mut container, &["hunter"], &[("meals", 0)]);
        let prey = insert(&mut container, &["alive"], &[]);
        let actuator =
            Actuator::pairwise(Selector::tagged(["hunter"]), Selector::tagged(["alive"]))
                .modifier(Modifier::on_this(Action::Inc(Symbol::new("meals"))))
                .modifier(Modifier::on_other(Action::UnsetTags(
                    ["alive"].into_iter().collect(),
                )));

        let applied = dispatch(&actuator, &mut container, &mut SimRng::new(2));

        // The prey stopped matching after the first hunter, but nothing in
        // the group guards on it.
        assert_eq!(applied, 2);
        assert_eq!(container.get(first).unwrap().counter("meals"), Some(1));
        assert_eq!(container.get(second).unwrap().counter("meals"), Some(1));
        assert!(!container.get(prey).unwrap().tags().contains("alive"));
    }
}
