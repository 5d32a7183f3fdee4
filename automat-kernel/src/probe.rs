//! Aggregate measures over the container
//!
//! A [`Measure`] names what to compute; a [`Probe`] accumulates one measure's
//! value across a single container scan. [`probe_container`] runs every
//! probe of a model in one pass and produces a [`ProbeRecord`].

use crate::container::Container;
use crate::object::Object;
use crate::predicate::{matches_all, Predicate};
use automat_types::{Reference, Symbol};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Fold applied to matching objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AggregateFunction {
    Count,
    Sum(Symbol),
    Min(Symbol),
    Max(Symbol),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MeasureKind {
    /// One counter of one named instance
    CounterByName { instance: Symbol, counter: Symbol },
    /// Aggregate over every object satisfying the predicates
    Aggregate {
        function: AggregateFunction,
        #[serde(default)]
        predicates: Vec<Predicate>,
    },
}

/// Named quantity recorded on every observed step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measure {
    pub name: Symbol,
    pub kind: MeasureKind,
}

impl Measure {
    pub fn aggregate(
        name: impl Into<Symbol>,
        function: AggregateFunction,
        predicates: impl IntoIterator<Item = Predicate>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::Aggregate {
                function,
                predicates: predicates.into_iter().collect(),
            },
        }
    }

    pub fn counter_by_name(
        name: impl Into<Symbol>,
        instance: impl Into<Symbol>,
        counter: impl Into<Symbol>,
    ) -> Self {
        Self {
            name: name.into(),
            kind: MeasureKind::CounterByName {
                instance: instance.into(),
                counter: counter.into(),
            },
        }
    }
}

#[derive(Debug, Clone)]
enum Accumulator {
    Count(i64),
    Sum(Symbol, i64),
    // Extrema start at zero rather than at the first match.
    Min(Symbol, i64),
    Max(Symbol, i64),
    Named {
        reference: Option<Reference>,
        counter: Symbol,
        value: i64,
    },
}

/// Running state of one measure during a scan
#[derive(Debug, Clone)]
pub struct Probe<'m> {
    measure: &'m Measure,
    accumulator: Accumulator,
}

impl<'m> Probe<'m> {
    /// Create a probe for `measure`
    ///
    /// `named` maps instance names to the references they were instantiated
    /// as; only `CounterByName` measures consult it.
    pub fn new(measure: &'m Measure, named: &BTreeMap<Symbol, Vec<Reference>>) -> Self {
        let accumulator = match &measure.kind {
            MeasureKind::CounterByName { instance, counter } => Accumulator::Named {
                reference: named
                    .get(instance)
                    .filter(|refs| refs.len() == 1)
                    .map(|refs| refs[0]),
                counter: counter.clone(),
                value: 0,
            },
            MeasureKind::Aggregate { function, .. } => match function {
                AggregateFunction::Count => Accumulator::Count(0),
                AggregateFunction::Sum(counter) => Accumulator::Sum(counter.clone(), 0),
                AggregateFunction::Min(counter) => Accumulator::Min(counter.clone(), 0),
                AggregateFunction::Max(counter) => Accumulator::Max(counter.clone(), 0),
            },
        };
        Self {
            measure,
            accumulator,
        }
    }

    pub fn name(&self) -> &Symbol {
        &self.measure.name
    }

    /// Feed one object of the scan
    pub fn observe(&mut self, object: &Object, container: &Container) {
        if let MeasureKind::Aggregate { predicates, .. } = &self.measure.kind {
            if !matches_all(predicates, object, container) {
                return;
            }
        }
        match &mut self.accumulator {
            Accumulator::Count(count) => *count += 1,
            Accumulator::Sum(counter, total) => {
                if let Some(value) = object.counter(counter) {
                    *total = total.saturating_add(value);
                }
            }
            Accumulator::Min(counter, min) => {
                if let Some(value) = object.counter(counter) {
                    *min = (*min).min(value);
                }
            }
            Accumulator::Max(counter, max) => {
                if let Some(value) = object.counter(counter) {
                    *max = (*max).max(value);
                }
            }
            Accumulator::Named {
                reference,
                counter,
                value,
            } => {
                if *reference == Some(object.id()) {
                    *value = object.counter(counter).unwrap_or(0);
                }
            }
        }
    }

    pub fn value(&self) -> i64 {
        match &self.accumulator {
            Accumulator::Count(value)
            | Accumulator::Sum(_, value)
            | Accumulator::Min(_, value)
            | Accumulator::Max(_, value)
            | Accumulator::Named { value, .. } => *value,
        }
    }
}

/// One measure's result in a record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeasureValue {
    pub name: Symbol,
    pub value: i64,
}

/// Values of every measure at one step, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRecord {
    pub step: u64,
    pub values: Vec<MeasureValue>,
}

impl ProbeRecord {
    pub fn get(&self, name: &str) -> Option<i64> {
        self.values
            .iter()
            .find(|v| v.name.as_str() == name)
            .map(|v| v.value)
    }
}

/// Run every measure over one scan of the container
pub fn probe_container(
    step: u64,
    measures: &[Measure],
    named: &BTreeMap<Symbol, Vec<Reference>>,
    container: &Container,
) -> ProbeRecord {
    let mut probes: Vec<Probe<'_>> = measures.iter().map(|m| Probe::new(m, named)).collect();
    for object in container.iter() {
        for probe in &mut probes {
            probe.observe(object, container);
        }
    }
    ProbeRecord {
        step,
        values: probes
            .iter()
            .map(|probe| MeasureValue {
                name: probe.name().clone(),
                value: probe.value(),
            })
            .collect(),
    }
}
