//! Automat kernel - rule-based simulation engine
//!
//! A model declares **concepts** (templates for objects), **actuators**
//! (rules applied every step) and **measures** (aggregates recorded after
//! every step). The engine instantiates one of the model's worlds into a
//! container and then advances it step by step.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────────────────┐
//! │                        Engine                         │
//! │  (step loop - shuffles actuators, collects signals)   │
//! ├───────────────────────────────────────────────────────┤
//! │                                                       │
//! │  ┌────────────┐   select    ┌──────────────────────┐  │
//! │  │  Actuator  │ ──────────▶ │      Container       │  │
//! │  │ Selector + │             │  Reference → Object  │  │
//! │  │ Modifiers  │ ◀────────── │   (tags, counters,   │  │
//! │  └─────┬──────┘  guard/apply│     slot bindings)   │  │
//! │        │                    └──────────┬───────────┘  │
//! │        │ traps / notify / halt         │ scan         │
//! │        ▼                               ▼              │
//! │  ┌────────────┐                 ┌────────────┐        │
//! │  │ EngineHooks│                 │   Probes   │        │
//! │  └────────────┘                 └─────┬──────┘        │
//! │                                       ▼               │
//! │                                 ┌────────────┐        │
//! │                                 │  Observer  │        │
//! │                                 └────────────┘        │
//! └───────────────────────────────────────────────────────┘
//! ```
//!
//! # Core Concepts
//!
//! ## Objects
//!
//! An **object** carries a tag set, named integer counters and named slots
//! that may be bound to other objects. Objects are immutable values; every
//! change produces a new version stored under the same [`Reference`].
//!
//! ## Predicates and Selectors
//!
//! A **predicate** tests one object, optionally through one of its slots.
//! A **selector** picks objects from the container: all of them, those
//! matching a predicate list, or the container root if it matches.
//!
//! ## Modifiers
//!
//! A **modifier** pairs a target (the object itself, its interaction
//! partner, or an object reached through a slot) with an action. Each
//! action has a guard; an actuator applies its modifiers to an object or
//! pair only when every guard passes, and then applies all of them.
//!
//! ## Steps
//!
//! Each step runs every actuator once, in an order shuffled by the engine's
//! seedable RNG. Actuators that fired raise their traps and notifications,
//! and may halt the engine at the end of the step.
//!
//! # Example
//!
//! ```rust
//! use automat_kernel::{
//!     Action, Actuator, AggregateFunction, CollectingObserver, Concept, Engine, EngineConfig,
//!     InstanceSpec, Measure, Model, Modifier, Predicate, Selector, World,
//! };
//!
//! let model = Model::new()
//!     .concept("cell", Concept::new().with_tag("alive").with_counter("age", 0))
//!     .actuator(
//!         Actuator::new(Selector::tagged(["alive"]))
//!             .named("grow")
//!             .modifier(Modifier::on_this(Action::Inc("age".into()))),
//!     )
//!     .measure(Measure::counter_by_name("first-age", "first", "age"))
//!     .measure(Measure::aggregate(
//!         "alive",
//!         AggregateFunction::Count,
//!         [Predicate::tags(["alive"])],
//!     ))
//!     .world(
//!         "main",
//!         World::new()
//!             .instance(InstanceSpec::new("cell").named("first"))
//!             .instance(InstanceSpec::new("cell").times(4)),
//!     );
//!
//! let observer = CollectingObserver::new();
//! let log = observer.log();
//! let mut engine = Engine::new(EngineConfig::seeded(42)).with_observer(observer);
//! engine.initialize(model, "main").unwrap();
//! engine.run(5).unwrap();
//!
//! let log = log.lock();
//! let last = log.records.last().unwrap();
//! assert_eq!(last.get("first-age"), Some(5));
//! assert_eq!(last.get("alive"), Some(5));
//! ```

// Modules
pub mod actuator;
pub mod config;
pub mod container;
pub mod engine;
pub mod error;
pub mod instantiate;
pub mod model;
pub mod modifier;
pub mod object;
pub mod observer;
pub mod predicate;
pub mod probe;
pub mod rng;

// Re-exports for convenience
pub use actuator::Actuator;
pub use config::EngineConfig;
pub use container::Container;
pub use engine::{Engine, EngineState, RunState, StepReport};
pub use error::{EngineError, ModelError, ModelResult, Result};
pub use instantiate::{instantiate, instantiate_graph, InstanceTable};
pub use model::{Concept, Initializers, InstanceSpec, Model, World};
pub use modifier::{apply_all, can_apply_all, Action, Modifier, ModifierTarget, Role};
pub use object::Object;
pub use observer::{
    CollectingHooks, CollectingObserver, EngineHooks, HookEvent, LoggingHooks, LoggingObserver,
    NoopHooks, Notification, ObservationLog, Observer, TrapSet,
};
pub use predicate::{matches_all, Predicate, PredicateKind, Selector};
pub use probe::{
    probe_container, AggregateFunction, Measure, MeasureKind, MeasureValue, Probe, ProbeRecord,
};
pub use rng::SimRng;

pub use automat_types::{CounterDict, Reference, Symbol, TagList};
