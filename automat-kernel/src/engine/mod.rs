//! The step loop
//!
//! An [`Engine`] owns one container and advances it one step at a time:
//! actuators run in a freshly shuffled order, the traps, notifications and
//! halt flags of the actuators that fired are collected, and probes are
//! recorded for the attached observer.

mod dispatch;

use crate::actuator::Actuator;
use crate::config::EngineConfig;
use crate::container::Container;
use crate::error::{EngineError, ModelError, ModelResult, Result};
use crate::instantiate::{bind_initial, instantiate, instantiate_graph, InstanceTable};
use crate::model::{Initializers, Model};
use crate::observer::{EngineHooks, NoopHooks, Notification, Observer, TrapSet};
use crate::probe::{probe_container, ProbeRecord};
use crate::rng::SimRng;
use automat_types::{Reference, Symbol};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Whether the engine still accepts steps
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RunState {
    #[default]
    Running,
    /// Terminal until the engine is initialized again
    Halted,
}

/// Mutable per-run state
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineState {
    /// Number of steps executed since initialization
    pub step: u64,
    pub run_state: RunState,
    /// Traps raised during the most recent step
    pub traps: TrapSet,
}

impl EngineState {
    pub fn is_halted(&self) -> bool {
        self.run_state == RunState::Halted
    }
}

/// Summary of one executed step
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepReport {
    pub step: u64,
    /// Modifier group applications across all actuators
    pub applications: usize,
    /// Actuators that applied at least once, in execution order
    pub fired: Vec<String>,
    pub traps: TrapSet,
    pub halted: bool,
    /// Present when an observer is attached and the step was probed
    pub record: Option<ProbeRecord>,
}

/// The simulation engine
///
/// # Example
///
/// ```
/// use automat_kernel::{
///     Action, Actuator, Concept, Engine, EngineConfig, InstanceSpec, Model, Modifier,
///     Selector, World,
/// };
///
/// let model = Model::new()
///     .concept("cell", Concept::new().with_counter("age", 0))
///     .actuator(
///         Actuator::new(Selector::tagged(["cell"]))
///             .modifier(Modifier::on_this(Action::Inc("age".into()))),
///     )
///     .world("main", World::new().instance(InstanceSpec::new("cell").times(2)));
///
/// let mut engine = Engine::new(EngineConfig::seeded(7));
/// engine.initialize(model, "main").unwrap();
/// assert_eq!(engine.run(3).unwrap(), 3);
///
/// for object in engine.container().iter() {
///     assert_eq!(object.counter("age"), Some(3));
/// }
/// ```
pub struct Engine {
    config: EngineConfig,
    /// RNG state as of construction, restored on every initialize
    origin: SimRng,
    rng: SimRng,
    model: Option<Arc<Model>>,
    /// Set once a world has been instantiated without errors
    ready: bool,
    container: Container,
    named: InstanceTable,
    state: EngineState,
    notifications: Vec<Notification>,
    observer: Option<Box<dyn Observer>>,
    hooks: Box<dyn EngineHooks>,
}

impl Engine {
    /// Create an engine, seeding its RNG from the configuration
    pub fn new(config: EngineConfig) -> Self {
        let rng = config.rng();
        Self::with_rng(config, rng)
    }

    /// Create an engine driven by an explicit RNG
    ///
    /// The configured seed is ignored.
    pub fn with_rng(config: EngineConfig, rng: SimRng) -> Self {
        Self {
            config,
            origin: rng.clone(),
            rng,
            model: None,
            ready: false,
            container: Container::new(),
            named: InstanceTable::new(),
            state: EngineState::default(),
            notifications: Vec::new(),
            observer: None,
            hooks: Box::new(NoopHooks),
        }
    }

    /// Attach an observer, replacing any previous one
    pub fn set_observer(&mut self, observer: impl Observer + 'static) {
        self.observer = Some(Box::new(observer));
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.set_observer(observer);
        self
    }

    /// Detach the observer, if any
    pub fn take_observer(&mut self) -> Option<Box<dyn Observer>> {
        self.observer.take()
    }

    pub fn set_hooks(&mut self, hooks: impl EngineHooks + 'static) {
        self.hooks = Box::new(hooks);
    }

    pub fn with_hooks(mut self, hooks: impl EngineHooks + 'static) -> Self {
        self.set_hooks(hooks);
        self
    }

    /// Discard the current run and instantiate `world` from `model`
    ///
    /// The container, instance table, notifications and RNG are all reset,
    /// so initializing twice with the same model and seed replays the same
    /// run. On error every problem found is returned and the engine refuses
    /// to step until a later initialize succeeds.
    pub fn initialize(
        &mut self,
        model: impl Into<Arc<Model>>,
        world: &str,
    ) -> std::result::Result<(), Vec<ModelError>> {
        let model = model.into();

        self.container.remove_all();
        self.named.clear();
        self.state = EngineState::default();
        self.notifications.clear();
        self.rng = self.origin.clone();
        self.ready = false;
        self.model = Some(model.clone());

        let result = match model.worlds.get(world) {
            Some(spec) => instantiate_graph(&model, &mut self.container, spec),
            None => Err(vec![ModelError::UnknownWorld(Symbol::new(world))]),
        };

        match result {
            Ok(named) => {
                self.named = named;
                self.ready = true;
                tracing::info!(
                    world,
                    objects = self.container.len(),
                    actuators = model.actuators.len(),
                    "initialized"
                );
                Ok(())
            }
            Err(errors) => {
                for error in &errors {
                    tracing::warn!(world, %error, "initialization error");
                }
                Err(errors)
            }
        }
    }

    /// Create one more object of `concept` in the running world
    ///
    /// Initializer bindings are resolved against the instance names of the
    /// current world.
    pub fn instantiate(&mut self, concept: &str, init: &Initializers) -> ModelResult<Reference> {
        let concept = Symbol::new(concept);
        let Some(model) = &self.model else {
            return Err(ModelError::UnknownConcept(concept));
        };
        let reference = instantiate(model, &mut self.container, &concept, init)?;
        for (slot, instance) in &init.bindings {
            if let Err(error) =
                bind_initial(&mut self.container, &self.named, reference, &concept, slot, instance)
            {
                self.container.remove(reference);
                return Err(error);
            }
        }
        Ok(reference)
    }

    /// Execute one step
    pub fn step(&mut self) -> Result<StepReport> {
        let model = self.ready_model()?;
        if self.state.is_halted() {
            return Err(EngineError::Halted {
                step: self.state.step,
            });
        }

        self.state.traps.clear();
        self.state.step += 1;
        let step = self.state.step;
        self.hooks.before_step(step, &self.container);

        let mut order: Vec<usize> = (0..model.actuators.len()).collect();
        self.rng.shuffle(&mut order);

        let mut applications = 0;
        let mut fired = Vec::new();
        for index in order {
            let actuator = &model.actuators[index];
            let applied = dispatch::dispatch(actuator, &mut self.container, &mut self.rng);
            if applied == 0 {
                continue;
            }
            applications += applied;
            fired.push(actuator.label().to_string());
            self.raise(step, actuator);
        }

        let record = match &mut self.observer {
            Some(observer) if self.config.probes_step(step) => {
                let record =
                    probe_container(step, &model.measures, &self.named, &self.container);
                observer.on_record(step, &record);
                Some(record)
            }
            _ => None,
        };

        if !self.state.traps.is_empty() {
            self.hooks.on_trap(step, &self.state.traps);
        }

        let halted = self.state.is_halted();
        if halted {
            tracing::info!(step, "halted");
            self.hooks.on_halt(step);
        }
        self.hooks.after_step(step, &self.container);

        tracing::debug!(step, applications, fired = fired.len(), "step");

        Ok(StepReport {
            step,
            applications,
            fired,
            traps: self.state.traps.clone(),
            halted,
            record,
        })
    }

    /// Execute up to `steps` steps, stopping early once halted
    ///
    /// Returns the number of steps actually executed.
    pub fn run(&mut self, steps: u64) -> Result<u64> {
        let model = self.ready_model()?;
        if self.state.is_halted() {
            return Err(EngineError::Halted {
                step: self.state.step,
            });
        }

        self.hooks.before_run(&self.container);
        if let Some(observer) = &mut self.observer {
            observer.on_run_start(&model.measures, steps);
        }

        let mut executed = 0;
        while executed < steps {
            let report = self.step()?;
            executed += 1;
            if report.halted {
                break;
            }
        }

        if let Some(observer) = &mut self.observer {
            observer.finalize();
        }
        self.hooks.after_run(&self.container);
        Ok(executed)
    }

    /// Probe the current container with every measure of the model
    pub fn probe(&self) -> Result<ProbeRecord> {
        let model = self.ready_model()?;
        Ok(probe_container(
            self.state.step,
            &model.measures,
            &self.named,
            &self.container,
        ))
    }

    pub fn container(&self) -> &Container {
        &self.container
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> Option<&Model> {
        self.model.as_deref()
    }

    pub fn state(&self) -> &EngineState {
        &self.state
    }

    pub fn step_count(&self) -> u64 {
        self.state.step
    }

    pub fn is_halted(&self) -> bool {
        self.state.is_halted()
    }

    /// Objects created under an instance name of the current world
    pub fn named(&self, name: &str) -> &[Reference] {
        self.named.get(name).map(Vec::as_slice).unwrap_or_default()
    }

    /// Every notification raised since initialization
    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    fn ready_model(&self) -> Result<Arc<Model>> {
        match &self.model {
            Some(model) if self.ready => Ok(model.clone()),
            _ => Err(EngineError::NotInitialized),
        }
    }

    /// Merge the signals of an actuator that fired during `step`
    fn raise(&mut self, step: u64, actuator: &Actuator) {
        for trap in &actuator.traps {
            *self.state.traps.entry(trap.clone()).or_default() += 1;
        }
        for name in &actuator.notifications {
            let notification = Notification {
                step,
                actuator: actuator.name.clone(),
                name: name.clone(),
            };
            if let Some(observer) = &mut self.observer {
                observer.on_notify(&notification);
            }
            self.notifications.push(notification);
        }
        if actuator.halts {
            self.state.run_state = RunState::Halted;
        }
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}
