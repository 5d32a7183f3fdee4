//! Callback points driven by the engine
//!
//! Two traits cover everything collaborators can plug in:
//!
//! - [`Observer`]: receives measures, probe records and notifications
//! - [`EngineHooks`]: run/step boundaries, traps and halting
//!
//! Both have no-op defaults so implementations only override what they need.
//! Logging and collecting implementations are provided for drivers and tests.

use crate::container::Container;
use crate::probe::{Measure, ProbeRecord};
use automat_types::Symbol;
use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Trap name → number of firing actuators that raised it in one step
pub type TrapSet = BTreeMap<Symbol, usize>;

/// A notification raised by a firing actuator
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub step: u64,
    pub actuator: Option<Symbol>,
    pub name: Symbol,
}

/// Receiver for measurement output
pub trait Observer: Send {
    /// Called once at the start of `run`
    fn on_run_start(&mut self, measures: &[Measure], total_steps: u64) {
        let _ = (measures, total_steps);
    }

    /// Called with the probe record of every observed step
    fn on_record(&mut self, step: u64, record: &ProbeRecord) {
        let _ = (step, record);
    }

    /// Called once per notification raised
    fn on_notify(&mut self, notification: &Notification) {
        let _ = notification;
    }

    /// Called once at the end of `run`
    fn finalize(&mut self) {}
}

/// Hooks around runs and steps
pub trait EngineHooks: Send {
    fn before_run(&mut self, container: &Container) {
        let _ = container;
    }

    fn after_run(&mut self, container: &Container) {
        let _ = container;
    }

    fn before_step(&mut self, step: u64, container: &Container) {
        let _ = (step, container);
    }

    fn after_step(&mut self, step: u64, container: &Container) {
        let _ = (step, container);
    }

    /// Called after a step that raised at least one trap
    fn on_trap(&mut self, step: u64, traps: &TrapSet) {
        let _ = (step, traps);
    }

    /// Called once, at the end of the step in which the engine halted
    fn on_halt(&mut self, step: u64) {
        let _ = step;
    }
}

/// Hooks that do nothing
pub struct NoopHooks;

impl EngineHooks for NoopHooks {}

/// An observer that logs every callback through `tracing`
pub struct LoggingObserver {
    prefix: String,
}

impl LoggingObserver {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl Observer for LoggingObserver {
    fn on_run_start(&mut self, measures: &[Measure], total_steps: u64) {
        let names: Vec<&str> = measures.iter().map(|m| m.name.as_str()).collect();
        tracing::info!(prefix = %self.prefix, total_steps, measures = ?names, "run started");
    }

    fn on_record(&mut self, step: u64, record: &ProbeRecord) {
        for value in &record.values {
            tracing::info!(
                prefix = %self.prefix,
                step,
                measure = %value.name,
                value = value.value,
                "probe"
            );
        }
    }

    fn on_notify(&mut self, notification: &Notification) {
        tracing::info!(
            prefix = %self.prefix,
            step = notification.step,
            notification = %notification.name,
            "notify"
        );
    }

    fn finalize(&mut self) {
        tracing::info!(prefix = %self.prefix, "run finished");
    }
}

/// Hooks that log traps and halting through `tracing`
pub struct LoggingHooks {
    prefix: String,
}

impl LoggingHooks {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl EngineHooks for LoggingHooks {
    fn before_run(&mut self, container: &Container) {
        tracing::debug!(prefix = %self.prefix, objects = container.len(), "before run");
    }

    fn after_run(&mut self, container: &Container) {
        tracing::debug!(prefix = %self.prefix, objects = container.len(), "after run");
    }

    fn on_trap(&mut self, step: u64, traps: &TrapSet) {
        tracing::warn!(prefix = %self.prefix, step, traps = ?traps, "trap");
    }

    fn on_halt(&mut self, step: u64) {
        tracing::info!(prefix = %self.prefix, step, "halted");
    }
}

/// Everything an observer was told
#[derive(Debug, Clone, Default)]
pub struct ObservationLog {
    pub measures: Vec<Symbol>,
    pub total_steps: Option<u64>,
    pub records: Vec<ProbeRecord>,
    pub notifications: Vec<Notification>,
    pub finalized: bool,
}

/// An observer that records callbacks into a shared log
///
/// Keep a handle from [`CollectingObserver::log`] before handing the
/// observer to the engine.
#[derive(Default)]
pub struct CollectingObserver {
    log: Arc<Mutex<ObservationLog>>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn log(&self) -> Arc<Mutex<ObservationLog>> {
        self.log.clone()
    }
}

impl Observer for CollectingObserver {
    fn on_run_start(&mut self, measures: &[Measure], total_steps: u64) {
        let mut log = self.log.lock();
        log.measures = measures.iter().map(|m| m.name.clone()).collect();
        log.total_steps = Some(total_steps);
    }

    fn on_record(&mut self, _step: u64, record: &ProbeRecord) {
        self.log.lock().records.push(record.clone());
    }

    fn on_notify(&mut self, notification: &Notification) {
        self.log.lock().notifications.push(notification.clone());
    }

    fn finalize(&mut self) {
        self.log.lock().finalized = true;
    }
}

/// One hook invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HookEvent {
    BeforeRun,
    AfterRun,
    BeforeStep(u64),
    AfterStep(u64),
    Trap { step: u64, traps: TrapSet },
    Halt(u64),
}

/// Hooks that record every invocation into a shared list
#[derive(Default)]
pub struct CollectingHooks {
    events: Arc<Mutex<Vec<HookEvent>>>,
}

impl CollectingHooks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Arc<Mutex<Vec<HookEvent>>> {
        self.events.clone()
    }
}

impl EngineHooks for CollectingHooks {
    fn before_run(&mut self, _container: &Container) {
        self.events.lock().push(HookEvent::BeforeRun);
    }

    fn after_run(&mut self, _container: &Container) {
        self.events.lock().push(HookEvent::AfterRun);
    }

    fn before_step(&mut self, step: u64, _container: &Container) {
        self.events.lock().push(HookEvent::BeforeStep(step));
    }

    fn after_step(&mut self, step: u64, _container: &Container) {
        self.events.lock().push(HookEvent::AfterStep(step));
    }

    fn on_trap(&mut self, step: u64, traps: &TrapSet) {
        self.events.lock().push(HookEvent::Trap {
            step,
            traps: traps.clone(),
        });
    }

    fn on_halt(&mut self, step: u64) {
        self.events.lock().push(HookEvent::Halt(step));
    }
}
