//! Engine configuration
//!
//! The kernel only defines the shape and defaults; reading it from a file
//! is up to the driver.

use crate::rng::SimRng;
use serde::{Deserialize, Serialize};

/// Knobs for one [`Engine`](crate::Engine)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Seed for step shuffling; `None` seeds from OS entropy
    pub seed: Option<u64>,
    /// Probe on steps that are a multiple of this (1 probes every step)
    pub probe_interval: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            seed: None,
            probe_interval: 1,
        }
    }
}

impl EngineConfig {
    pub fn seeded(seed: u64) -> Self {
        Self {
            seed: Some(seed),
            ..Self::default()
        }
    }

    pub fn with_probe_interval(mut self, interval: u64) -> Self {
        self.probe_interval = interval;
        self
    }

    /// Whether probes run after `step`
    pub fn probes_step(&self, step: u64) -> bool {
        self.probe_interval <= 1 || step % self.probe_interval == 0
    }

    pub(crate) fn rng(&self) -> SimRng {
        match self.seed {
            Some(seed) => SimRng::new(seed),
            None => SimRng::from_entropy(),
        }
    }
}
