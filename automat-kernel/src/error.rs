//! Error types for the automat kernel

use automat_types::Symbol;
use thiserror::Error;

/// Problems with the model or world being instantiated
///
/// These are collected across a whole instantiation pass so the caller
/// sees every problem at once.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// Concept name not defined by the model
    #[error("unknown concept `{0}`")]
    UnknownConcept(Symbol),

    /// World name not defined by the model
    #[error("unknown world `{0}`")]
    UnknownWorld(Symbol),

    /// Binding or root refers to an instance name that was never created
    #[error("unknown instance `{0}`")]
    UnknownInstance(Symbol),

    /// Binding or root refers to a name shared by several instances
    #[error("instance name `{name}` refers to {count} objects")]
    AmbiguousInstance { name: Symbol, count: usize },

    /// Binding initializer for a slot the concept does not declare
    #[error("concept `{concept}` does not declare slot `{slot}`")]
    UndeclaredSlot { concept: Symbol, slot: Symbol },
}

/// Misuse of the stepping API
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// `step` or `run` before a successful `initialize`
    #[error("engine has not been initialized with a world")]
    NotInitialized,

    /// The engine halted and must be re-initialized
    #[error("engine halted at step {step}")]
    Halted { step: u64 },
}

/// Result type using ModelError
pub type ModelResult<T> = std::result::Result<T, ModelError>;

/// Result type using EngineError
pub type Result<T> = std::result::Result<T, EngineError>;
