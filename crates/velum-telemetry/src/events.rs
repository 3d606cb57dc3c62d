//! Simulation event types.
//!
//! Structured events emitted by the solver facade at various points in
//! each step. Events are lightweight value types carrying just enough
//! data for monitoring and debugging.

use serde::{Deserialize, Serialize};

/// A simulation event emitted by the engine.
///
/// Events are tagged with a step index and carry domain-specific data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimulationEvent {
    /// Step number (0-indexed).
    pub step: u64,
    /// Event payload.
    pub kind: EventKind,
}

/// Event payload variants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum EventKind {
    /// A solver step started.
    StepBegin,

    /// A solver step completed.
    StepEnd {
        /// Wall-clock time for the step (seconds).
        wall_time: f64,
    },

    /// Energy snapshot after the step.
    Energy {
        /// Kinetic energy (½ Σ m v²).
        kinetic: f64,
        /// Elastic potential energy (½ Σ k (l − l₀)²).
        potential: f64,
    },

    /// Linear-solve statistics from an implicit step.
    SolveStats {
        /// Which backend ran ("lu" or "bicgstab").
        #[serde(skip_deserializing)]
        solver: &'static str,
        /// Iterations performed (0 for the direct path).
        iterations: u32,
        /// Final residual norm (0 for the direct path).
        residual: f64,
    },
}

impl SimulationEvent {
    /// Creates a new event for the given step.
    pub fn new(step: u64, kind: EventKind) -> Self {
        Self { step, kind }
    }
}
