//! # velum-telemetry
//!
//! Event bus for simulation telemetry. Emits structured events
//! (step timing, energy, linear-solve statistics) consumed by
//! pluggable sinks (in-memory for tests, `tracing` for the CLI).

pub mod bus;
pub mod events;
pub mod sinks;

pub use bus::EventBus;
pub use events::{EventKind, SimulationEvent};
pub use sinks::{EventSink, TracingSink, VecSink};
