//! Pluggable event sinks.

use crate::events::SimulationEvent;

/// Trait for event consumers.
///
/// Implement this to create custom telemetry outputs.
pub trait EventSink: Send {
    /// Process a single event.
    fn handle(&mut self, event: &SimulationEvent);

    /// Called when the simulation ends. Flush buffers, close files, etc.
    fn finalize(&mut self) {}

    /// Returns a human-readable name for this sink.
    fn name(&self) -> &str;
}

/// A simple sink that collects events into a `Vec` for tests and inspection.
pub struct VecSink {
    /// Collected events.
    pub events: Vec<SimulationEvent>,
}

impl VecSink {
    /// Creates an empty vec sink.
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }
}

impl Default for VecSink {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSink for VecSink {
    fn handle(&mut self, event: &SimulationEvent) {
        self.events.push(event.clone());
    }

    fn name(&self) -> &str {
        "vec_sink"
    }
}

/// A sink that logs events through the `tracing` crate.
pub struct TracingSink;

impl EventSink for TracingSink {
    fn handle(&mut self, event: &SimulationEvent) {
        tracing::info!(step = event.step, event = ?event.kind, "simulation_event");
    }

    fn name(&self) -> &str {
        "tracing_sink"
    }
}
