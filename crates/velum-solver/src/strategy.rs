//! Integrator strategy trait — the seam between the two time-stepping
//! policies.
//!
//! The facade selects one implementation from configuration at setup and
//! never swaps it mid-simulation.

use velum_types::VelumResult;

use crate::config::SolverConfig;
use crate::network::SpringNetwork;

/// Result of one integration step.
#[derive(Debug, Clone, Copy)]
pub struct StepStats {
    /// Elastic potential energy at the evaluated configuration.
    pub potential_energy: f64,
    /// Which linear-solve backend ran ("none" for the explicit scheme).
    pub solver: &'static str,
    /// Linear-solver iterations (0 for the direct path and the explicit
    /// scheme).
    pub iterations: u32,
    /// Linear-solver residual (0 for the direct path and the explicit
    /// scheme).
    pub residual: f64,
}

/// Trait for time integrators.
///
/// The facade calls these in order:
///
/// ```text
/// integrator.init(&network, &config)?;
/// loop {
///     integrator.step(&mut network, &config)?;
/// }
/// ```
///
/// `step` advances velocities and positions in place; writing positions
/// back to the mesh is the facade's job. On error, implementations leave
/// the network at its last valid state.
///
/// # Implementations
///
/// - [`SymplecticIntegrator`](crate::symplectic::SymplecticIntegrator)
/// - [`ImplicitIntegrator`](crate::implicit::ImplicitIntegrator)
pub trait Integrator: Send {
    /// One-time setup: pre-compute whatever the scheme needs (the
    /// implicit scheme builds its sparsity pattern here).
    fn init(&mut self, network: &SpringNetwork, config: &SolverConfig) -> VelumResult<()>;

    /// Advance the simulation by one `config.dt`.
    fn step(&mut self, network: &mut SpringNetwork, config: &SolverConfig)
        -> VelumResult<StepStats>;

    /// Returns the integrator's name.
    fn name(&self) -> &str;
}

/// Zeroes the velocity DOFs of every pinned vertex.
///
/// Run after each velocity update so a pinned vertex can never pick up
/// motion, whatever the force or solve produced.
pub(crate) fn clamp_pinned_velocities(network: &mut SpringNetwork, config: &SolverConfig) {
    for &pin in &config.pinned {
        let i = pin.index();
        network.velocities[3 * i] = 0.0;
        network.velocities[3 * i + 1] = 0.0;
        network.velocities[3 * i + 2] = 0.0;
    }
}
