//! Explicit symplectic Euler integrator.
//!
//! Velocity first from forces at the current state, then position from
//! the updated velocity. No linear solve; stable only for small `dt`.

use velum_types::VelumResult;

use crate::config::SolverConfig;
use crate::forces::accumulate_forces;
use crate::network::SpringNetwork;
use crate::strategy::{clamp_pinned_velocities, Integrator, StepStats};

/// Forward symplectic integrator (no per-step state).
#[derive(Debug, Default)]
pub struct SymplecticIntegrator;

impl Integrator for SymplecticIntegrator {
    fn init(&mut self, _network: &SpringNetwork, _config: &SolverConfig) -> VelumResult<()> {
        Ok(())
    }

    fn step(
        &mut self,
        network: &mut SpringNetwork,
        config: &SolverConfig,
    ) -> VelumResult<StepStats> {
        network.save_previous();

        // Forces fail before any state is written, so an error here leaves
        // the network untouched.
        let potential_energy = accumulate_forces(network, config)?;

        let dt = config.dt;
        let inv_mass = 1.0 / network.vertex_mass;
        let beta_g = config.air_damping;

        // v ← v + dt·M⁻¹(F − β_g·v)
        for i in 0..network.velocities.len() {
            network.velocities[i] +=
                dt * inv_mass * (network.forces[i] - beta_g * network.velocities[i]);
        }
        clamp_pinned_velocities(network, config);

        // x ← x + dt·v
        for i in 0..network.positions.len() {
            network.positions[i] += dt * network.velocities[i];
        }

        Ok(StepStats {
            potential_energy,
            solver: "none",
            iterations: 0,
            residual: 0.0,
        })
    }

    fn name(&self) -> &str {
        "symplectic"
    }
}
