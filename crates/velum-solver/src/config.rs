//! Solver configuration.
//!
//! Every knob is a plain numeric/boolean parameter with a serde surface,
//! so a config can live in a TOML file or be driven from UI state.

use serde::{Deserialize, Serialize};
use velum_types::{constants, ParticleId, VelumError, VelumResult};

/// Which time-stepping scheme drives the simulation.
///
/// Selected once per configuration; there is no transition between
/// schemes mid-simulation other than rebuilding the solver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntegratorKind {
    /// Forward symplectic Euler: cheap, stable only for small `dt`.
    Symplectic,
    /// Backward Euler with a sparse velocity solve.
    Implicit,
}

/// Which backend solves the implicit velocity system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LinearSolverKind {
    /// Sparse LU with reused symbolic analysis.
    Direct,
    /// BiCGSTAB under the configured iteration cap.
    Iterative,
}

/// Configuration for the deformable-body solver.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolverConfig {
    /// Spring stiffness `k`.
    pub stiffness: f32,

    /// Time step `dt` (seconds).
    pub dt: f32,

    /// Total mass of the body; shared uniformly across vertices.
    pub mass: f32,

    /// Structural (per-spring) damping `β_s`.
    pub structural_damping: f32,

    /// Global air damping `β_g`.
    pub air_damping: f32,

    /// Gravitational acceleration magnitude, applied along −Y.
    pub gravity: f32,

    /// Scale applied to the accumulated force vector.
    pub force_scale: f32,

    /// Master switch — `step()` is a no-op while false.
    pub enabled: bool,

    /// Time-stepping scheme.
    pub integrator: IntegratorKind,

    /// Linear-solve backend for the implicit scheme.
    pub linear_solver: LinearSolverKind,

    /// Iteration cap for the iterative backend.
    pub iterative_cap: u32,

    /// Relative residual tolerance for the iterative backend.
    pub iterative_tolerance: f64,

    /// Collision flag. Stored but inert: detection is an open interface
    /// point with no contact generation behind it.
    pub collisions_enabled: bool,

    /// Collision tolerance. Inert, see `collisions_enabled`.
    pub collision_tolerance: f32,

    /// Vertices held fixed as boundary conditions.
    pub pinned: Vec<ParticleId>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            stiffness: 30.0,
            dt: constants::DEFAULT_DT,
            mass: 1.0,
            structural_damping: 0.05,
            air_damping: 0.005,
            gravity: constants::GRAVITY,
            force_scale: 1.0,
            enabled: false,
            integrator: IntegratorKind::Implicit,
            linear_solver: LinearSolverKind::Direct,
            iterative_cap: constants::DEFAULT_ITERATIVE_CAP,
            iterative_tolerance: 1.0e-4,
            collisions_enabled: false,
            collision_tolerance: 0.01,
            pinned: Vec::new(),
        }
    }
}

impl SolverConfig {
    /// Validates the configuration against a concrete mesh.
    ///
    /// Pinned indices are checked here, at setup time, so the force and
    /// solve loops can index without bounds anxiety.
    pub fn validate(&self, vertex_count: usize) -> VelumResult<()> {
        if self.dt <= 0.0 || !self.dt.is_finite() {
            return Err(VelumError::InvalidConfig(format!(
                "dt must be positive and finite, got {}",
                self.dt
            )));
        }
        if self.mass <= 0.0 || !self.mass.is_finite() {
            return Err(VelumError::InvalidConfig(format!(
                "mass must be positive and finite, got {}",
                self.mass
            )));
        }
        if self.stiffness < 0.0 {
            return Err(VelumError::InvalidConfig(format!(
                "stiffness must be non-negative, got {}",
                self.stiffness
            )));
        }
        for &pin in &self.pinned {
            if pin.index() >= vertex_count {
                return Err(VelumError::InvalidConfig(format!(
                    "Pinned vertex {} is out of range (vertex count: {})",
                    pin.0, vertex_count
                )));
            }
        }
        Ok(())
    }
}
