//! Solver facade — owns the network and the chosen integrator, and
//! mediates the mesh handoff.
//!
//! The mesh is owned by the scene; the solver borrows it mutably for
//! exactly the duration of `step` (acquire-before-step,
//! release-after-write-back). Everything runs synchronously on the
//! caller's thread; there is no background execution to guard against.

use velum_mesh::{Topology, TriangleMesh};
use velum_types::VelumResult;

use crate::config::{IntegratorKind, SolverConfig};
use crate::implicit::ImplicitIntegrator;
use crate::network::SpringNetwork;
use crate::strategy::{Integrator, StepStats};
use crate::symplectic::SymplecticIntegrator;

/// Deformable-body solver facade.
pub struct DeformableSolver {
    config: SolverConfig,
    network: SpringNetwork,
    integrator: Box<dyn Integrator>,
    /// Collider meshes registered through [`add_collider`](Self::add_collider).
    /// Stored but never consulted: collision detection is an open
    /// interface point with no contact generation behind it.
    colliders: Vec<TriangleMesh>,
    steps_taken: u64,
    potential_energy: f64,
}

impl DeformableSolver {
    /// Builds the solver for a mesh: derives the spring network from the
    /// edge set, validates the configuration against the vertex count,
    /// and initializes the configured integrator.
    pub fn new(
        mesh: &TriangleMesh,
        topology: &Topology,
        config: SolverConfig,
    ) -> VelumResult<Self> {
        config.validate(mesh.vertex_count())?;
        let network = SpringNetwork::from_mesh(mesh, topology, config.mass)?;

        let mut integrator: Box<dyn Integrator> = match config.integrator {
            IntegratorKind::Symplectic => Box::new(SymplecticIntegrator),
            IntegratorKind::Implicit => Box::new(ImplicitIntegrator::new()),
        };
        integrator.init(&network, &config)?;

        Ok(Self {
            config,
            network,
            integrator,
            colliders: Vec::new(),
            steps_taken: 0,
            potential_energy: 0.0,
        })
    }

    /// Advances one timestep and writes updated positions back to the
    /// mesh. A disabled simulation is a deliberate no-op, not an error.
    ///
    /// On failure the network keeps its last valid state and the mesh is
    /// left untouched.
    pub fn step(&mut self, mesh: &mut TriangleMesh) -> VelumResult<Option<StepStats>> {
        if !self.config.enabled {
            return Ok(None);
        }

        let stats = self.integrator.step(&mut self.network, &self.config)?;
        self.network.write_back(mesh);
        self.potential_energy = stats.potential_energy;
        self.steps_taken += 1;
        Ok(Some(stats))
    }

    /// Restores the setup snapshot and rewrites the mesh positions.
    pub fn reset(&mut self, mesh: &mut TriangleMesh) {
        self.network.reset(mesh);
        self.potential_energy = 0.0;
        self.steps_taken = 0;
    }

    /// Registers a collider mesh at the (currently inert) collision seam.
    pub fn add_collider(&mut self, mesh: TriangleMesh) {
        self.colliders.push(mesh);
    }

    /// Number of registered colliders.
    pub fn collider_count(&self) -> usize {
        self.colliders.len()
    }

    /// Collision-detection entry point.
    ///
    /// Declared but not implemented, matching the system this replaces:
    /// `collisions_enabled` and `collision_tolerance` are honored as
    /// configuration, yet no candidate pairs are generated and no contact
    /// response exists.
    // TODO: broad-phase pair generation over velum_spatial::Octree once a
    // contact response lands.
    pub fn detect_collisions(&mut self) -> VelumResult<()> {
        if !self.config.collisions_enabled {
            return Ok(());
        }
        Ok(())
    }

    /// Enables or disables stepping.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.config.enabled = enabled;
    }

    /// The active configuration.
    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Read access to the kinematic state.
    pub fn network(&self) -> &SpringNetwork {
        &self.network
    }

    /// Mutable access to the kinematic state (initial conditions,
    /// perturbation experiments).
    pub fn network_mut(&mut self) -> &mut SpringNetwork {
        &mut self.network
    }

    /// The active integrator's name.
    pub fn integrator_name(&self) -> &str {
        self.integrator.name()
    }

    /// Steps successfully taken since setup or the last reset.
    pub fn steps_taken(&self) -> u64 {
        self.steps_taken
    }

    /// Elastic potential energy from the most recent step.
    pub fn potential_energy(&self) -> f64 {
        self.potential_energy
    }

    /// Current kinetic energy.
    pub fn kinetic_energy(&self) -> f64 {
        self.network.kinetic_energy()
    }
}
