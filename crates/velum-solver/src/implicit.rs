//! Implicit backward-Euler integrator.
//!
//! Solves a velocity-only linear system each step:
//!
//! 1. zero the sparse system's values (pattern untouched)
//! 2. add the mass matrix onto the block diagonal
//! 3. advance positions by `dt·v` — an explicit predictor used purely to
//!    evaluate forces and derivatives at the new configuration, which is
//!    what keeps the linear system velocity-only
//! 4. accumulate forces and both Jacobians at the predicted state
//! 5. factorize (symbolic analysis cached after the first call) and solve
//!    for the velocity increment `dv`
//! 6. zero `dv` at pinned DOFs
//! 7. `v ← v + dv`, `x ← x + dt·v`
//!
//! Any failure rolls positions back to the pre-step snapshot so the
//! caller holds the last valid state instead of rendering garbage.

use velum_math::sparse::{CsrMatrix, SparseSolver};
use velum_math::{bicgstab, lu::LuSolver};
use velum_types::{VelumError, VelumResult};

use crate::assembly::{add_mass_blocks, build_system_pattern};
use crate::config::{LinearSolverKind, SolverConfig};
use crate::forces::accumulate_forces;
use crate::jacobian::{accumulate_dfdx, accumulate_dfdv};
use crate::network::SpringNetwork;
use crate::strategy::{clamp_pinned_velocities, Integrator, StepStats};

/// Backward-Euler integrator with a frozen-pattern sparse system.
pub struct ImplicitIntegrator {
    /// The 3N×3N system; pattern built once in `init`.
    system: CsrMatrix,
    /// Direct solver holding the cached symbolic analysis.
    lu: LuSolver,
    /// Right-hand side scratch vector.
    rhs: Vec<f32>,
    /// Velocity-increment scratch vector.
    dv: Vec<f32>,
    initialized: bool,
}

impl ImplicitIntegrator {
    /// Creates an uninitialized integrator.
    pub fn new() -> Self {
        Self {
            system: CsrMatrix::new(0, 0),
            lu: LuSolver::new(),
            rhs: Vec::new(),
            dv: Vec::new(),
            initialized: false,
        }
    }

    /// The assembled sparse system (for pattern inspection).
    pub fn system(&self) -> &CsrMatrix {
        &self.system
    }

    fn advance(&mut self, network: &mut SpringNetwork, config: &SolverConfig) -> VelumResult<StepStats> {
        let dt = config.dt;
        let n = network.vertex_count();

        // 1–2. Fresh coefficients, mass on the diagonal.
        self.system.zero_values();
        add_mass_blocks(&mut self.system, n, network.vertex_mass)?;

        // 3. Explicit position predictor.
        for i in 0..network.positions.len() {
            network.positions[i] += dt * network.velocities[i];
        }

        // 4. Forces and derivatives at the predicted configuration.
        let potential_energy = accumulate_forces(network, config)?;
        accumulate_dfdx(network, config, dt, &mut self.system)?;
        accumulate_dfdv(network, config, dt, &mut self.system)?;

        // RHS = −M(v_guess − v) + dt(F − β_g·v); the first Newton iterate
        // takes v_guess = v, so the mass term vanishes.
        let beta_g = config.air_damping;
        for i in 0..self.rhs.len() {
            self.rhs[i] = dt * (network.forces[i] - beta_g * network.velocities[i]);
        }

        // 5. Solve for the velocity increment.
        let (solver, iterations, residual) = match config.linear_solver {
            LinearSolverKind::Direct => {
                self.lu
                    .factorize(&self.system)
                    .map_err(VelumError::Factorization)?;
                self.lu
                    .solve(&self.rhs, &mut self.dv)
                    .map_err(VelumError::Factorization)?;
                ("lu", 0, 0.0)
            }
            LinearSolverKind::Iterative => {
                let report = bicgstab::solve(
                    &self.system,
                    &self.rhs,
                    &mut self.dv,
                    config.iterative_cap,
                    config.iterative_tolerance,
                )
                .map_err(VelumError::Factorization)?;
                if !report.converged {
                    return Err(VelumError::SolverDivergence {
                        iterations: report.iterations,
                        residual: report.residual,
                    });
                }
                ("bicgstab", report.iterations, report.residual)
            }
        };

        // 6. Pinned DOFs receive no velocity change.
        for &pin in &config.pinned {
            let i = pin.index();
            self.dv[3 * i] = 0.0;
            self.dv[3 * i + 1] = 0.0;
            self.dv[3 * i + 2] = 0.0;
        }

        // 7. Apply the increment, then move with the new velocity.
        for i in 0..network.velocities.len() {
            network.velocities[i] += self.dv[i];
        }
        clamp_pinned_velocities(network, config);
        for i in 0..network.positions.len() {
            network.positions[i] += dt * network.velocities[i];
        }

        Ok(StepStats {
            potential_energy,
            solver,
            iterations,
            residual,
        })
    }
}

impl Default for ImplicitIntegrator {
    fn default() -> Self {
        Self::new()
    }
}

impl Integrator for ImplicitIntegrator {
    fn init(&mut self, network: &SpringNetwork, _config: &SolverConfig) -> VelumResult<()> {
        let n = network.vertex_count();
        self.system = build_system_pattern(n, &network.springs);
        self.lu = LuSolver::new();
        self.rhs = vec![0.0f32; 3 * n];
        self.dv = vec![0.0f32; 3 * n];
        self.initialized = true;
        Ok(())
    }

    fn step(
        &mut self,
        network: &mut SpringNetwork,
        config: &SolverConfig,
    ) -> VelumResult<StepStats> {
        if !self.initialized {
            return Err(VelumError::InvalidConfig(
                "Integrator not initialized. Call init() first.".into(),
            ));
        }

        network.save_previous();
        let result = self.advance(network, config);
        if result.is_err() {
            // Only positions can have been touched before a failure;
            // velocities change strictly after the solve succeeds.
            network.restore_previous();
        }
        result
    }

    fn name(&self) -> &str {
        "implicit"
    }
}
