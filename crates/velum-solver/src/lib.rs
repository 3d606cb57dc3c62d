//! # velum-solver
//!
//! Mass-spring deformable-body solver: turns a triangle mesh's edge set
//! into a spring network and integrates its motion under gravity, elastic,
//! and damping forces.
//!
//! ## Key Types
//!
//! - [`SpringNetwork`] — per-vertex kinematic state and the derived springs
//! - [`Integrator`] — strategy trait with two implementations:
//!   [`SymplecticIntegrator`] (explicit, no linear solve) and
//!   [`ImplicitIntegrator`] (backward Euler, sparse linear solve)
//! - [`SolverConfig`] — the full numeric/boolean configuration surface
//! - [`DeformableSolver`] — facade owning network + integrator; writes
//!   updated positions back to the mesh after each step

pub mod assembly;
pub mod config;
pub mod engine;
pub mod forces;
pub mod implicit;
pub mod jacobian;
pub mod network;
pub mod strategy;
pub mod symplectic;

pub use config::{IntegratorKind, LinearSolverKind, SolverConfig};
pub use engine::DeformableSolver;
pub use implicit::ImplicitIntegrator;
pub use network::{Spring, SpringNetwork};
pub use strategy::{Integrator, StepStats};
pub use symplectic::SymplecticIntegrator;
