//! Error types for the Velum engine.
//!
//! All crates return `VelumResult<T>` from fallible operations.
//! Precondition violations surface as recoverable variants rather than
//! assertions: the solver runs inside an interactive application, and a
//! malformed input must never take the host process down.

use thiserror::Error;

/// Unified error type for the Velum engine.
#[derive(Debug, Error)]
pub enum VelumError {
    /// Mesh data is malformed or inconsistent.
    #[error("Invalid mesh: {0}")]
    InvalidMesh(String),

    /// Configuration value is invalid.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A spring has collapsed to zero length; its unit direction is
    /// undefined and force evaluation cannot continue.
    #[error("Spring {spring} has zero current length")]
    DegenerateSpring {
        /// Index of the offending spring in the network.
        spring: usize,
    },

    /// Sparse factorization failed (singular or structurally broken system).
    #[error("Factorization failed: {0}")]
    Factorization(String),

    /// The iterative solver exhausted its iteration cap.
    #[error("Solver did not converge after {iterations} iterations (residual: {residual:.2e})")]
    SolverDivergence {
        /// Iterations performed before giving up.
        iterations: u32,
        /// Residual norm at the final iteration.
        residual: f64,
    },

    /// Spatial-index construction parameters are out of range.
    #[error("Invalid spatial bounds: {0}")]
    InvalidBounds(String),

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience alias for `Result<T, VelumError>`.
pub type VelumResult<T> = Result<T, VelumError>;
