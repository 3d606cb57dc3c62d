//! Scalar type alias for the simulation.

/// The floating-point type used throughout the simulation.
///
/// Set to `f32` to match GPU vertex buffers; the sparse direct solver
/// promotes to `f64` internally where it matters.
pub type Scalar = f32;
