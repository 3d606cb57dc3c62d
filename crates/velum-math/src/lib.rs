//! # velum-math
//!
//! Linear algebra primitives for the Velum deformable-body engine.
//!
//! Provides:
//! - Re-exports of `glam` types (`Vec3`, `Mat3`, etc.)
//! - Sparse matrix representation (CSR) with a frozen-pattern contract
//! - Sparse LU solver backed by `faer` with reusable symbolic analysis
//! - BiCGSTAB iterative fallback

pub mod bicgstab;
pub mod lu;
pub mod sparse;

// Re-export glam types as the canonical math types for Velum.
pub use glam::{Mat3, Mat4, Quat, Vec2, Vec3, Vec4};
