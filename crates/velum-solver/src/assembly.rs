//! Sparse system assembly for the implicit integrator.
//!
//! The 3N×3N system has a fixed structural pattern: a 3×3 diagonal block
//! per vertex plus the two symmetric off-diagonal 3×3 blocks per spring.
//! The pattern is built once here; every implicit step only rewrites
//! coefficient values, which keeps the direct solver's symbolic analysis
//! valid for the lifetime of the simulation.

use velum_math::sparse::CsrMatrix;
use velum_math::Mat3;
use velum_types::{VelumError, VelumResult};

use crate::network::Spring;

/// Builds the frozen sparsity pattern for `n` vertices and the given
/// springs. All coefficients start at zero.
pub fn build_system_pattern(n: usize, springs: &[Spring]) -> CsrMatrix {
    let mut triplets: Vec<(usize, usize, f32)> = Vec::with_capacity(9 * n + 18 * springs.len());

    // Vectorize each 3×3 block row-wise into the triplet list.
    let mut add_block_pattern = |r0: usize, c0: usize, triplets: &mut Vec<(usize, usize, f32)>| {
        for r in 0..3 {
            for c in 0..3 {
                triplets.push((r0 + r, c0 + c, 0.0));
            }
        }
    };

    // Block diagonal, one per vertex.
    for i in 0..n {
        add_block_pattern(3 * i, 3 * i, &mut triplets);
    }
    // Two symmetric off-diagonal blocks per spring.
    for sp in springs {
        add_block_pattern(3 * sp.a, 3 * sp.b, &mut triplets);
        add_block_pattern(3 * sp.b, 3 * sp.a, &mut triplets);
    }

    CsrMatrix::from_triplets(3 * n, 3 * n, &triplets)
}

/// Adds the diagonal mass matrix `m·I` onto the block diagonal.
pub fn add_mass_blocks(system: &mut CsrMatrix, n: usize, vertex_mass: f32) -> VelumResult<()> {
    for i in 0..n {
        for r in 0..3 {
            system
                .add(3 * i + r, 3 * i + r, vertex_mass)
                .map_err(VelumError::Factorization)?;
        }
    }
    Ok(())
}

/// Scatters a 3×3 block into the system at block position (`va`, `vb`).
///
/// The target block must be part of the frozen pattern.
pub fn add_block(system: &mut CsrMatrix, va: usize, vb: usize, m: &Mat3) -> VelumResult<()> {
    let cols = m.to_cols_array_2d();
    for r in 0..3 {
        for c in 0..3 {
            system
                .add(3 * va + r, 3 * vb + c, cols[c][r])
                .map_err(VelumError::Factorization)?;
        }
    }
    Ok(())
}
