//! Analytic force derivatives for the implicit integrator.
//!
//! Per spring with axis `n = (x_b − x_a)/l`:
//!
//! - position derivative `K_s = −k(nnᵀ + ((l−l0)/l)(I − nnᵀ))` — the
//!   standard normal/tangential stiffness split;
//! - damping-position cross term
//!   `K_d = −(β_s/l)((n·b)I + n bᵀ)(I − nnᵀ)` with `b = v_a − v_b`;
//! - velocity derivative `B = −β_s nnᵀ`.
//!
//! Each 3×3 block scatters into the four symmetric positions (a,a),
//! (b,b), (a,b), (b,a), pre-scaled by the backward-Euler factors so the
//! assembled left-hand side is `M − dt²(K_s + K_d) − dt·B` in the
//! velocity-step form.

use velum_math::sparse::CsrMatrix;
use velum_math::{Mat3, Vec3};
use velum_types::{VelumError, VelumResult};

use crate::assembly::add_block;
use crate::config::SolverConfig;
use crate::network::{vec3_at, SpringNetwork};

/// Outer product `u vᵀ`.
#[inline]
fn outer(u: Vec3, v: Vec3) -> Mat3 {
    Mat3::from_cols(u * v.x, u * v.y, u * v.z)
}

/// Accumulates `−dt²(K_s + K_d)` contributions into the system.
pub fn accumulate_dfdx(
    net: &SpringNetwork,
    config: &SolverConfig,
    dt: f32,
    system: &mut CsrMatrix,
) -> VelumResult<()> {
    let k = config.stiffness;
    let beta_s = config.structural_damping;
    let dt2 = dt * dt;

    for (idx, sp) in net.springs.iter().enumerate() {
        let x_a = vec3_at(&net.positions, sp.a);
        let x_b = vec3_at(&net.positions, sp.b);
        let v_a = vec3_at(&net.velocities, sp.a);
        let v_b = vec3_at(&net.velocities, sp.b);

        let d = x_b - x_a;
        let l = d.length();
        if l == 0.0 || !l.is_finite() {
            return Err(VelumError::DegenerateSpring { spring: idx });
        }
        let n = d / l;
        let nnt = outer(n, n);
        let tangential = Mat3::IDENTITY - nnt;

        let k_s = (nnt + tangential * ((l - sp.rest_length) / l)) * -k;

        let b = v_a - v_b;
        let k_d = (Mat3::IDENTITY * n.dot(b) + outer(n, b)) * tangential * (-beta_s / l);

        let block = (k_s + k_d) * dt2;
        add_block(system, sp.a, sp.a, &(-block))?;
        add_block(system, sp.b, sp.b, &(-block))?;
        add_block(system, sp.a, sp.b, &block)?;
        add_block(system, sp.b, sp.a, &block)?;
    }

    Ok(())
}

/// Accumulates `−dt·B` contributions into the system.
pub fn accumulate_dfdv(
    net: &SpringNetwork,
    config: &SolverConfig,
    dt: f32,
    system: &mut CsrMatrix,
) -> VelumResult<()> {
    let beta_s = config.structural_damping;

    for (idx, sp) in net.springs.iter().enumerate() {
        let x_a = vec3_at(&net.positions, sp.a);
        let x_b = vec3_at(&net.positions, sp.b);

        let d = x_b - x_a;
        let l = d.length();
        if l == 0.0 || !l.is_finite() {
            return Err(VelumError::DegenerateSpring { spring: idx });
        }
        let n = d / l;

        let block = outer(n, n) * (-beta_s) * dt;
        add_block(system, sp.a, sp.a, &(-block))?;
        add_block(system, sp.b, sp.b, &(-block))?;
        add_block(system, sp.a, sp.b, &block)?;
        add_block(system, sp.b, sp.a, &block)?;
    }

    Ok(())
}
