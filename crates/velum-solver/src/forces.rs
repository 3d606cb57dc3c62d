//! Force accumulation for the spring network.
//!
//! Per spring: Hooke elastic force along the current axis plus damping
//! proportional to the axial relative velocity. Uniform gravity acts on
//! every vertex, the whole force vector is scaled by the configured
//! global factor, and pinned vertices have their forces zeroed last so
//! nothing downstream accelerates them.

use velum_math::Vec3;
use velum_types::{VelumError, VelumResult};

use crate::config::SolverConfig;
use crate::network::{add_vec3, set_vec3, vec3_at, SpringNetwork};

/// Accumulates spring, damping, and gravity forces into `net.forces`.
///
/// Returns the elastic potential energy `½ Σ k (l − l0)²` gathered along
/// the way. A spring at exactly zero current length has no defined axis
/// and fails with [`VelumError::DegenerateSpring`] before anything else
/// is written — the caller keeps the last valid state.
pub fn accumulate_forces(net: &mut SpringNetwork, config: &SolverConfig) -> VelumResult<f64> {
    let k = config.stiffness;
    let beta_s = config.structural_damping;
    let mut potential = 0.0f64;

    net.forces.fill(0.0);

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

        let stretch = l - sp.rest_length;
        potential += 0.5 * (k as f64) * (stretch as f64) * (stretch as f64);

        let n = d / l;
        // Elastic pull toward rest length, then axial damping of the
        // relative velocity.
        let mut f = n * (stretch * k);
        f += n * (-beta_s * n.dot(v_a - v_b));

        add_vec3(&mut net.forces, sp.a, f);
        add_vec3(&mut net.forces, sp.b, -f);
    }

    // Uniform gravity, then the global scale over everything accumulated.
    let g = Vec3::new(0.0, -config.gravity * net.vertex_mass, 0.0);
    for i in 0..net.vertex_count() {
        add_vec3(&mut net.forces, i, g);
    }

    if config.force_scale != 1.0 {
        for f in &mut net.forces {
            *f *= config.force_scale;
        }
    }

    // Boundary conditions: pinned vertices feel nothing.
    for &pin in &config.pinned {
        set_vec3(&mut net.forces, pin.index(), Vec3::ZERO);
    }

    Ok(potential)
}
