//! Spring network — the solver's view of the mesh.
//!
//! One spring per unique undirected edge, plus the flattened kinematic
//! state: 3N-length position, velocity, and force vectors where segment
//! `[3i, 3i+3)` holds vertex i's 3-vector. The vectors are sized at setup
//! and never change length (no topology change after setup).

use velum_math::Vec3;
use velum_mesh::{Topology, TriangleMesh};
use velum_types::{Scalar, VelumError, VelumResult};

/// A linear-elastic spring over one mesh edge.
///
/// Endpoints keep the edge's canonical order (`a < b`). The rest length
/// is the endpoint distance in the setup configuration and never changes
/// afterward — `reset()` restores positions, not rest lengths.
#[derive(Debug, Clone, Copy)]
pub struct Spring {
    /// Lower-index endpoint.
    pub a: usize,
    /// Higher-index endpoint.
    pub b: usize,
    /// Rest length `l0`.
    pub rest_length: Scalar,
}

/// Reads the 3-vector for vertex `i` out of a flattened state vector.
#[inline]
pub fn vec3_at(buf: &[Scalar], i: usize) -> Vec3 {
    Vec3::new(buf[3 * i], buf[3 * i + 1], buf[3 * i + 2])
}

/// Writes the 3-vector for vertex `i` into a flattened state vector.
#[inline]
pub fn set_vec3(buf: &mut [Scalar], i: usize, v: Vec3) {
    buf[3 * i] = v.x;
    buf[3 * i + 1] = v.y;
    buf[3 * i + 2] = v.z;
}

/// Accumulates into the 3-vector for vertex `i`.
#[inline]
pub fn add_vec3(buf: &mut [Scalar], i: usize, v: Vec3) {
    buf[3 * i] += v.x;
    buf[3 * i + 1] += v.y;
    buf[3 * i + 2] += v.z;
}

/// Per-vertex kinematic state plus the derived spring set.
#[derive(Debug, Clone)]
pub struct SpringNetwork {
    /// One spring per unique mesh edge.
    pub springs: Vec<Spring>,
    /// Current positions, flattened (length 3N).
    pub positions: Vec<Scalar>,
    /// Positions at the start of the current step (length 3N).
    pub last_positions: Vec<Scalar>,
    /// Current velocities, flattened (length 3N).
    pub velocities: Vec<Scalar>,
    /// Accumulated forces, flattened (length 3N).
    pub forces: Vec<Scalar>,
    /// Per-vertex mass share (total mass / vertex count).
    pub vertex_mass: Scalar,
    /// Setup-time position snapshot restored by `reset()`.
    default_positions: Vec<Scalar>,
    /// Vertex count, fixed at setup.
    n: usize,
}

impl SpringNetwork {
    /// Builds the network from a mesh and its edge topology.
    ///
    /// A mesh with zero vertices is an explicit precondition violation.
    pub fn from_mesh(
        mesh: &TriangleMesh,
        topology: &Topology,
        total_mass: Scalar,
    ) -> VelumResult<Self> {
        let n = mesh.vertex_count();
        if n == 0 {
            return Err(VelumError::InvalidMesh(
                "Cannot build a spring network over zero vertices".into(),
            ));
        }

        let mut positions = vec![0.0f32; 3 * n];
        for i in 0..n {
            set_vec3(&mut positions, i, mesh.position(i));
        }

        let mut springs = Vec::with_capacity(topology.edge_count());
        for &[a, b] in &topology.edges {
            let (a, b) = (a as usize, b as usize);
            let rest_length = (mesh.position(a) - mesh.position(b)).length();
            springs.push(Spring { a, b, rest_length });
        }

        Ok(Self {
            springs,
            default_positions: positions.clone(),
            last_positions: positions.clone(),
            positions,
            velocities: vec![0.0f32; 3 * n],
            forces: vec![0.0f32; 3 * n],
            vertex_mass: total_mass / n as f32,
            n,
        })
    }

    /// Number of vertices in the network.
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.n
    }

    /// Restores the setup snapshot: current and last positions back to the
    /// defaults, velocity and force zeroed, mesh positions rewritten.
    /// Idempotent.
    pub fn reset(&mut self, mesh: &mut TriangleMesh) {
        self.positions.copy_from_slice(&self.default_positions);
        self.last_positions.copy_from_slice(&self.default_positions);
        self.velocities.fill(0.0);
        self.forces.fill(0.0);
        self.write_back(mesh);
    }

    /// Snapshots current positions into `last_positions`.
    pub fn save_previous(&mut self) {
        self.last_positions.copy_from_slice(&self.positions);
    }

    /// Restores positions from `last_positions` (used to hold the last
    /// valid state when a step fails partway).
    pub fn restore_previous(&mut self) {
        self.positions.copy_from_slice(&self.last_positions);
    }

    /// Writes current positions back through the mesh's position mutator.
    pub fn write_back(&self, mesh: &mut TriangleMesh) {
        for i in 0..self.n {
            mesh.set_position(i, vec3_at(&self.positions, i));
        }
    }

    /// Total kinetic energy `½ Σ m ‖v‖²`.
    pub fn kinetic_energy(&self) -> f64 {
        let m = self.vertex_mass as f64;
        let mut energy = 0.0f64;
        for i in 0..self.n {
            let v = vec3_at(&self.velocities, i);
            energy += 0.5 * m * (v.length_squared() as f64);
        }
        energy
    }
}
