//! Integration tests for velum-solver.

use velum_mesh::generators::quad_grid;
use velum_mesh::{Topology, TriangleMesh};
use velum_solver::forces::accumulate_forces;
use velum_solver::network::vec3_at;
use velum_solver::{
    DeformableSolver, ImplicitIntegrator, Integrator, IntegratorKind, LinearSolverKind,
    SolverConfig, SpringNetwork,
};
use velum_types::{ParticleId, VelumError};

/// A minimal two-vertex mesh (no triangles); callers pair it with a
/// hand-built single-edge topology.
fn two_point_mesh(p0: [f32; 3], p1: [f32; 3]) -> TriangleMesh {
    let mut mesh = TriangleMesh::with_capacity(2, 0);
    for p in [p0, p1] {
        mesh.pos_x.push(p[0]);
        mesh.pos_y.push(p[1]);
        mesh.pos_z.push(p[2]);
        mesh.normal_x.push(0.0);
        mesh.normal_y.push(0.0);
        mesh.normal_z.push(1.0);
        mesh.uv_u.push(0.0);
        mesh.uv_v.push(0.0);
    }
    mesh
}

fn single_spring_topology() -> Topology {
    Topology {
        edges: vec![[0, 1]],
    }
}

fn quiet_config() -> SolverConfig {
    SolverConfig {
        enabled: true,
        gravity: 0.0,
        structural_damping: 0.0,
        air_damping: 0.0,
        ..Default::default()
    }
}

// ─── SpringNetwork Tests ──────────────────────────────────────

#[test]
fn network_from_mesh_shapes() {
    let mesh = quad_grid(4, 4, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let n = mesh.vertex_count();
    assert_eq!(net.vertex_count(), n);
    assert_eq!(net.positions.len(), 3 * n);
    assert_eq!(net.velocities.len(), 3 * n);
    assert_eq!(net.forces.len(), 3 * n);
    assert_eq!(net.springs.len(), topo.edge_count());
    assert!((net.vertex_mass - 1.0 / n as f32).abs() < 1e-7);
}

#[test]
fn network_rest_lengths_match_setup_geometry() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    for sp in &net.springs {
        let expected = (mesh.position(sp.a) - mesh.position(sp.b)).length();
        assert!((sp.rest_length - expected).abs() < 1e-7);
        assert!(sp.a < sp.b, "Spring endpoints must keep canonical order");
    }
}

#[test]
fn network_zero_vertices_is_precondition_violation() {
    let mesh = TriangleMesh::with_capacity(0, 0);
    let topo = Topology::build(&mesh);
    assert!(matches!(
        SpringNetwork::from_mesh(&mesh, &topo, 1.0),
        Err(VelumError::InvalidMesh(_))
    ));
}

// ─── Force Model Tests ────────────────────────────────────────

#[test]
fn rest_configuration_has_zero_elastic_force() {
    // Every spring sits exactly at rest length right after setup, so with
    // gravity and damping off the accumulated force is exactly zero.
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let potential = accumulate_forces(&mut net, &quiet_config()).unwrap();
    assert_eq!(potential, 0.0);
    assert!(net.forces.iter().all(|&f| f == 0.0));
}

#[test]
fn potential_energy_non_negative() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    // Squash one corner inward, stretch another outward.
    net.positions[0] += 0.3;
    net.positions[1] -= 0.2;
    let last = net.positions.len() - 3;
    net.positions[last] -= 0.4;

    let potential = accumulate_forces(&mut net, &quiet_config()).unwrap();
    assert!(potential > 0.0);
}

#[test]
fn stretched_spring_pulls_endpoints_together() {
    let mesh = two_point_mesh([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let topo = single_spring_topology();
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    // Stretch along +X: vertex 1 moves from x=2 to x=3.
    net.positions[3] = 3.0;
    accumulate_forces(&mut net, &quiet_config()).unwrap();

    let f_a = vec3_at(&net.forces, 0);
    let f_b = vec3_at(&net.forces, 1);
    assert!(f_a.x > 0.0, "Endpoint a must be pulled toward b, got {f_a:?}");
    assert!(f_b.x < 0.0, "Endpoint b must be pulled toward a, got {f_b:?}");
    assert!((f_a + f_b).length() < 1e-6, "Spring forces must cancel");
}

#[test]
fn pinned_vertices_feel_no_force() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let config = SolverConfig {
        enabled: true,
        pinned: vec![ParticleId(0), ParticleId(2)],
        ..Default::default()
    };
    accumulate_forces(&mut net, &config).unwrap();

    for pin in [0usize, 2] {
        assert_eq!(vec3_at(&net.forces, pin).length(), 0.0);
    }
    // Gravity still acts on free vertices.
    assert!(vec3_at(&net.forces, 4).y < 0.0);
}

#[test]
fn zero_length_spring_fails_explicitly() {
    let mesh = two_point_mesh([1.0, 1.0, 1.0], [1.0, 1.0, 1.0]);
    let topo = single_spring_topology();
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let err = accumulate_forces(&mut net, &quiet_config()).unwrap_err();
    assert!(matches!(err, VelumError::DegenerateSpring { spring: 0 }));
}

// ─── Configuration Tests ──────────────────────────────────────

#[test]
fn config_defaults() {
    let config = SolverConfig::default();
    assert_eq!(config.stiffness, 30.0);
    assert_eq!(config.dt, 1.0e-3);
    assert_eq!(config.mass, 1.0);
    assert_eq!(config.structural_damping, 0.05);
    assert_eq!(config.air_damping, 0.005);
    assert_eq!(config.force_scale, 1.0);
    assert!(!config.enabled);
    assert!(!config.collisions_enabled);
    assert_eq!(config.collision_tolerance, 0.01);
    assert_eq!(config.integrator, IntegratorKind::Implicit);
    assert_eq!(config.iterative_cap, 200);
}

#[test]
fn config_toml_roundtrip() {
    let config = SolverConfig {
        pinned: vec![ParticleId(263), ParticleId(275)],
        integrator: IntegratorKind::Symplectic,
        ..Default::default()
    };
    let text = toml::to_string(&config).unwrap();
    let back: SolverConfig = toml::from_str(&text).unwrap();
    assert_eq!(back.pinned, config.pinned);
    assert_eq!(back.integrator, IntegratorKind::Symplectic);
    assert_eq!(back.stiffness, config.stiffness);
}

#[test]
fn config_rejects_out_of_range_pin() {
    let mesh = quad_grid(1, 1, 1.0, 1.0); // 4 vertices
    let topo = Topology::build(&mesh);
    let config = SolverConfig {
        pinned: vec![ParticleId(99)],
        ..Default::default()
    };
    assert!(matches!(
        DeformableSolver::new(&mesh, &topo, config),
        Err(VelumError::InvalidConfig(_))
    ));
}

#[test]
fn config_rejects_bad_timestep() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let config = SolverConfig {
        dt: 0.0,
        ..Default::default()
    };
    assert!(DeformableSolver::new(&mesh, &topo, config).is_err());
}

// ─── Facade Tests ─────────────────────────────────────────────

#[test]
fn disabled_step_is_noop() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut working = mesh.clone();

    // Default config: enabled = false.
    let mut solver = DeformableSolver::new(&mesh, &topo, SolverConfig::default()).unwrap();
    let stats = solver.step(&mut working).unwrap();
    assert!(stats.is_none());
    assert_eq!(solver.steps_taken(), 0);
    for i in 0..mesh.vertex_count() {
        assert_eq!(working.position(i), mesh.position(i));
    }

    // Flipping the switch makes the same call advance the simulation.
    solver.set_enabled(true);
    let stats = solver.step(&mut working).unwrap();
    assert!(stats.is_some());
    assert_eq!(solver.steps_taken(), 1);
}

#[test]
fn gravity_pulls_centroid_down_implicit() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut working = mesh.clone();

    let config = SolverConfig {
        enabled: true,
        ..Default::default()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

    let n = mesh.vertex_count();
    let initial: f32 = mesh.pos_y.iter().sum::<f32>() / n as f32;

    for _ in 0..30 {
        let stats = solver.step(&mut working).unwrap();
        assert!(stats.is_some());
    }

    let after: f32 = working.pos_y.iter().sum::<f32>() / n as f32;
    assert!(
        after < initial,
        "Centroid should fall under gravity: {after} vs {initial}"
    );
}

#[test]
fn pinned_vertices_never_move() {
    for integrator in [IntegratorKind::Implicit, IntegratorKind::Symplectic] {
        let mesh = quad_grid(4, 4, 1.0, 1.0);
        let topo = Topology::build(&mesh);
        let mut working = mesh.clone();

        // Top-left and top-right corners of the sheet.
        let config = SolverConfig {
            enabled: true,
            integrator,
            pinned: vec![ParticleId(0), ParticleId(4)],
            ..Default::default()
        };
        let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

        for _ in 0..50 {
            solver.step(&mut working).unwrap();
        }

        for pin in [0usize, 4] {
            let moved = (working.position(pin) - mesh.position(pin)).length();
            assert!(
                moved < 1e-6,
                "{integrator:?}: pinned vertex {pin} moved by {moved}"
            );
        }
        // The sheet itself must have sagged.
        let center = mesh.vertex_count() / 2;
        assert!(working.position(center).y < mesh.position(center).y);
    }
}

#[test]
fn at_rest_configuration_stays_stationary() {
    for integrator in [IntegratorKind::Implicit, IntegratorKind::Symplectic] {
        let mesh = quad_grid(3, 3, 1.0, 1.0);
        let topo = Topology::build(&mesh);
        let mut working = mesh.clone();

        let config = SolverConfig {
            integrator,
            ..quiet_config()
        };
        let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

        for _ in 0..20 {
            solver.step(&mut working).unwrap();
        }

        for i in 0..mesh.vertex_count() {
            let drift = (working.position(i) - mesh.position(i)).length();
            assert!(
                drift < 1e-6,
                "{integrator:?}: vertex {i} drifted by {drift} from rest"
            );
        }
    }
}

#[test]
fn symplectic_conserves_momentum() {
    // Two vertices, one spring, no gravity, no damping: total momentum
    // must stay at its initial value (zero) while the spring oscillates.
    let mesh = two_point_mesh([0.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
    let topo = single_spring_topology();
    let mut working = mesh.clone();

    let config = SolverConfig {
        integrator: IntegratorKind::Symplectic,
        ..quiet_config()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

    // Opposite initial velocities: zero net momentum, nonzero motion.
    {
        let net = solver.network_mut();
        net.velocities[0] = 0.5;
        net.velocities[3] = -0.5;
    }

    let mut oscillated = false;
    for _ in 0..500 {
        solver.step(&mut working).unwrap();
        let net = solver.network();
        let p = vec3_at(&net.velocities, 0) + vec3_at(&net.velocities, 1);
        assert!(
            p.length() * net.vertex_mass < 1e-5,
            "Momentum drifted to {p:?}"
        );
        if vec3_at(&net.velocities, 0).x < 0.0 {
            oscillated = true;
        }
    }
    assert!(oscillated, "Spring should have pulled vertex 0 back");
}

#[test]
fn reset_restores_setup_snapshot_exactly() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut working = mesh.clone();

    let config = SolverConfig {
        enabled: true,
        ..Default::default()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

    for _ in 0..25 {
        solver.step(&mut working).unwrap();
    }
    assert!(working.position(4) != mesh.position(4), "Should have moved");

    solver.reset(&mut working);

    let net = solver.network();
    for i in 0..mesh.vertex_count() {
        assert_eq!(working.position(i), mesh.position(i));
        assert_eq!(vec3_at(&net.positions, i), mesh.position(i));
        assert_eq!(vec3_at(&net.velocities, i).length(), 0.0);
    }
    assert_eq!(solver.steps_taken(), 0);

    // Idempotent.
    solver.reset(&mut working);
    assert_eq!(working.position(0), mesh.position(0));
}

#[test]
fn failed_step_holds_last_valid_state() {
    let mesh = two_point_mesh([1.0, 2.0, 3.0], [1.0, 2.0, 3.0]);
    let topo = single_spring_topology();
    let mut working = mesh.clone();

    let config = SolverConfig {
        enabled: true,
        ..Default::default()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

    let err = solver.step(&mut working).unwrap_err();
    assert!(matches!(err, VelumError::DegenerateSpring { .. }));

    // Neither the mesh nor the network saw partial writes.
    assert_eq!(working.position(0), mesh.position(0));
    assert_eq!(vec3_at(&solver.network().positions, 0), mesh.position(0));
    assert_eq!(solver.steps_taken(), 0);
}

#[test]
fn iterative_backend_matches_direct() {
    let run = |linear_solver: LinearSolverKind| -> Vec<f32> {
        let mesh = quad_grid(3, 3, 1.0, 1.0);
        let topo = Topology::build(&mesh);
        let mut working = mesh.clone();
        let config = SolverConfig {
            enabled: true,
            linear_solver,
            iterative_tolerance: 1.0e-8,
            ..Default::default()
        };
        let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();
        for _ in 0..10 {
            let stats = solver.step(&mut working).unwrap().unwrap();
            match linear_solver {
                LinearSolverKind::Direct => assert_eq!(stats.solver, "lu"),
                LinearSolverKind::Iterative => {
                    assert_eq!(stats.solver, "bicgstab");
                    assert!(stats.iterations > 0);
                }
            }
        }
        working.pos_y.clone()
    };

    let direct = run(LinearSolverKind::Direct);
    let iterative = run(LinearSolverKind::Iterative);
    for (d, i) in direct.iter().zip(&iterative) {
        assert!(
            (d - i).abs() < 1e-4,
            "Backends disagree: direct={d}, iterative={i}"
        );
    }
}

#[test]
fn collision_seam_is_inert() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let config = SolverConfig {
        collisions_enabled: true,
        ..Default::default()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();

    solver.add_collider(quad_grid(1, 1, 4.0, 4.0));
    assert_eq!(solver.collider_count(), 1);
    solver.detect_collisions().unwrap();
}

#[test]
fn energy_diagnostics_track_motion() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut working = mesh.clone();

    let config = SolverConfig {
        enabled: true,
        ..Default::default()
    };
    let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();
    assert_eq!(solver.kinetic_energy(), 0.0);

    let mut stats = None;
    for _ in 0..10 {
        stats = solver.step(&mut working).unwrap();
    }
    let stats = stats.unwrap();
    assert!(solver.kinetic_energy() > 0.0, "Falling sheet has KE");
    assert!(stats.potential_energy >= 0.0);
    assert_eq!(stats.potential_energy, solver.potential_energy());
}

// ─── Sparse Pattern Stability ─────────────────────────────────

#[test]
fn implicit_pattern_is_stable_across_steps() {
    let mesh = quad_grid(3, 3, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let config = SolverConfig {
        enabled: true,
        ..Default::default()
    };
    let mut integrator = ImplicitIntegrator::new();
    integrator.init(&net, &config).unwrap();

    let row_ptr = integrator.system().row_ptr.clone();
    let col_idx = integrator.system().col_idx.clone();
    let nnz = integrator.system().nnz();

    for _ in 0..10 {
        integrator.step(&mut net, &config).unwrap();
    }

    assert_eq!(integrator.system().row_ptr, row_ptr);
    assert_eq!(integrator.system().col_idx, col_idx);
    assert_eq!(integrator.system().nnz(), nnz);
}

#[test]
fn implicit_pattern_has_expected_block_structure() {
    let mesh = quad_grid(2, 2, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let config = SolverConfig::default();
    let mut integrator = ImplicitIntegrator::new();
    integrator.init(&net, &config).unwrap();

    let n = mesh.vertex_count();
    // 9 entries per vertex diagonal block, 18 per spring (two blocks).
    let expected = 9 * n + 18 * net.springs.len();
    assert_eq!(integrator.system().nnz(), expected);
    assert_eq!(integrator.system().rows, 3 * n);
    assert_eq!(integrator.system().cols, 3 * n);
}

#[test]
fn implicit_uninitialized_step_fails() {
    let mesh = quad_grid(1, 1, 1.0, 1.0);
    let topo = Topology::build(&mesh);
    let mut net = SpringNetwork::from_mesh(&mesh, &topo, 1.0).unwrap();

    let mut integrator = ImplicitIntegrator::new();
    assert!(integrator.step(&mut net, &SolverConfig::default()).is_err());
}

// ─── Stability Comparison ─────────────────────────────────────

#[test]
fn implicit_survives_large_timestep() {
    // At dt = 100× the default, the explicit scheme blows up while
    // backward Euler keeps every coordinate finite.
    let run = |integrator: IntegratorKind| -> bool {
        let mesh = quad_grid(4, 4, 1.0, 1.0);
        let topo = Topology::build(&mesh);
        let mut working = mesh.clone();
        let config = SolverConfig {
            enabled: true,
            dt: 0.1,
            integrator,
            pinned: vec![ParticleId(0), ParticleId(4)],
            ..Default::default()
        };
        let mut solver = DeformableSolver::new(&mesh, &topo, config).unwrap();
        for _ in 0..60 {
            if solver.step(&mut working).is_err() {
                return false;
            }
        }
        working.pos_y.iter().all(|v| v.is_finite() && v.abs() < 100.0)
    };

    assert!(run(IntegratorKind::Implicit), "Implicit should stay bounded");
    assert!(
        !run(IntegratorKind::Symplectic),
        "Symplectic at this dt should diverge"
    );
}
