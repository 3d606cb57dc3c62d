//! CLI command implementations.

use std::time::Instant;

use velum_math::Vec3;
use velum_mesh::generators::{quad_grid, uv_sphere};
use velum_mesh::normals::compute_vertex_normals;
use velum_mesh::Topology;
use velum_solver::{DeformableSolver, SolverConfig};
use velum_spatial::{Aabb, Octree};
use velum_telemetry::{EventBus, EventKind, SimulationEvent, TracingSink};
use velum_types::{ParticleId, VelumError, VelumResult};

/// Runs a hanging-sheet simulation: a quad grid pinned at its two top
/// corners, stepped under the given (or default) configuration.
pub fn simulate(config_path: Option<&str>, steps: u32) -> VelumResult<()> {
    let mut config = match config_path {
        Some(path) => {
            let text = std::fs::read_to_string(path)?;
            toml::from_str::<SolverConfig>(&text)
                .map_err(|e| VelumError::InvalidConfig(e.to_string()))?
        }
        None => SolverConfig::default(),
    };
    config.enabled = true;

    let cols = 10;
    let mesh = quad_grid(cols, 10, 1.0, 1.0);
    if config.pinned.is_empty() {
        // Top-left and top-right corners.
        config.pinned = vec![ParticleId(0), ParticleId(cols as u32)];
    }

    let topology = Topology::build(&mesh);
    let mut working = mesh.clone();
    let mut solver = DeformableSolver::new(&mesh, &topology, config)?;

    let mut bus = EventBus::new();
    bus.add_sink(Box::new(TracingSink));

    tracing::info!(
        vertices = mesh.vertex_count(),
        springs = solver.network().springs.len(),
        integrator = solver.integrator_name(),
        "simulation start"
    );

    for step in 0..steps as u64 {
        // A coarse heartbeat: logging every step would swamp the output.
        let heartbeat = step % 100 == 0;
        let begin = Instant::now();
        if heartbeat {
            bus.emit(SimulationEvent::new(step, EventKind::StepBegin));
        }

        let stats = match solver.step(&mut working)? {
            Some(stats) => stats,
            None => break,
        };

        if heartbeat {
            bus.emit(SimulationEvent::new(
                step,
                EventKind::Energy {
                    kinetic: solver.kinetic_energy(),
                    potential: stats.potential_energy,
                },
            ));
            bus.emit(SimulationEvent::new(
                step,
                EventKind::SolveStats {
                    solver: stats.solver,
                    iterations: stats.iterations,
                    residual: stats.residual,
                },
            ));
            bus.emit(SimulationEvent::new(
                step,
                EventKind::StepEnd {
                    wall_time: begin.elapsed().as_secs_f64(),
                },
            ));
            bus.flush();
        }
    }
    bus.flush();

    compute_vertex_normals(&mut working);

    println!("steps:     {}", solver.steps_taken());
    println!("kinetic:   {:.6}", solver.kinetic_energy());
    println!("potential: {:.6}", solver.potential_energy());
    Ok(())
}

/// Builds an octree over a sampled sphere's vertices and prints cell and
/// element statistics.
pub fn octree(radius: f32, levels: u8, max_elems: usize) -> VelumResult<()> {
    let mesh = uv_sphere(radius, 12, 16);
    let points: Vec<Vec3> = (0..mesh.vertex_count()).map(|i| mesh.position(i)).collect();

    let bounds = Aabb::from_points(&points)
        .ok_or_else(|| VelumError::InvalidBounds("Empty point set".into()))?;
    let tree = Octree::build(&points, bounds, levels, max_elems)?;

    let leaves = tree.leaves();
    let occupied = leaves
        .iter()
        .filter(|&&c| tree.cell(c).element_count() > 0)
        .count();
    let deepest = leaves
        .iter()
        .map(|&c| tree.cell(c).level)
        .max()
        .unwrap_or(0);
    let max_occupancy = leaves
        .iter()
        .map(|&c| tree.cell(c).element_count())
        .max()
        .unwrap_or(0);

    println!("points:          {}", tree.point_count());
    println!("cells:           {}", tree.cell_count());
    println!("leaves:          {} ({} occupied)", leaves.len(), occupied);
    println!("element records: {}", tree.element_count());
    println!("deepest leaf:    level {deepest}");
    println!("max occupancy:   {max_occupancy}");
    Ok(())
}

/// Parses a solver config file and checks its numeric ranges.
pub fn validate(path: &str) -> VelumResult<()> {
    let text = std::fs::read_to_string(path)?;
    let config: SolverConfig =
        toml::from_str(&text).map_err(|e| VelumError::InvalidConfig(e.to_string()))?;

    // No mesh at hand: range-check everything except the pin indices.
    config.validate(usize::MAX)?;

    println!("{path}: ok");
    println!(
        "  integrator={:?} dt={} k={} mass={} pinned={}",
        config.integrator,
        config.dt,
        config.stiffness,
        config.mass,
        config.pinned.len()
    );
    Ok(())
}
