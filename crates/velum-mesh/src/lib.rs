//! # velum-mesh
//!
//! Triangle mesh storage, edge topology, and procedural generators.
//!
//! The mesh is the collaborator shared between the solver (which reads
//! and writes vertex positions every step) and whatever presents the
//! result — only the position accessor/mutator surface is relied on by
//! the rest of the engine.

pub mod generators;
pub mod mesh;
pub mod normals;
pub mod topology;

pub use mesh::TriangleMesh;
pub use topology::Topology;
