//! # velum-spatial
//!
//! Hierarchical spatial index over a raw point buffer.
//!
//! The octree partitions a bounding box into axis-aligned cells with a
//! bounded element count per cell. It is built once and read-only
//! thereafter — the intended consumer is a collision broad phase that
//! narrows candidate pairs to points sharing a leaf.
//!
//! Storage is an arena: cells and chain elements live in flat vectors
//! linked by `u32` indices with a sentinel terminator, so the tree has no
//! per-node allocation and no pointer cycles.

pub mod bounds;
pub mod octree;

pub use bounds::Aabb;
pub use octree::Octree;
