//! Strongly-typed identifiers for simulation entities.
//!
//! Newtype wrappers prevent accidental mixing of vertex indices with
//! anything else that happens to be a `u32` (octree element slots,
//! triangle offsets).

use serde::{Deserialize, Serialize};

/// Index into the vertex (particle) arrays.
///
/// The pinned-vertex set in the solver configuration is a list of these,
/// validated against the mesh's vertex count at setup time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParticleId(pub u32);

impl ParticleId {
    /// Returns the raw index as `usize` for array indexing.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for ParticleId {
    fn from(val: u32) -> Self {
        Self(val)
    }
}
