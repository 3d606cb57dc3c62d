//! Adaptive octree over a point buffer, stored in arenas.
//!
//! Cells and chain elements live in flat vectors linked by `u32` indices
//! (`NONE` terminates a chain). The element table is append-only for the
//! octree's lifetime: subdividing a cell writes a *new* element record per
//! reclassified point and leaves the parent's chain intact, so an internal
//! cell still remembers everything below it.
//!
//! Subdivision is conditional: a cell splits while its element count
//! exceeds `max_elems_per_cell` and its level is below `max_levels`
//! (capped at [`MAX_OCTREE_LEVELS`]).

use velum_math::Vec3;
use velum_types::constants::MAX_OCTREE_LEVELS;
use velum_types::{VelumError, VelumResult};

use crate::bounds::Aabb;

/// Sentinel index terminating an element chain.
pub const NONE: u32 = u32::MAX;

/// Node in a cell's singly linked element list.
#[derive(Debug, Clone, Copy)]
struct Element {
    /// Index into the point buffer.
    point: u32,
    /// Next element in the chain, or `NONE`.
    next: u32,
}

/// One cell of the octree: an axis-aligned box that either holds points
/// directly (leaf) or delegates to exactly eight children.
#[derive(Debug, Clone)]
pub struct Cell {
    /// The region this cell spans.
    pub bounds: Aabb,
    /// Depth in the tree; the root is level 0.
    pub level: u8,
    /// Indices of the eight children, created atomically, or `None` for a leaf.
    children: Option<[u32; 8]>,
    /// Head of this cell's element chain, or `NONE`.
    head: u32,
    /// Number of elements in this cell's chain.
    count: u32,
}

impl Cell {
    fn new(bounds: Aabb, level: u8) -> Self {
        Self {
            bounds,
            level,
            children: None,
            head: NONE,
            count: 0,
        }
    }

    /// True if this cell has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_none()
    }

    /// The eight child cell indices, if subdivided.
    pub fn children(&self) -> Option<&[u32; 8]> {
        self.children.as_ref()
    }

    /// Number of points chained to this cell.
    pub fn element_count(&self) -> usize {
        self.count as usize
    }
}

/// Hierarchical spatial index over a point set.
pub struct Octree {
    points: Vec<Vec3>,
    cells: Vec<Cell>,
    elements: Vec<Element>,
    max_levels: u8,
    max_elems_per_cell: usize,
}

impl Octree {
    /// Builds an octree over `points` spanning `bounds`.
    ///
    /// `max_levels` bounds the subdivision depth (root = level 0, hard cap
    /// [`MAX_OCTREE_LEVELS`]); `max_elems_per_cell` is the occupancy
    /// threshold that triggers a split. All preconditions fail fast with a
    /// recoverable error.
    pub fn build(
        points: &[Vec3],
        bounds: Aabb,
        max_levels: u8,
        max_elems_per_cell: usize,
    ) -> VelumResult<Self> {
        if points.is_empty() {
            return Err(VelumError::InvalidBounds(
                "Cannot build an octree over zero points".into(),
            ));
        }
        if max_levels > MAX_OCTREE_LEVELS {
            return Err(VelumError::InvalidBounds(format!(
                "max_levels ({max_levels}) exceeds the cap ({MAX_OCTREE_LEVELS})"
            )));
        }
        if max_elems_per_cell == 0 {
            return Err(VelumError::InvalidBounds(
                "max_elems_per_cell must be positive".into(),
            ));
        }
        if bounds.width <= 0.0 || bounds.height <= 0.0 || bounds.depth <= 0.0 {
            return Err(VelumError::InvalidBounds(format!(
                "Bounding box extents must be positive, got {} × {} × {}",
                bounds.width, bounds.height, bounds.depth
            )));
        }

        let mut tree = Self {
            points: points.to_vec(),
            cells: vec![Cell::new(bounds, 0)],
            elements: Vec::with_capacity(points.len()),
            max_levels,
            max_elems_per_cell,
        };

        // Chain every point onto the root in order. We know the running
        // tail here, so the initial fill links directly instead of
        // re-walking the chain per insertion.
        let mut tail = NONE;
        for point in 0..points.len() as u32 {
            let elem = tree.elements.len() as u32;
            tree.elements.push(Element { point, next: NONE });
            if tail == NONE {
                tree.cells[0].head = elem;
            } else {
                tree.elements[tail as usize].next = elem;
            }
            tail = elem;
            tree.cells[0].count += 1;
        }

        if tree.cells[0].element_count() > max_elems_per_cell && max_levels > 0 {
            tree.subdivide(0);
        }

        Ok(tree)
    }

    /// Appends a fresh element record to `cell`'s chain, walking to the
    /// current tail. O(n) per insertion — subdivision touches each point
    /// once per level, so this stays cheap at the capped depths.
    fn append_element(&mut self, cell: usize, point: u32) {
        let elem = self.elements.len() as u32;
        self.elements.push(Element { point, next: NONE });

        let head = self.cells[cell].head;
        if head == NONE {
            self.cells[cell].head = elem;
        } else {
            let mut cursor = head;
            while self.elements[cursor as usize].next != NONE {
                cursor = self.elements[cursor as usize].next;
            }
            self.elements[cursor as usize].next = elem;
        }
        self.cells[cell].count += 1;
    }

    /// Splits `cell_id` into eight children and reclassifies its chain.
    ///
    /// Children are created all at once; each point goes to exactly one
    /// child chosen by comparing its coordinates against the parent
    /// center (x → bit 0, y → bit 1, z → bit 2). Children over the
    /// occupancy threshold split again until `max_levels`.
    fn subdivide(&mut self, cell_id: usize) {
        let parent_bounds = self.cells[cell_id].bounds;
        let parent_level = self.cells[cell_id].level;
        let parent_head = self.cells[cell_id].head;
        let center = parent_bounds.center();

        let half_w = parent_bounds.width / 2.0;
        let half_h = parent_bounds.height / 2.0;
        let half_d = parent_bounds.depth / 2.0;

        let base = self.cells.len() as u32;
        let mut children = [0u32; 8];
        for (octant, slot) in children.iter_mut().enumerate() {
            let dx = if octant & 1 != 0 { half_w } else { 0.0 };
            let dy = if octant & 2 != 0 { half_h } else { 0.0 };
            let dz = if octant & 4 != 0 { half_d } else { 0.0 };
            let origin = parent_bounds.origin + Vec3::new(dx, dy, dz);
            self.cells.push(Cell::new(
                Aabb::new(origin, half_w, half_h, half_d),
                parent_level + 1,
            ));
            *slot = base + octant as u32;
        }
        self.cells[cell_id].children = Some(children);

        // Reclassify every element of the parent chain into one child.
        // The parent chain itself stays — the element table only grows.
        // Ties on a center plane go to the high child: its half-open box
        // is the one that contains the boundary coordinate.
        let mut cursor = parent_head;
        while cursor != NONE {
            let point = self.elements[cursor as usize].point;
            let p = self.points[point as usize];
            let octant = usize::from(p.x >= center.x)
                | usize::from(p.y >= center.y) << 1
                | usize::from(p.z >= center.z) << 2;
            self.append_element(children[octant] as usize, point);
            cursor = self.elements[cursor as usize].next;
        }

        for &child in &children {
            let child = child as usize;
            if self.cells[child].element_count() > self.max_elems_per_cell
                && self.cells[child].level < self.max_levels
            {
                self.subdivide(child);
            }
        }
    }

    /// Number of cells in the arena.
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of element records in the arena (grows with each split).
    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Number of indexed points.
    pub fn point_count(&self) -> usize {
        self.points.len()
    }

    /// The cell at `id`.
    pub fn cell(&self, id: usize) -> &Cell {
        &self.cells[id]
    }

    /// The indexed point at `id`.
    pub fn point(&self, id: u32) -> Vec3 {
        self.points[id as usize]
    }

    /// Indices of all leaf cells.
    pub fn leaves(&self) -> Vec<usize> {
        (0..self.cells.len())
            .filter(|&i| self.cells[i].is_leaf())
            .collect()
    }

    /// Walks `cell`'s element chain, yielding point indices.
    pub fn cell_points(&self, cell: usize) -> impl Iterator<Item = u32> + '_ {
        ChainIter {
            elements: &self.elements,
            cursor: self.cells[cell].head,
        }
    }

    /// Descends to the leaf cell containing `p`, or `None` if `p` is
    /// outside the root bounds.
    pub fn locate(&self, p: Vec3) -> Option<usize> {
        if !self.cells[0].bounds.contains(p) {
            return None;
        }
        let mut cell = 0usize;
        while let Some(children) = self.cells[cell].children {
            let center = self.cells[cell].bounds.center();
            let octant = usize::from(p.x >= center.x)
                | usize::from(p.y >= center.y) << 1
                | usize::from(p.z >= center.z) << 2;
            cell = children[octant] as usize;
        }
        Some(cell)
    }
}

struct ChainIter<'a> {
    elements: &'a [Element],
    cursor: u32,
}

impl Iterator for ChainIter<'_> {
    type Item = u32;

    fn next(&mut self) -> Option<u32> {
        if self.cursor == NONE {
            return None;
        }
        let elem = self.elements[self.cursor as usize];
        self.cursor = elem.next;
        Some(elem.point)
    }
}
