//! Integration tests for velum-spatial.

use velum_math::Vec3;
use velum_spatial::{Aabb, Octree};

/// Ten fixed sample points inside a radius-4 sphere.
fn sphere_points() -> Vec<Vec3> {
    vec![
        Vec3::new(1.2, -0.5, 2.0),
        Vec3::new(-3.1, 0.4, 0.7),
        Vec3::new(0.0, 2.5, -1.1),
        Vec3::new(2.2, 1.8, 1.5),
        Vec3::new(-0.9, -2.7, 0.3),
        Vec3::new(3.0, -0.2, -2.1),
        Vec3::new(-1.5, 1.1, -3.0),
        Vec3::new(0.8, -3.3, -0.6),
        Vec3::new(-2.4, -1.0, 2.2),
        Vec3::new(1.7, 3.1, 0.2),
    ]
}

// ─── Aabb Tests ───────────────────────────────────────────────

#[test]
fn aabb_contains_is_half_open() {
    let b = Aabb::new(Vec3::ZERO, 1.0, 1.0, 1.0);
    assert!(b.contains(Vec3::ZERO));
    assert!(b.contains(Vec3::new(0.999, 0.5, 0.0)));
    assert!(!b.contains(Vec3::new(1.0, 0.5, 0.5)));
    assert!(!b.contains(Vec3::new(-0.001, 0.5, 0.5)));
}

#[test]
fn aabb_from_points_encloses_extremes() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    for &p in &points {
        assert!(b.contains(p), "Tight box must contain {p:?}");
    }
}

#[test]
fn aabb_from_points_empty() {
    assert!(Aabb::from_points(&[]).is_none());
}

// ─── Precondition Tests ───────────────────────────────────────

#[test]
fn build_rejects_zero_points() {
    let b = Aabb::new(Vec3::ZERO, 1.0, 1.0, 1.0);
    assert!(Octree::build(&[], b, 1, 4).is_err());
}

#[test]
fn build_rejects_excessive_depth() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    assert!(Octree::build(&points, b, 6, 4).is_err());
    assert!(Octree::build(&points, b, 5, 4).is_ok());
}

#[test]
fn build_rejects_zero_capacity() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    assert!(Octree::build(&points, b, 1, 0).is_err());
}

#[test]
fn build_rejects_degenerate_bounds() {
    let points = sphere_points();
    let b = Aabb::new(Vec3::ZERO, 1.0, 0.0, 1.0);
    assert!(Octree::build(&points, b, 1, 4).is_err());
}

// ─── Subdivision Policy Tests ─────────────────────────────────

#[test]
fn no_subdivision_under_cap() {
    // Occupancy at or below the threshold: the root stays a leaf and the
    // element arena holds exactly one record per point.
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 3, 10).unwrap();

    assert_eq!(tree.cell_count(), 1);
    assert!(tree.cell(0).is_leaf());
    assert_eq!(tree.element_count(), points.len());
    assert_eq!(tree.cell_points(0).count(), points.len());
}

#[test]
fn split_appends_records() {
    // One forced split: each of the N points gets a fresh record in some
    // child chain, and the root chain is left intact — the arena grows to
    // 2N instead of moving records.
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 1, 4).unwrap();

    assert_eq!(tree.cell_count(), 9); // root + 8 children
    assert!(!tree.cell(0).is_leaf());
    assert_eq!(tree.element_count(), 2 * points.len());
    assert_eq!(tree.cell_points(0).count(), points.len());

    let leaf_total: usize = tree.leaves().iter().map(|&c| tree.cell_points(c).count()).sum();
    assert_eq!(leaf_total, points.len());
}

#[test]
fn children_created_atomically() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 1, 4).unwrap();

    for id in 0..tree.cell_count() {
        let cell = tree.cell(id);
        match cell.children() {
            None => {}
            Some(children) => assert_eq!(children.len(), 8),
        }
    }
}

#[test]
fn conditional_recursion_stops_at_cap_and_level() {
    // Two clustered points plus an outlier, capacity 1, two levels:
    // the cluster drives one split per level, then the level cap ends
    // recursion even though the deepest cell is still over capacity.
    let points = vec![
        Vec3::new(0.10, 0.10, 0.10),
        Vec3::new(0.15, 0.12, 0.11),
        Vec3::new(0.90, 0.90, 0.90),
    ];
    let b = Aabb::new(Vec3::ZERO, 1.0, 1.0, 1.0);
    let tree = Octree::build(&points, b, 2, 1).unwrap();

    // root + 8 (level 1) + 8 (level 2 under the crowded child)
    assert_eq!(tree.cell_count(), 17);
    // 3 root records + 3 level-1 records + 2 level-2 records
    assert_eq!(tree.element_count(), 8);

    // The crowded level-2 leaf holds both cluster points and sits at the
    // level cap.
    let crowded = tree
        .leaves()
        .into_iter()
        .find(|&c| tree.cell_points(c).count() == 2)
        .unwrap();
    assert_eq!(tree.cell(crowded).level, 2);
}

// ─── Containment Invariant ────────────────────────────────────

#[test]
fn leaf_chains_respect_cell_bounds() {
    // 10 points inside a radius-4 sphere, tight box, one level, capacity
    // 4. Exhaustively: every point reachable from any leaf chain lies
    // inside that leaf's box on all three axes.
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 1, 4).unwrap();

    for leaf in tree.leaves() {
        let bounds = tree.cell(leaf).bounds;
        for point in tree.cell_points(leaf) {
            let p = tree.point(point);
            assert!(
                bounds.contains(p),
                "Point {point} at {p:?} escapes leaf box {bounds:?}"
            );
        }
    }
}

#[test]
fn containment_holds_at_depth() {
    // Same invariant with deeper, occupancy-driven subdivision.
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 5, 1).unwrap();

    for leaf in tree.leaves() {
        let bounds = tree.cell(leaf).bounds;
        for point in tree.cell_points(leaf) {
            assert!(bounds.contains(tree.point(point)));
        }
    }
}

// ─── Query Tests ──────────────────────────────────────────────

#[test]
fn locate_finds_owning_leaf() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 2, 2).unwrap();

    for (i, &p) in points.iter().enumerate() {
        let leaf = tree.locate(p).unwrap();
        assert!(tree.cell(leaf).is_leaf());
        assert!(
            tree.cell_points(leaf).any(|id| id == i as u32),
            "Leaf {leaf} does not chain point {i}"
        );
    }
}

#[test]
fn locate_outside_bounds_is_none() {
    let points = sphere_points();
    let b = Aabb::from_points(&points).unwrap();
    let tree = Octree::build(&points, b, 1, 4).unwrap();
    assert!(tree.locate(Vec3::new(100.0, 0.0, 0.0)).is_none());
}
