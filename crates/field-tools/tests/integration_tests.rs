//! Integration tests for field-tools.
//!
//! These tests run the public API end to end on small discretised meshes.

use field_tools::{
    ElementGroup, FieldError, FieldErrorCode, NestedXi, XiTree, keep_xi_by_element,
    region_ep_map, remove_close_points, remove_duplicates, remove_duplicates_flat, value_count,
};
use nalgebra::{Point2, Point3};

// =============================================================================
// Fixtures
// =============================================================================

/// Discretise an `nx` x `ny` grid of unit square elements, each sampled on a
/// `samples` x `samples` grid of parametric coordinates. Shared element edges
/// produce coincident points.
fn quad_grid(nx: usize, ny: usize, samples: usize) -> Vec<ElementGroup<[f64; 2], 2>> {
    let step = 1.0 / (samples - 1) as f64;
    let mut elements = Vec::new();

    for ey in 0..ny {
        for ex in 0..nx {
            let mut points = Vec::new();
            let mut xi = Vec::new();
            for j in 0..samples {
                for i in 0..samples {
                    let (u, v) = (i as f64 * step, j as f64 * step);
                    points.push(Point2::new(ex as f64 + u, ey as f64 + v));
                    xi.push([u, v]);
                }
            }
            elements.push(ElementGroup::new(points, xi).unwrap());
        }
    }

    elements
}

/// Same as [`quad_grid`] but embedded in the z = 0 plane of 3D space.
fn planar_patch(n: usize, samples: usize) -> Vec<ElementGroup<[f64; 2], 3>> {
    quad_grid(n, n, samples)
        .into_iter()
        .map(|e| {
            let (xi, points) = e.into_parts();
            let points = points.iter().map(|p| Point3::new(p.x, p.y, 0.0)).collect();
            ElementGroup::new(points, xi).unwrap()
        })
        .collect()
}

fn min_pairwise_distance<const D: usize>(points: &[nalgebra::Point<f64, D>]) -> f64 {
    let mut min = f64::INFINITY;
    for i in 0..points.len() {
        for j in (i + 1)..points.len() {
            min = min.min(nalgebra::distance(&points[i], &points[j]));
        }
    }
    min
}

// =============================================================================
// remove_close_points
// =============================================================================

#[test]
fn test_close_points_scenario() {
    let points = vec![
        Point2::new(0.0, 0.0),
        Point2::new(0.0, 0.0001),
        Point2::new(5.0, 5.0),
    ];
    let result = remove_close_points(&points, 0.01).unwrap();

    assert_eq!(result.points.len(), 2);
    assert!(result.points.contains(&Point2::new(5.0, 5.0)));
    assert_eq!(result.keep_mask.iter().filter(|&&k| k).count(), 2);
}

#[test]
fn test_close_points_on_quad_grid_matches_unique_nodes() {
    // 3 x 2 elements sampled 3 x 3: unique nodes form a 7 x 5 lattice.
    let elements = quad_grid(3, 2, 3);
    let points: Vec<_> = elements
        .iter()
        .flat_map(|e| e.points().iter().copied())
        .collect();
    assert_eq!(points.len(), 54);

    let result = remove_close_points(&points, 1e-6).unwrap();
    assert_eq!(result.points.len(), 35);
    assert!(min_pairwise_distance(&result.points) >= 0.5 - 1e-12);

    // Feed the mask back through the per-element view.
    let xi: Vec<Vec<[f64; 2]>> = elements.iter().map(|e| e.xi().to_vec()).collect();
    let kept = keep_xi_by_element(&xi, &result.keep_mask).unwrap();
    assert_eq!(kept.len(), 6);
    assert_eq!(kept.values().map(Vec::len).sum::<usize>(), 35);
}

#[test]
fn test_close_points_is_idempotent() {
    let points: Vec<Point3<f64>> = (0..40)
        .map(|i| {
            let t = i as f64 * 0.37;
            Point3::new(t.sin(), t.cos(), (i % 7) as f64 * 0.05)
        })
        .collect();

    let first = remove_close_points(&points, 0.2).unwrap();
    let second = remove_close_points(&first.points, 0.2).unwrap();

    assert_eq!(second.removed, 0);
    assert_eq!(second.points, first.points);
}

// =============================================================================
// remove_duplicates / remove_duplicates_flat
// =============================================================================

#[test]
fn test_flat_duplicates_on_quad_grid() {
    let elements = quad_grid(3, 2, 3);
    let result = remove_duplicates_flat(elements).unwrap();

    assert_eq!(result.removed, 54 - 35);
    assert_eq!(result.passes, 6);

    let points: Vec<_> = result
        .groups
        .iter()
        .flat_map(|e| e.points().iter().copied())
        .collect();
    assert_eq!(points.len(), 35);
    assert!(min_pairwise_distance(&points) > 0.0);

    for element in &result.groups {
        assert_eq!(element.points().len(), element.xi().len());
    }

    // The last element is processed after all its neighbours are cleaned.
    assert_eq!(result.groups[5].len(), 9);
}

#[test]
fn test_nested_duplicates_match_flat() {
    let flat = quad_grid(2, 2, 4);
    let nested: Vec<Vec<_>> = vec![flat[..2].to_vec(), flat[2..].to_vec()];

    let from_flat = remove_duplicates_flat(flat).unwrap();
    let from_nested = remove_duplicates(nested).unwrap();

    assert_eq!(from_nested.removed, from_flat.removed);
    let regrouped: Vec<_> = from_nested.groups.into_iter().flatten().collect();
    assert_eq!(regrouped, from_flat.groups);
}

#[test]
fn test_duplicates_empty_input() {
    let groups: Vec<Vec<ElementGroup<f64, 3>>> = vec![vec![], vec![]];
    let err = remove_duplicates(groups).unwrap_err();
    assert_eq!(err.code(), FieldErrorCode::EmptyPointCloud);
}

#[test]
fn test_shape_mismatch_reported() {
    let err = ElementGroup::new(vec![Point3::new(0.0, 0.0, 0.0); 3], vec![0.0; 2]).unwrap_err();
    assert!(matches!(err, FieldError::ShapeMismatch { points: 3, xi: 2 }));
    assert!(err.to_string().contains("3 points"));
}

// =============================================================================
// Degenerate layouts: long axis runs, planar data, large coincident clusters
// =============================================================================

#[test]
fn test_close_points_on_axis_aligned_line() {
    // 40 points sharing x = 0, spaced 1 apart.
    let points: Vec<Point2<f64>> = (0..40).map(|i| Point2::new(0.0, i as f64)).collect();

    let result = remove_close_points(&points, 0.5).unwrap();
    assert_eq!(result.removed, 0);

    // Spacing equal to the threshold survives the strict comparison.
    let result = remove_close_points(&points, 1.0).unwrap();
    assert_eq!(result.removed, 0);

    // Every survivor is tied at distance 1, so the lowest index keeps going.
    let result = remove_close_points(&points, 1.5).unwrap();
    assert_eq!(result.points, vec![Point2::new(0.0, 39.0)]);
}

#[test]
fn test_flat_duplicates_on_axis_aligned_line_elements() {
    // 1D elements along the x axis, 4 samples each, sharing end points.
    let elements: Vec<ElementGroup<f64, 3>> = (0..20)
        .map(|e| {
            let points = (0..4)
                .map(|i| Point3::new(e as f64 + i as f64 / 3.0, 0.0, 0.0))
                .collect();
            ElementGroup::new(points, vec![0.0, 1.0 / 3.0, 2.0 / 3.0, 1.0]).unwrap()
        })
        .collect();

    let result = remove_duplicates_flat(elements).unwrap();
    assert_eq!(result.removed, 19);
    assert_eq!(result.groups.iter().map(ElementGroup::len).sum::<usize>(), 61);
}

#[test]
fn test_flat_duplicates_on_coplanar_patch() {
    // 8 x 8 elements sampled 5 x 5 in the z = 0 plane: 33 x 33 unique nodes.
    let elements = planar_patch(8, 5);
    let result = remove_duplicates_flat(elements).unwrap();

    let points: Vec<_> = result
        .groups
        .iter()
        .flat_map(|e| e.points().iter().copied())
        .collect();
    assert_eq!(points.len(), 33 * 33);
    assert_eq!(result.removed, 64 * 25 - 33 * 33);
}

#[test]
fn test_close_points_on_coplanar_patch() {
    let points: Vec<Point3<f64>> = planar_patch(4, 5)
        .iter()
        .flat_map(|e| e.points().iter().copied())
        .collect();

    let result = remove_close_points(&points, 1e-6).unwrap();
    assert_eq!(result.points.len(), 17 * 17);
    assert!(min_pairwise_distance(&result.points) >= 0.25 - 1e-12);
}

#[test]
fn test_many_elements_sharing_one_vertex() {
    // 40 two-point elements fanning out from the origin.
    let elements: Vec<ElementGroup<f64, 2>> = (0..40)
        .map(|e| {
            let angle = e as f64 * std::f64::consts::TAU / 40.0;
            ElementGroup::new(
                vec![Point2::new(0.0, 0.0), Point2::new(angle.cos(), angle.sin())],
                vec![0.0, 1.0],
            )
            .unwrap()
        })
        .collect();

    let result = remove_duplicates_flat(elements).unwrap();
    assert_eq!(result.removed, 39);
    // The origin survives only in the last element.
    assert_eq!(result.groups[39].len(), 2);
    assert!(result.groups[..39].iter().all(|e| e.xi() == [1.0]));
}

#[test]
fn test_close_points_large_coincident_cluster() {
    let mut points = vec![Point3::new(1.0, 2.0, 3.0); 50];
    points.push(Point3::new(4.0, 2.0, 3.0));

    let result = remove_close_points(&points, 1e-6).unwrap();
    assert_eq!(result.points.len(), 2);
    assert!(result.keep_mask[49]);
    assert!(result.keep_mask[50]);
}

// =============================================================================
// Bookkeeping
// =============================================================================

#[test]
fn test_keep_xi_scenario() {
    let xi = vec![vec!["a", "b"], vec!["c"]];
    let kept = keep_xi_by_element(&xi, &[true, false, true]).unwrap();
    assert_eq!(kept[&0], vec!["a"]);
    assert_eq!(kept[&1], vec!["c"]);
}

#[test]
fn test_region_map_covers_flattened_values() {
    let regions = XiTree::index_nested(vec![
        NestedXi::List(vec![
            NestedXi::Array(vec![0.0, 1.0]),
            NestedXi::Array(vec![0.5]),
        ]),
        NestedXi::Array(vec![0.25, 0.75]),
    ]);

    let map = region_ep_map(&regions);
    assert_eq!(map[&0], 0..3);
    assert_eq!(map[&1], 3..5);
    assert_eq!(map[&1].end, value_count(&regions));
}
