//! Near-duplicate point removal.
//!
//! Three routines share one pattern: build a nearest-neighbour index over the
//! points that are still alive, query it, remove some points, and build a new
//! index before the next query. The index is never edited in place.
//!
//! - [`remove_close_points`]: greedy thinning of a flat cloud down to a
//!   minimum spacing, one point per pass.
//! - [`remove_duplicates`]: drops coincident points from a nested
//!   `groups -> elements` structure, one element per pass.
//! - [`remove_duplicates_flat`]: the same over a flat list of elements.
//!
//! # Tie-breaking
//!
//! When several points share the smallest nearest-neighbour distance,
//! [`remove_close_points`] removes the one with the lowest original index.
//!
//! # Example
//!
//! ```
//! use field_tools::remove_close_points;
//! use nalgebra::Point2;
//!
//! let points = vec![
//!     Point2::new(0.0, 0.0),
//!     Point2::new(0.0, 0.0001),
//!     Point2::new(5.0, 5.0),
//! ];
//! let result = remove_close_points(&points, 0.01).unwrap();
//! assert_eq!(result.points.len(), 2);
//! assert_eq!(result.keep_mask, vec![false, true, true]);
//! ```

use nalgebra::Point;

use crate::error::{FieldError, FieldResult};
use crate::spatial::SpatialIndex;
use crate::tracing_ext::{OperationTimer, log_dedup_result, log_pass, log_removed_point};
use crate::types::{ElementGroup, check_finite};

/// Parameters for [`remove_close_points_with_params`].
#[derive(Debug, Clone, PartialEq)]
pub struct ClosePointParams {
    /// Points closer than this to their nearest neighbour are thinned out.
    /// The comparison is strict, so pairs exactly `min_dist` apart survive.
    /// Default: 1e-6
    pub min_dist: f64,
}

impl Default for ClosePointParams {
    fn default() -> Self {
        Self { min_dist: 1e-6 }
    }
}

impl ClosePointParams {
    /// Create params with the given minimum spacing.
    pub fn with_min_dist(min_dist: f64) -> Self {
        Self { min_dist }
    }

    /// Check that `min_dist` is finite and non-negative.
    pub fn validate(&self) -> FieldResult<()> {
        if !self.min_dist.is_finite() || self.min_dist < 0.0 {
            return Err(FieldError::invalid_params(
                "min_dist",
                format!("expected a finite, non-negative distance, got {}", self.min_dist),
            ));
        }
        Ok(())
    }
}

/// Result of [`remove_close_points`].
#[derive(Debug, Clone)]
pub struct ClosePointResult<const D: usize> {
    /// Surviving points in their original relative order.
    pub points: Vec<Point<f64, D>>,
    /// One flag per input point, `true` if it survived.
    pub keep_mask: Vec<bool>,
    /// Number of points removed.
    pub removed: usize,
    /// Number of index builds performed.
    pub passes: usize,
}

/// Result of [`remove_duplicates`] and [`remove_duplicates_flat`].
#[derive(Debug, Clone)]
pub struct DuplicateRemovalResult<G> {
    /// Filtered groups, same shape as the input.
    pub groups: G,
    /// Number of points removed across all groups.
    pub removed: usize,
    /// Number of index builds performed.
    pub passes: usize,
}

/// Thin `points` so that no two survivors are closer than `min_dist`.
///
/// See [`remove_close_points_with_params`].
pub fn remove_close_points<const D: usize>(
    points: &[Point<f64, D>],
    min_dist: f64,
) -> FieldResult<ClosePointResult<D>> {
    remove_close_points_with_params(points, &ClosePointParams::with_min_dist(min_dist))
}

/// Thin a point cloud by repeatedly removing the point with the closest
/// neighbour.
///
/// Each pass rebuilds the index over the surviving points and finds the point
/// whose nearest other survivor is closest. If that distance is below
/// `params.min_dist` the point is removed and another pass runs; otherwise
/// the loop stops. Ties go to the lowest original index. At most `N - 1`
/// points are removed, and a single remaining point always stops the loop.
///
/// Each pass costs an index build plus one query per survivor, so the worst
/// case is quadratic in the number of removals. Intended for mesh
/// discretisations, not large scans.
pub fn remove_close_points_with_params<const D: usize>(
    points: &[Point<f64, D>],
    params: &ClosePointParams,
) -> FieldResult<ClosePointResult<D>> {
    params.validate()?;
    if points.is_empty() {
        return Err(FieldError::empty_point_cloud("remove_close_points got no points"));
    }
    check_finite(points)?;

    let _timer = OperationTimer::with_points("remove_close_points", points.len());

    let mut keep_mask = vec![true; points.len()];
    let mut passes = 0;

    loop {
        let live: Vec<usize> = keep_mask
            .iter()
            .enumerate()
            .filter_map(|(i, &k)| k.then_some(i))
            .collect();
        let live_points: Vec<Point<f64, D>> = live.iter().map(|&i| points[i]).collect();

        let index = SpatialIndex::build(&live_points)?;
        log_pass("remove_close_points", passes, live.len());
        passes += 1;

        // First strict minimum wins, i.e. the lowest original index.
        let mut closest: Option<(usize, f64)> = None;
        for (slot, p) in live_points.iter().enumerate() {
            let d = index.nearest_other_distance(p);
            if closest.is_none_or(|(_, best)| d < best) {
                closest = Some((slot, d));
            }
        }

        match closest {
            Some((slot, d)) if d < params.min_dist => {
                keep_mask[live[slot]] = false;
                log_removed_point("remove_close_points", live[slot], d);
            }
            _ => break,
        }
    }

    let kept: Vec<Point<f64, D>> = points
        .iter()
        .zip(&keep_mask)
        .filter_map(|(p, &k)| k.then_some(*p))
        .collect();
    let removed = points.len() - kept.len();
    log_dedup_result("remove_close_points", points.len(), removed, passes);

    Ok(ClosePointResult {
        points: kept,
        keep_mask,
        removed,
        passes,
    })
}

/// Remove coincident points from a nested `groups -> elements` structure.
///
/// Elements are visited in order (`groups[0][0]`, `groups[0][1]`, ...,
/// `groups[1][0]`, ...). For each element the index is rebuilt over every
/// point currently alive in the whole structure, and the element keeps only
/// the points whose nearest other point is at a distance greater than zero.
/// Parametric coordinates are filtered with their points.
///
/// Because later elements see the already filtered data, a point shared by
/// two elements is dropped from whichever comes first and kept in the other.
/// Points coincident within one element see each other and are all dropped.
///
/// Fails if the structure holds no points at all.
pub fn remove_duplicates<X, const D: usize>(
    groups: Vec<Vec<ElementGroup<X, D>>>,
) -> FieldResult<DuplicateRemovalResult<Vec<Vec<ElementGroup<X, D>>>>> {
    let shape: Vec<usize> = groups.iter().map(Vec::len).collect();
    let flat: Vec<ElementGroup<X, D>> = groups.into_iter().flatten().collect();

    let result = dedup_elements(flat, "remove_duplicates")?;

    let mut elements = result.groups.into_iter();
    let nested: Vec<Vec<ElementGroup<X, D>>> = shape
        .into_iter()
        .map(|n| elements.by_ref().take(n).collect())
        .collect();

    Ok(DuplicateRemovalResult {
        groups: nested,
        removed: result.removed,
        passes: result.passes,
    })
}

/// Remove coincident points from a flat list of elements.
///
/// Same rules as [`remove_duplicates`] with one index rebuild per element.
pub fn remove_duplicates_flat<X, const D: usize>(
    groups: Vec<ElementGroup<X, D>>,
) -> FieldResult<DuplicateRemovalResult<Vec<ElementGroup<X, D>>>> {
    dedup_elements(groups, "remove_duplicates_flat")
}

fn dedup_elements<X, const D: usize>(
    mut elements: Vec<ElementGroup<X, D>>,
    operation: &'static str,
) -> FieldResult<DuplicateRemovalResult<Vec<ElementGroup<X, D>>>> {
    let total: usize = elements.iter().map(ElementGroup::len).sum();
    if total == 0 {
        return Err(FieldError::empty_point_cloud(format!(
            "{} got {} elements with no points",
            operation,
            elements.len()
        )));
    }
    for element in &elements {
        check_finite(element.points())?;
    }

    let _timer = OperationTimer::with_points(operation, total);

    let mut removed = 0;
    let mut passes = 0;

    for e in 0..elements.len() {
        if elements[e].is_empty() {
            continue;
        }

        let all_points: Vec<Point<f64, D>> = elements
            .iter()
            .flat_map(|g| g.points().iter().copied())
            .collect();
        let index = SpatialIndex::build(&all_points)?;
        log_pass(operation, passes, all_points.len());
        passes += 1;

        let keep: Vec<bool> = elements[e]
            .points()
            .iter()
            .map(|p| index.nearest_other_distance(p) > 0.0)
            .collect();

        let dropped = keep.iter().filter(|&&k| !k).count();
        if dropped > 0 {
            let element = std::mem::take(&mut elements[e]);
            elements[e] = element.retain_mask(&keep);
            removed += dropped;
        }
    }

    log_dedup_result(operation, total, removed, passes);

    Ok(DuplicateRemovalResult {
        groups: elements,
        removed,
        passes,
    })
}
