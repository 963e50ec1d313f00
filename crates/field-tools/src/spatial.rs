//! Nearest-neighbour index over a point cloud.
//!
//! A wrapper around a kiddo KD-tree. The index is immutable once built:
//! callers that remove points build a fresh index from the surviving set
//! instead of deleting from the tree.
//!
//! Mesh discretisations are hostile to a bucketed KD-tree: shared element
//! vertices stack many coincident points, and structured or planar samples put
//! long runs of points on one axis value. kiddo cannot split a full bucket
//! whose points all share the split value, so the tree is fed:
//!
//! - one entry per distinct position ("site"), coincident points are listed
//!   under their site,
//! - site coordinates after a fixed orthonormal reflection, which takes
//!   lattice and planar data off the coordinate axes.
//!
//! If some transformed axis still holds [`BUCKET_SIZE`] or more sites with the
//! same value the tree could fail to split, and the index answers queries by
//! a linear scan instead. Reported distances are always computed from the
//! original coordinates.

use std::cmp::Ordering;
use std::collections::HashMap;

use kiddo::{KdTree, SquaredEuclidean};
use nalgebra::{Point, SVector};
use tracing::debug;

use crate::error::{FieldError, FieldResult};
use crate::types::check_finite;

/// Leaf bucket size of [`kiddo::KdTree`].
pub const BUCKET_SIZE: usize = 32;

/// One result of a k-nearest query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbour {
    /// Index of the point in the slice the index was built from.
    pub index: usize,
    /// Euclidean distance to the query point.
    pub distance: f64,
}

/// Query strategy chosen at build time.
enum Backend<const D: usize> {
    Tree {
        tree: KdTree<f64, D>,
        basis: [SVector<f64, D>; D],
        /// Point indices per site; item `s` of the tree is site `s`.
        sites: Vec<Vec<usize>>,
        /// Bound on the distance error introduced by the transform.
        tolerance: f64,
    },
    Scan,
}

/// Nearest-neighbour index over a fixed, non-empty set of points.
pub struct SpatialIndex<const D: usize> {
    points: Vec<Point<f64, D>>,
    backend: Backend<D>,
}

impl<const D: usize> SpatialIndex<D> {
    /// Build an index over `points`.
    ///
    /// Index `i` in query results refers to `points[i]`. Fails on an empty
    /// slice or on non-finite coordinates; any other input is accepted.
    pub fn build(points: &[Point<f64, D>]) -> FieldResult<Self> {
        if points.is_empty() {
            return Err(FieldError::empty_point_cloud(
                "cannot build a nearest-neighbour index over zero points",
            ));
        }
        check_finite(points)?;

        let backend = if D == 0 {
            Backend::Scan
        } else {
            build_tree(points)
        };
        Ok(Self {
            points: points.to_vec(),
            backend,
        })
    }

    /// Number of indexed points.
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always false; an index is never built over an empty set.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// True if queries go through the KD-tree rather than a linear scan.
    pub fn uses_tree(&self) -> bool {
        matches!(self.backend, Backend::Tree { .. })
    }

    /// The `k` nearest indexed points to `query`, closest first.
    ///
    /// Equal distances are ordered by index. When `query` is itself indexed
    /// it comes back as one of the zero-distance entries.
    pub fn nearest(&self, query: &Point<f64, D>, k: usize) -> Vec<Neighbour> {
        if k == 0 {
            return Vec::new();
        }

        let mut found: Vec<Neighbour> = match &self.backend {
            Backend::Tree {
                tree,
                basis,
                sites,
                tolerance,
            } => {
                let q = transform(basis, query);

                // The k nearest sites hold at least k points, so the k-th
                // nearest point lies within their reach plus the transform
                // error. Everything the transform could have reordered falls
                // inside that radius.
                let first = tree.nearest_n::<SquaredEuclidean>(&q, k.min(sites.len()));
                let reach = first.last().map_or(0.0, |n| n.distance.sqrt());
                let radius = reach + 2.0 * tolerance;

                tree.within_unsorted::<SquaredEuclidean>(&q, radius * radius)
                    .iter()
                    .flat_map(|site| sites[site.item as usize].iter())
                    .map(|&i| self.neighbour(query, i))
                    .collect()
            }
            Backend::Scan => (0..self.points.len())
                .map(|i| self.neighbour(query, i))
                .collect::<Vec<_>>(),
        };

        if k < found.len() {
            found.select_nth_unstable_by(k, by_distance_then_index);
            found.truncate(k);
        }
        found.sort_unstable_by(by_distance_then_index);
        found
    }

    /// Distance from an indexed point to its closest other indexed point.
    ///
    /// Takes the second of the two nearest results, so a coincident copy
    /// yields 0. Returns `f64::INFINITY` when the index holds one point.
    pub fn nearest_other_distance(&self, query: &Point<f64, D>) -> f64 {
        self.nearest(query, 2)
            .get(1)
            .map_or(f64::INFINITY, |n| n.distance)
    }

    #[inline]
    fn neighbour(&self, query: &Point<f64, D>, index: usize) -> Neighbour {
        Neighbour {
            index,
            distance: nalgebra::distance(query, &self.points[index]),
        }
    }
}

fn build_tree<const D: usize>(points: &[Point<f64, D>]) -> Backend<D> {
    // Group coincident points; -0.0 and 0.0 are the same position.
    let mut site_of: HashMap<[u64; D], usize> = HashMap::new();
    let mut sites: Vec<Vec<usize>> = Vec::new();
    for (i, p) in points.iter().enumerate() {
        let key: [u64; D] = std::array::from_fn(|axis| (p[axis] + 0.0).to_bits());
        let site = *site_of.entry(key).or_insert_with(|| {
            sites.push(Vec::new());
            sites.len() - 1
        });
        sites[site].push(i);
    }

    let basis = householder::<D>();
    let transformed: Vec<[f64; D]> = sites
        .iter()
        .map(|members| transform(&basis, &points[members[0]]))
        .collect();

    let run = longest_axis_run(&transformed);
    if run >= BUCKET_SIZE {
        debug!(
            target: "field_tools::spatial",
            points = points.len(),
            sites = sites.len(),
            longest_axis_run = run,
            "Falling back to linear scan"
        );
        return Backend::Scan;
    }

    let scale = points
        .iter()
        .flat_map(|p| p.coords.iter().copied())
        .fold(0.0f64, |acc, v| acc.max(v.abs()));
    let tolerance = 64.0 * D as f64 * f64::EPSILON * (scale + 1.0);

    let mut tree = KdTree::with_capacity(sites.len());
    for (s, coords) in transformed.iter().enumerate() {
        tree.add(coords, s as u64);
    }

    Backend::Tree {
        tree,
        basis,
        sites,
        tolerance,
    }
}

/// Fixed Householder reflection `I - 2uu^T` with every entry well away from 0
/// and 1, so no row lines up with a coordinate axis.
fn householder<const D: usize>() -> [SVector<f64, D>; D] {
    const GOLDEN: f64 = 1.618_033_988_749_895;

    let u = SVector::<f64, D>::from_fn(|j, _| (j as f64 + GOLDEN).sqrt()).normalize();
    std::array::from_fn(|i| {
        let mut row = u * (-2.0 * u[i]);
        row[i] += 1.0;
        row
    })
}

#[inline]
fn transform<const D: usize>(basis: &[SVector<f64, D>; D], p: &Point<f64, D>) -> [f64; D] {
    std::array::from_fn(|axis| basis[axis].dot(&p.coords))
}

/// Largest number of entries sharing one value on any axis.
fn longest_axis_run<const D: usize>(coords: &[[f64; D]]) -> usize {
    let mut longest = 0;
    let mut values: Vec<f64> = Vec::with_capacity(coords.len());
    for axis in 0..D {
        values.clear();
        values.extend(coords.iter().map(|c| c[axis]));
        values.sort_unstable_by(f64::total_cmp);

        let mut run = 0;
        for (i, v) in values.iter().enumerate() {
            run = if i > 0 && values[i - 1] == *v { run + 1 } else { 1 };
            longest = longest.max(run);
        }
    }
    longest
}

fn by_distance_then_index(a: &Neighbour, b: &Neighbour) -> Ordering {
    a.distance
        .total_cmp(&b.distance)
        .then_with(|| a.index.cmp(&b.index))
}
