//! Core data types: element groups with lockstep parametric coordinates.

use nalgebra::Point;

use crate::error::{FieldError, FieldResult};

/// Points of one element together with their parametric coordinates.
///
/// `points[i]` is the physical location of parametric coordinate `xi[i]`.
/// The two vectors always have the same length: construction checks it and
/// every filtering operation removes entries from both.
#[derive(Debug, Clone, PartialEq)]
pub struct ElementGroup<X, const D: usize> {
    points: Vec<Point<f64, D>>,
    xi: Vec<X>,
}

impl<X, const D: usize> ElementGroup<X, D> {
    /// Pair points with parametric coordinates.
    ///
    /// Fails with [`FieldError::ShapeMismatch`] if the lengths differ.
    pub fn new(points: Vec<Point<f64, D>>, xi: Vec<X>) -> FieldResult<Self> {
        if points.len() != xi.len() {
            return Err(FieldError::shape_mismatch(points.len(), xi.len()));
        }
        Ok(Self { points, xi })
    }

    /// An element with no points.
    pub fn empty() -> Self {
        Self {
            points: Vec::new(),
            xi: Vec::new(),
        }
    }

    /// Number of points (equal to the number of parametric coordinates).
    #[inline]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Check if the element has no points.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Physical points.
    #[inline]
    pub fn points(&self) -> &[Point<f64, D>] {
        &self.points
    }

    /// Parametric coordinates.
    #[inline]
    pub fn xi(&self) -> &[X] {
        &self.xi
    }

    /// Split into `(xi, points)`.
    pub fn into_parts(self) -> (Vec<X>, Vec<Point<f64, D>>) {
        (self.xi, self.points)
    }

    /// Keep only the entries whose flag is `true`.
    ///
    /// `keep` must have one flag per point.
    pub(crate) fn retain_mask(self, keep: &[bool]) -> Self {
        debug_assert_eq!(keep.len(), self.points.len());
        let (points, xi) = self
            .points
            .into_iter()
            .zip(self.xi)
            .zip(keep)
            .filter_map(|(pair, &k)| k.then_some(pair))
            .unzip();
        Self { points, xi }
    }
}

impl<X, const D: usize> Default for ElementGroup<X, D> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Check that every coordinate of every point is finite.
pub(crate) fn check_finite<const D: usize>(points: &[Point<f64, D>]) -> FieldResult<()> {
    for (point_index, p) in points.iter().enumerate() {
        if let Some(axis) = (0..D).find(|&axis| !p[axis].is_finite()) {
            return Err(FieldError::InvalidCoordinate {
                point_index,
                axis,
                value: p[axis],
            });
        }
    }
    Ok(())
}
