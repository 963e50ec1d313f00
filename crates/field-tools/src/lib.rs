//! Point deduplication and element bookkeeping for piecewise-parametric meshes.
//!
//! Discretising a mesh element by element evaluates every element at a grid
//! of parametric coordinates (`xi`). Neighbouring elements share boundaries,
//! so the resulting point cloud holds coincident or nearly coincident points.
//! This crate removes them while keeping each point paired with its `xi`.
//!
//! # Features
//!
//! - **Spacing thinning**: [`remove_close_points`] greedily removes points
//!   until no two survivors are closer than a threshold
//! - **Coincident point removal**: [`remove_duplicates`] and
//!   [`remove_duplicates_flat`] drop exact duplicates across element groups
//! - **Mask reconstruction**: [`keep_xi_by_element`] turns a flat keep mask
//!   back into per-element parametric coordinates
//! - **Bookkeeping**: [`group_by_element`], [`XiTree`], [`region_ep_map`]
//! - **Statistics**: [`bic`]
//!
//! All routines are generic over the point dimension and use
//! [`nalgebra::Point`] for coordinates.
//!
//! # Quick Start
//!
//! ```
//! use field_tools::{keep_xi_by_element, remove_close_points};
//! use nalgebra::Point2;
//!
//! // Two line elements sampled at xi = 0, 0.5, 1, sharing the point (1, 0).
//! let xi = vec![vec![0.0, 0.5, 1.0], vec![0.0, 0.5, 1.0]];
//! let points = vec![
//!     Point2::new(0.0, 0.0), Point2::new(0.5, 0.0), Point2::new(1.0, 0.0),
//!     Point2::new(1.0, 0.0), Point2::new(1.5, 0.0), Point2::new(2.0, 0.0),
//! ];
//!
//! let result = remove_close_points(&points, 1e-6).unwrap();
//! let kept = keep_xi_by_element(&xi, &result.keep_mask).unwrap();
//!
//! assert_eq!(result.points.len(), 5);
//! assert_eq!(kept[&0], vec![0.0, 0.5]);
//! assert_eq!(kept[&1], vec![0.0, 0.5, 1.0]);
//! ```
//!
//! # Grouped Deduplication
//!
//! ```
//! use field_tools::{ElementGroup, remove_duplicates_flat};
//! use nalgebra::Point2;
//!
//! let groups = vec![
//!     ElementGroup::new(vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)], vec![0.0, 1.0])?,
//!     ElementGroup::new(vec![Point2::new(1.0, 0.0), Point2::new(2.0, 0.0)], vec![0.0, 1.0])?,
//! ];
//! let result = remove_duplicates_flat(groups)?;
//! assert_eq!(result.removed, 1);
//! assert_eq!(result.groups[0].xi(), &[0.0]);
//! # Ok::<(), field_tools::FieldError>(())
//! ```
//!
//! # Error Handling
//!
//! Operations return `FieldResult<T>`, which is `Result<T, FieldError>`.
//! Shape mismatches, empty input, bad masks and non-finite coordinates are
//! reported, never truncated or skipped.
//!
//! # Logging
//!
//! Operations emit `tracing` events under the `field_tools` target. See
//! [`tracing_ext`].

mod error;
mod types;

pub mod dedup;
pub mod grouping;
pub mod mask;
pub mod spatial;
pub mod stats;
pub mod tracing_ext;

// Re-export core types
pub use error::{FieldError, FieldErrorCode, FieldResult, RecoverySuggestion};
pub use types::ElementGroup;

// Re-export deduplication
pub use dedup::{
    ClosePointParams, ClosePointResult, DuplicateRemovalResult, remove_close_points,
    remove_close_points_with_params, remove_duplicates, remove_duplicates_flat,
};
pub use mask::keep_xi_by_element;
pub use spatial::{Neighbour, SpatialIndex};

// Re-export bookkeeping helpers
pub use grouping::{
    ElementPositions, ElementXi, NestedXi, XiTree, group_by_element, region_ep_map, value_count,
};
pub use stats::bic;

// Re-export tracing extensions
pub use tracing_ext::{OperationTimer, log_dedup_result};
