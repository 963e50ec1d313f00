// Allow unused_assignments lint for error struct fields that are used in thiserror Display macros
// but appear as "never read" to the compiler. This is a false positive in newer Rust versions.
#![allow(unused_assignments)]

//! Error types for point deduplication and element grouping.
//!
//! Every error carries:
//! - A machine-readable error code (`FIELD-XXXX`)
//! - The offending sizes or values, so callers can report them
//! - A recovery suggestion
//! - Terminal display via miette
//!
//! # Error Codes
//!
//! - `FIELD-1xxx`: Input shape and data errors
//! - `FIELD-2xxx`: Parameter errors
//!
//! # Example
//!
//! ```
//! use field_tools::{ElementGroup, FieldError, FieldErrorCode};
//! use nalgebra::Point2;
//!
//! let err = ElementGroup::new(vec![Point2::new(0.0, 0.0)], Vec::<f64>::new()).unwrap_err();
//! assert_eq!(err.code(), FieldErrorCode::ShapeMismatch);
//! assert!(matches!(err, FieldError::ShapeMismatch { points: 1, xi: 0 }));
//! ```

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias for field tool operations.
pub type FieldResult<T> = Result<T, FieldError>;

/// Machine-readable error codes.
///
/// - 1xxx = Input shape and data errors
/// - 2xxx = Parameter errors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldErrorCode {
    /// FIELD-1001: Points and parametric coordinates differ in length
    ShapeMismatch = 1001,
    /// FIELD-1002: No points to operate on
    EmptyPointCloud = 1002,
    /// FIELD-1003: Keep mask length differs from the total element length
    MaskLengthMismatch = 1003,
    /// FIELD-1004: Point has a NaN or infinite coordinate
    InvalidCoordinate = 1004,

    /// FIELD-2001: Parameter out of range
    InvalidParams = 2001,
}

impl FieldErrorCode {
    /// Returns the error code as a string in the format `FIELD-XXXX`.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldErrorCode::ShapeMismatch => "FIELD-1001",
            FieldErrorCode::EmptyPointCloud => "FIELD-1002",
            FieldErrorCode::MaskLengthMismatch => "FIELD-1003",
            FieldErrorCode::InvalidCoordinate => "FIELD-1004",
            FieldErrorCode::InvalidParams => "FIELD-2001",
        }
    }
}

impl std::fmt::Display for FieldErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Recovery suggestions for field tool errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverySuggestion {
    /// Check how the input was produced.
    CheckInput { checks: Vec<String> },
    /// Adjust parameters for the operation.
    AdjustParameters { parameters: Vec<(String, String)> },
}

impl std::fmt::Display for RecoverySuggestion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecoverySuggestion::CheckInput { checks } => {
                write!(f, "Check the input for: {}", checks.join(", "))
            }
            RecoverySuggestion::AdjustParameters { parameters } => {
                let params: Vec<String> = parameters
                    .iter()
                    .map(|(k, v)| format!("{} = {}", k, v))
                    .collect();
                write!(f, "Try adjusting: {}", params.join(", "))
            }
        }
    }
}

/// Errors raised by deduplication, mask reconstruction and grouping.
#[derive(Debug, Error, Diagnostic)]
pub enum FieldError {
    /// Points and parametric coordinates of one element differ in length.
    #[error("shape mismatch: {points} points but {xi} parametric coordinates")]
    #[diagnostic(
        code(field::input::shape),
        help("Every point needs exactly one parametric coordinate. Check the discretisation that produced them.")
    )]
    ShapeMismatch { points: usize, xi: usize },

    /// Nothing to deduplicate or index.
    #[error("point cloud is empty: {details}")]
    #[diagnostic(
        code(field::input::empty),
        help("Deduplication needs at least one point.")
    )]
    EmptyPointCloud { details: String },

    /// Keep mask does not cover the element lists exactly.
    #[error("keep mask has {mask_len} entries but the element lists hold {expected} values")]
    #[diagnostic(
        code(field::input::mask_length),
        help("The mask must come from the concatenation of the same element lists.")
    )]
    MaskLengthMismatch { mask_len: usize, expected: usize },

    /// A coordinate is NaN or infinite.
    #[error("invalid coordinate at point {point_index}: axis {axis} is {value}")]
    #[diagnostic(
        code(field::input::coordinate),
        help("Nearest-neighbour queries need finite coordinates.")
    )]
    InvalidCoordinate {
        point_index: usize,
        axis: usize,
        value: f64,
    },

    /// Parameter out of its valid range.
    #[error("invalid parameter {name}: {details}")]
    #[diagnostic(code(field::params::invalid))]
    InvalidParams { name: &'static str, details: String },
}

impl FieldError {
    /// Returns the machine-readable error code.
    pub fn code(&self) -> FieldErrorCode {
        match self {
            FieldError::ShapeMismatch { .. } => FieldErrorCode::ShapeMismatch,
            FieldError::EmptyPointCloud { .. } => FieldErrorCode::EmptyPointCloud,
            FieldError::MaskLengthMismatch { .. } => FieldErrorCode::MaskLengthMismatch,
            FieldError::InvalidCoordinate { .. } => FieldErrorCode::InvalidCoordinate,
            FieldError::InvalidParams { .. } => FieldErrorCode::InvalidParams,
        }
    }

    /// Returns a recovery suggestion for this error.
    pub fn recovery_suggestion(&self) -> RecoverySuggestion {
        match self {
            FieldError::ShapeMismatch { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["one xi per point".into(), "element ordering".into()],
            },
            FieldError::EmptyPointCloud { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["discretisation produced points".into()],
            },
            FieldError::MaskLengthMismatch { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["mask built from the same element lists".into()],
            },
            FieldError::InvalidCoordinate { .. } => RecoverySuggestion::CheckInput {
                checks: vec!["NaN or infinite coordinates".into()],
            },
            FieldError::InvalidParams { name, .. } => RecoverySuggestion::AdjustParameters {
                parameters: vec![((*name).into(), "use a finite, non-negative value".into())],
            },
        }
    }

    pub(crate) fn shape_mismatch(points: usize, xi: usize) -> Self {
        FieldError::ShapeMismatch { points, xi }
    }

    pub(crate) fn empty_point_cloud(details: impl Into<String>) -> Self {
        FieldError::EmptyPointCloud {
            details: details.into(),
        }
    }

    pub(crate) fn invalid_params(name: &'static str, details: impl Into<String>) -> Self {
        FieldError::InvalidParams {
            name,
            details: details.into(),
        }
    }
}
