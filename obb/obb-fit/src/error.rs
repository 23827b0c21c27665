//! Error types for bounding box fitting.

use obb_types::MeshError;
use thiserror::Error;

/// Result type alias for fitting operations.
pub type FitResult<T> = Result<T, FitError>;

/// Broad classification of a [`FitError`].
///
/// Lets callers tell "the input was bad" apart from "the math broke down"
/// and from "this estimator is not installed", e.g. to fall back from the
/// hull estimator to the triangle estimator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Empty or malformed input.
    Input,
    /// A computation left its numerical domain (division by zero area,
    /// non-symmetric matrix, failed hull).
    NumericalDomain,
    /// The requested capability is not available in this build or setup.
    FeatureUnavailable,
}

/// Errors that can occur while fitting an oriented bounding box.
#[derive(Debug, Error)]
pub enum FitError {
    /// No points to fit.
    #[error("point set is empty")]
    EmptyPoints,

    /// No triangles for a surface estimator.
    #[error("triangle set is empty")]
    EmptyTriangles,

    /// Mesh snapshot failed validation.
    #[error(transparent)]
    Mesh(#[from] MeshError),

    /// Unsupported method selector.
    #[error("unsupported fit method {0}: use 0 (points), 1 (triangles), or 2 (hull)")]
    UnsupportedMethod(u8),

    /// Every triangle has zero area, so the surface moments are undefined.
    #[error("total surface area is zero across {triangles} triangles")]
    ZeroSurfaceArea {
        /// Number of triangles that were accumulated.
        triangles: usize,
    },

    /// The matrix handed to the eigensolver is not symmetric.
    #[error("matrix is not symmetric: max asymmetry {asymmetry:e} exceeds tolerance {tolerance:e}")]
    NotSymmetric {
        /// Largest `|m[i][j] - m[j][i]|` found.
        asymmetry: f64,
        /// Tolerance that was applied.
        tolerance: f64,
    },

    /// The matrix contains NaN or infinite entries.
    #[error("matrix contains non-finite entries")]
    NonFinite,

    /// The convex hull collaborator could not process the points.
    #[error("convex hull failed: {0}")]
    HullFailed(String),

    /// No convex hull collaborator is available.
    #[error("convex hull unavailable: {0}")]
    HullUnavailable(String),
}

impl FitError {
    /// Classify the error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyPoints
            | Self::EmptyTriangles
            | Self::Mesh(_)
            | Self::UnsupportedMethod(_) => ErrorKind::Input,
            Self::ZeroSurfaceArea { .. }
            | Self::NotSymmetric { .. }
            | Self::NonFinite
            | Self::HullFailed(_) => ErrorKind::NumericalDomain,
            Self::HullUnavailable(_) => ErrorKind::FeatureUnavailable,
        }
    }

    /// Create a hull failure error.
    #[must_use]
    pub fn hull_failed(details: impl Into<String>) -> Self {
        Self::HullFailed(details.into())
    }

    /// Create a hull unavailable error.
    #[must_use]
    pub fn hull_unavailable(details: impl Into<String>) -> Self {
        Self::HullUnavailable(details.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FitError::EmptyPoints;
        assert!(format!("{err}").contains("empty"));

        let err = FitError::UnsupportedMethod(7);
        assert!(format!("{err}").contains('7'));

        let err = FitError::hull_unavailable("built without the `hull` feature");
        assert!(format!("{err}").contains("hull"));
    }

    #[test]
    fn test_error_kinds() {
        assert_eq!(FitError::EmptyPoints.kind(), ErrorKind::Input);
        assert_eq!(FitError::EmptyTriangles.kind(), ErrorKind::Input);
        assert_eq!(FitError::Mesh(MeshError::NoPoints).kind(), ErrorKind::Input);
        assert_eq!(
            FitError::ZeroSurfaceArea { triangles: 2 }.kind(),
            ErrorKind::NumericalDomain
        );
        assert_eq!(
            FitError::NotSymmetric {
                asymmetry: 1.0,
                tolerance: 1e-9
            }
            .kind(),
            ErrorKind::NumericalDomain
        );
        assert_eq!(
            FitError::hull_failed("coplanar").kind(),
            ErrorKind::NumericalDomain
        );
        assert_eq!(
            FitError::hull_unavailable("none").kind(),
            ErrorKind::FeatureUnavailable
        );
    }
}
