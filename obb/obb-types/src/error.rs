//! Error types for mesh validation.

use thiserror::Error;

/// Result type alias for mesh operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Errors raised when a mesh snapshot is not usable as input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MeshError {
    /// The mesh has no points.
    #[error("mesh has no points")]
    NoPoints,

    /// The mesh has no triangles.
    #[error("mesh has no triangles")]
    NoTriangles,

    /// A triangle references a point that does not exist.
    #[error("triangle {face} references point {index}, but the mesh has {point_count} points")]
    IndexOutOfRange {
        /// Index of the offending triangle.
        face: usize,
        /// The out-of-range point index.
        index: u32,
        /// Number of points in the mesh.
        point_count: usize,
    },
}
