//! Oriented bounding boxes for triangle meshes.
//!
//! This umbrella crate re-exports the obb-* crates behind a single
//! dependency:
//!
//! - [`types`] - Mesh data model: `IndexedMesh`, `MeshRef`, `MeshSource`
//! - [`fit`] - Moment estimators, eigensolver, projection, transforms
//!
//! # Quick Start
//!
//! ```
//! use obb::prelude::*;
//!
//! let mut mesh = box_mesh(Vector3::new(4.0, 2.0, 1.0));
//! mesh.translate(Vector3::new(-2.0, -1.0, -0.5));
//!
//! let obb = OrientedBoundingBox::fit(&mesh, &FitParams::with_method(FitMethod::Triangles))
//!     .unwrap();
//!
//! assert!((obb.volume() - 8.0).abs() < 1e-9);
//! assert!(obb.center().coords.norm() < 1e-9);
//!
//! // Place a unit cube over the box
//! let matrix: [f64; 16] = (*obb.matrix()).into();
//! assert!((matrix[15] - 1.0).abs() < f64::EPSILON);
//! ```
//!
//! # Feature Flags
//!
//! - `hull` (default) - Bundled convex hull strategy backed by parry3d
//! - `serde` - Serialization for meshes, parameters and fitted boxes

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]

// =============================================================================
// Re-exports
// =============================================================================

/// Mesh data model.
pub use obb_types as types;

/// Bounding box fitting.
pub use obb_fit as fit;

// =============================================================================
// Prelude
// =============================================================================

/// Common imports for bounding box fitting.
///
/// # Usage
///
/// ```
/// use obb::prelude::*;
/// ```
pub mod prelude {
    // Mesh model
    pub use obb_types::{
        IndexedMesh, MeshRef, MeshSource, Point3, Triangle, Vector3, box_mesh, unit_cube,
    };

    // Fitting
    pub use obb_fit::{
        AffineTransform, ConvexHull, ErrorKind, FitError, FitMethod, FitParams, FitResult,
        OrientedBoundingBox,
    };
}
