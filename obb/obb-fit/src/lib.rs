//! Oriented bounding boxes from covariance analysis.
//!
//! A mesh is reduced to a 3x3 covariance matrix by one of three moment
//! estimators, the matrix's eigenvectors become the box axes, and the mesh
//! points are projected onto those axes to find the tight extents.
//!
//! # Estimators
//!
//! - **Points** ([`covariance_from_points`]): every vertex counts once.
//!   Fast, but biased towards densely tessellated regions.
//! - **Triangles** ([`covariance_from_triangles`]): second moments
//!   integrated over the surface, weighted by triangle area.
//! - **Hull** ([`covariance_from_hull`]): the triangle estimator applied to
//!   the convex hull, which ignores interior and concave detail. Requires a
//!   [`ConvexHull`] strategy; the `hull` feature bundles one.
//!
//! # Outputs
//!
//! [`OrientedBoundingBox`] carries the basis, center, half extents, the
//! eight corners in a fixed order, and an [`AffineTransform`] that maps a
//! unit cube onto the box without reflecting it.
//!
//! # Example
//!
//! ```
//! use obb_fit::{FitMethod, FitParams, OrientedBoundingBox};
//! use obb_types::{box_mesh, Vector3};
//!
//! let mesh = box_mesh(Vector3::new(4.0, 2.0, 1.0));
//! let params = FitParams::with_method(FitMethod::Triangles);
//! let obb = OrientedBoundingBox::fit(&mesh, &params).unwrap();
//!
//! assert!((obb.volume() - 8.0).abs() < 1e-9);
//! assert!(obb.matrix().determinant() > 0.0);
//! ```
//!
//! # Parallelism
//!
//! Accumulation runs on the rayon pool once the element count reaches
//! [`FitParams::parallel_threshold`]. Use [`FitParams::precise`] for
//! bit-for-bit reproducible sequential sums.

// Safety: Deny unwrap/expect in library code. Tests may use them (workspace warns).
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod covariance;
mod eigen;
mod error;
mod hull;
mod moments;
mod obb;
mod params;
mod project;
mod reduce;
mod transform;

pub use covariance::Covariance;
pub use eigen::{EigenBasis, EigenDecomposition, solve, solve_covariance};
pub use error::{ErrorKind, FitError, FitResult};
#[cfg(feature = "hull")]
pub use hull::ParryHull;
pub use hull::{
    ConvexHull, HullFaces, UnavailableHull, covariance_from_hull, covariance_from_hull_with,
    default_hull,
};
pub use moments::{
    SurfaceMoments, covariance_from_points, covariance_from_triangles, surface_moments,
};
pub use obb::OrientedBoundingBox;
pub use params::{FitMethod, FitParams};
pub use project::{BoxFrame, CORNER_SIGNS, derive_corners, project};
pub use transform::{AffineTransform, build_matrix};
