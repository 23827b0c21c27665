//! Oriented bounding box fitting.
//!
//! Pipeline: moment estimator → covariance → eigenbasis → projection of the
//! mesh points → box frame → corners and affine transform.

use std::time::Instant;

use nalgebra::{Point3, Vector3};
use obb_types::{IndexedMesh, MeshSource};
use tracing::{info, warn};

use crate::covariance::Covariance;
use crate::eigen::{EigenBasis, solve_covariance};
use crate::error::FitResult;
use crate::hull::{ConvexHull, covariance_from_hull_with, default_hull};
use crate::moments::{covariance_from_points, covariance_from_triangles};
use crate::params::{FitMethod, FitParams};
use crate::project::{BoxFrame, derive_corners, project};
use crate::transform::{AffineTransform, build_matrix};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Quads of the box surface as corner indices, each wound consistently.
const BOX_QUADS: [[u32; 4]; 6] = [
    [0, 1, 3, 2],
    [2, 3, 5, 4],
    [4, 5, 7, 6],
    [6, 7, 1, 0],
    [1, 7, 5, 3],
    [6, 0, 2, 4],
];

/// An oriented bounding box fitted to a mesh.
///
/// Axes come from the eigenvectors of a covariance matrix, so the box is
/// aligned with the mesh's principal directions. It is tight along those
/// axes but not necessarily the minimum-volume box.
///
/// All values are computed once on construction.
///
/// # Example
///
/// ```
/// use obb_fit::{FitParams, OrientedBoundingBox};
/// use obb_types::unit_cube;
///
/// let obb = OrientedBoundingBox::fit(&unit_cube(), &FitParams::default()).unwrap();
/// assert!((obb.volume() - 1.0).abs() < 1e-6);
/// assert!((obb.width() - 1.0).abs() < 1e-6);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct OrientedBoundingBox {
    method: FitMethod,
    eigenvalues: Vector3<f64>,
    frame: BoxFrame,
    corners: [Point3<f64>; 8],
    matrix: AffineTransform,
}

impl OrientedBoundingBox {
    /// Fit a box using the estimator selected by `params.method`.
    ///
    /// [`FitMethod::Hull`] uses [`default_hull`].
    ///
    /// # Errors
    ///
    /// Propagates the errors of the selected estimator, the eigensolver,
    /// and the projector.
    pub fn fit<M: MeshSource + ?Sized>(mesh: &M, params: &FitParams) -> FitResult<Self> {
        Self::fit_with_hull(mesh, default_hull(), params)
    }

    /// Like [`OrientedBoundingBox::fit`], with an explicit hull strategy.
    ///
    /// # Errors
    ///
    /// See [`OrientedBoundingBox::fit`].
    pub fn fit_with_hull<M: MeshSource + ?Sized>(
        mesh: &M,
        hull: &dyn ConvexHull,
        params: &FitParams,
    ) -> FitResult<Self> {
        let start = Instant::now();

        let covariance = match params.method {
            FitMethod::Points => covariance_from_points(mesh.points(), params)?,
            FitMethod::Triangles => covariance_from_triangles(mesh, params)?,
            FitMethod::Hull => covariance_from_hull_with(mesh, hull, params)?,
        };
        let obb = Self::build(params.method, &covariance, mesh.points(), params)?;

        info!(
            method = params.method.name(),
            points = mesh.point_count(),
            triangles = mesh.triangle_count(),
            volume = obb.volume(),
            elapsed_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX),
            "Fitted oriented bounding box"
        );

        Ok(obb)
    }

    /// Fit a box from point moments. Triangles are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FitError::EmptyPoints`] if the mesh has no points.
    pub fn from_points<M: MeshSource + ?Sized>(mesh: &M) -> FitResult<Self> {
        Self::fit(mesh, &FitParams::with_method(FitMethod::Points))
    }

    /// Fit a box from area-weighted surface moments.
    ///
    /// # Errors
    ///
    /// See [`covariance_from_triangles`].
    pub fn from_triangles<M: MeshSource + ?Sized>(mesh: &M) -> FitResult<Self> {
        Self::fit(mesh, &FitParams::with_method(FitMethod::Triangles))
    }

    /// Fit a box from the surface moments of the mesh's convex hull, using
    /// the default hull strategy.
    ///
    /// The box extents are measured on the original mesh points.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FitError::HullUnavailable`] when built without the
    /// `hull` feature; see also [`covariance_from_hull_with`].
    pub fn from_hull<M: MeshSource + ?Sized>(mesh: &M) -> FitResult<Self> {
        Self::fit(mesh, &FitParams::with_method(FitMethod::Hull))
    }

    /// Fit a box from convex hull moments with an explicit hull strategy.
    ///
    /// # Errors
    ///
    /// See [`covariance_from_hull_with`].
    pub fn from_hull_with<M: MeshSource + ?Sized>(
        mesh: &M,
        hull: &dyn ConvexHull,
    ) -> FitResult<Self> {
        Self::fit_with_hull(mesh, hull, &FitParams::with_method(FitMethod::Hull))
    }

    /// Fit a box to `points` along the eigenvectors of a precomputed
    /// covariance matrix.
    ///
    /// # Errors
    ///
    /// Returns [`crate::FitError::NonFinite`] for a non-finite matrix or
    /// [`crate::FitError::EmptyPoints`] if `points` is empty.
    pub fn from_covariance(
        covariance: &Covariance,
        points: &[Point3<f64>],
        params: &FitParams,
    ) -> FitResult<Self> {
        Self::build(params.method, covariance, points, params)
    }

    fn build(
        method: FitMethod,
        covariance: &Covariance,
        points: &[Point3<f64>],
        params: &FitParams,
    ) -> FitResult<Self> {
        let eigen = solve_covariance(covariance, params)?;
        let frame = project(points, &eigen.basis, params.is_parallel(points.len()))?;

        if frame.half_extents.min() <= 0.0 {
            warn!(
                ex = frame.half_extents.x,
                ey = frame.half_extents.y,
                ez = frame.half_extents.z,
                "Box has zero volume"
            );
        }

        Ok(Self {
            method,
            eigenvalues: eigen.values,
            corners: derive_corners(&frame),
            matrix: build_matrix(&frame),
            frame,
        })
    }

    /// Estimator that produced the axes.
    #[must_use]
    pub const fn method(&self) -> FitMethod {
        self.method
    }

    /// Box axes `(r, u, f)`, smallest to largest eigenvalue.
    #[must_use]
    pub const fn basis(&self) -> &EigenBasis {
        &self.frame.basis
    }

    /// Covariance eigenvalues, ascending.
    #[must_use]
    pub const fn eigenvalues(&self) -> Vector3<f64> {
        self.eigenvalues
    }

    /// Basis, center and half extents.
    #[must_use]
    pub const fn frame(&self) -> &BoxFrame {
        &self.frame
    }

    /// Box center in world coordinates.
    #[must_use]
    pub const fn center(&self) -> Point3<f64> {
        self.frame.center
    }

    /// Half extents along `(r, u, f)`.
    #[must_use]
    pub const fn half_extents(&self) -> Vector3<f64> {
        self.frame.half_extents
    }

    /// Full extents along `(r, u, f)`.
    #[must_use]
    pub fn extents(&self) -> Vector3<f64> {
        self.frame.half_extents * 2.0
    }

    /// The eight corners; see [`derive_corners`] for the order.
    #[must_use]
    pub const fn corners(&self) -> &[Point3<f64>; 8] {
        &self.corners
    }

    /// Transform mapping the cube `[-0.5, 0.5]³` onto this box.
    #[must_use]
    pub const fn matrix(&self) -> &AffineTransform {
        &self.matrix
    }

    /// Distance from corner 0 to corner 1 (extent along `f`).
    #[must_use]
    pub fn width(&self) -> f64 {
        (self.corners[1] - self.corners[0]).norm()
    }

    /// Distance from corner 0 to corner 2 (extent along `r`).
    #[must_use]
    pub fn height(&self) -> f64 {
        (self.corners[2] - self.corners[0]).norm()
    }

    /// Distance from corner 0 to corner 6 (extent along `u`).
    #[must_use]
    pub fn depth(&self) -> f64 {
        (self.corners[6] - self.corners[0]).norm()
    }

    /// `width · height · depth`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.width() * self.height() * self.depth()
    }

    /// Total area of the six faces.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        let (w, h, d) = (self.width(), self.height(), self.depth());
        2.0 * w.mul_add(h, h.mul_add(d, d * w))
    }

    /// Check if a point is inside the box, allowing `tolerance` slack.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        self.frame.contains(point, tolerance)
    }

    /// The box as a closed triangle mesh with outward-facing normals.
    ///
    /// Vertex `i` is corner `i`.
    #[must_use]
    pub fn to_mesh(&self) -> IndexedMesh {
        let faces = BOX_QUADS
            .iter()
            .flat_map(|&[a, b, c, d]| [[a, b, c], [a, c, d]])
            .collect();
        let mut mesh = IndexedMesh::from_parts(self.corners.to_vec(), faces);
        if mesh.signed_volume() < 0.0 {
            mesh.flip_normals();
        }
        mesh
    }
}
