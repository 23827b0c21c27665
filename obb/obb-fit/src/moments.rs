//! Moment estimators: reduce a mesh to a covariance matrix.
//!
//! Two weighting policies are implemented here:
//!
//! - **Points**: every vertex counts once, regardless of tessellation.
//! - **Triangles**: second moments are integrated over the surface, so
//!   densely tessellated regions do not bias the result.
//!
//! The convex hull estimator reuses the triangle estimator on hull faces.

// Counts are converted to f64 for averaging
#![allow(clippy::cast_precision_loss)]
// Algorithm uses standard mathematical variable names
#![allow(clippy::many_single_char_names)]

use std::ops::Add;

use nalgebra::{Point3, Vector3};
use obb_types::{MeshSource, Triangle};
use tracing::debug;

use crate::covariance::Covariance;
use crate::error::{FitError, FitResult};
use crate::params::FitParams;
use crate::reduce::map_reduce;

/// Compute the point-moment covariance of a point cloud.
///
/// With mean `μ`, accumulates `Σ (p − μ)(p − μ)ᵀ` over all points, which
/// equals `Σ (p pᵀ − μ μᵀ)` without cancelling large raw moments on meshes
/// far from the origin. The result is `N` times the population covariance;
/// the count is not divided out because the eigenvectors do not depend on
/// scale.
///
/// # Errors
///
/// Returns [`FitError::EmptyPoints`] if `points` is empty.
///
/// # Example
///
/// ```
/// use obb_fit::{covariance_from_points, FitParams};
/// use obb_types::Point3;
///
/// let points = [
///     Point3::new(-1.0, 0.0, 0.0),
///     Point3::new(1.0, 0.0, 0.0),
/// ];
/// let c = covariance_from_points(&points, &FitParams::default()).unwrap();
/// assert!((c.xx - 2.0).abs() < 1e-12);
/// assert!(c.yy.abs() < 1e-12);
/// ```
pub fn covariance_from_points(points: &[Point3<f64>], params: &FitParams) -> FitResult<Covariance> {
    if points.is_empty() {
        return Err(FitError::EmptyPoints);
    }

    let parallel = params.is_parallel(points.len());
    let sum = map_reduce(
        points,
        parallel,
        Vector3::<f64>::zeros,
        |p| p.coords,
        |a, b| a + b,
    );
    let mean = sum / points.len() as f64;

    let covariance = map_reduce(
        points,
        parallel,
        || Covariance::ZERO,
        |p| {
            let d = p.coords - mean;
            Covariance::outer(&d, &d)
        },
        Add::add,
    );

    debug!(
        points = points.len(),
        parallel,
        trace = covariance.trace(),
        "Accumulated point moments"
    );

    Ok(covariance)
}

/// Area-weighted first and second moments of a set of triangles, taken
/// about a reference point.
///
/// Partial sums about the same reference combine with `+`, so triangles can
/// be accumulated in any order or split across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceMoments {
    /// Reference point the moments are taken about.
    pub origin: Point3<f64>,
    /// Total area.
    pub area: f64,
    /// Sum of `centroid * area`, relative to `origin`.
    pub weighted_centroid: Vector3<f64>,
    /// Sum of `(9 m mᵀ + p pᵀ + q qᵀ + r rᵀ) * area / 12`, relative to
    /// `origin`.
    pub second: Covariance,
    /// Number of zero-area triangles seen.
    pub degenerate: usize,
}

impl Default for SurfaceMoments {
    fn default() -> Self {
        Self::about(Point3::origin())
    }
}

impl SurfaceMoments {
    /// Empty moments about `origin`.
    #[must_use]
    pub fn about(origin: Point3<f64>) -> Self {
        Self {
            origin,
            area: 0.0,
            weighted_centroid: Vector3::zeros(),
            second: Covariance::ZERO,
            degenerate: 0,
        }
    }

    /// Contribution of a single triangle, about `origin`.
    ///
    /// Degenerate triangles have zero area and contribute nothing but their
    /// count.
    #[must_use]
    pub fn of_triangle(tri: &Triangle, origin: &Point3<f64>) -> Self {
        let [p, q, r] = tri.vertices().map(|v| v - *origin);
        let local = Triangle::new(Point3::from(p), Point3::from(q), Point3::from(r));
        let area = local.area();
        let m = local.centroid().coords;

        let second = (Covariance::outer(&m, &m) * 9.0
            + Covariance::outer(&p, &p)
            + Covariance::outer(&q, &q)
            + Covariance::outer(&r, &r))
            * (area / 12.0);

        Self {
            origin: *origin,
            area,
            weighted_centroid: m * area,
            second,
            degenerate: usize::from(local.is_degenerate(f64::MIN_POSITIVE)),
        }
    }

    /// Area-weighted mean of the surface, in world coordinates.
    ///
    /// Returns `None` if the total area is zero.
    #[must_use]
    pub fn centroid(&self) -> Option<Point3<f64>> {
        (self.area > 0.0).then(|| self.origin + self.weighted_centroid / self.area)
    }

    /// Divide by the total area and subtract the mean outer product.
    ///
    /// The result is a central moment, so it does not depend on `origin`.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::ZeroSurfaceArea`] if the total area is zero, or
    /// [`FitError::NonFinite`] if the result is not finite.
    pub fn covariance(&self, triangles: usize) -> FitResult<Covariance> {
        if self.area.is_nan() || self.area <= 0.0 {
            return Err(FitError::ZeroSurfaceArea { triangles });
        }

        let mu = self.weighted_centroid / self.area;
        let covariance = self.second / self.area - Covariance::outer(&mu, &mu);
        if !covariance.is_finite() {
            return Err(FitError::NonFinite);
        }
        Ok(covariance)
    }
}

impl Add for SurfaceMoments {
    type Output = Self;

    /// Both operands must share an `origin`; the left one is kept.
    fn add(self, rhs: Self) -> Self {
        Self {
            origin: self.origin,
            area: self.area + rhs.area,
            weighted_centroid: self.weighted_centroid + rhs.weighted_centroid,
            second: self.second + rhs.second,
            degenerate: self.degenerate + rhs.degenerate,
        }
    }
}

/// Accumulate the surface moments of every triangle of a mesh.
///
/// Moments are taken about the first vertex of the first triangle, which
/// keeps the raw sums small for meshes placed far from the world origin.
///
/// # Errors
///
/// Returns [`FitError::EmptyTriangles`] if the mesh has no triangles, or
/// [`FitError::Mesh`] if a triangle index is out of range.
pub fn surface_moments<M: MeshSource + ?Sized>(
    mesh: &M,
    params: &FitParams,
) -> FitResult<SurfaceMoments> {
    let triangles = mesh.triangles();
    if triangles.is_empty() {
        return Err(FitError::EmptyTriangles);
    }
    mesh.validate()?;

    let points = mesh.points();
    let origin = points[triangles[0][0] as usize];
    let resolve = |&[a, b, c]: &[u32; 3]| {
        Triangle::new(points[a as usize], points[b as usize], points[c as usize])
    };

    Ok(map_reduce(
        triangles,
        params.is_parallel(triangles.len()),
        || SurfaceMoments::about(origin),
        |face| SurfaceMoments::of_triangle(&resolve(face), &origin),
        Add::add,
    ))
}

/// Compute the area-weighted surface covariance of a triangle mesh.
///
/// Each triangle contributes its exact second moment (centroid term plus
/// vertex terms, weighted by `area / 12`). The totals are divided by the
/// surface area once, after all triangles are combined.
///
/// # Errors
///
/// - [`FitError::EmptyTriangles`] if the mesh has no triangles
/// - [`FitError::Mesh`] if a triangle index is out of range
/// - [`FitError::ZeroSurfaceArea`] if every triangle is degenerate
///
/// # Example
///
/// ```
/// use obb_fit::{covariance_from_triangles, FitParams};
/// use obb_types::unit_cube;
///
/// let c = covariance_from_triangles(&unit_cube(), &FitParams::default()).unwrap();
/// assert!((c.xx - c.yy).abs() < 1e-12);
/// assert!((c.yy - c.zz).abs() < 1e-12);
/// ```
pub fn covariance_from_triangles<M: MeshSource + ?Sized>(
    mesh: &M,
    params: &FitParams,
) -> FitResult<Covariance> {
    let moments = surface_moments(mesh, params)?;
    let covariance = moments.covariance(mesh.triangle_count())?;

    debug!(
        triangles = mesh.triangle_count(),
        degenerate = moments.degenerate,
        area = moments.area,
        trace = covariance.trace(),
        "Accumulated surface moments"
    );

    Ok(covariance)
}
