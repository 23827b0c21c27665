//! Convex hull estimator.
//!
//! The hull is computed by a pluggable [`ConvexHull`] strategy and its faces
//! are fed to the triangle estimator. With the `hull` feature (on by
//! default) a strategy backed by parry3d is bundled; without it, the
//! default strategy reports [`FitError::HullUnavailable`].

use nalgebra::Point3;
use obb_types::{MeshRef, MeshSource};
use tracing::debug;

use crate::covariance::Covariance;
use crate::error::{FitError, FitResult};
use crate::moments::covariance_from_triangles;
use crate::params::FitParams;

/// Triangulated surface of a convex hull.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HullFaces {
    /// Hull vertices.
    pub points: Vec<Point3<f64>>,
    /// Hull triangles, indexing into `points`.
    pub faces: Vec<[u32; 3]>,
}

impl HullFaces {
    /// Unshare vertices: three fresh points per face, indexed sequentially.
    ///
    /// Strategies may return shared or unshared vertices; the flattened form
    /// is the same either way.
    ///
    /// # Panics
    ///
    /// Panics if a face index is out of range; call
    /// [`MeshSource::validate`] first.
    #[must_use]
    pub fn flattened(&self) -> Self {
        let points: Vec<Point3<f64>> = self
            .faces
            .iter()
            .flat_map(|face| face.map(|i| self.points[i as usize]))
            .collect();
        #[allow(clippy::cast_possible_truncation)]
        let faces = (0..self.faces.len() as u32)
            .map(|f| [3 * f, 3 * f + 1, 3 * f + 2])
            .collect();
        Self { points, faces }
    }
}

impl MeshSource for HullFaces {
    fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    fn triangles(&self) -> &[[u32; 3]] {
        &self.faces
    }
}

/// A convex hull algorithm.
///
/// Implementations must return triangles that together cover the hull
/// boundary; orientation and vertex sharing do not matter.
pub trait ConvexHull: Sync {
    /// Short name, used in logs and errors.
    fn name(&self) -> &str;

    /// Whether the strategy can run at all in this build.
    fn is_available(&self) -> bool {
        true
    }

    /// Compute the hull of a point set.
    ///
    /// # Errors
    ///
    /// Returns [`FitError::HullFailed`] if the points are degenerate (fewer
    /// than four, coplanar, or collinear) or the algorithm breaks down.
    fn convex_hull(&self, points: &[Point3<f64>]) -> FitResult<HullFaces>;
}

/// Strategy used when no convex hull algorithm is compiled in.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnavailableHull;

impl ConvexHull for UnavailableHull {
    fn name(&self) -> &'static str {
        "unavailable"
    }

    fn is_available(&self) -> bool {
        false
    }

    fn convex_hull(&self, _points: &[Point3<f64>]) -> FitResult<HullFaces> {
        Err(FitError::hull_unavailable(
            "built without the `hull` feature and no strategy was supplied",
        ))
    }
}

/// Convex hull via parry3d's quickhull.
#[cfg(feature = "hull")]
#[derive(Debug, Clone, Copy, Default)]
pub struct ParryHull;

#[cfg(feature = "hull")]
impl ConvexHull for ParryHull {
    fn name(&self) -> &'static str {
        "parry"
    }

    fn convex_hull(&self, points: &[Point3<f64>]) -> FitResult<HullFaces> {
        use parry3d_f64::math::Point;

        if points.len() < 4 {
            return Err(FitError::hull_failed(format!(
                "need at least 4 points, got {}",
                points.len()
            )));
        }

        let input: Vec<Point<f64>> = points.iter().map(|p| Point::new(p.x, p.y, p.z)).collect();
        let (vertices, faces) = parry3d_f64::transformation::try_convex_hull(&input)
            .map_err(|e| FitError::hull_failed(format!("{e:?}")))?;

        if faces.is_empty() {
            return Err(FitError::hull_failed("hull has no faces"));
        }

        Ok(HullFaces {
            points: vertices
                .iter()
                .map(|p| Point3::new(p.x, p.y, p.z))
                .collect(),
            faces,
        })
    }
}

/// The strategy used by [`covariance_from_hull`] and
/// `OrientedBoundingBox::from_hull`.
#[must_use]
pub fn default_hull() -> &'static dyn ConvexHull {
    #[cfg(feature = "hull")]
    {
        &ParryHull
    }
    #[cfg(not(feature = "hull"))]
    {
        &UnavailableHull
    }
}

/// Compute the surface covariance of a mesh's convex hull using the
/// default strategy.
///
/// # Errors
///
/// See [`covariance_from_hull_with`].
pub fn covariance_from_hull<M: MeshSource + ?Sized>(
    mesh: &M,
    params: &FitParams,
) -> FitResult<Covariance> {
    covariance_from_hull_with(mesh, default_hull(), params)
}

/// Compute the surface covariance of a mesh's convex hull.
///
/// Only the mesh points are used; its triangles are ignored.
///
/// # Errors
///
/// - [`FitError::HullUnavailable`] if the strategy cannot run
/// - [`FitError::EmptyPoints`] if the mesh has no points
/// - [`FitError::HullFailed`] if the hull cannot be built, or the strategy
///   returns faces with out-of-range indices
/// - [`FitError::ZeroSurfaceArea`] if every hull face is degenerate
pub fn covariance_from_hull_with<M: MeshSource + ?Sized>(
    mesh: &M,
    hull: &dyn ConvexHull,
    params: &FitParams,
) -> FitResult<Covariance> {
    if !hull.is_available() {
        return Err(FitError::hull_unavailable(format!(
            "strategy `{}` is not available",
            hull.name()
        )));
    }

    let points = mesh.points();
    if points.is_empty() {
        return Err(FitError::EmptyPoints);
    }

    let faces = hull.convex_hull(points)?;
    if let Err(e) = faces.validate() {
        let details = format!("{} returned invalid faces: {e}", hull.name());
        return Err(FitError::hull_failed(details));
    }
    let faces = faces.flattened();

    debug!(
        strategy = hull.name(),
        input_points = points.len(),
        hull_faces = faces.faces.len(),
        "Built convex hull"
    );

    covariance_from_triangles(&MeshRef::new(&faces.points, &faces.faces), params)
}
