//! Project points onto a basis and derive the box frame and corners.

use nalgebra::{Point3, Vector3};
use tracing::debug;

use crate::eigen::EigenBasis;
use crate::error::{FitError, FitResult};
use crate::reduce::map_reduce;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Sign pattern of each corner along `(r, u, f)`.
///
/// Corner `i` sits at `center + sr·ex·r + su·ey·u + sf·ez·f`.
pub const CORNER_SIGNS: [[f64; 3]; 8] = [
    [-1.0, 1.0, 1.0],
    [-1.0, 1.0, -1.0],
    [1.0, 1.0, 1.0],
    [1.0, 1.0, -1.0],
    [1.0, -1.0, 1.0],
    [1.0, -1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [-1.0, -1.0, -1.0],
];

/// An oriented box: axes, world center, and half extents along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct BoxFrame {
    /// Box axes.
    pub basis: EigenBasis,
    /// Box center in world coordinates.
    pub center: Point3<f64>,
    /// Half extents `(ex, ey, ez)` along `(r, u, f)`. Never negative.
    pub half_extents: Vector3<f64>,
}

impl BoxFrame {
    /// Box volume, `8 · ex · ey · ez`.
    #[must_use]
    pub fn volume(&self) -> f64 {
        8.0 * self.half_extents.x * self.half_extents.y * self.half_extents.z
    }

    /// The eight corners, in [`CORNER_SIGNS`] order.
    #[must_use]
    pub fn corners(&self) -> [Point3<f64>; 8] {
        derive_corners(self)
    }

    /// Check whether a world point lies inside the box, with slack
    /// `tolerance` on every side.
    #[must_use]
    pub fn contains(&self, point: &Point3<f64>, tolerance: f64) -> bool {
        let local = self.basis.to_local(&Point3::from(point - self.center));
        (0..3).all(|i| local[i].abs() <= self.half_extents[i] + tolerance)
    }
}

/// Bounding interval of a point set in basis coordinates.
#[derive(Debug, Clone, Copy)]
struct Bounds {
    min: Vector3<f64>,
    max: Vector3<f64>,
}

impl Bounds {
    fn empty() -> Self {
        Self {
            min: Vector3::repeat(f64::INFINITY),
            max: Vector3::repeat(f64::NEG_INFINITY),
        }
    }

    fn point(v: Vector3<f64>) -> Self {
        Self { min: v, max: v }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            min: self.min.inf(&other.min),
            max: self.max.sup(&other.max),
        }
    }
}

/// Project every point onto `basis` and take the tight interval per axis.
///
/// With `p' = (r·p, u·p, f·p)`, the box center in basis coordinates is the
/// interval midpoint; it is mapped back to world space through the basis.
///
/// # Errors
///
/// Returns [`FitError::EmptyPoints`] if `points` is empty, or
/// [`FitError::NonFinite`] if a projected coordinate is NaN.
///
/// # Example
///
/// ```
/// use obb_fit::{project, EigenBasis};
/// use obb_types::Point3;
///
/// let points = [Point3::new(0.0, 0.0, 0.0), Point3::new(2.0, 4.0, 6.0)];
/// let frame = project(&points, &EigenBasis::identity(), false).unwrap();
/// assert_eq!(frame.center, Point3::new(1.0, 2.0, 3.0));
/// assert_eq!(frame.half_extents.z, 3.0);
/// ```
pub fn project(points: &[Point3<f64>], basis: &EigenBasis, parallel: bool) -> FitResult<BoxFrame> {
    if points.is_empty() {
        return Err(FitError::EmptyPoints);
    }

    let bounds = map_reduce(
        points,
        parallel,
        Bounds::empty,
        |p| Bounds::point(basis.to_local(p)),
        Bounds::merge,
    );

    if bounds.min.iter().any(|v| v.is_nan()) || bounds.max.iter().any(|v| v.is_nan()) {
        return Err(FitError::NonFinite);
    }

    let local_center = (bounds.min + bounds.max) * 0.5;
    let half_extents = (bounds.max - bounds.min) * 0.5;
    let center = Point3::from(basis.to_world(&local_center));

    debug!(
        points = points.len(),
        ex = half_extents.x,
        ey = half_extents.y,
        ez = half_extents.z,
        "Projected points onto principal axes"
    );

    Ok(BoxFrame {
        basis: *basis,
        center,
        half_extents,
    })
}

/// The eight corners of a box frame.
///
/// Order, as signs along `(r, u, f)`:
///
/// | corner | r | u | f |
/// |--------|---|---|---|
/// | 0      | − | + | + |
/// | 1      | − | + | − |
/// | 2      | + | + | + |
/// | 3      | + | + | − |
/// | 4      | + | − | + |
/// | 5      | + | − | − |
/// | 6      | − | − | + |
/// | 7      | − | − | − |
///
/// So `|c1 − c0| = 2·ez`, `|c2 − c0| = 2·ex`, `|c6 − c0| = 2·ey`.
#[must_use]
pub fn derive_corners(frame: &BoxFrame) -> [Point3<f64>; 8] {
    let e = frame.half_extents;
    let center = frame.center;
    let r = frame.basis.r * e.x;
    let u = frame.basis.u * e.y;
    let f = frame.basis.f * e.z;

    CORNER_SIGNS.map(|[sr, su, sf]| center + r * sr + u * su + f * sf)
}
