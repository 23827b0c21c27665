//! Affine transform that maps a unit cube onto a fitted box.

use nalgebra::{Matrix3, Matrix4, Point3, Vector3};
use tracing::debug;

use crate::project::BoxFrame;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A 4x4 affine matrix stored as 16 values in row-major order.
///
/// Uses the row-vector convention: a point transforms as `[x y z 1] · M`,
/// so rows 0 to 2 are the scaled axes and row 3 holds the translation.
///
/// # Example
///
/// ```
/// use obb_fit::AffineTransform;
/// use obb_types::Point3;
///
/// let t = AffineTransform::IDENTITY;
/// assert_eq!(t.transform_point(&Point3::new(1.0, 2.0, 3.0)), Point3::new(1.0, 2.0, 3.0));
/// assert!((t.determinant() - 1.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AffineTransform(pub [f64; 16]);

impl Default for AffineTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl AffineTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self([
        1.0, 0.0, 0.0, 0.0, //
        0.0, 1.0, 0.0, 0.0, //
        0.0, 0.0, 1.0, 0.0, //
        0.0, 0.0, 0.0, 1.0,
    ]);

    /// Assemble from three axis rows and a translation row.
    #[must_use]
    pub fn from_rows(
        x: Vector3<f64>,
        y: Vector3<f64>,
        z: Vector3<f64>,
        translation: Vector3<f64>,
    ) -> Self {
        Self([
            x.x,
            x.y,
            x.z,
            0.0,
            y.x,
            y.y,
            y.z,
            0.0,
            z.x,
            z.y,
            z.z,
            0.0,
            translation.x,
            translation.y,
            translation.z,
            1.0,
        ])
    }

    /// The 16 values, row-major.
    #[must_use]
    pub const fn as_array(&self) -> &[f64; 16] {
        &self.0
    }

    /// Row `i` (0 to 3).
    ///
    /// # Panics
    ///
    /// Panics if `i > 3`.
    #[must_use]
    pub fn row(&self, i: usize) -> [f64; 4] {
        let start = i * 4;
        [
            self.0[start],
            self.0[start + 1],
            self.0[start + 2],
            self.0[start + 3],
        ]
    }

    /// Convert to an nalgebra matrix with the same row layout.
    #[must_use]
    pub fn to_matrix4(&self) -> Matrix4<f64> {
        Matrix4::from_row_slice(&self.0)
    }

    /// The upper-left 3x3 block (scaled axes as rows).
    #[must_use]
    pub fn linear(&self) -> Matrix3<f64> {
        self.to_matrix4().fixed_view::<3, 3>(0, 0).into_owned()
    }

    /// Determinant of the full 4x4 matrix.
    #[must_use]
    pub fn determinant(&self) -> f64 {
        self.to_matrix4().determinant()
    }

    /// Translation component (row 3).
    #[must_use]
    pub fn translation(&self) -> Vector3<f64> {
        Vector3::new(self.0[12], self.0[13], self.0[14])
    }

    /// Transform a point: `[x y z 1] · M`.
    #[must_use]
    pub fn transform_point(&self, point: &Point3<f64>) -> Point3<f64> {
        let p = &point.coords;
        let axis = |i: usize| Vector3::new(self.0[i * 4], self.0[i * 4 + 1], self.0[i * 4 + 2]);
        Point3::from(axis(0) * p.x + axis(1) * p.y + axis(2) * p.z + self.translation())
    }
}

impl From<AffineTransform> for Matrix4<f64> {
    fn from(t: AffineTransform) -> Self {
        t.to_matrix4()
    }
}

impl From<AffineTransform> for [f64; 16] {
    fn from(t: AffineTransform) -> Self {
        t.0
    }
}

/// Build the transform that maps the cube `[-0.5, 0.5]³` onto the box.
///
/// Rows are `2·ey·u`, `2·ez·f`, `2·ex·r` and `(center, 1)`. When the basis
/// is mirrored the determinant comes out negative; the linear part of row 2
/// is then negated so the result never reflects.
#[must_use]
pub fn build_matrix(frame: &BoxFrame) -> AffineTransform {
    let BoxFrame {
        basis,
        center,
        half_extents: e,
    } = *frame;

    let mut transform = AffineTransform::from_rows(
        basis.u * (2.0 * e.y),
        basis.f * (2.0 * e.z),
        basis.r * (2.0 * e.x),
        center.coords,
    );

    let det = transform.determinant();
    if det < 0.0 {
        debug!(det, "Mirrored basis, negating row 2");
        for v in &mut transform.0[8..=10] {
            *v = -*v;
        }
    }

    transform
}
