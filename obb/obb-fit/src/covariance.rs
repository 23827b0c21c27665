//! Symmetric 3x3 covariance matrix.

use std::ops::{Add, AddAssign, Div, Mul, Sub};

use nalgebra::{Matrix3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A symmetric 3x3 matrix of second moments.
///
/// Only the six independent entries are stored, so the matrix is symmetric
/// by construction.
///
/// # Example
///
/// ```
/// use obb_fit::Covariance;
///
/// let c = Covariance::new(2.0, 0.5, 0.0, 1.0, 0.0, 3.0);
/// let m = c.to_matrix();
/// assert_eq!(m[(0, 1)], m[(1, 0)]);
/// assert!((c.trace() - 6.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Covariance {
    /// Row 0, column 0.
    pub xx: f64,
    /// Rows 0/1, columns 1/0.
    pub xy: f64,
    /// Rows 0/2, columns 2/0.
    pub xz: f64,
    /// Row 1, column 1.
    pub yy: f64,
    /// Rows 1/2, columns 2/1.
    pub yz: f64,
    /// Row 2, column 2.
    pub zz: f64,
}

impl Covariance {
    /// The zero matrix.
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0, 0.0, 0.0, 0.0);

    /// Create from the six independent entries.
    #[inline]
    #[must_use]
    pub const fn new(xx: f64, xy: f64, xz: f64, yy: f64, yz: f64, zz: f64) -> Self {
        Self {
            xx,
            xy,
            xz,
            yy,
            yz,
            zz,
        }
    }

    /// Symmetric outer product `a bᵀ` restricted to the upper triangle.
    ///
    /// For `a == b` this is exactly `a aᵀ`.
    #[inline]
    #[must_use]
    pub fn outer(a: &Vector3<f64>, b: &Vector3<f64>) -> Self {
        Self::new(
            a.x * b.x,
            a.x * b.y,
            a.x * b.z,
            a.y * b.y,
            a.y * b.z,
            a.z * b.z,
        )
    }

    /// Build from the upper triangle of a full matrix.
    ///
    /// The lower triangle is ignored; check symmetry first if it matters.
    #[must_use]
    pub fn from_upper(m: &Matrix3<f64>) -> Self {
        Self::new(
            m[(0, 0)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 1)],
            m[(1, 2)],
            m[(2, 2)],
        )
    }

    /// Expand into a full symmetric matrix.
    #[must_use]
    pub fn to_matrix(&self) -> Matrix3<f64> {
        Matrix3::new(
            self.xx, self.xy, self.xz, //
            self.xy, self.yy, self.yz, //
            self.xz, self.yz, self.zz,
        )
    }

    /// Sum of the diagonal.
    #[inline]
    #[must_use]
    pub fn trace(&self) -> f64 {
        self.xx + self.yy + self.zz
    }

    /// Largest absolute entry.
    #[must_use]
    pub fn max_abs(&self) -> f64 {
        let entries = self.entries();
        entries.iter().fold(0.0_f64, |acc, v| acc.max(v.abs()))
    }

    /// Check that no entry is NaN or infinite.
    #[must_use]
    pub fn is_finite(&self) -> bool {
        self.entries().iter().all(|v| v.is_finite())
    }

    const fn entries(&self) -> [f64; 6] {
        [self.xx, self.xy, self.xz, self.yy, self.yz, self.zz]
    }
}

impl From<Covariance> for Matrix3<f64> {
    fn from(c: Covariance) -> Self {
        c.to_matrix()
    }
}

impl Add for Covariance {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.xx + rhs.xx,
            self.xy + rhs.xy,
            self.xz + rhs.xz,
            self.yy + rhs.yy,
            self.yz + rhs.yz,
            self.zz + rhs.zz,
        )
    }
}

impl AddAssign for Covariance {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl Sub for Covariance {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.xx - rhs.xx,
            self.xy - rhs.xy,
            self.xz - rhs.xz,
            self.yy - rhs.yy,
            self.yz - rhs.yz,
            self.zz - rhs.zz,
        )
    }
}

impl Mul<f64> for Covariance {
    type Output = Self;

    fn mul(self, s: f64) -> Self {
        Self::new(
            self.xx * s,
            self.xy * s,
            self.xz * s,
            self.yy * s,
            self.yz * s,
            self.zz * s,
        )
    }
}

impl Div<f64> for Covariance {
    type Output = Self;

    fn div(self, s: f64) -> Self {
        Self::new(
            self.xx / s,
            self.xy / s,
            self.xz / s,
            self.yy / s,
            self.yz / s,
            self.zz / s,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn matrix_is_symmetric() {
        let c = Covariance::new(1.0, 2.0, 3.0, 4.0, 5.0, 6.0);
        let m = c.to_matrix();
        assert_eq!(m, m.transpose());
        assert_eq!(Covariance::from_upper(&m), c);
    }

    #[test]
    fn outer_matches_nalgebra() {
        let a = Vector3::new(1.0, -2.0, 0.5);
        let expected = a * a.transpose();
        let c = Covariance::outer(&a, &a);
        assert_relative_eq!(c.to_matrix(), expected, epsilon = 1e-15);
    }

    #[test]
    fn arithmetic() {
        let a = Covariance::new(1.0, 1.0, 1.0, 1.0, 1.0, 1.0);
        let b = a * 3.0 - a;
        assert_relative_eq!(b.xx, 2.0);
        assert_relative_eq!((b / 2.0).zz, 1.0);

        let mut acc = Covariance::ZERO;
        acc += a;
        acc += a;
        assert_relative_eq!(acc.yz, 2.0);
    }

    #[test]
    fn max_abs_and_finite() {
        let c = Covariance::new(1.0, -7.0, 0.0, 2.0, 0.0, 3.0);
        assert_relative_eq!(c.max_abs(), 7.0);
        assert!(c.is_finite());

        let bad = Covariance::new(f64::NAN, 0.0, 0.0, 0.0, 0.0, 0.0);
        assert!(!bad.is_finite());
    }
}
