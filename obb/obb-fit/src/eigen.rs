//! Symmetric eigensolver for covariance matrices.
//!
//! Wraps nalgebra's `SymmetricEigen` with the guarantees the projector
//! relies on: ascending eigenvalue order, an orthonormal basis even for
//! repeated eigenvalues, and the identity basis for a zero matrix.

use nalgebra::{Matrix3, Point3, SymmetricEigen, Vector3};
use tracing::{debug, warn};

use crate::covariance::Covariance;
use crate::error::{FitError, FitResult};
use crate::params::FitParams;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Relative eigenvalue spread below which the basis is not unique.
const ISOTROPY_RATIO: f64 = 1e-9;

/// An orthonormal basis of principal axes.
///
/// `r`, `u` and `f` are the eigenvectors for the smallest, middle and
/// largest eigenvalue. The basis may be left-handed; the transform builder
/// corrects for that.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EigenBasis {
    /// Axis 0 (smallest eigenvalue).
    pub r: Vector3<f64>,
    /// Axis 1 (middle eigenvalue).
    pub u: Vector3<f64>,
    /// Axis 2 (largest eigenvalue).
    pub f: Vector3<f64>,
}

impl Default for EigenBasis {
    fn default() -> Self {
        Self::identity()
    }
}

impl EigenBasis {
    /// The world axes.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Vector3::x(), Vector3::y(), Vector3::z())
    }

    /// Create from three axes. No orthonormality check is performed.
    #[must_use]
    pub const fn new(r: Vector3<f64>, u: Vector3<f64>, f: Vector3<f64>) -> Self {
        Self { r, u, f }
    }

    /// Create from three roughly orthogonal vectors, cleaning them up with
    /// Gram-Schmidt.
    ///
    /// Each axis keeps its sign. A vector that collapses onto the previous
    /// ones is replaced: `u` by any unit vector orthogonal to `r`, `f` by
    /// `r × u`.
    #[must_use]
    pub fn orthonormalized(r: Vector3<f64>, u: Vector3<f64>, f: Vector3<f64>) -> Self {
        let r = r.try_normalize(f64::EPSILON).unwrap_or_else(Vector3::x);

        let u = (u - r * r.dot(&u))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| any_orthogonal(&r));

        let f = (f - r * r.dot(&f) - u * u.dot(&f))
            .try_normalize(f64::EPSILON)
            .unwrap_or_else(|| r.cross(&u));

        Self { r, u, f }
    }

    /// The axes in order `[r, u, f]`.
    #[must_use]
    pub const fn axes(&self) -> [Vector3<f64>; 3] {
        [self.r, self.u, self.f]
    }

    /// Matrix with `r`, `u`, `f` as rows (world to local).
    #[must_use]
    pub fn to_rows(&self) -> Matrix3<f64> {
        Matrix3::from_rows(&[self.r.transpose(), self.u.transpose(), self.f.transpose()])
    }

    /// Coordinates of a world point in this basis: `(r·p, u·p, f·p)`.
    #[must_use]
    pub fn to_local(&self, point: &Point3<f64>) -> Vector3<f64> {
        let p = &point.coords;
        Vector3::new(self.r.dot(p), self.u.dot(p), self.f.dot(p))
    }

    /// World vector for coordinates in this basis: `Rᵀ · local`.
    #[must_use]
    pub fn to_world(&self, local: &Vector3<f64>) -> Vector3<f64> {
        self.r * local.x + self.u * local.y + self.f * local.z
    }

    /// `(r × u) · f`: `+1` for a right-handed basis, `-1` for a mirrored one.
    #[must_use]
    pub fn handedness(&self) -> f64 {
        self.r.cross(&self.u).dot(&self.f)
    }

    /// Check unit length and pairwise orthogonality within `tolerance`.
    #[must_use]
    pub fn is_orthonormal(&self, tolerance: f64) -> bool {
        let is_unit = |a: &Vector3<f64>| (a.norm() - 1.0).abs() <= tolerance;
        let unit = self.axes().iter().all(is_unit);
        let orthogonal = self.r.dot(&self.u).abs() <= tolerance
            && self.r.dot(&self.f).abs() <= tolerance
            && self.u.dot(&self.f).abs() <= tolerance;
        unit && orthogonal
    }
}

/// Eigenvalues and matching eigenbasis of a covariance matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EigenDecomposition {
    /// Eigenvalues in ascending order.
    pub values: Vector3<f64>,
    /// Eigenvectors, `basis.r` ↔ `values[0]` and so on.
    pub basis: EigenBasis,
}

impl EigenDecomposition {
    /// Check whether the eigenvalues are (nearly) all equal, in which case
    /// any orthonormal basis is an eigenbasis.
    #[must_use]
    pub fn is_isotropic(&self) -> bool {
        let spread = self.values[2] - self.values[0];
        spread <= ISOTROPY_RATIO * self.values.amax().max(f64::MIN_POSITIVE)
    }
}

/// Solve the symmetric eigenproblem for a covariance matrix.
///
/// # Errors
///
/// Returns [`FitError::NonFinite`] if any entry is NaN or infinite.
pub fn solve_covariance(
    covariance: &Covariance,
    params: &FitParams,
) -> FitResult<EigenDecomposition> {
    solve(&covariance.to_matrix(), params)
}

/// Solve the symmetric eigenproblem for a 3x3 matrix.
///
/// Eigenvalues come back in ascending order; ties keep the relative order
/// of the underlying decomposition. Entries smaller than
/// `params.noise_floor` times the largest entry are zeroed first, so an
/// isotropic matrix with rounding dust in its off-diagonal entries still
/// yields the world axes. A zero matrix yields zero eigenvalues and the
/// identity basis.
///
/// # Errors
///
/// - [`FitError::NonFinite`] if any entry is NaN or infinite
/// - [`FitError::NotSymmetric`] if `|m[i][j] - m[j][i]|` exceeds
///   `params.symmetry_tolerance` times the largest entry
///
/// # Example
///
/// ```
/// use obb_fit::{solve, FitParams};
/// use nalgebra::Matrix3;
///
/// let m = Matrix3::new(
///     3.0, 0.0, 0.0,
///     0.0, 1.0, 0.0,
///     0.0, 0.0, 2.0,
/// );
/// let eig = solve(&m, &FitParams::default()).unwrap();
/// assert!((eig.values[0] - 1.0).abs() < 1e-12);
/// assert!((eig.values[2] - 3.0).abs() < 1e-12);
/// assert!(eig.basis.r.y.abs() > 0.999);
/// ```
pub fn solve(matrix: &Matrix3<f64>, params: &FitParams) -> FitResult<EigenDecomposition> {
    if matrix.iter().any(|v| !v.is_finite()) {
        return Err(FitError::NonFinite);
    }

    let scale = matrix.amax();
    if scale == 0.0 {
        debug!("Zero covariance, using identity basis");
        return Ok(EigenDecomposition {
            values: Vector3::zeros(),
            basis: EigenBasis::identity(),
        });
    }

    let asymmetry = (matrix - matrix.transpose()).amax();
    let tolerance = params.symmetry_tolerance * scale;
    if asymmetry > tolerance {
        return Err(FitError::NotSymmetric {
            asymmetry,
            tolerance,
        });
    }

    let floor = params.noise_floor * scale;
    let symmetric = (matrix + matrix.transpose()) * 0.5;
    let cleaned = symmetric.map(|v| if v.abs() < floor { 0.0 } else { v });

    let eigen = SymmetricEigen::new(cleaned);

    let mut order = [0_usize, 1, 2];
    order.sort_by(|&a, &b| eigen.eigenvalues[a].total_cmp(&eigen.eigenvalues[b]));

    let values = Vector3::new(
        eigen.eigenvalues[order[0]],
        eigen.eigenvalues[order[1]],
        eigen.eigenvalues[order[2]],
    );
    let basis = EigenBasis::orthonormalized(
        eigen.eigenvectors.column(order[0]).into_owned(),
        eigen.eigenvectors.column(order[1]).into_owned(),
        eigen.eigenvectors.column(order[2]).into_owned(),
    );

    let decomposition = EigenDecomposition { values, basis };
    if decomposition.is_isotropic() {
        warn!(
            eigenvalue = values[0],
            "Isotropic covariance, principal axes are not unique"
        );
    }
    debug!(
        smallest = values[0],
        middle = values[1],
        largest = values[2],
        "Solved covariance eigenproblem"
    );

    Ok(decomposition)
}

/// Any unit vector orthogonal to `v` (which must be unit length).
fn any_orthogonal(v: &Vector3<f64>) -> Vector3<f64> {
    // Cross with the world axis least aligned with v
    let axis = if v.x.abs() <= v.y.abs() && v.x.abs() <= v.z.abs() {
        Vector3::x()
    } else if v.y.abs() <= v.z.abs() {
        Vector3::y()
    } else {
        Vector3::z()
    };
    v.cross(&axis).normalize()
}
