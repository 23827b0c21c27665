//! Parameters for bounding box fitting.

use crate::error::FitError;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which moment estimator feeds the eigensolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum FitMethod {
    /// Point moments: every vertex counts equally.
    #[default]
    Points,
    /// Area-weighted surface moments over the mesh triangles.
    Triangles,
    /// Area-weighted surface moments over the convex hull faces.
    Hull,
}

impl FitMethod {
    /// Short lowercase name, used in logs.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Points => "points",
            Self::Triangles => "triangles",
            Self::Hull => "hull",
        }
    }
}

impl TryFrom<u8> for FitMethod {
    type Error = FitError;

    /// Map the integer selectors `0` (points), `1` (triangles), `2` (hull).
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::Points),
            1 => Ok(Self::Triangles),
            2 => Ok(Self::Hull),
            other => Err(FitError::UnsupportedMethod(other)),
        }
    }
}

/// Parameters for fitting an oriented bounding box.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct FitParams {
    /// Moment estimator. Default: [`FitMethod::Points`]
    pub method: FitMethod,

    /// Largest allowed `|m[i][j] - m[j][i]|`, relative to the largest matrix
    /// entry, before the eigensolver rejects its input. Default: 1e-9
    pub symmetry_tolerance: f64,

    /// Matrix entries smaller than this fraction of the largest entry are
    /// treated as zero before decomposition. Default: 1e-12
    pub noise_floor: f64,

    /// Element count (points or triangles) from which accumulation runs on
    /// the rayon pool. Default: 65536
    pub parallel_threshold: usize,
}

impl Default for FitParams {
    fn default() -> Self {
        Self {
            method: FitMethod::Points,
            symmetry_tolerance: 1e-9,
            noise_floor: 1e-12,
            parallel_threshold: 65_536,
        }
    }
}

impl FitParams {
    /// Create params for a specific estimator.
    #[must_use]
    pub fn with_method(method: FitMethod) -> Self {
        Self {
            method,
            ..Default::default()
        }
    }

    /// Sequential accumulation only; results are bit-for-bit reproducible.
    #[must_use]
    pub fn precise() -> Self {
        Self {
            parallel_threshold: usize::MAX,
            ..Default::default()
        }
    }

    /// Go parallel early, for large scan meshes.
    #[must_use]
    pub fn fast() -> Self {
        Self {
            parallel_threshold: 8_192,
            ..Default::default()
        }
    }

    /// Set the estimator.
    #[must_use]
    pub const fn with_estimator(mut self, method: FitMethod) -> Self {
        self.method = method;
        self
    }

    /// Set the parallel threshold.
    #[must_use]
    pub const fn with_parallel_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Set the symmetry tolerance.
    #[must_use]
    pub const fn with_symmetry_tolerance(mut self, tolerance: f64) -> Self {
        self.symmetry_tolerance = tolerance;
        self
    }

    /// Set the noise floor.
    #[must_use]
    pub const fn with_noise_floor(mut self, floor: f64) -> Self {
        self.noise_floor = floor;
        self
    }

    /// Whether `count` elements should be reduced in parallel.
    #[must_use]
    pub const fn is_parallel(&self, count: usize) -> bool {
        count >= self.parallel_threshold
    }
}
