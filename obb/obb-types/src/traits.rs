//! The mesh source interface.

use crate::{MeshError, MeshResult, Triangle};
use nalgebra::Point3;

/// Trait for anything that can hand over a mesh snapshot.
///
/// This is the only contact point between the fitting algorithms and a host
/// geometry layer. Points are indexed by position; every triangle is a triple
/// of indices into [`MeshSource::points`].
pub trait MeshSource {
    /// Get the point positions.
    fn points(&self) -> &[Point3<f64>];

    /// Get the triangles as point index triples.
    fn triangles(&self) -> &[[u32; 3]];

    /// Get the number of points.
    fn point_count(&self) -> usize {
        self.points().len()
    }

    /// Get the number of triangles.
    fn triangle_count(&self) -> usize {
        self.triangles().len()
    }

    /// Get a triangle by index with resolved positions.
    ///
    /// Returns `None` if the triangle index or any of its point indices is
    /// out of bounds.
    fn triangle(&self, index: usize) -> Option<Triangle> {
        let [i0, i1, i2] = *self.triangles().get(index)?;
        let points = self.points();
        Some(Triangle::new(
            *points.get(i0 as usize)?,
            *points.get(i1 as usize)?,
            *points.get(i2 as usize)?,
        ))
    }

    /// Check that every triangle index refers to an existing point.
    ///
    /// Empty meshes are valid here; whether an empty point or triangle set
    /// is acceptable depends on the consumer.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::IndexOutOfRange`] for the first offending index.
    fn validate(&self) -> MeshResult<()> {
        let point_count = self.point_count();
        for (face, tri) in self.triangles().iter().enumerate() {
            if let Some(&index) = tri.iter().find(|&&i| i as usize >= point_count) {
                return Err(MeshError::IndexOutOfRange {
                    face,
                    index,
                    point_count,
                });
            }
        }
        Ok(())
    }
}

/// A borrowed mesh view over point and triangle slices.
///
/// # Example
///
/// ```
/// use obb_types::{MeshRef, MeshSource, Point3};
///
/// let points = [
///     Point3::new(0.0, 0.0, 0.0),
///     Point3::new(2.0, 0.0, 0.0),
///     Point3::new(0.0, 2.0, 0.0),
/// ];
/// let faces = [[0, 1, 2]];
///
/// let view = MeshRef::new(&points, &faces);
/// let tri = view.triangle(0).unwrap();
/// assert!((tri.area() - 2.0).abs() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct MeshRef<'a> {
    points: &'a [Point3<f64>],
    triangles: &'a [[u32; 3]],
}

impl<'a> MeshRef<'a> {
    /// Create a view over points and triangles.
    #[must_use]
    pub const fn new(points: &'a [Point3<f64>], triangles: &'a [[u32; 3]]) -> Self {
        Self { points, triangles }
    }

    /// Create a view over a bare point cloud (no triangles).
    #[must_use]
    pub const fn points_only(points: &'a [Point3<f64>]) -> Self {
        Self {
            points,
            triangles: &[],
        }
    }
}

impl MeshSource for MeshRef<'_> {
    fn points(&self) -> &[Point3<f64>] {
        self.points
    }

    fn triangles(&self) -> &[[u32; 3]] {
        self.triangles
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle_points() -> Vec<Point3<f64>> {
        vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 1.0, 0.0),
        ]
    }

    #[test]
    fn view_counts() {
        let points = triangle_points();
        let faces = [[0, 1, 2]];
        let view = MeshRef::new(&points, &faces);
        assert_eq!(view.point_count(), 3);
        assert_eq!(view.triangle_count(), 1);
    }

    #[test]
    fn points_only_has_no_triangles() {
        let points = triangle_points();
        let view = MeshRef::points_only(&points);
        assert_eq!(view.triangle_count(), 0);
        assert!(view.validate().is_ok());
    }

    #[test]
    fn validate_rejects_out_of_range() {
        let points = triangle_points();
        let faces = [[0, 1, 2], [0, 2, 7]];
        let view = MeshRef::new(&points, &faces);

        let err = view.validate().unwrap_err();
        assert_eq!(
            err,
            MeshError::IndexOutOfRange {
                face: 1,
                index: 7,
                point_count: 3,
            }
        );
    }

    #[test]
    fn triangle_out_of_range_is_none() {
        let points = triangle_points();
        let faces = [[0, 1, 5]];
        let view = MeshRef::new(&points, &faces);
        assert!(view.triangle(0).is_none());
        assert!(view.triangle(1).is_none());
    }
}
