//! Indexed triangle mesh.

use crate::{MeshSource, Triangle};
use nalgebra::{Point3, Rotation3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Points and faces are stored separately, with faces referencing points by
/// index. Faces use **counter-clockwise (CCW) winding** when viewed from
/// outside.
///
/// # Example
///
/// ```
/// use obb_types::{IndexedMesh, MeshSource, Point3};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Point3::new(0.0, 0.0, 0.0),
///         Point3::new(1.0, 0.0, 0.0),
///         Point3::new(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
///
/// assert_eq!(mesh.point_count(), 3);
/// assert_eq!(mesh.triangle_count(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Point positions.
    pub points: Vec<Point3<f64>>,

    /// Triangle faces as indices into the point array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create a new empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            points: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create a mesh with pre-allocated capacity.
    #[inline]
    #[must_use]
    pub fn with_capacity(point_count: usize, face_count: usize) -> Self {
        Self {
            points: Vec::with_capacity(point_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from points and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(points: Vec<Point3<f64>>, faces: Vec<[u32; 3]>) -> Self {
        Self { points, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// * `positions` - `[x0, y0, z0, x1, y1, z1, ...]`
    /// * `indices` - `[a0, b0, c0, a1, b1, c1, ...]`
    ///
    /// Returns an empty mesh if either length is not a multiple of 3.
    ///
    /// # Example
    ///
    /// ```
    /// use obb_types::{IndexedMesh, MeshSource};
    ///
    /// let positions = [0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0];
    /// let indices = [0, 1, 2];
    ///
    /// let mesh = IndexedMesh::from_raw(&positions, &indices);
    /// assert_eq!(mesh.point_count(), 3);
    /// assert_eq!(mesh.triangle_count(), 1);
    /// ```
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        let points = positions
            .chunks_exact(3)
            .map(|c| Point3::new(c[0], c[1], c[2]))
            .collect();

        let faces = indices
            .chunks_exact(3)
            .map(|c| [c[0], c[1], c[2]])
            .collect();

        Self { points, faces }
    }

    /// Check if the mesh has no points or no faces.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty() || self.faces.is_empty()
    }

    /// Translate mesh by the given vector.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for point in &mut self.points {
            *point += offset;
        }
    }

    /// Scale mesh uniformly around the origin.
    pub fn scale(&mut self, factor: f64) {
        for point in &mut self.points {
            point.coords *= factor;
        }
    }

    /// Scale mesh non-uniformly around the origin.
    pub fn scale_axes(&mut self, factors: Vector3<f64>) {
        for point in &mut self.points {
            point.coords.component_mul_assign(&factors);
        }
    }

    /// Rotate mesh around the origin.
    pub fn rotate(&mut self, rotation: &Rotation3<f64>) {
        for point in &mut self.points {
            *point = rotation * *point;
        }
    }

    /// Iterate over all triangles with resolved positions.
    ///
    /// Faces with out-of-range indices are skipped; call
    /// [`MeshSource::validate`] first when that matters.
    pub fn resolved_triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.faces.len()).filter_map(|i| self.triangle(i))
    }

    /// Compute the signed volume of the mesh.
    ///
    /// Sum of signed tetrahedra formed by each face and the origin. Positive
    /// for a closed mesh with outward winding, negative when inside-out.
    #[must_use]
    pub fn signed_volume(&self) -> f64 {
        let volume: f64 = self
            .resolved_triangles()
            .map(|tri| {
                let cross = tri.v1.coords.cross(&tri.v2.coords);
                tri.v0.coords.dot(&cross)
            })
            .sum();
        volume / 6.0
    }

    /// Compute the absolute volume of the mesh.
    #[inline]
    #[must_use]
    pub fn volume(&self) -> f64 {
        self.signed_volume().abs()
    }

    /// Compute the total surface area of the mesh.
    #[must_use]
    pub fn surface_area(&self) -> f64 {
        self.resolved_triangles().map(|tri| tri.area()).sum()
    }

    /// Flip all faces by reversing winding order.
    pub fn flip_normals(&mut self) {
        for face in &mut self.faces {
            face.swap(1, 2);
        }
    }
}

impl MeshSource for IndexedMesh {
    #[inline]
    fn points(&self) -> &[Point3<f64>] {
        &self.points
    }

    #[inline]
    fn triangles(&self) -> &[[u32; 3]] {
        &self.faces
    }
}

/// Create a unit cube mesh.
///
/// The cube spans (0,0,0) to (1,1,1) with outward-facing winding.
///
/// # Example
///
/// ```
/// use obb_types::{unit_cube, MeshSource};
///
/// let cube = unit_cube();
/// assert_eq!(cube.point_count(), 8);
/// assert_eq!(cube.triangle_count(), 12);
/// ```
#[must_use]
pub fn unit_cube() -> IndexedMesh {
    box_mesh(Vector3::new(1.0, 1.0, 1.0))
}

/// Create an axis-aligned box mesh spanning the origin to `size`.
#[must_use]
pub fn box_mesh(size: Vector3<f64>) -> IndexedMesh {
    let (sx, sy, sz) = (size.x, size.y, size.z);
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    mesh.points.push(Point3::new(0.0, 0.0, 0.0)); // 0
    mesh.points.push(Point3::new(sx, 0.0, 0.0)); // 1
    mesh.points.push(Point3::new(sx, sy, 0.0)); // 2
    mesh.points.push(Point3::new(0.0, sy, 0.0)); // 3
    mesh.points.push(Point3::new(0.0, 0.0, sz)); // 4
    mesh.points.push(Point3::new(sx, 0.0, sz)); // 5
    mesh.points.push(Point3::new(sx, sy, sz)); // 6
    mesh.points.push(Point3::new(0.0, sy, sz)); // 7

    // Bottom (z=0), top (z=sz)
    mesh.faces.push([0, 2, 1]);
    mesh.faces.push([0, 3, 2]);
    mesh.faces.push([4, 5, 6]);
    mesh.faces.push([4, 6, 7]);

    // Front (y=0), back (y=sy)
    mesh.faces.push([0, 1, 5]);
    mesh.faces.push([0, 5, 4]);
    mesh.faces.push([3, 7, 6]);
    mesh.faces.push([3, 6, 2]);

    // Left (x=0), right (x=sx)
    mesh.faces.push([0, 4, 7]);
    mesh.faces.push([0, 7, 3]);
    mesh.faces.push([1, 2, 6]);
    mesh.faces.push([1, 6, 5]);

    mesh
}
