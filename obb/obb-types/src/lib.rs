//! Mesh data model for oriented bounding box fitting.
//!
//! This crate provides the inputs consumed by `obb-fit`:
//!
//! - [`IndexedMesh`] - An owned triangle mesh (points + index triples)
//! - [`MeshRef`] - A borrowed view over point and triangle slices
//! - [`MeshSource`] - The narrow interface any host geometry layer implements
//! - [`Triangle`] - A concrete triangle with resolved positions
//!
//! The fitting algorithms never see a scene graph. A host application (or a
//! test fixture) hands over a snapshot of its points and triangles through
//! [`MeshSource`] and gets plain values back.
//!
//! # Units
//!
//! This library is **unit-agnostic**. All coordinates are `f64`.
//!
//! # Example
//!
//! ```
//! use obb_types::{IndexedMesh, MeshSource, Point3};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.points.push(Point3::new(0.0, 0.0, 0.0));
//! mesh.points.push(Point3::new(1.0, 0.0, 0.0));
//! mesh.points.push(Point3::new(0.5, 1.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! assert_eq!(mesh.triangle_count(), 1);
//! assert!(mesh.validate().is_ok());
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod mesh;
mod traits;
mod triangle;

pub use error::{MeshError, MeshResult};
pub use mesh::{IndexedMesh, box_mesh, unit_cube};
pub use traits::{MeshRef, MeshSource};
pub use triangle::Triangle;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
