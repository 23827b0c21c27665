//! Property-based tests for bounding box fitting.
//!
//! These tests use proptest to generate random point clouds and meshes and
//! verify the invariants every fitted box must satisfy.
//!
//! Run with: cargo test -p obb-fit -- proptest

use obb_fit::{
    FitError, FitMethod, FitParams, OrientedBoundingBox, covariance_from_points,
    covariance_from_triangles,
};
use obb_types::{IndexedMesh, MeshRef, Point3, Vector3};
use proptest::prelude::*;

// =============================================================================
// Strategies
// =============================================================================

/// Generate a random point in a bounded range.
fn arb_point() -> impl Strategy<Value = Point3<f64>> {
    prop::array::uniform3(-100.0..100.0f64).prop_map(|[x, y, z]| Point3::new(x, y, z))
}

/// Generate a non-empty point cloud.
fn arb_points(max: usize) -> impl Strategy<Value = Vec<Point3<f64>>> {
    prop::collection::vec(arb_point(), 1..=max)
}

/// Generate a mesh whose face indices are all valid.
fn arb_mesh(max_points: usize, max_faces: usize) -> impl Strategy<Value = IndexedMesh> {
    (3..=max_points).prop_flat_map(move |n| {
        let points = prop::collection::vec(arb_point(), n);
        #[allow(clippy::cast_possible_truncation)]
        let faces = prop::collection::vec(prop::array::uniform3(0..n as u32), 1..=max_faces);
        (points, faces).prop_map(|(points, faces)| IndexedMesh::from_parts(points, faces))
    })
}

/// Slack for containment checks, relative to the coordinate range.
const TOLERANCE: f64 = 1e-7;

fn assert_box_invariants(
    obb: &OrientedBoundingBox,
    points: &[Point3<f64>],
) -> Result<(), TestCaseError> {
    prop_assert!(obb.basis().is_orthonormal(1e-9), "basis {:?}", obb.basis());
    prop_assert!(obb.matrix().determinant() >= -1e-9);

    let h = obb.half_extents();
    prop_assert!(h.x >= 0.0 && h.y >= 0.0 && h.z >= 0.0);

    for p in points {
        prop_assert!(obb.contains(p, TOLERANCE), "{:?} outside box", p);
    }

    let e = obb.extents();
    prop_assert!((obb.width() - e.z).abs() <= TOLERANCE);
    prop_assert!((obb.height() - e.x).abs() <= TOLERANCE);
    prop_assert!((obb.depth() - e.y).abs() <= TOLERANCE);

    let mean = obb
        .corners()
        .iter()
        .fold(Vector3::zeros(), |acc, c| acc + c.coords)
        / 8.0;
    prop_assert!((mean - obb.center().coords).norm() <= TOLERANCE);

    let ev = obb.eigenvalues();
    prop_assert!(ev[0] <= ev[1] && ev[1] <= ev[2]);
    Ok(())
}

// =============================================================================
// Property Tests: Point Moments
// =============================================================================

proptest! {
    /// Every point fit yields an orthonormal basis, contains its input, and
    /// never reflects.
    #[test]
    fn points_fit_invariants(points in arb_points(64)) {
        let mesh = MeshRef::points_only(&points);
        let obb = OrientedBoundingBox::from_points(&mesh).unwrap();
        assert_box_invariants(&obb, &points)?;
    }

    /// Fitting is deterministic.
    #[test]
    fn points_fit_is_idempotent(points in arb_points(32)) {
        let mesh = MeshRef::points_only(&points);
        let a = OrientedBoundingBox::from_points(&mesh).unwrap();
        let b = OrientedBoundingBox::from_points(&mesh).unwrap();
        prop_assert_eq!(a, b);
    }

    /// Covariance does not depend on where the cloud sits.
    #[test]
    fn points_covariance_is_translation_invariant(
        points in arb_points(32),
        offset in prop::array::uniform3(-50.0..50.0f64),
    ) {
        let params = FitParams::default();
        let shift = Vector3::from(offset);
        let moved: Vec<_> = points.iter().map(|p| p + shift).collect();

        let a = covariance_from_points(&points, &params).unwrap();
        let b = covariance_from_points(&moved, &params).unwrap();

        let scale = 1e-9 * a.max_abs().max(1.0);
        prop_assert!((a.to_matrix() - b.to_matrix()).amax() <= scale);
    }

    /// Sequential and parallel accumulation agree.
    #[test]
    fn points_parallel_matches_sequential(points in arb_points(200)) {
        let seq = covariance_from_points(&points, &FitParams::precise()).unwrap();
        let par = covariance_from_points(
            &points,
            &FitParams::default().with_parallel_threshold(1),
        )
        .unwrap();
        let scale = 1e-9 * seq.max_abs().max(1.0);
        prop_assert!((seq.to_matrix() - par.to_matrix()).amax() <= scale);
    }
}

// =============================================================================
// Property Tests: Surface Moments
// =============================================================================

proptest! {
    /// Random triangle soups either fit or report zero area; they never
    /// panic or produce NaN.
    #[test]
    fn triangles_fit_or_zero_area(mesh in arb_mesh(30, 40)) {
        match OrientedBoundingBox::fit(&mesh, &FitParams::with_method(FitMethod::Triangles)) {
            Ok(obb) => assert_box_invariants(&obb, &mesh.points)?,
            Err(FitError::ZeroSurfaceArea { triangles }) => {
                prop_assert_eq!(triangles, mesh.faces.len());
            }
            Err(other) => prop_assert!(false, "unexpected error: {other}"),
        }
    }

    /// Surface covariance is positive semi-definite.
    #[test]
    fn triangles_covariance_has_nonnegative_diagonal(mesh in arb_mesh(20, 30)) {
        if let Ok(c) = covariance_from_triangles(&mesh, &FitParams::default()) {
            prop_assert!(c.is_finite());
            let slack = 1e-9 * c.max_abs().max(1.0);
            prop_assert!(c.xx >= -slack && c.yy >= -slack && c.zz >= -slack);
        }
    }

    /// Out-of-range indices are always rejected as input errors.
    #[test]
    fn triangles_reject_bad_indices(mut mesh in arb_mesh(10, 10)) {
        #[allow(clippy::cast_possible_truncation)]
        let n = mesh.points.len() as u32;
        mesh.faces.push([0, 1, n]);
        let err = covariance_from_triangles(&mesh, &FitParams::default()).unwrap_err();
        prop_assert_eq!(err.kind(), obb_fit::ErrorKind::Input);
    }
}

// =============================================================================
// Property Tests: Convex Hull
// =============================================================================

#[cfg(feature = "hull")]
proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Hull fits contain every input point, including interior ones.
    #[test]
    fn hull_fit_contains_points(points in prop::collection::vec(arb_point(), 8..64)) {
        let mesh = MeshRef::points_only(&points);
        match OrientedBoundingBox::from_hull(&mesh) {
            Ok(obb) => assert_box_invariants(&obb, &points)?,
            // Random clouds are almost never flat, but quickhull may still
            // give up on near-degenerate input
            Err(err) => prop_assert_eq!(err.kind(), obb_fit::ErrorKind::NumericalDomain),
        }
    }
}
