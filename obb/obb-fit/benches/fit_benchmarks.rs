//! Benchmarks for obb-fit operations.
//!
//! Run with: cargo bench -p obb-fit
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p obb-fit -- --save-baseline main
//! 2. After changes: cargo bench -p obb-fit -- --baseline main

use std::collections::HashMap;

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use nalgebra::Rotation3;
use obb_fit::{
    FitMethod, FitParams, OrientedBoundingBox, covariance_from_points, covariance_from_triangles,
};
use obb_types::{IndexedMesh, Point3, Vector3};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create an icosphere mesh with specified subdivision level, squashed into
/// an ellipsoid so the principal axes are well defined.
fn create_ellipsoid(subdivisions: u32) -> IndexedMesh {
    let mut mesh = IndexedMesh::new();

    let phi = f64::midpoint(1.0, 5.0_f64.sqrt());
    let a = 1.0;
    let b = 1.0 / phi;

    let ico_verts = [
        [0.0, b, -a],
        [b, a, 0.0],
        [-b, a, 0.0],
        [0.0, b, a],
        [0.0, -b, a],
        [-a, 0.0, b],
        [0.0, -b, -a],
        [a, 0.0, -b],
        [a, 0.0, b],
        [-a, 0.0, -b],
        [b, -a, 0.0],
        [-b, -a, 0.0],
    ];

    for v in &ico_verts {
        mesh.points.push(Point3::from(Vector3::from(*v).normalize()));
    }

    mesh.faces.extend_from_slice(&[
        [0, 1, 2],
        [3, 2, 1],
        [3, 4, 5],
        [3, 8, 4],
        [0, 6, 7],
        [0, 9, 6],
        [4, 10, 11],
        [6, 11, 10],
        [2, 5, 9],
        [11, 9, 5],
        [1, 7, 8],
        [10, 8, 7],
        [3, 5, 2],
        [3, 1, 8],
        [0, 2, 9],
        [0, 7, 1],
        [6, 9, 11],
        [6, 10, 7],
        [4, 11, 5],
        [4, 8, 10],
    ]);

    for _ in 0..subdivisions {
        mesh = subdivide_sphere(&mesh);
    }

    mesh.scale_axes(Vector3::new(3.0, 1.5, 0.5));
    mesh.rotate(&Rotation3::from_euler_angles(0.4, 0.2, -0.7));
    mesh
}

fn subdivide_sphere(mesh: &IndexedMesh) -> IndexedMesh {
    let mut new_mesh = IndexedMesh::new();
    new_mesh.points.clone_from(&mesh.points);

    let mut edge_midpoints: HashMap<(u32, u32), u32> = HashMap::new();

    for &[v0, v1, v2] in &mesh.faces {
        let m01 = get_midpoint(v0, v1, &mut new_mesh.points, &mut edge_midpoints);
        let m12 = get_midpoint(v1, v2, &mut new_mesh.points, &mut edge_midpoints);
        let m20 = get_midpoint(v2, v0, &mut new_mesh.points, &mut edge_midpoints);

        new_mesh.faces.push([v0, m01, m20]);
        new_mesh.faces.push([v1, m12, m01]);
        new_mesh.faces.push([v2, m20, m12]);
        new_mesh.faces.push([m01, m12, m20]);
    }

    new_mesh
}

fn get_midpoint(
    v1: u32,
    v2: u32,
    points: &mut Vec<Point3<f64>>,
    edge_midpoints: &mut HashMap<(u32, u32), u32>,
) -> u32 {
    let key = if v1 < v2 { (v1, v2) } else { (v2, v1) };

    if let Some(&idx) = edge_midpoints.get(&key) {
        return idx;
    }

    let mid = nalgebra::center(&points[v1 as usize], &points[v2 as usize]);

    let idx = points.len() as u32;
    points.push(Point3::from(mid.coords.normalize()));
    edge_midpoints.insert(key, idx);
    idx
}

// =============================================================================
// Estimator Benchmarks
// =============================================================================

fn bench_estimators(c: &mut Criterion) {
    let mut group = c.benchmark_group("Estimators");

    let test_cases = [
        ("ellipsoid_1280tri", create_ellipsoid(3)),
        ("ellipsoid_20480tri", create_ellipsoid(5)),
        ("ellipsoid_327680tri", create_ellipsoid(7)),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.faces.len() as u64));

        for (label, params) in [("seq", FitParams::precise()), ("par", FitParams::fast())] {
            let id = BenchmarkId::new(format!("points_{label}"), name);
            group.bench_with_input(id, mesh, |b, mesh| {
                b.iter(|| covariance_from_points(black_box(&mesh.points), &params));
            });

            let id = BenchmarkId::new(format!("triangles_{label}"), name);
            group.bench_with_input(id, mesh, |b, mesh| {
                b.iter(|| covariance_from_triangles(black_box(mesh), &params));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Full Fit Benchmarks
// =============================================================================

fn bench_fit(c: &mut Criterion) {
    let mut group = c.benchmark_group("Fit");
    group.sample_size(20); // Hull fits are slower, reduce samples

    let test_cases = [
        ("ellipsoid_1280tri", create_ellipsoid(3)),
        ("ellipsoid_20480tri", create_ellipsoid(5)),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.faces.len() as u64));

        for method in [FitMethod::Points, FitMethod::Triangles, FitMethod::Hull] {
            let params = FitParams::with_method(method);
            group.bench_with_input(BenchmarkId::new(method.name(), name), mesh, |b, mesh| {
                b.iter(|| OrientedBoundingBox::fit(black_box(mesh), &params));
            });
        }
    }

    group.finish();
}

// =============================================================================
// Criterion Setup
// =============================================================================

criterion_group!(benches, bench_estimators, bench_fit);
criterion_main!(benches);
