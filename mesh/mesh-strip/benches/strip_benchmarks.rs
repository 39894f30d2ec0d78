//! Benchmarks for strip search.
//!
//! Run with: cargo bench -p mesh-strip
//!
//! To compare against baseline:
//! 1. First run: cargo bench -p mesh-strip -- --save-baseline main
//! 2. After changes: cargo bench -p mesh-strip -- --baseline main

#![allow(
    missing_docs,
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss
)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use mesh_strip::{find_strips, SpatialGrid, StripParams, StripStrategy};
use mesh_types::{Mesh, Triangle, Vertex};

// =============================================================================
// Test Mesh Generation
// =============================================================================

/// Create an `n` x `n` height field, two triangles per cell.
fn create_height_field(n: u32) -> Mesh {
    let mut mesh = Mesh::with_capacity(((n + 1) * (n + 1)) as usize, (2 * n * n) as usize);
    for j in 0..=n {
        for i in 0..=n {
            let (x, y) = (i as f32, j as f32);
            let z = (x * 0.3).sin() * (y * 0.2).cos();
            mesh.push_vertex(Vertex::from_coords(x, y, z));
        }
    }

    let row = n + 1;
    for j in 0..n {
        for i in 0..n {
            let v00 = j * row + i;
            let v10 = v00 + 1;
            let v01 = v00 + row;
            let v11 = v01 + 1;
            mesh.triangles.push(Triangle::new(v00, v10, v11));
            mesh.triangles.push(Triangle::new(v00, v11, v01));
        }
    }
    mesh
}

// =============================================================================
// Strip Search Benchmarks
// =============================================================================

fn bench_strategies(c: &mut Criterion) {
    let mut group = c.benchmark_group("StripSearch");
    group.sample_size(20);

    let test_cases = [
        ("field_512tri", create_height_field(16)),
        ("field_8192tri", create_height_field(64)),
    ];

    for (name, mesh) in &test_cases {
        group.throughput(Throughput::Elements(mesh.triangle_count() as u64));

        for strategy in StripStrategy::ALL {
            let params = StripParams::default();
            group.bench_with_input(BenchmarkId::new(strategy.name(), name), mesh, |b, mesh| {
                b.iter(|| find_strips(black_box(mesh), strategy, &params));
            });
        }
    }

    group.finish();
}

fn bench_large_link(c: &mut Criterion) {
    let mut group = c.benchmark_group("StripSearchLarge");
    group.sample_size(10);

    let mesh = create_height_field(256);
    group.throughput(Throughput::Elements(mesh.triangle_count() as u64));

    for strategy in [StripStrategy::Grid, StripStrategy::Link] {
        let params = StripParams::default();
        group.bench_with_input(
            BenchmarkId::new(strategy.name(), "field_131072tri"),
            &mesh,
            |b, mesh| {
                b.iter(|| find_strips(black_box(mesh), strategy, &params));
            },
        );
    }

    group.finish();
}

// =============================================================================
// Spatial Grid Benchmarks
// =============================================================================

fn bench_grid_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("SpatialGrid");

    for n in [64, 256] {
        let mesh = create_height_field(n);
        group.throughput(Throughput::Elements(mesh.triangle_count() as u64));
        group.bench_with_input(
            BenchmarkId::new("build", mesh.triangle_count()),
            &mesh,
            |b, mesh| {
                b.iter(|| SpatialGrid::for_mesh(black_box(mesh)));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_strategies, bench_large_link, bench_grid_build);
criterion_main!(benches);
