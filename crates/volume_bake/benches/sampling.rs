mod common;

use std::hint::black_box;

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use glam::{DVec2, DVec3};
use volume_bake::region::{GridResolution, RegionDescriptor};

fn sampling_volume_benches(c: &mut Criterion) {
    let shapes = [
        RegionDescriptor::boxed(DVec3::ZERO, DVec3::splat(500.0)),
        RegionDescriptor::spherical_shell(DVec3::ZERO, 6_000.0, 6_500.0),
    ];

    for region in &shapes {
        let mut group = c.benchmark_group(format!("sampling/{}", region.name()));
        for &edge in &common::EDGES {
            let res = GridResolution::volume(edge, edge, edge);
            group.throughput(common::cells_throughput(res.cell_count()));
            group.bench_with_input(BenchmarkId::from_parameter(edge), &res, |b, res| {
                b.iter(|| {
                    let positions = region.generate_positions(res).unwrap_or_default();
                    black_box(positions.len());
                });
            });
        }
        group.finish();
    }
}

fn sampling_planar_benches(c: &mut Criterion) {
    let shapes = [
        RegionDescriptor::equirectangular_sphere(DVec3::ZERO, 6_371.0),
        RegionDescriptor::planar_slab(DVec3::ZERO, DVec2::splat(4_096.0), 0.0),
    ];

    for region in &shapes {
        let mut group = c.benchmark_group(format!("sampling/{}", region.name()));
        for &edge in &[256u32, 512, 1024] {
            let res = GridResolution::planar(edge, edge / 2);
            group.throughput(common::cells_throughput(res.cell_count()));
            group.bench_with_input(BenchmarkId::from_parameter(edge), &res, |b, res| {
                b.iter(|| {
                    let positions = region.generate_positions(res).unwrap_or_default();
                    black_box(positions.len());
                });
            });
        }
        group.finish();
    }
}

criterion_group! {
    name = benches;
    config = common::default_criterion();
    targets = sampling_volume_benches, sampling_planar_benches
}
criterion_main!(benches);
