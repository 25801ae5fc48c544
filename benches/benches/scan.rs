// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use autocrop::raster::{Color, EdgeQuery, RasterSample, area_color, find_edge_for};
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

/// A square raster with a blob in the middle third.
fn blob(side: u16) -> RasterSample {
    let mut raster = RasterSample::new(side, side);
    let third = side / 3;
    raster.fill_rect(
        third,
        third,
        side - third,
        side - third,
        Color::from_premul_rgba8(0, 0, 0, 255),
    );
    raster
}

fn bench_find_edge(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/find_edge");

    // Worst case is a scan across the empty margin before hitting content.
    for side in [32_u16, 100, 256, 1024] {
        let raster = blob(side);
        group.throughput(Throughput::Elements(u64::from(side) * u64::from(side)));
        for query in [EdgeQuery::DOWN, EdgeQuery::LEFT] {
            let id = BenchmarkId::new(format!("{},{}", query.dx(), query.dy()), side);
            group.bench_with_input(id, &raster, |b, raster| {
                b.iter(|| black_box(find_edge_for(raster, query)));
            });
        }
    }

    group.finish();
}

fn bench_area_color(c: &mut Criterion) {
    let mut group = c.benchmark_group("scan/area_color");

    for side in [32_u16, 100, 256, 1024] {
        let uniform = RasterSample::new(side, side);
        group.throughput(Throughput::Elements(u64::from(side) * u64::from(side)));
        group.bench_with_input(BenchmarkId::new("uniform", side), &uniform, |b, raster| {
            b.iter(|| black_box(area_color(raster, 0..=side - 1, 0..=side - 1)));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_find_edge, bench_area_color);
criterion_main!(benches);
