// Copyright 2025 the Autocrop Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::time::Duration;

use autocrop::{AutocropConfig, AutocropEngine};
use autocrop_imaging::{Document, DocumentBuilder, FilterDesc, StrokeStyle};
use autocrop_vello_cpu::VelloCpuRenderer;
use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use kurbo::{Circle, Rect};
use peniko::Color;

fn shapes() -> Document {
    let mut b = DocumentBuilder::new(800.0, 600.0);
    b.set_brush(Color::from_rgba8(20, 90, 200, 255))
        .fill(&Circle::new((300.0, 250.0), 80.0))
        .set_stroke(StrokeStyle::new(6.0))
        .stroke_rect(Rect::new(420.0, 120.0, 610.0, 330.0));
    b.build()
}

fn blurred() -> Document {
    let mut b = DocumentBuilder::new(800.0, 600.0);
    b.with_filter(FilterDesc::blur(6.0), |b| {
        b.fill_rect(Rect::new(200.0, 150.0, 500.0, 400.0));
    });
    b.build()
}

fn bench_raster_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("autocrop/raster_size");
    group.sample_size(20);
    group.measurement_time(Duration::from_secs(3));

    // Larger rasters need fewer renders per edge but each render costs more.
    for (name, document) in [("shapes", shapes()), ("blurred", blurred())] {
        let renderer = VelloCpuRenderer::new(document);
        for side in [16_u16, 50, 100, 200] {
            let config = AutocropConfig::default().with_raster_size(side, side);
            let Ok(engine) = AutocropEngine::new(config) else {
                continue;
            };
            group.bench_with_input(BenchmarkId::new(name, side), &engine, |b, engine| {
                b.iter(|| black_box(engine.autocrop(&renderer)));
            });
        }
    }

    group.finish();
}

criterion_group!(benches, bench_raster_size);
criterion_main!(benches);
