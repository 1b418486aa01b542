//! Benchmarks for stroke generation and shape extraction

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use glam::Vec2;
use meridian_geometry::svg::SvgLoader;
use meridian_geometry::{LineCap, LineJoin, StrokeStyle, create_shapes, points_to_stroke, stroke_vertex_count};

fn zigzag(n: usize) -> Vec<Vec2> {
    (0..n)
        .map(|i| Vec2::new(i as f32 * 4.0, if i % 2 == 0 { 0.0 } else { 3.0 }))
        .collect()
}

fn bench_stroke(c: &mut Criterion) {
    let mut group = c.benchmark_group("stroke");

    for size in [16, 256, 4096] {
        let points = zigzag(size);
        group.throughput(Throughput::Elements(size as u64));

        for join in [LineJoin::Miter, LineJoin::Round, LineJoin::Bevel] {
            let style = StrokeStyle::new(2.0).with_join(join).with_cap(LineCap::Round);

            group.bench_with_input(BenchmarkId::new(format!("{:?}", join), size), &points, |b, points| {
                b.iter(|| points_to_stroke(black_box(points), &style, 12, 0.001));
            });
        }

        let style = StrokeStyle::new(2.0);
        group.bench_with_input(BenchmarkId::new("count_only", size), &points, |b, points| {
            b.iter(|| stroke_vertex_count(black_box(points), &style, 12, 0.001));
        });
    }

    group.finish();
}

fn nested_squares(count: usize) -> String {
    let mut d = String::new();
    for i in 0..count {
        let min = i as f32 * 2.0;
        let max = 1000.0 - min;
        if i % 2 == 0 {
            d.push_str(&format!("M{min} {min} H{max} V{max} H{min} Z "));
        } else {
            d.push_str(&format!("M{min} {min} V{max} H{max} V{min} Z "));
        }
    }
    format!(r#"<svg xmlns="http://www.w3.org/2000/svg"><path d="{d}"/></svg>"#)
}

fn bench_shapes(c: &mut Criterion) {
    let mut group = c.benchmark_group("create_shapes");
    let loader = SvgLoader::default();

    for count in [4, 32, 128] {
        let data = loader.parse(&nested_squares(count)).expect("valid svg");
        let path = &data.paths[0];
        group.throughput(Throughput::Elements(count as u64));

        group.bench_with_input(BenchmarkId::new("nonzero", count), path, |b, path| {
            b.iter(|| create_shapes(black_box(path), 12));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_stroke, bench_shapes);
criterion_main!(benches);
