use std::env;
use std::hint::black_box;
use std::time::Duration;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

use xstakeoff_core::polyline::{PolylineSettings, Segment, collect_segments, merge_segments};
use xstakeoff_core::{Drawing, PathItem, Rect};

fn bench_seed() -> u64 {
    env::var("XSTAKEOFF_BENCH_SEED")
        .ok()
        .and_then(|v| v.parse::<u64>().ok())
        .unwrap_or(0xC0FFEE)
}

struct Jitter(u64);

impl Jitter {
    fn next(&mut self, amplitude: f64) -> f64 {
        let mut x = self.0.max(1);
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        (x as f64 / u64::MAX as f64 - 0.5) * 2.0 * amplitude
    }
}

/// Ground lines broken into short pieces with sub-tolerance endpoint noise,
/// shuffled across drawings the way plotted sheets split them.
fn gen_sheet(seed: u64, lines: usize, pieces: usize) -> Vec<Drawing> {
    let mut jitter = Jitter(seed);
    let mut drawings = Vec::with_capacity(lines);
    for line in 0..lines {
        let y = 20.0 + line as f64 * 15.0;
        let mut items = Vec::with_capacity(pieces);
        for piece in 0..pieces {
            let x0 = 10.0 + piece as f64 * 12.0;
            let a = (x0 + jitter.next(0.4), y + jitter.next(0.4));
            let b = (x0 + 12.0, y + (piece % 3) as f64);
            if piece % 2 == 0 {
                items.push(PathItem::line(a, b));
            } else {
                items.push(PathItem::line(b, a));
            }
        }
        let x1 = 10.0 + pieces as f64 * 12.0;
        drawings.push(Drawing::new(
            Some(Rect::new(9.0, y - 1.0, x1 + 1.0, y + 3.0)),
            items,
        ));
    }
    drawings
}

fn bench_merge(c: &mut Criterion) {
    let seed = bench_seed();
    let settings = PolylineSettings::default();
    let region = Rect::new(0.0, 0.0, 10_000.0, 10_000.0);

    let mut group = c.benchmark_group("polyline_merge");
    group.sample_size(30);
    group.measurement_time(Duration::from_secs(5));

    for &(lines, pieces) in &[(20usize, 50usize), (60, 100), (120, 200)] {
        let drawings = gen_sheet(seed ^ (lines as u64), lines, pieces);
        let segments: Vec<Segment> = collect_segments(&drawings, &region);

        group.throughput(Throughput::Elements(segments.len() as u64));
        group.bench_with_input(
            BenchmarkId::new("collect", segments.len()),
            &drawings,
            |b, drawings| {
                b.iter(|| black_box(collect_segments(drawings, &region).len()));
            },
        );
        group.bench_with_input(
            BenchmarkId::new("merge", segments.len()),
            &segments,
            |b, segments| {
                b.iter(|| black_box(merge_segments(segments, &settings).len()));
            },
        );
    }

    group.finish();
}

criterion_group!(benches, bench_merge);
criterion_main!(benches);
