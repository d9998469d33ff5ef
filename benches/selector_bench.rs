use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use pools::Selector;
use pools::models::{Limits, SelectionMode};
use pools::services::loader::normalize_lines;
use std::hint::black_box;

const POOL_SIZES: &[usize] = &[16, 255, 10_000];
const NO_REPEAT: &[usize] = &[1, 50, 1_000];

fn bench_random_pick(c: &mut Criterion) {
    let mut group = c.benchmark_group("random_pick");
    for &len in POOL_SIZES {
        for &no_repeat in NO_REPEAT {
            let id = BenchmarkId::new(format!("len_{}", len), no_repeat);
            group.bench_with_input(id, &(len, no_repeat), |b, &(len, no_repeat)| {
                let mut selector = Selector::with_seed(SelectionMode::Random, no_repeat, len, 7);
                b.iter(|| black_box(selector.pick()));
            });
        }
    }
    group.finish();
}

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("queue");
    for &len in POOL_SIZES {
        group.bench_with_input(BenchmarkId::new("pick", len), &len, |b, &len| {
            let mut selector = Selector::with_seed(SelectionMode::Queue, 0, len, 7);
            b.iter(|| black_box(selector.pick()));
        });
        group.bench_with_input(BenchmarkId::new("shuffle", len), &len, |b, &len| {
            let mut selector = Selector::with_seed(SelectionMode::Queue, 0, len, 7);
            b.iter(|| black_box(selector.shuffle()));
        });
    }
    group.finish();
}

fn bench_normalize(c: &mut Criterion) {
    let text: String = (0..10_000)
        .map(|i| format!("  line number {} with cafe\u{301} and some padding  \r\n", i))
        .collect();
    let limits = Limits {
        max_lines: 10_000,
        max_chars: 32,
        ..Limits::default()
    };

    c.bench_function("normalize_10k_lines", |b| {
        b.iter(|| black_box(normalize_lines(black_box(&text), &limits)));
    });
}

criterion_group!(selector_bench, bench_random_pick, bench_queue, bench_normalize);
criterion_main!(selector_bench);
