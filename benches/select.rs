use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use rank_select::diversity::{select, select_naive, MmrConfig};
use rank_select::similarity::score_all;
use rank_select::simd;

fn random_vec(dim: usize, seed: u64) -> Vec<f32> {
    // Simple LCG for reproducible "random" vectors
    let mut x = seed.wrapping_add(1);
    (0..dim)
        .map(|_| {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1442695040888963407);
            ((x >> 40) as f32 / (1u64 << 24) as f32) * 2.0 - 1.0
        })
        .collect()
}

fn candidates(n: usize, dim: usize) -> Vec<Vec<f32>> {
    (0..n).map(|i| random_vec(dim, i as u64 + 1000)).collect()
}

fn bench_simd(c: &mut Criterion) {
    let mut g = c.benchmark_group("simd");

    for &dim in &[384, 768, 1536] {
        let a = random_vec(dim, 1);
        let b = random_vec(dim, 2);

        g.bench_with_input(BenchmarkId::new("dot", dim), &dim, |bench, _| {
            bench.iter(|| black_box(simd::dot(&a, &b)));
        });

        g.bench_with_input(BenchmarkId::new("cosine", dim), &dim, |bench, _| {
            bench.iter(|| black_box(simd::cosine(&a, &b)));
        });
    }

    g.finish();
}

fn bench_relevance(c: &mut Criterion) {
    let mut g = c.benchmark_group("score_all");

    for &n in &[100, 500, 2000] {
        let query = random_vec(1536, 7);
        let cands = candidates(n, 1536);
        g.bench_with_input(BenchmarkId::new("1536d", n), &n, |bench, _| {
            bench.iter(|| black_box(score_all(&query, &cands)));
        });
    }

    g.finish();
}

fn bench_select(c: &mut Criterion) {
    let mut g = c.benchmark_group("select");
    g.sample_size(20);

    let config = MmrConfig::default().with_cap(50);
    for &dim in &[384, 1536] {
        let query = random_vec(dim, 7);
        for &n in &[100, 500, 2000] {
            let cands = candidates(n, dim);
            let id = format!("{dim}d/{n}");

            g.bench_with_input(BenchmarkId::new("incremental", &id), &n, |bench, _| {
                bench.iter(|| black_box(select(&query, &cands, config)));
            });

            // The naive form is cap² · n; skip it where it dominates the run.
            if n <= 500 {
                g.bench_with_input(BenchmarkId::new("naive", &id), &n, |bench, _| {
                    bench.iter(|| black_box(select_naive(&query, &cands, config)));
                });
            }
        }
    }

    g.finish();
}

criterion_group!(benches, bench_simd, bench_relevance, bench_select);
criterion_main!(benches);
