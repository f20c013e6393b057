use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use vs_graph::RegionGraph;
use vs_stats::{HistogramQuantileProvider, QuantileProvider, StatisticsProvider};

fn synthetic_samples(n: usize) -> Vec<f32> {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    (0..n).map(|_| rng.gen_range(0.0f32..1.0)).collect()
}

fn bench_quantile_providers(c: &mut Criterion) {
    let samples = synthetic_samples(100_000);

    c.bench_function("histogram_quantile_ingest_query_100k", |b| {
        b.iter(|| {
            let mut g = RegionGraph::new(3);
            let mut p = HistogramQuantileProvider::new(&mut g, 75);
            let e = g.add_edge(1, 2);
            for &a in black_box(&samples) {
                p.add_affinity(e, a);
            }
            black_box(p.value(e));
        });
    });

    c.bench_function("exact_quantile_ingest_query_100k", |b| {
        b.iter(|| {
            let mut g = RegionGraph::new(3);
            let mut p = QuantileProvider::new(&mut g, 75);
            let e = g.add_edge(1, 2);
            for &a in black_box(&samples) {
                p.add_affinity(e, a);
            }
            black_box(p.value(e));
        });
    });
}

criterion_group!(benches, bench_quantile_providers);
criterion_main!(benches);
