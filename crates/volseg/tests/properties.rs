//! Invariant checks on seeded random region graphs.

use std::collections::HashSet;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use volseg::{
    DefaultScoring, EdgeId, IterativeRegionMerging, NodeId, RegionGraph, RegionSizeProvider,
    ScoringFunction, StatisticsProvider, default_scoring,
};

const NUM_FRAGMENTS: usize = 40;

fn random_counts(rng: &mut ChaCha8Rng) -> Vec<u64> {
    let mut counts = vec![0u64];
    for _ in 0..NUM_FRAGMENTS {
        counts.push(rng.gen_range(1..=5));
    }
    counts
}

/// A connected random RAG: a random spanning tree plus chords, with 1..=3
/// affinity samples per edge and random fragment sizes.
fn random_rag(seed: u64) -> (RegionGraph, DefaultScoring) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let counts = random_counts(&mut rng);

    let mut g = RegionGraph::new(NUM_FRAGMENTS + 1);
    let mut scoring = default_scoring(&mut g, counts);

    let mut pairs: Vec<(usize, usize)> = Vec::new();
    for v in 2..=NUM_FRAGMENTS {
        pairs.push((rng.gen_range(1..v), v));
    }
    for _ in 0..NUM_FRAGMENTS {
        let u = rng.gen_range(1..=NUM_FRAGMENTS);
        let v = rng.gen_range(1..=NUM_FRAGMENTS);
        if u != v {
            pairs.push((u.min(v), u.max(v)));
        }
    }

    for (u, v) in pairs {
        if g.find_edge(u, v).is_some() {
            continue;
        }
        let e = g.add_edge(u, v);
        scoring.notify_new_edge(e);
        for _ in 0..rng.gen_range(1..=3) {
            scoring.add_affinity(e, rng.gen_range(0.0f32..1.0));
        }
    }

    (g, scoring)
}

#[test]
fn merges_consume_non_decreasing_scores() {
    for seed in [3, 11, 42] {
        let (g, mut scoring) = random_rag(seed);
        let mut merging = IterativeRegionMerging::new(g);
        merging.merge_until(&mut scoring, 1e6);

        let history = merging.merge_history();
        assert!(!history.is_empty());
        for pair in history.windows(2) {
            assert!(
                pair[0].score <= pair[1].score,
                "seed {seed}: merge scores decreased: {} then {}",
                pair[0].score,
                pair[1].score
            );
        }
    }
}

#[test]
fn no_parallel_live_edges_between_roots() {
    for seed in [3, 11, 42] {
        let (g, mut scoring) = random_rag(seed);
        let mut merging = IterativeRegionMerging::new(g);
        merging.merge_until(&mut scoring, 2.0);

        let graph = merging.graph();
        let live: Vec<EdgeId> = (0..graph.num_edges())
            .filter(|&e| !graph.is_removed(e))
            .collect();

        let mut pairs: HashSet<(NodeId, NodeId)> = HashSet::new();
        for e in live {
            let edge = graph.edge(e);
            assert!(merging.is_root(edge.u), "seed {seed}: live edge off-root");
            assert!(merging.is_root(edge.v), "seed {seed}: live edge off-root");
            let pair = (edge.u.min(edge.v), edge.u.max(edge.v));
            assert!(
                pairs.insert(pair),
                "seed {seed}: parallel live edges between {pair:?}"
            );
        }
    }
}

#[test]
fn every_fragment_resolves_to_a_live_root() {
    let (g, mut scoring) = random_rag(42);
    let mut merging = IterativeRegionMerging::new(g);
    merging.merge_until(&mut scoring, 2.0);

    for fragment in 1..=NUM_FRAGMENTS {
        let root = merging.get_root(fragment);
        assert!(merging.is_root(root));
        // Compression is transparent: a second query gives the same root.
        assert_eq!(merging.get_root(fragment), root);
    }
}

#[test]
fn ascending_sweep_equals_direct_merge() {
    for seed in [3, 11, 42] {
        let (g, mut scoring) = random_rag(seed);
        let mut swept = IterativeRegionMerging::new(g);
        for t in [0.3, 0.9, 1.7, 2.5] {
            swept.merge_until(&mut scoring, t);
        }

        let (g, mut scoring_direct) = random_rag(seed);
        let mut direct = IterativeRegionMerging::new(g);
        direct.merge_until(&mut scoring_direct, 2.5);

        assert_eq!(swept.merge_history(), direct.merge_history());
        for fragment in 1..=NUM_FRAGMENTS {
            assert_eq!(
                swept.get_root(fragment),
                direct.get_root(fragment),
                "seed {seed}: roots diverge at fragment {fragment}"
            );
        }
    }
}

/// Wraps the default scoring and mirrors node merges into an independent
/// size provider, exposing cluster sizes for verification.
struct InstrumentedScoring {
    inner: DefaultScoring,
    sizes: RegionSizeProvider,
}

impl ScoringFunction for InstrumentedScoring {
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32 {
        self.inner.score(graph, e)
    }

    fn notify_new_edge(&mut self, e: EdgeId) {
        self.inner.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.inner.add_affinity(e, affinity);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        self.inner.notify_node_merge(a, b, c);
        self.sizes.notify_node_merge(a, b, c);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.inner.notify_edge_merge(from, to);
    }
}

#[test]
fn cluster_sizes_are_additive() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    let counts = random_counts(&mut rng);

    let mut g = RegionGraph::new(NUM_FRAGMENTS + 1);
    let mut scoring = InstrumentedScoring {
        inner: default_scoring(&mut g, counts.clone()),
        sizes: RegionSizeProvider::from_counts(&mut g, counts),
    };

    for v in 2..=NUM_FRAGMENTS {
        let u = rng.gen_range(1..v);
        let e = g.add_edge(u, v);
        scoring.notify_new_edge(e);
        scoring.add_affinity(e, rng.gen_range(0.0f32..1.0));
    }

    let mut merging = IterativeRegionMerging::new(g);
    merging.merge_until(&mut scoring, 2.0);
    assert!(!merging.merge_history().is_empty());

    for record in merging.merge_history() {
        assert_eq!(
            scoring.sizes.size(record.c),
            scoring.sizes.size(record.a) + scoring.sizes.size(record.b),
            "cluster {} size is not the sum of its children",
            record.c
        );
    }
}
