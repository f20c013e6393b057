use vs_graph::{EdgeId, EdgeMap, RegionGraph};

use crate::StatisticsProvider;
use crate::histogram::Histogram;

/// Exact quantile over the affinity samples of an edge.
///
/// Every sample is retained; a query partially sorts the sample list with a
/// linear-time selection at index `(n - 1) * q / 100` (0-based floor).
/// Merging parallel edges concatenates their sample lists.
#[derive(Debug)]
pub struct QuantileProvider {
    q: u8,
    samples: EdgeMap<Vec<f32>>,
}

impl QuantileProvider {
    /// `q` is a percentile in `0..=100`.
    pub fn new(graph: &mut RegionGraph, q: u8) -> Self {
        assert!(q <= 100, "quantile {q} outside 0..=100");
        Self {
            q,
            samples: EdgeMap::new(graph),
        }
    }

    /// Panics if no sample was ever added to `e`.
    pub fn value(&self, e: EdgeId) -> f32 {
        let q = usize::from(self.q);
        self.samples.update(e, |samples| {
            assert!(!samples.is_empty(), "quantile of edge {e} with no samples");
            let pivot = (samples.len() - 1) * q / 100;
            let (_, value, _) = samples.select_nth_unstable_by(pivot, f32::total_cmp);
            *value
        })
    }

    pub fn num_samples(&self, e: EdgeId) -> usize {
        self.samples.update(e, |samples| samples.len())
    }
}

impl StatisticsProvider for QuantileProvider {
    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.samples.update(e, |samples| samples.push(affinity));
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.samples.take(from);
        if merged.is_empty() {
            return false;
        }
        self.samples.update(to, |samples| samples.extend(merged));
        true
    }
}

/// Approximate quantile over a 256-bin histogram of the samples of an edge.
///
/// The pivot is 1-based with integer arithmetic, `q * total / 100 + 1`
/// (floor plus one); the query returns the lower bound of the first bin
/// whose cumulative count reaches the pivot. Merging parallel edges adds
/// histograms bin-wise.
///
/// With [`HistogramQuantileProvider::init_with_max`], affinity ingest keeps
/// only samples equal to the running maximum (a strictly larger sample
/// resets the histogram), so initial edges are scored by their maximum
/// affinity while merged edges still aggregate.
#[derive(Debug)]
pub struct HistogramQuantileProvider {
    q: u8,
    keep_max_only: bool,
    histograms: EdgeMap<Histogram>,
    max_seen: EdgeMap<f32>,
}

impl HistogramQuantileProvider {
    /// `q` is a percentile in `0..=100`; every sample is histogrammed.
    pub fn new(graph: &mut RegionGraph, q: u8) -> Self {
        Self::with_mode(graph, q, false)
    }

    /// Like [`Self::new`], but only samples equal to the maximum seen so far
    /// are retained during ingest.
    pub fn init_with_max(graph: &mut RegionGraph, q: u8) -> Self {
        Self::with_mode(graph, q, true)
    }

    fn with_mode(graph: &mut RegionGraph, q: u8, keep_max_only: bool) -> Self {
        assert!(q <= 100, "quantile {q} outside 0..=100");
        Self {
            q,
            keep_max_only,
            histograms: EdgeMap::new(graph),
            max_seen: EdgeMap::new(graph),
        }
    }

    /// Panics if no sample was ever added to `e`.
    pub fn value(&self, e: EdgeId) -> f32 {
        self.histograms.update(e, |hist| {
            assert!(!hist.is_empty(), "quantile of edge {e} with no samples");
            let pivot = u64::from(self.q) * hist.total() / 100 + 1;
            Histogram::value_of(hist.cumulative_bin(pivot))
        })
    }

    pub fn num_samples(&self, e: EdgeId) -> u64 {
        self.histograms.update(e, |hist| hist.total())
    }
}

impl StatisticsProvider for HistogramQuantileProvider {
    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        if self.keep_max_only {
            let max = self.max_seen.get(e);
            if affinity < max {
                return;
            }
            if affinity > max {
                self.max_seen.set(e, affinity);
                self.histograms.update(e, |hist| hist.clear());
            }
        }
        self.histograms
            .update(e, |hist| hist.inc(Histogram::bin_of(affinity)));
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.histograms.take(from);
        if merged.is_empty() {
            return false;
        }
        self.histograms.update(to, |hist| hist.merge(&merged));
        let from_max = self.max_seen.get(from);
        self.max_seen.update(to, |max| *max = max.max(from_max));
        true
    }
}

#[cfg(test)]
mod tests {
    use super::{HistogramQuantileProvider, QuantileProvider};
    use crate::StatisticsProvider;
    use vs_graph::RegionGraph;

    fn seeded_edge(p: &mut impl StatisticsProvider, e: usize, samples: &[f32]) {
        p.notify_new_edge(e);
        for &a in samples {
            p.add_affinity(e, a);
        }
    }

    #[test]
    fn exact_median_of_five() {
        let mut g = RegionGraph::new(3);
        let mut p = QuantileProvider::new(&mut g, 50);
        let e = g.add_edge(1, 2);
        seeded_edge(&mut p, e, &[0.5, 0.1, 0.4, 0.2, 0.3]);

        // index (5 - 1) * 50 / 100 = 2 after selection
        assert_eq!(p.value(e), 0.3);
    }

    #[test]
    fn exact_quantile_extremes() {
        let mut g = RegionGraph::new(3);
        let mut lo = QuantileProvider::new(&mut g, 0);
        let mut hi = QuantileProvider::new(&mut g, 100);
        let e = g.add_edge(1, 2);
        for p in [&mut lo, &mut hi] {
            seeded_edge(p, e, &[0.5, 0.1, 0.4]);
        }

        assert_eq!(lo.value(e), 0.1);
        assert_eq!(hi.value(e), 0.5);
    }

    #[test]
    fn exact_merge_concatenates_samples() {
        let mut g = RegionGraph::new(4);
        let mut p = QuantileProvider::new(&mut g, 50);
        let a = g.add_edge(1, 2);
        let b = g.add_edge(1, 3);
        seeded_edge(&mut p, a, &[0.1, 0.2]);
        seeded_edge(&mut p, b, &[0.3, 0.4, 0.5]);

        assert!(p.notify_edge_merge(b, a));
        assert_eq!(p.num_samples(a), 5);
        assert_eq!(p.num_samples(b), 0);
        assert_eq!(p.value(a), 0.3);
    }

    #[test]
    #[should_panic(expected = "no samples")]
    fn exact_empty_query_panics() {
        let mut g = RegionGraph::new(3);
        let p = QuantileProvider::new(&mut g, 50);
        let e = g.add_edge(1, 2);
        let _ = p.value(e);
    }

    #[test]
    fn histogram_median_within_one_bin() {
        let mut g = RegionGraph::new(3);
        let mut p = HistogramQuantileProvider::new(&mut g, 50);
        let e = g.add_edge(1, 2);
        seeded_edge(&mut p, e, &[0.1, 0.2, 0.3, 0.4, 0.5]);

        assert!((p.value(e) - 0.3).abs() <= 1.0 / 255.0);
    }

    #[test]
    fn histogram_merge_adds_bin_wise() {
        let mut g = RegionGraph::new(4);
        let mut p = HistogramQuantileProvider::new(&mut g, 50);
        let a = g.add_edge(1, 2);
        let b = g.add_edge(1, 3);
        seeded_edge(&mut p, a, &[0.1]);
        seeded_edge(&mut p, b, &[0.8, 0.9]);

        assert!(p.notify_edge_merge(b, a));
        assert_eq!(p.num_samples(a), 3);
        assert!((p.value(a) - 0.8).abs() <= 1.0 / 255.0);
    }

    #[test]
    fn init_with_max_keeps_only_maximal_samples() {
        let mut g = RegionGraph::new(3);
        let mut p = HistogramQuantileProvider::init_with_max(&mut g, 50);
        let e = g.add_edge(1, 2);
        seeded_edge(&mut p, e, &[0.3, 0.7, 0.5, 0.7, 0.2]);

        assert_eq!(p.num_samples(e), 2);
        assert!((p.value(e) - 0.7).abs() <= 1.0 / 255.0);
    }

    #[test]
    fn quantile_converges_on_uniform_samples() {
        use rand::{Rng, SeedableRng};
        use rand_chacha::ChaCha8Rng;

        let mut g = RegionGraph::new(3);
        let mut p = HistogramQuantileProvider::new(&mut g, 75);
        let e = g.add_edge(1, 2);

        let mut rng = ChaCha8Rng::seed_from_u64(7);
        for _ in 0..20_000 {
            p.add_affinity(e, rng.gen_range(0.0f32..1.0));
        }

        assert!((p.value(e) - 0.75).abs() < 0.02);
    }
}
