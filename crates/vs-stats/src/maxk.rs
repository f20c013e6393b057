use vs_graph::{EdgeId, EdgeMap, RegionGraph};

use crate::StatisticsProvider;

/// The `k` largest affinity samples of each edge; the read-out is their mean.
///
/// `k` is small, so the retained samples live in a bounded vector and a new
/// sample evicts the current minimum.
#[derive(Debug)]
pub struct MaxKAffinityProvider {
    k: usize,
    retained: EdgeMap<Vec<f32>>,
}

impl MaxKAffinityProvider {
    pub fn new(graph: &mut RegionGraph, k: usize) -> Self {
        assert!(k > 0, "k must be positive");
        Self {
            k,
            retained: EdgeMap::new(graph),
        }
    }

    /// Mean of the retained samples. Panics if no sample was ever added.
    pub fn value(&self, e: EdgeId) -> f32 {
        self.retained.update(e, |retained| {
            assert!(
                !retained.is_empty(),
                "top-k affinity of edge {e} with no samples"
            );
            retained.iter().sum::<f32>() / retained.len() as f32
        })
    }

    pub fn num_samples(&self, e: EdgeId) -> usize {
        self.retained.update(e, |retained| retained.len())
    }

    fn insert(k: usize, retained: &mut Vec<f32>, affinity: f32) {
        if retained.len() < k {
            retained.push(affinity);
            return;
        }

        let (min_idx, &min) = retained
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| a.total_cmp(b))
            .expect("k is positive");
        if affinity > min {
            retained[min_idx] = affinity;
        }
    }
}

impl StatisticsProvider for MaxKAffinityProvider {
    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        let k = self.k;
        self.retained
            .update(e, |retained| Self::insert(k, retained, affinity));
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.retained.take(from);
        if merged.is_empty() {
            return false;
        }
        let k = self.k;
        self.retained.update(to, |retained| {
            for affinity in merged {
                Self::insert(k, retained, affinity);
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::MaxKAffinityProvider;
    use crate::StatisticsProvider;
    use vs_graph::RegionGraph;

    #[test]
    fn mean_of_top_k() {
        let mut g = RegionGraph::new(3);
        let mut p = MaxKAffinityProvider::new(&mut g, 2);
        let e = g.add_edge(1, 2);

        for a in [0.1, 0.9, 0.5, 0.7, 0.2] {
            p.add_affinity(e, a);
        }

        assert_eq!(p.num_samples(e), 2);
        assert!((p.value(e) - 0.8).abs() < 1e-6);
    }

    #[test]
    fn fewer_samples_than_k() {
        let mut g = RegionGraph::new(3);
        let mut p = MaxKAffinityProvider::new(&mut g, 4);
        let e = g.add_edge(1, 2);

        p.add_affinity(e, 0.2);
        p.add_affinity(e, 0.4);
        assert!((p.value(e) - 0.3).abs() < 1e-6);
    }

    #[test]
    fn merge_keeps_k_largest_of_union() {
        let mut g = RegionGraph::new(4);
        let mut p = MaxKAffinityProvider::new(&mut g, 2);
        let a = g.add_edge(1, 2);
        let b = g.add_edge(1, 3);

        p.add_affinity(a, 0.3);
        p.add_affinity(a, 0.6);
        p.add_affinity(b, 0.8);
        p.add_affinity(b, 0.1);

        assert!(p.notify_edge_merge(b, a));
        assert!((p.value(a) - 0.7).abs() < 1e-6);
        assert_eq!(p.num_samples(b), 0);
    }
}
