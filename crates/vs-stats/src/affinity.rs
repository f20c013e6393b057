use vs_graph::{EdgeId, EdgeMap, RegionGraph};

use crate::StatisticsProvider;

/// Maximum affinity sample seen on each edge.
#[derive(Debug)]
pub struct MaxAffinityProvider {
    values: EdgeMap<f32>,
}

impl MaxAffinityProvider {
    pub fn new(graph: &mut RegionGraph) -> Self {
        Self {
            values: EdgeMap::new(graph),
        }
    }

    pub fn value(&self, e: EdgeId) -> f32 {
        self.values.get(e)
    }
}

impl StatisticsProvider for MaxAffinityProvider {
    fn notify_new_edge(&mut self, e: EdgeId) {
        self.values.set(e, 0.0);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.values.update(e, |v| *v = v.max(affinity));
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.values.get(from);
        if self.values.get(to) >= merged {
            return false;
        }
        self.values.set(to, merged);
        true
    }
}

/// Minimum affinity sample seen on each edge.
#[derive(Debug)]
pub struct MinAffinityProvider {
    values: EdgeMap<f32>,
}

impl MinAffinityProvider {
    pub fn new(graph: &mut RegionGraph) -> Self {
        Self {
            values: EdgeMap::new(graph),
        }
    }

    pub fn value(&self, e: EdgeId) -> f32 {
        self.values.get(e)
    }
}

impl StatisticsProvider for MinAffinityProvider {
    fn notify_new_edge(&mut self, e: EdgeId) {
        self.values.set(e, f32::INFINITY);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.values.update(e, |v| *v = v.min(affinity));
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.values.get(from);
        if self.values.get(to) <= merged {
            return false;
        }
        self.values.set(to, merged);
        true
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct MeanAcc {
    sum: f32,
    count: u32,
}

/// Mean of all affinity samples contributing to an edge.
#[derive(Debug)]
pub struct MeanAffinityProvider {
    values: EdgeMap<MeanAcc>,
}

impl MeanAffinityProvider {
    pub fn new(graph: &mut RegionGraph) -> Self {
        Self {
            values: EdgeMap::new(graph),
        }
    }

    /// Panics if no sample was ever added to `e`.
    pub fn value(&self, e: EdgeId) -> f32 {
        let acc = self.values.get(e);
        assert!(acc.count > 0, "mean affinity of edge {e} with no samples");
        acc.sum / acc.count as f32
    }
}

impl StatisticsProvider for MeanAffinityProvider {
    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.values.update(e, |acc| {
            acc.sum += affinity;
            acc.count += 1;
        });
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let merged = self.values.get(from);
        if merged.count == 0 {
            return false;
        }
        self.values.update(to, |acc| {
            acc.sum += merged.sum;
            acc.count += merged.count;
        });
        true
    }
}
