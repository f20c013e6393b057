use vs_graph::{NodeId, NodeMap, RegionGraph};

use crate::StatisticsProvider;

/// Voxel count per region.
///
/// Fragment sizes are usually seeded from the watershed's per-label counts
/// via [`RegionSizeProvider::from_counts`]; cluster sizes are maintained
/// additively on node merges.
#[derive(Debug)]
pub struct RegionSizeProvider {
    sizes: NodeMap<u64>,
}

impl RegionSizeProvider {
    pub fn new(graph: &mut RegionGraph) -> Self {
        Self {
            sizes: NodeMap::new(graph),
        }
    }

    /// Seeds sizes with one count per existing node (index 0 is background).
    pub fn from_counts(graph: &mut RegionGraph, counts: Vec<u64>) -> Self {
        Self {
            sizes: NodeMap::from_values(graph, counts),
        }
    }

    pub fn size(&self, n: NodeId) -> u64 {
        self.sizes.get(n)
    }
}

impl StatisticsProvider for RegionSizeProvider {
    fn add_voxel(&mut self, n: NodeId, _x: usize, _y: usize, _z: usize) {
        self.sizes.update(n, |s| *s += 1);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) -> bool {
        self.sizes.set(c, self.sizes.get(a) + self.sizes.get(b));
        true
    }
}
