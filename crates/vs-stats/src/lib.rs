//! Per-edge and per-node statistics for region merging.
//!
//! A statistics provider maintains one scalar (or small aggregate) per RAG
//! edge or node and keeps it consistent across merges. Providers receive
//! affinity samples while the RAG is extracted and fold their state when the
//! merging engine collapses nodes or parallel edges.
//!
//! [`StatisticsProvider`] is a capability set with no-op defaults: a
//! provider overrides exactly the callbacks it cares about. Tuples of
//! providers forward every callback to each element, which is how compound
//! statistics are assembled without dynamic dispatch.

mod affinity;
mod histogram;
mod maxk;
mod quantile;
mod random;
mod size;

pub use affinity::{MaxAffinityProvider, MeanAffinityProvider, MinAffinityProvider};
pub use histogram::{HISTOGRAM_BINS, Histogram};
pub use maxk::MaxKAffinityProvider;
pub use quantile::{HistogramQuantileProvider, QuantileProvider};
pub use random::RandomProvider;
pub use size::RegionSizeProvider;

use vs_graph::{EdgeId, NodeId};

/// Callbacks a statistics provider may handle.
///
/// The merge callbacks report whether the fold changed the provider's state
/// in a way that can affect a dependent score.
pub trait StatisticsProvider {
    /// A new RAG edge `e` exists; initialize its state.
    fn notify_new_edge(&mut self, _e: EdgeId) {}

    /// Accumulate one raw affinity sample into `e`.
    fn add_affinity(&mut self, _e: EdgeId, _affinity: f32) {}

    /// Accumulate one voxel into node `n`.
    fn add_voxel(&mut self, _n: NodeId, _x: usize, _y: usize, _z: usize) {}

    /// Nodes `a` and `b` were merged into the new node `c`.
    fn notify_node_merge(&mut self, _a: NodeId, _b: NodeId, _c: NodeId) -> bool {
        false
    }

    /// The parallel edge `from` is folded into `to`.
    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) -> bool {
        false
    }
}

impl<A, B> StatisticsProvider for (A, B)
where
    A: StatisticsProvider,
    B: StatisticsProvider,
{
    fn notify_new_edge(&mut self, e: EdgeId) {
        self.0.notify_new_edge(e);
        self.1.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.0.add_affinity(e, affinity);
        self.1.add_affinity(e, affinity);
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.0.add_voxel(n, x, y, z);
        self.1.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) -> bool {
        let first = self.0.notify_node_merge(a, b, c);
        let second = self.1.notify_node_merge(a, b, c);
        first || second
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let first = self.0.notify_edge_merge(from, to);
        let second = self.1.notify_edge_merge(from, to);
        first || second
    }
}

impl<A, B, C> StatisticsProvider for (A, B, C)
where
    A: StatisticsProvider,
    B: StatisticsProvider,
    C: StatisticsProvider,
{
    fn notify_new_edge(&mut self, e: EdgeId) {
        self.0.notify_new_edge(e);
        self.1.notify_new_edge(e);
        self.2.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.0.add_affinity(e, affinity);
        self.1.add_affinity(e, affinity);
        self.2.add_affinity(e, affinity);
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.0.add_voxel(n, x, y, z);
        self.1.add_voxel(n, x, y, z);
        self.2.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) -> bool {
        let first = self.0.notify_node_merge(a, b, c);
        let second = self.1.notify_node_merge(a, b, c);
        let third = self.2.notify_node_merge(a, b, c);
        first || second || third
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) -> bool {
        let first = self.0.notify_edge_merge(from, to);
        let second = self.1.notify_edge_merge(from, to);
        let third = self.2.notify_edge_merge(from, to);
        first || second || third
    }
}

#[cfg(test)]
mod tests {
    use super::{MaxAffinityProvider, MinAffinityProvider, StatisticsProvider};
    use vs_graph::RegionGraph;

    #[test]
    fn tuple_forwards_to_every_element() {
        let mut g = RegionGraph::new(3);
        let mut compound = (
            MaxAffinityProvider::new(&mut g),
            MinAffinityProvider::new(&mut g),
        );

        let e = g.add_edge(1, 2);
        compound.notify_new_edge(e);
        compound.add_affinity(e, 0.25);
        compound.add_affinity(e, 0.75);

        assert_eq!(compound.0.value(e), 0.75);
        assert_eq!(compound.1.value(e), 0.25);
    }

    #[test]
    fn tuple_merge_result_is_any_change() {
        let mut g = RegionGraph::new(4);
        let mut compound = (
            MaxAffinityProvider::new(&mut g),
            MinAffinityProvider::new(&mut g),
        );

        let keep = g.add_edge(1, 2);
        let drop = g.add_edge(1, 3);
        compound.notify_new_edge(keep);
        compound.notify_new_edge(drop);
        compound.add_affinity(keep, 0.5);
        compound.add_affinity(drop, 0.5);

        // Equal statistics: neither provider reports a change.
        assert!(!compound.notify_edge_merge(drop, keep));

        let lower = g.add_edge(2, 3);
        compound.notify_new_edge(lower);
        compound.add_affinity(lower, 0.1);

        // The min provider changes even though the max provider does not.
        assert!(compound.notify_edge_merge(lower, keep));
    }
}
