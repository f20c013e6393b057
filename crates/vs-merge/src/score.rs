use vs_graph::{EdgeId, NodeId, RegionGraph};
use vs_stats::{
    HistogramQuantileProvider, MaxAffinityProvider, MaxKAffinityProvider, MeanAffinityProvider,
    MinAffinityProvider, QuantileProvider, RandomProvider, RegionSizeProvider, StatisticsProvider,
};

/// An edge scoring function: lower scores merge earlier.
///
/// A scorer owns the statistics it reads and receives the same callbacks as
/// a statistics provider, so one object serves both the RAG-construction
/// pass (ingest callbacks) and the merging engine (merge callbacks).
///
/// With no intervening merge, two `score` calls for the same edge return the
/// same value. After a merge step completes, `score` reflects the merged
/// regions and may only have increased for edges the merge touched.
pub trait ScoringFunction {
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32;

    fn notify_new_edge(&mut self, _e: EdgeId) {}
    fn add_affinity(&mut self, _e: EdgeId, _affinity: f32) {}
    fn add_voxel(&mut self, _n: NodeId, _x: usize, _y: usize, _z: usize) {}
    fn notify_node_merge(&mut self, _a: NodeId, _b: NodeId, _c: NodeId) {}
    fn notify_edge_merge(&mut self, _from: EdgeId, _to: EdgeId) {}
}

/// Size of the smaller of the two regions an edge connects.
#[derive(Debug)]
pub struct MinSize {
    sizes: RegionSizeProvider,
}

impl MinSize {
    pub fn new(sizes: RegionSizeProvider) -> Self {
        Self { sizes }
    }

    pub fn sizes(&self) -> &RegionSizeProvider {
        &self.sizes
    }
}

impl ScoringFunction for MinSize {
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32 {
        let edge = graph.edge(e);
        self.sizes.size(edge.u).min(self.sizes.size(edge.v)) as f32
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.sizes.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        self.sizes.notify_node_merge(a, b, c);
    }
}

/// Size of the larger of the two regions an edge connects.
#[derive(Debug)]
pub struct MaxSize {
    sizes: RegionSizeProvider,
}

impl MaxSize {
    pub fn new(sizes: RegionSizeProvider) -> Self {
        Self { sizes }
    }

    pub fn sizes(&self) -> &RegionSizeProvider {
        &self.sizes
    }
}

impl ScoringFunction for MaxSize {
    fn score(&mut self, graph: &RegionGraph, e: EdgeId) -> f32 {
        let edge = graph.edge(e);
        self.sizes.size(edge.u).max(self.sizes.size(edge.v)) as f32
    }

    fn add_voxel(&mut self, n: NodeId, x: usize, y: usize, z: usize) {
        self.sizes.add_voxel(n, x, y, z);
    }

    fn notify_node_merge(&mut self, a: NodeId, b: NodeId, c: NodeId) {
        self.sizes.notify_node_merge(a, b, c);
    }
}

/// Maximum affinity between the two regions.
#[derive(Debug)]
pub struct MaxAffinity {
    affinities: MaxAffinityProvider,
}

impl MaxAffinity {
    pub fn new(affinities: MaxAffinityProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for MaxAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn notify_new_edge(&mut self, e: EdgeId) {
        self.affinities.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// Minimum affinity between the two regions.
#[derive(Debug)]
pub struct MinAffinity {
    affinities: MinAffinityProvider,
}

impl MinAffinity {
    pub fn new(affinities: MinAffinityProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for MinAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn notify_new_edge(&mut self, e: EdgeId) {
        self.affinities.notify_new_edge(e);
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// Mean affinity between the two regions.
#[derive(Debug)]
pub struct MeanAffinity {
    affinities: MeanAffinityProvider,
}

impl MeanAffinity {
    pub fn new(affinities: MeanAffinityProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for MeanAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// Exact `q`-quantile of the affinities between the two regions.
#[derive(Debug)]
pub struct QuantileAffinity {
    affinities: QuantileProvider,
}

impl QuantileAffinity {
    pub fn new(affinities: QuantileProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for QuantileAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// Approximate `q`-quantile of the affinities, from a per-edge histogram.
#[derive(Debug)]
pub struct HistogramQuantileAffinity {
    affinities: HistogramQuantileProvider,
}

impl HistogramQuantileAffinity {
    pub fn new(affinities: HistogramQuantileProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for HistogramQuantileAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// Mean of the `k` largest affinities between the two regions.
#[derive(Debug)]
pub struct MaxKAffinity {
    affinities: MaxKAffinityProvider,
}

impl MaxKAffinity {
    pub fn new(affinities: MaxKAffinityProvider) -> Self {
        Self { affinities }
    }
}

impl ScoringFunction for MaxKAffinity {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.affinities.value(e)
    }

    fn add_affinity(&mut self, e: EdgeId, affinity: f32) {
        self.affinities.add_affinity(e, affinity);
    }

    fn notify_edge_merge(&mut self, from: EdgeId, to: EdgeId) {
        self.affinities.notify_edge_merge(from, to);
    }
}

/// A per-edge random score in `[0, 1)`.
#[derive(Debug)]
pub struct Random {
    values: RandomProvider,
}

impl Random {
    pub fn new(values: RandomProvider) -> Self {
        Self { values }
    }
}

impl ScoringFunction for Random {
    fn score(&mut self, _graph: &RegionGraph, e: EdgeId) -> f32 {
        self.values.value(e)
    }
}

/// A constant score.
#[derive(Debug, Clone, Copy)]
pub struct Constant {
    value: f32,
}

impl Constant {
    pub fn new(value: f32) -> Self {
        Self { value }
    }
}

impl ScoringFunction for Constant {
    fn score(&mut self, _graph: &RegionGraph, _e: EdgeId) -> f32 {
        self.value
    }
}
