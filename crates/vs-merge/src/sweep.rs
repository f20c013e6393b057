use vs_core::Volume;
use vs_graph::RegionGraph;
use vs_stats::{MaxAffinityProvider, RegionSizeProvider};

use crate::merging::IterativeRegionMerging;
use crate::operators::{Multiply, OneMinus, multiply, one_minus};
use crate::score::{MaxAffinity, MinSize, ScoringFunction};

/// The canonical scoring: `(1 - max affinity) * min size`.
///
/// Edges between small, weakly connected regions merge first; edges between
/// large, strongly connected pairs last.
pub type DefaultScoring = Multiply<OneMinus<MaxAffinity>, MinSize>;

/// Builds [`DefaultScoring`] with its providers registered on `graph`.
///
/// `counts` holds one voxel count per node (index 0 is background), as
/// produced by the watershed.
pub fn default_scoring(graph: &mut RegionGraph, counts: Vec<u64>) -> DefaultScoring {
    multiply(
        one_minus(MaxAffinity::new(MaxAffinityProvider::new(graph))),
        MinSize::new(RegionSizeProvider::from_counts(graph, counts)),
    )
}

/// Drives an ascending threshold sequence and materializes one segmentation
/// per threshold.
///
/// The carried volume starts as the fragment labeling and is relabeled in
/// place at every step, so each segmentation continues from the previous
/// one and only one volume is live at a time; iteration yields clones.
#[derive(Debug)]
pub struct ThresholdSweep<S> {
    merging: IterativeRegionMerging,
    scoring: S,
    segmentation: Volume<u64>,
    thresholds: std::vec::IntoIter<f32>,
}

impl<S: ScoringFunction> ThresholdSweep<S> {
    pub fn new(
        merging: IterativeRegionMerging,
        scoring: S,
        fragments: Volume<u64>,
        thresholds: Vec<f32>,
    ) -> Self {
        Self {
            merging,
            scoring,
            segmentation: fragments,
            thresholds: thresholds.into_iter(),
        }
    }

    /// Access to the engine, e.g. for the merge history.
    pub fn merging(&self) -> &IterativeRegionMerging {
        &self.merging
    }
}

impl<S: ScoringFunction> Iterator for ThresholdSweep<S> {
    type Item = (f32, Volume<u64>);

    fn next(&mut self) -> Option<Self::Item> {
        let threshold = self.thresholds.next()?;
        self.merging.merge_until(&mut self.scoring, threshold);
        self.merging.extract_segmentation(&mut self.segmentation);
        Some((threshold, self.segmentation.clone()))
    }
}
