//! Cheapest-first iterative region merging.
//!
//! Core strategy:
//! - Score every RAG edge with a composable [`ScoringFunction`] and keep all
//!   edges in a min-heap (ties broken by ascending edge id).
//! - Pop the cheapest edge and merge its endpoint regions into a new cluster
//!   node; surviving incident edges are *moved* to the cluster and marked
//!   stale instead of being rescored eagerly.
//! - Parallel edges created by a merge collapse optimistically: the first
//!   sighting of a neighbor moves the edge, the second folds into whichever
//!   of the two scores lower.
//! - Stale edges rescore lazily when they surface at the top of the queue.
//!   A merge can only raise an edge's true score (monotone regret), so no
//!   merge below the threshold is ever missed.
//!
//! [`merge_until`](IterativeRegionMerging::merge_until) runs the loop up to
//! a score threshold; [`ThresholdSweep`] drives an ascending sequence of
//! thresholds and materializes one segmentation per threshold.

mod merging;
mod operators;
mod score;
mod sweep;

pub use merging::{IterativeRegionMerging, MergeRecord};
pub use operators::{
    Add, BinaryOp, BinaryOperator, Divide, Invert, Multiply, OneMinus, Square, UnaryOp,
    UnaryOperator, add, divide, invert, multiply, one_minus, square,
};
pub use score::{
    Constant, HistogramQuantileAffinity, MaxAffinity, MaxKAffinity, MaxSize, MeanAffinity,
    MinAffinity, MinSize, QuantileAffinity, Random, ScoringFunction,
};
pub use sweep::{DefaultScoring, ThresholdSweep, default_scoring};
