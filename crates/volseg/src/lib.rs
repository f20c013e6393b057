//! Umbrella crate for the `volseg` workspace.
//!
//! Re-exports the region graph, statistics providers, scoring functions,
//! and the iterative merging engine as a single dependency.

pub use vs_core::*;
pub use vs_graph::*;
pub use vs_merge::*;
pub use vs_stats::*;
