//! Region adjacency graph (RAG) over segmentation fragments.
//!
//! The graph keeps dense integer node and edge ids and never reuses an id:
//! - Nodes are fragments (`1..=N`, `0` reserved for background) plus clusters
//!   appended by merges.
//! - Edges are removed logically via a flag; incidence lists are pruned
//!   lazily, so readers must re-check endpoints and removal flags.
//! - [`NodeMap`]/[`EdgeMap`] attribute maps subscribe to graph growth and
//!   extend themselves by one default slot per new node/edge.
//!
//! Edge retargeting ([`RegionGraph::move_edge`]) updates the incidence lists
//! of the new endpoints eagerly so that a subsequent
//! [`RegionGraph::find_edge`] sees already-moved edges. Entries left behind
//! in the old endpoints' lists go stale and are skipped on read.

mod graph;
mod maps;

pub use graph::{Edge, EdgeId, NodeId, RegionGraph};
pub use maps::{EdgeMap, NodeMap};

pub(crate) use maps::GrowSlot;
