use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use vs_core::Volume;
use vs_graph::{EdgeId, NodeId, RegionGraph};

use crate::score::ScoringFunction;

/// One completed merge: regions `a` and `b` became cluster `c` at `score`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MergeRecord {
    pub a: NodeId,
    pub b: NodeId,
    pub c: NodeId,
    pub score: f32,
}

/// Queue key: cheapest score first, ties broken by ascending edge id.
#[derive(Debug, Clone, Copy)]
struct QueueEntry {
    score: f32,
    edge: EdgeId,
}

impl PartialEq for QueueEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for QueueEntry {}

impl PartialOrd for QueueEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for QueueEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.edge.cmp(&other.edge))
    }
}

/// Cheapest-first region merging over an affinity RAG.
///
/// The engine owns the graph. Edges live in a priority queue keyed by their
/// score at push time; the queue is never purged. Instead, edges carry two
/// flags:
/// - *removed* (on the graph): the edge was consumed by a merge or folded
///   into a parallel edge; popped entries for it are discarded.
/// - *stale*: a neighboring merge changed the statistics under the edge; it
///   is rescored when popped and re-queued.
///
/// Correctness rests on monotone regret: rescoring may only increase a
/// score, so the cheapest live entry at the top of the queue is always
/// trustworthy and no merge below the threshold is missed.
#[derive(Debug)]
pub struct IterativeRegionMerging {
    graph: RegionGraph,
    scores: Vec<f32>,
    stale: Vec<bool>,
    queue: BinaryHeap<Reverse<QueueEntry>>,
    /// Merge-tree parent per node; a self-entry marks a root.
    parent: Vec<NodeId>,
    merged_until: Option<f32>,
    history: Vec<MergeRecord>,
}

impl IterativeRegionMerging {
    /// Takes ownership of a fully built RAG. Edges added to the graph after
    /// this point would not be scored, so build first, merge second.
    pub fn new(graph: RegionGraph) -> Self {
        let num_edges = graph.num_edges();
        let parent = (0..graph.num_nodes()).collect();
        Self {
            graph,
            scores: vec![0.0; num_edges],
            stale: vec![false; num_edges],
            queue: BinaryHeap::new(),
            parent,
            merged_until: None,
            history: Vec::new(),
        }
    }

    pub fn graph(&self) -> &RegionGraph {
        &self.graph
    }

    /// The highest threshold merged so far, if any.
    pub fn merged_until(&self) -> Option<f32> {
        self.merged_until
    }

    /// All merges performed so far, in execution order.
    pub fn merge_history(&self) -> &[MergeRecord] {
        &self.history
    }

    pub fn is_root(&self, n: NodeId) -> bool {
        self.parent[n] == n
    }

    /// Merges regions cheapest-first until the next merge would cost
    /// `threshold` or more.
    ///
    /// Calling with a threshold at or below a previously merged one is a
    /// no-op, so an ascending sweep reproduces the exact merge history of a
    /// single call with the final threshold.
    pub fn merge_until<S: ScoringFunction>(&mut self, scoring: &mut S, threshold: f32) {
        if let Some(done) = self.merged_until
            && threshold <= done
        {
            return;
        }

        if self.merged_until.is_none() {
            for e in 0..self.graph.num_edges() {
                let score = scoring.score(&self.graph, e);
                self.scores[e] = score;
                self.queue.push(Reverse(QueueEntry { score, edge: e }));
            }
        }

        while let Some(&Reverse(top)) = self.queue.peek() {
            if top.score >= threshold {
                break;
            }
            self.queue.pop();

            let e = top.edge;
            if self.graph.is_removed(e) {
                continue;
            }

            if self.stale[e] {
                let rescored = scoring.score(&self.graph, e);
                assert!(
                    rescored >= top.score,
                    "rescored edge {e}: score decreased from {} to {rescored}",
                    top.score,
                );
                self.scores[e] = rescored;
                self.stale[e] = false;
                self.queue.push(Reverse(QueueEntry {
                    score: rescored,
                    edge: e,
                }));
                continue;
            }

            self.merge_step(e, top.score, scoring);
        }

        self.merged_until = Some(threshold);
    }

    /// Merges the endpoints of `e` into a fresh cluster node and rewires
    /// both regions' incident edges onto it.
    fn merge_step<S: ScoringFunction>(&mut self, e: EdgeId, score: f32, scoring: &mut S) {
        let ends = self.graph.edge(e);
        let (a, b) = (ends.u, ends.v);
        debug_assert!(self.is_root(a) && self.is_root(b), "merge of non-root edge");

        let c = self.graph.add_node();
        self.parent.push(c);
        self.parent[a] = c;
        self.parent[b] = c;

        scoring.notify_node_merge(a, b, c);
        self.history.push(MergeRecord { a, b, c, score });

        for x in [a, b] {
            // Snapshot: move_edge appends to other incidence lists while we
            // walk this one.
            let incident = self.graph.inc_edges(x).to_vec();
            for ne in incident {
                if ne == e || self.graph.is_removed(ne) {
                    continue;
                }
                let ends = self.graph.edge(ne);
                if ends.u != x && ends.v != x {
                    // Entry left behind by an earlier move.
                    continue;
                }
                let y = if ends.u == x { ends.v } else { ends.u };
                debug_assert!(self.is_root(y), "live edge to non-root {y}");

                match self.graph.find_edge(c, y) {
                    None => {
                        // First sighting of this neighbor.
                        self.graph.move_edge(ne, c, y);
                        self.stale[ne] = true;
                    }
                    Some(prev) => {
                        // Second sighting: fold the parallel pair into the
                        // cheaper edge.
                        let keep_ne = match self.scores[ne].total_cmp(&self.scores[prev]) {
                            Ordering::Less => true,
                            Ordering::Greater => false,
                            Ordering::Equal => ne < prev,
                        };
                        let (keep, drop) = if keep_ne { (ne, prev) } else { (prev, ne) };

                        scoring.notify_edge_merge(drop, keep);
                        if keep == ne {
                            self.graph.move_edge(ne, c, y);
                        }
                        self.graph.remove_edge(drop);
                        self.stale[keep] = true;
                    }
                }
            }
        }

        self.graph.remove_edge(e);
    }

    /// The current cluster containing `id`, compressing the walked path.
    pub fn get_root(&mut self, id: NodeId) -> NodeId {
        let mut root = id;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        let mut walk = id;
        while self.parent[walk] != root {
            let next = self.parent[walk];
            self.parent[walk] = root;
            walk = next;
        }

        root
    }

    /// Relabels every voxel to the root of its current label.
    ///
    /// The volume must hold the initial fragment labels or labels produced
    /// by a previous extraction; an unseen label panics.
    pub fn extract_segmentation(&mut self, segmentation: &mut Volume<u64>) {
        for label in segmentation.data_mut() {
            *label = self.get_root(*label as NodeId) as u64;
        }
    }
}
