use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use vs_graph::{EdgeId, EdgeMap, RegionGraph};

use crate::StatisticsProvider;

/// A random value in `[0, 1)` per edge.
///
/// The draw happens lazily on first read and is cached for the lifetime of
/// the edge, so repeated reads (in particular stale rescores) observe the
/// same value and scores based on it never decrease. The stream is
/// deterministic for a given seed.
#[derive(Debug)]
pub struct RandomProvider {
    rng: ChaCha8Rng,
    drawn: EdgeMap<Option<f32>>,
}

impl RandomProvider {
    pub fn new(graph: &mut RegionGraph, seed: u64) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            drawn: EdgeMap::new(graph),
        }
    }

    pub fn value(&mut self, e: EdgeId) -> f32 {
        if let Some(value) = self.drawn.get(e) {
            return value;
        }
        let value = self.rng.gen_range(0.0f32..1.0);
        self.drawn.set(e, Some(value));
        value
    }
}

// The surviving edge of a merge keeps its draw; a redraw could lower a
// score that is already queued.
impl StatisticsProvider for RandomProvider {}
