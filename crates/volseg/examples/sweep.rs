//! Example: agglomeration sweep over a synthetic affinity volume.
//!
//! Builds a block-structured fragment volume (an artificial watershed
//! over-segmentation), derives boundary affinities from a coarser "true
//! object" partition plus noise, extracts the region adjacency graph, and
//! runs the merging engine over an ascending list of score thresholds.
//!
//! Region counts per threshold and total timing are printed to stdout; an
//! optional JSON summary can be written to a given path.
//!
//! Run from the workspace root:
//!   cargo run -p volseg --example sweep -- --help
//!   cargo run -p volseg --example sweep -- --size 32 --thresholds 2,8,32,128

use std::collections::{HashMap, HashSet};
use std::fs;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use volseg::{RegionGraph, ScoringFunction, ThresholdSweep, Volume, default_scoring};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(about = "Run an agglomeration sweep on a synthetic affinity volume")]
struct Args {
    /// Cubic volume side length (voxels)
    #[arg(long, default_value_t = 24)]
    size: usize,

    /// Fragment block side length (the artificial over-segmentation)
    #[arg(long, default_value_t = 4)]
    fragment_size: usize,

    /// True object block side length (drives the affinities)
    #[arg(long, default_value_t = 8)]
    object_size: usize,

    /// Comma-separated ascending score thresholds
    #[arg(long, default_value = "1,4,16,64", value_delimiter = ',')]
    thresholds: Vec<f32>,

    /// RNG seed for the affinity noise
    #[arg(long, default_value_t = 7)]
    seed: u64,

    /// Output JSON path (optional)
    #[arg(long)]
    out: Option<String>,
}

// ── JSON DTOs ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct LevelDto {
    threshold: f32,
    num_regions: usize,
}

#[derive(Serialize)]
struct SummaryDto {
    size: usize,
    num_fragments: usize,
    num_edges: usize,
    num_merges: usize,
    levels: Vec<LevelDto>,
}

fn main() -> Result<()> {
    let args = Args::parse();
    anyhow::ensure!(args.size > 0, "--size must be positive");
    anyhow::ensure!(
        args.fragment_size > 0 && args.object_size > 0,
        "block sizes must be positive"
    );

    let total = Instant::now();

    let (fragments, num_fragments) = fragment_volume(args.size, args.fragment_size);
    println!(
        "fragment volume: {0}x{0}x{0}, {1} fragments",
        args.size, num_fragments
    );

    // Region graph extraction: one edge per adjacent fragment pair, fed with
    // one affinity sample per boundary voxel pair.
    let build_start = Instant::now();
    let mut graph = RegionGraph::new(num_fragments + 1);
    let counts = fragment_counts(&fragments, num_fragments);
    let mut scoring = default_scoring(&mut graph, counts);
    let num_edges = extract_region_graph(&fragments, &args, &mut graph, &mut scoring);
    println!(
        "region graph: {} edges ({:.1} ms)",
        num_edges,
        build_start.elapsed().as_secs_f64() * 1e3
    );

    let merging = volseg::IterativeRegionMerging::new(graph);
    let mut levels = Vec::with_capacity(args.thresholds.len());

    let mut sweep = ThresholdSweep::new(merging, scoring, fragments, args.thresholds.clone());
    while let Some((threshold, segmentation)) = sweep.next() {
        let level_start = Instant::now();
        let num_regions = count_regions(&segmentation);
        println!(
            "threshold {threshold:>8.1}: {num_regions:>6} regions ({:.1} ms)",
            level_start.elapsed().as_secs_f64() * 1e3
        );
        levels.push(LevelDto {
            threshold,
            num_regions,
        });
    }

    let num_merges = sweep.merging().merge_history().len();
    println!(
        "total: {} merges, {:.1} ms",
        num_merges,
        total.elapsed().as_secs_f64() * 1e3
    );

    if let Some(path) = &args.out {
        let summary = SummaryDto {
            size: args.size,
            num_fragments,
            num_edges,
            num_merges,
            levels,
        };
        let json = serde_json::to_string_pretty(&summary)?;
        fs::write(path, json).with_context(|| format!("writing {path}"))?;
        println!("wrote {path}");
    }

    Ok(())
}

/// Labels each `fragment_size`-cubed block with its own id, starting at 1.
fn fragment_volume(size: usize, fragment_size: usize) -> (Volume<u64>, usize) {
    let blocks = size.div_ceil(fragment_size);
    let mut volume = Volume::new_fill(size, size, size, 0u64);

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let block = ((z / fragment_size) * blocks + y / fragment_size) * blocks
                    + x / fragment_size;
                *volume.get_mut(x, y, z).expect("in bounds") = block as u64 + 1;
            }
        }
    }

    (volume, blocks * blocks * blocks)
}

fn fragment_counts(fragments: &Volume<u64>, num_fragments: usize) -> Vec<u64> {
    let mut counts = vec![0u64; num_fragments + 1];
    for &label in fragments.data() {
        counts[label as usize] += 1;
    }
    counts
}

/// Scans +x/+y/+z voxel pairs with differing labels and feeds the scoring
/// function one affinity sample per boundary crossing.
fn extract_region_graph(
    fragments: &Volume<u64>,
    args: &Args,
    graph: &mut RegionGraph,
    scoring: &mut impl ScoringFunction,
) -> usize {
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);
    let mut edge_ids: HashMap<(u64, u64), usize> = HashMap::new();
    let size = args.size;

    let object = |x: usize, y: usize, z: usize| {
        let blocks = size.div_ceil(args.object_size);
        ((z / args.object_size) * blocks + y / args.object_size) * blocks + x / args.object_size
    };

    for z in 0..size {
        for y in 0..size {
            for x in 0..size {
                let label = *fragments.get(x, y, z).expect("in bounds");
                for (nx, ny, nz) in [(x + 1, y, z), (x, y + 1, z), (x, y, z + 1)] {
                    let Some(&neighbor) = fragments.get(nx, ny, nz) else {
                        continue;
                    };
                    if neighbor == label || neighbor == 0 || label == 0 {
                        continue;
                    }

                    let same_object = object(x, y, z) == object(nx, ny, nz);
                    let base = if same_object { 0.9 } else { 0.1 };
                    let affinity: f32 = (base + rng.gen_range(-0.05f32..0.05)).clamp(0.0, 1.0);

                    let key = (label.min(neighbor), label.max(neighbor));
                    let edge = *edge_ids.entry(key).or_insert_with(|| {
                        let e = graph.add_edge(key.0 as usize, key.1 as usize);
                        scoring.notify_new_edge(e);
                        e
                    });
                    scoring.add_affinity(edge, affinity);
                }
            }
        }
    }

    edge_ids.len()
}

fn count_regions(segmentation: &Volume<u64>) -> usize {
    let labels: HashSet<u64> = segmentation.data().iter().copied().collect();
    labels.len()
}
