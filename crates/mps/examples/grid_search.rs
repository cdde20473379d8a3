//! Search probe on a triangulated grid with random long chords.
//!
//! Purpose
//! - The grid part is planar, the chords are not, so the result shows how
//!   many chords the search manages to keep compared with the plain order.
//!
//! Usage: `cargo run --release --example grid_search -- [side] [chords] [iterations]`

use std::time::Instant;

use mps::api::{search, Graph, SearchCfg};
use rand::{rngs::StdRng, Rng, SeedableRng};

fn grid_with_chords(side: usize, chords: usize, seed: u64) -> Graph {
    let id = |r: usize, c: usize| r * side + c;
    let mut edges = Vec::new();
    for r in 0..side {
        for c in 0..side {
            if c + 1 < side {
                edges.push((id(r, c), id(r, c + 1)));
            }
            if r + 1 < side {
                edges.push((id(r, c), id(r + 1, c)));
            }
            if r + 1 < side && c + 1 < side {
                edges.push((id(r, c), id(r + 1, c + 1)));
            }
        }
    }
    let n = side * side;
    let mut rng = StdRng::seed_from_u64(seed);
    edges.extend((0..chords).map(|_| (rng.gen_range(0..n), rng.gen_range(0..n))));
    Graph::new(n, edges).expect("grid ids are in range")
}

fn main() {
    let args: Vec<usize> = std::env::args().skip(1).filter_map(|a| a.parse().ok()).collect();
    let side = args.first().copied().unwrap_or(30);
    let chords = args.get(1).copied().unwrap_or(200);
    let iterations = args.get(2).copied().unwrap_or(200);

    let g = grid_with_chords(side, chords, 2024);
    let cfg = SearchCfg {
        iterations,
        ..SearchCfg::default()
    };
    let start = Instant::now();
    let out = search(&g, &cfg).expect("default config is valid");
    let elapsed = start.elapsed().as_secs_f64() * 1e3;

    println!(
        "vertices={} edges={} iterations={iterations}",
        g.vertex_count(),
        g.edge_count()
    );
    println!(
        "initial_removed={} best_removed={} improvement={}",
        out.initial_removed,
        out.removed,
        out.initial_removed - out.removed
    );
    println!("search_time_ms={elapsed:.3}");
}
