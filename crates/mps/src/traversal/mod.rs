//! Traversal engine: plain, guided and mutated DFS post-orders.
//!
//! Purpose
//! - Number every original entity with a post-order index and set its DFS
//!   parent. This is the only place that writes either field for a run.
//!
//! Model
//! - All modes share one iterative stack skeleton (`dfs.rs`); they differ in
//!   how the neighbors of an expanded entity are ordered and in root choice.
//! - Guided replay sorts neighbors by their position in the reversed
//!   reference order. Because a reference post-order lists each root last
//!   within its component, replaying it reproduces the same spanning forest.
//! - Mutated replay follows the guided order for the first `mutate_point`
//!   expansions and then prefers neighbors with few unmarked neighbors of
//!   their own, shuffling the first half of that ranking.

mod dfs;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::entity::{Arena, EntityId};
use crate::error::{MpsError, Result};

use dfs::Dfs;

/// Check that `order` is a permutation of `0..n`.
pub fn validate_order(n: usize, order: &[usize]) -> Result<()> {
    if order.len() != n {
        return Err(MpsError::order(format!(
            "expected {n} entries, got {}",
            order.len()
        )));
    }
    let mut seen = vec![false; n];
    for &v in order {
        if v >= n {
            return Err(MpsError::order(format!("vertex {v} out of range")));
        }
        if std::mem::replace(&mut seen[v], true) {
            return Err(MpsError::order(format!("vertex {v} listed twice")));
        }
    }
    Ok(())
}

/// Position of every vertex in the reversed reference order.
fn replay_positions(order: &[usize]) -> Vec<usize> {
    let mut pos = vec![0; order.len()];
    for (j, &v) in order.iter().rev().enumerate() {
        pos[v] = j;
    }
    pos
}

/// Plain DFS: adjacency order as stored, roots in ascending vertex id.
pub(crate) fn plain(arena: &mut Arena) -> Vec<EntityId> {
    let n = arena.originals();
    let mut dfs = Dfs::new(arena);
    let mut order = |a: &Arena, u: EntityId| a[u].adj.clone();
    for v in 0..n {
        if !dfs.is_marked(v) {
            dfs.visit(v, &mut order);
        }
    }
    dfs.finish()
}

/// Guided DFS replaying a validated reference order.
pub(crate) fn guided(arena: &mut Arena, reference: &[usize]) -> Vec<EntityId> {
    let pos = replay_positions(reference);
    let mut order = |a: &Arena, u: EntityId| {
        let mut nbrs = a[u].adj.clone();
        nbrs.sort_by_key(|w| pos[w.0]);
        nbrs
    };
    let first = reference.last().copied();
    run_replay(arena, reference, first, &mut order)
}

/// Mutated DFS. `mutate_point >= n` never triggers the mutation.
pub(crate) fn mutated<R: Rng + ?Sized>(
    arena: &mut Arena,
    reference: &[usize],
    mutate_point: usize,
    rng: &mut R,
) -> Vec<EntityId> {
    let pos = replay_positions(reference);
    let first = if mutate_point == 0 {
        reference.choose(rng).copied()
    } else {
        reference.last().copied()
    };
    let mut expanded = 0usize;
    let mut order = |a: &Arena, u: EntityId| {
        let mut nbrs = a[u].adj.clone();
        if expanded >= mutate_point {
            nbrs.sort_by_cached_key(|&w| unmarked_neighbors(a, w));
            let half = nbrs.len() / 2;
            nbrs[..half].shuffle(&mut *rng);
        } else {
            nbrs.sort_by_key(|w| pos[w.0]);
        }
        expanded += 1;
        nbrs
    };
    run_replay(arena, reference, first, &mut order)
}

fn unmarked_neighbors(arena: &Arena, w: EntityId) -> usize {
    arena[w].adj.iter().filter(|&&x| !arena[x].marked).count()
}

/// Start from `first`, then take the remaining roots in reversed reference
/// order so every component is entered at its reference root.
fn run_replay(
    arena: &mut Arena,
    reference: &[usize],
    first: Option<usize>,
    order: &mut dfs::NeighborOrder<'_>,
) -> Vec<EntityId> {
    let mut dfs = Dfs::new(arena);
    for v in first.into_iter().chain(reference.iter().rev().copied()) {
        if !dfs.is_marked(v) {
            dfs.visit(v, order);
        }
    }
    dfs.finish()
}

/// Vertex ids of a post-order list, leaf to root.
pub(crate) fn vertex_ids(arena: &Arena, post: &[EntityId]) -> Vec<usize> {
    post.iter().map(|&id| arena[id].vertex).collect()
}
