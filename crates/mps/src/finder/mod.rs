//! Public operations: traversal orders, removed-edge counts, planar subgraphs.
//!
//! Purpose
//! - Wrap one run of the pipeline (arena → traversal → classifier →
//!   elimination engine) behind functions that take a `Graph` and vertex-id
//!   orders, so callers never see entities.
//!
//! Why this design
//! - Every operation builds its own arena and drops it on return, so no
//!   hierarchy state survives between calls and repeated calls with the same
//!   inputs agree.
//! - `compute_and_canonicalize` reuses the arena of the mutated run for the
//!   canonicalizing replay instead of rebuilding it from the graph.
//!
//! Orders are post-orders of vertex ids, leaf to root.

use rand::Rng;

use crate::classify::{self, Classified};
use crate::eliminate::Engine;
use crate::entity::{Arena, EntityId};
use crate::error::Result;
use crate::graph::Graph;
use crate::traversal::{self, validate_order};

#[cfg(test)]
mod witness;

/// Edge partition produced by one evaluated order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PlanarSubgraph {
    /// The post-order the partition was computed for.
    pub order: Vec<usize>,
    /// DFS tree edges as (parent, child).
    pub tree_edges: Vec<(usize, usize)>,
    /// Back edges kept, as (descendant, ancestor).
    pub kept_edges: Vec<(usize, usize)>,
    /// Back edges removed, as (descendant, ancestor).
    pub removed_edges: Vec<(usize, usize)>,
}

impl PlanarSubgraph {
    pub fn removed_count(&self) -> usize {
        self.removed_edges.len()
    }

    /// Tree edges followed by kept back edges.
    pub fn planar_edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.tree_edges.iter().chain(&self.kept_edges).copied()
    }
}

/// One run's arena plus the post-order of the last traversal.
struct Run {
    arena: Arena,
    post: Vec<EntityId>,
}

impl Run {
    fn new(graph: &Graph) -> Self {
        Self {
            arena: Arena::from_adjacency(&graph.adjacency()),
            post: Vec::new(),
        }
    }

    fn order(&self) -> Vec<usize> {
        traversal::vertex_ids(&self.arena, &self.post)
    }

    /// Classify and route all back edges of the current traversal.
    fn eliminate(&mut self) -> (Classified, usize) {
        classify::sort_adjacency(&mut self.arena, &self.post);
        let mut classified = classify::determine_edges(&mut self.arena, &self.post);
        let removed = Engine::new(&mut self.arena, &self.post).run(&mut classified.back);
        (classified, removed)
    }

    fn vertex(&self, id: EntityId) -> usize {
        self.arena[id].vertex
    }
}

/// Plain DFS post-order.
pub fn generate_order(graph: &Graph) -> Vec<usize> {
    let mut run = Run::new(graph);
    run.post = traversal::plain(&mut run.arena);
    run.order()
}

/// Replay `order`; the result describes the same spanning forest.
pub fn generate_guided_order(graph: &Graph, order: &[usize]) -> Result<Vec<usize>> {
    validate_order(graph.vertex_count(), order)?;
    let mut run = Run::new(graph);
    run.post = traversal::guided(&mut run.arena, order);
    Ok(run.order())
}

/// Replay `order` up to `mutate_point` expansions, then perturb.
pub fn generate_mutated_order<R: Rng + ?Sized>(
    graph: &Graph,
    order: &[usize],
    mutate_point: usize,
    rng: &mut R,
) -> Result<Vec<usize>> {
    validate_order(graph.vertex_count(), order)?;
    let mut run = Run::new(graph);
    run.post = traversal::mutated(&mut run.arena, order, mutate_point, rng);
    Ok(run.order())
}

/// Number of back edges removed when the tree of `order` is replayed.
pub fn evaluate(graph: &Graph, order: &[usize]) -> Result<usize> {
    validate_order(graph.vertex_count(), order)?;
    let mut run = Run::new(graph);
    run.post = traversal::guided(&mut run.arena, order);
    Ok(run.eliminate().1)
}

/// Mutate `order` at `mutate_point`, count removed edges for the mutated tree,
/// and return that tree's order in canonical replay form with the count.
pub fn compute_and_canonicalize<R: Rng + ?Sized>(
    graph: &Graph,
    mutate_point: usize,
    order: &[usize],
    rng: &mut R,
) -> Result<(Vec<usize>, usize)> {
    validate_order(graph.vertex_count(), order)?;
    let mut run = Run::new(graph);
    run.post = traversal::mutated(&mut run.arena, order, mutate_point, rng);
    let (_, removed) = run.eliminate();
    let mutated = run.order();

    run.arena.reset_to_originals();
    run.post = traversal::guided(&mut run.arena, &mutated);
    Ok((run.order(), removed))
}

/// Replay `order` and report which edges survive.
pub fn planar_subgraph(graph: &Graph, order: &[usize]) -> Result<PlanarSubgraph> {
    validate_order(graph.vertex_count(), order)?;
    let mut run = Run::new(graph);
    run.post = traversal::guided(&mut run.arena, order);
    let (classified, _) = run.eliminate();

    let tree_edges = classified
        .tree
        .iter()
        .map(|&(p, c)| (run.vertex(p), run.vertex(c)))
        .collect();
    let (mut kept_edges, mut removed_edges) = (Vec::new(), Vec::new());
    for e in &classified.back {
        let pair = (run.vertex(e.child), run.vertex(e.ancestor));
        if e.eliminated {
            removed_edges.push(pair);
        } else {
            kept_edges.push(pair);
        }
    }
    Ok(PlanarSubgraph {
        order: run.order(),
        tree_edges,
        kept_edges,
        removed_edges,
    })
}
