//! Input graph handed to the engine.
//!
//! The graph is a vertex count plus an unordered edge list. Construction drops
//! self-loops and duplicate pairs, so the engine never sees a multigraph. The
//! edge order is kept (first occurrence wins) because it fixes the adjacency
//! order that the plain traversal follows.

use std::collections::HashSet;

use crate::error::{MpsError, Result};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Graph {
    n: usize,
    edges: Vec<(usize, usize)>,
}

impl Graph {
    /// Build a simple graph on vertices `0..n`.
    pub fn new(n: usize, edges: impl IntoIterator<Item = (usize, usize)>) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut kept = Vec::new();
        for (u, v) in edges {
            for vertex in [u, v] {
                if vertex >= n {
                    return Err(MpsError::VertexOutOfRange { vertex, n });
                }
            }
            if u == v {
                continue;
            }
            if seen.insert((u.min(v), u.max(v))) {
                kept.push((u, v));
            }
        }
        Ok(Self { n, edges: kept })
    }

    /// Complete graph K_n.
    pub fn complete(n: usize) -> Self {
        let edges = (0..n).flat_map(|u| (u + 1..n).map(move |v| (u, v)));
        Self {
            n,
            edges: edges.collect(),
        }
    }

    /// Complete bipartite graph K_{a,b}; the left side is `0..a`.
    pub fn complete_bipartite(a: usize, b: usize) -> Self {
        let edges = (0..a).flat_map(|u| (a..a + b).map(move |v| (u, v)));
        Self {
            n: a + b,
            edges: edges.collect(),
        }
    }

    pub fn vertex_count(&self) -> usize {
        self.n
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn edges(&self) -> &[(usize, usize)] {
        &self.edges
    }

    /// Adjacency lists in edge-insertion order.
    pub fn adjacency(&self) -> Vec<Vec<usize>> {
        let mut adj = vec![Vec::new(); self.n];
        for &(u, v) in &self.edges {
            adj[u].push(v);
            adj[v].push(u);
        }
        adj
    }

    /// Number of connected components (isolated vertices count).
    pub fn component_count(&self) -> usize {
        let adj = self.adjacency();
        let mut seen = vec![false; self.n];
        let mut count = 0;
        let mut stack = Vec::new();
        for root in 0..self.n {
            if seen[root] {
                continue;
            }
            count += 1;
            seen[root] = true;
            stack.push(root);
            while let Some(u) = stack.pop() {
                for &w in &adj[u] {
                    if !seen[w] {
                        seen[w] = true;
                        stack.push(w);
                    }
                }
            }
        }
        count
    }
}
