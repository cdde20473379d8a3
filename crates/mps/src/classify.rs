//! Edge classifier: adjacency sort by post-order index, then tree/back split.

use crate::entity::{Arena, EntityId, UNSET};

/// Non-tree edge, stored as (lower-indexed descendant, higher-indexed ancestor).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct BackEdge {
    pub child: EntityId,
    pub ancestor: EntityId,
    pub eliminated: bool,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct Classified {
    /// (parent, child) pairs in ascending child index.
    pub tree: Vec<(EntityId, EntityId)>,
    /// In ascending ancestor index, then ascending child index.
    pub back: Vec<BackEdge>,
}

/// Rebuild every adjacency list in ascending neighbor post-order index.
/// One bucket pass over all edges.
pub(crate) fn sort_adjacency(arena: &mut Arena, post: &[EntityId]) {
    let mut buckets: Vec<Vec<EntityId>> = vec![Vec::new(); post.len()];
    for &u in post {
        for &w in &arena[u].adj {
            buckets[arena[w].post_index].push(u);
        }
    }
    for (&u, bucket) in post.iter().zip(buckets) {
        arena[u].adj = bucket;
    }
}

/// Split edges into tree and back edges. Requires sorted adjacency.
pub(crate) fn determine_edges(arena: &mut Arena, post: &[EntityId]) -> Classified {
    let mut out = Classified::default();
    for &v in post {
        if let Some(p) = arena[v].parent {
            arena[v].ancestor = arena[p].post_index;
            out.tree.push((p, v));
        }
    }
    for (i, &v) in post.iter().enumerate() {
        for &w in &arena[v].adj {
            if arena[w].post_index > i {
                break;
            }
            // tree child of v
            if arena[w].ancestor == i {
                continue;
            }
            out.back.push(BackEdge {
                child: w,
                ancestor: v,
                eliminated: false,
            });
        }
    }
    for &v in post {
        arena[v].ancestor = UNSET;
    }
    out
}
