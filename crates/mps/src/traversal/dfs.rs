//! Iterative DFS skeleton shared by the three traversal modes.

use crate::entity::{Arena, EntityId};

/// Orders the neighbors of the entity being expanded. Called once per
/// entity, right after it is marked.
pub(super) type NeighborOrder<'f> = dyn FnMut(&Arena, EntityId) -> Vec<EntityId> + 'f;

pub(super) struct Dfs<'a> {
    arena: &'a mut Arena,
    finished: Vec<bool>,
    post: Vec<EntityId>,
    stack: Vec<EntityId>,
}

impl<'a> Dfs<'a> {
    pub(super) fn new(arena: &'a mut Arena) -> Self {
        let n = arena.originals();
        Self {
            arena,
            finished: vec![false; n],
            post: Vec::with_capacity(n),
            stack: Vec::new(),
        }
    }

    pub(super) fn is_marked(&self, v: usize) -> bool {
        self.arena[EntityId(v)].marked
    }

    /// Post-order DFS from `root`. A node may sit on the stack several times;
    /// the first time a marked node resurfaces it is numbered, later copies
    /// are discarded.
    pub(super) fn visit(&mut self, root: usize, order: &mut NeighborOrder<'_>) {
        self.stack.push(EntityId(root));
        while let Some(&top) = self.stack.last() {
            if !self.arena[top].marked {
                self.arena[top].marked = true;
                let neighbors = order(self.arena, top);
                // LIFO: push in reverse so the first neighbor is expanded first.
                for &w in neighbors.iter().rev() {
                    if !self.arena[w].marked {
                        self.arena[w].parent = Some(top);
                        self.stack.push(w);
                    }
                }
            } else {
                self.stack.pop();
                if self.finished[top.0] {
                    continue;
                }
                self.finished[top.0] = true;
                self.arena[top].post_index = self.post.len();
                self.post.push(top);
            }
        }
    }

    pub(super) fn finish(self) -> Vec<EntityId> {
        self.post
    }
}
