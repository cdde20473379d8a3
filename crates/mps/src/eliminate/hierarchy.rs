//! Lifting an entity into its top-tier c-node.

use crate::entity::{EntityId, Kind, Status};

use super::Engine;

/// A boundary position: an entity and the neighbor it was reached from.
pub(super) type Cursor = (EntityId, EntityId);

/// Two boundary positions delimiting the part of a cycle that survives.
pub(super) type Boundary = (Cursor, Cursor);

pub(super) enum Search {
    /// A top-tier c-node owns one of the visited entities.
    TopTier(EntityId),
    /// The nearest essential member, with the entity it was reached from.
    Sentinel(Cursor),
}

impl Engine<'_> {
    /// Replace boundary entity `p` inside `c`'s cycle by a fresh replica and
    /// hang `p` below `c`. No child link is created here.
    pub(super) fn make_essential(&mut self, p: EntityId, c: EntityId) {
        let s = self.arena.alloc(Kind::Replica);
        let n0 = self.arena.neighbor(p, 0);
        let n1 = self.arena.neighbor(p, 1);
        self.arena.init_replica(s, p, c);
        self.arena[c].essentials.push(s);
        self.arena.set_to_boundary_path(s, n0, n1);
        self.arena.inherit_ae(s, p);
        self.arena.relink(n0, p, s);
        self.arena.relink(n1, p, s);
        let e = &mut self.arena[p];
        e.neighbors = [None, None];
        e.parent = Some(c);
    }

    /// Top-tier c-node whose boundary cycle contains `n` once the levels
    /// below have been merged upward. `n` itself is not made essential.
    pub(super) fn find(&mut self, n: EntityId) -> EntityId {
        let mut levels: Vec<(Boundary, EntityId)> = Vec::new();
        let mut cur = n;
        let top = loop {
            let search = if self.arena[cur].parent.is_none() {
                self.search_from(cur)
            } else {
                // `cur` hangs on an artificial edge; unfold it first.
                let ((up, up_prev), (down, down_prev)) = self.trim(cur);
                self.parallel_search(up, up_prev, down, down_prev)
            };
            let first = match search {
                Search::TopTier(c) => break c,
                Search::Sentinel(s) => s,
            };
            let c = self.arena[first.0]
                .owner
                .expect("essential member has an owning c-node");
            let size = self.arena[c].essentials.len();
            let second = self.count_sentinel_elimination(first, size);
            cur = if self.arena[c].status == Status::ArtificialEdge {
                self.collapse_to_two(c, first.0, second.0)
            } else {
                c
            };
            levels.push(((first, second), c));
        };
        for (boundary, c) in levels.into_iter().rev() {
            self.merge(boundary, c);
        }
        top
    }

    /// `c` lies on an artificial edge: keep only the child matching one of the
    /// two surviving essential members and pretend `c` has size two.
    fn collapse_to_two(&mut self, c: EntityId, a: EntityId, b: EntityId) -> EntityId {
        let children = self.arena[c].children.clone();
        let mut kept = None;
        for ch in children {
            if self.arena.is_same(a, ch) || self.arena.is_same(b, ch) {
                kept = Some(ch);
            } else {
                self.eliminate(ch);
            }
        }
        let kept = kept.expect("c-node on an artificial edge keeps the child it was entered from");
        let e = &mut self.arena[c];
        e.children = vec![kept];
        e.essentials = vec![a, b];
        kept
    }

    /// Splice the surviving arc `boundary` of `list_node`'s cycle into the
    /// cycle that contains `list_node`, then delete `list_node`.
    pub(super) fn merge(&mut self, boundary: Boundary, list_node: EntityId) {
        let n0 = self.arena.neighbor(list_node, 0);
        let n1 = self.arena.neighbor(list_node, 1);
        let (a, b) = boundary;
        let ((s0, s0_prev), (s1, s1_prev)) = if self.arena.is_same(a.0, n0) {
            (a, b)
        } else {
            (b, a)
        };
        if s0_prev == s1 && s1_prev == s0 {
            self.arena.relink(n0, list_node, n1);
            self.arena.relink(n1, list_node, n0);
        } else {
            self.arena.relink(n0, list_node, s0_prev);
            self.arena.relink(n1, list_node, s1_prev);
            self.arena.relink(s0_prev, s0, n0);
            self.arena.relink(s1_prev, s1, n1);
        }
        self.arena.inherit_ae(n0, s0);
        self.arena.inherit_ae(n1, s1);
        self.arena[list_node].status = Status::Deleted;
    }

    /// Search both directions away from `x`.
    pub(super) fn search_from(&mut self, x: EntityId) -> Search {
        let n0 = self.arena.neighbor(x, 0);
        let n1 = self.arena.neighbor(x, 1);
        self.parallel_search(n0, x, n1, x)
    }

    /// Walk `n0` and `n1` away from their predecessors in lockstep until one
    /// of them is owned by a top-tier c-node or is an essential member.
    /// On a top-tier hit every walked entity is re-owned by that c-node.
    pub(super) fn parallel_search(
        &mut self,
        mut n0: EntityId,
        mut n0_prev: EntityId,
        mut n1: EntityId,
        mut n1_prev: EntityId,
    ) -> Search {
        let mut walked = Vec::new();
        let top = loop {
            if let Some(c) = self.top_tier_owner(n0) {
                break c;
            }
            if let Some(c) = self.top_tier_owner(n1) {
                break c;
            }
            if self.arena.is_sentinel(n0) {
                return Search::Sentinel((n0, n0_prev));
            }
            if self.arena.is_sentinel(n1) {
                return Search::Sentinel((n1, n1_prev));
            }
            walked.push(n0);
            walked.push(n1);
            let next0 = self.arena.next(n0, n0_prev);
            n0_prev = std::mem::replace(&mut n0, next0);
            let next1 = self.arena.next(n1, n1_prev);
            n1_prev = std::mem::replace(&mut n1, next1);
        };
        for x in walked {
            self.arena[x].owner = Some(top);
        }
        Search::TopTier(top)
    }

    fn top_tier_owner(&self, x: EntityId) -> Option<EntityId> {
        self.arena[x]
            .owner
            .filter(|&c| self.arena[c].status == Status::NotVisited)
    }

    /// From essential member `y` (reached from `y_prev`) walk away from
    /// `y_prev`, eliminating everything up to the `num_sentinel`-th essential
    /// member `z` counted from `y`. Reconnects `y` and `z` directly and
    /// returns `(z, z_prev)` where `z_prev` is `z`'s neighbor outside the
    /// eliminated arc.
    pub(super) fn count_sentinel_elimination(&mut self, first: Cursor, num_sentinel: usize) -> Cursor {
        debug_assert!(num_sentinel >= 2, "a c-node has at least two essential members");
        let (y, y_prev) = first;
        let mut count = 1;
        let mut prev = y;
        let mut n = self.arena.next(y, y_prev);
        let (z, z_prev) = loop {
            if self.arena.is_sentinel(n) {
                count += 1;
                if count == num_sentinel {
                    break (n, self.arena.next(n, prev));
                }
            }
            self.eliminate(n);
            let next = self.arena.next(n, prev);
            prev = std::mem::replace(&mut n, next);
        };
        let z_inner = self.arena.next(z, z_prev);
        self.eliminate_ae(z, z_inner);
        let y_inner = self.arena.next(y, y_prev);
        self.eliminate_ae(y, y_inner);
        self.arena.set_neighbors(z, y, z_prev);
        self.arena.set_neighbors(y, z, y_prev);
        (z, z_prev)
    }
}
