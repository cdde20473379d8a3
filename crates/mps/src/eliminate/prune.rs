//! Elimination cascades and artificial-edge trimming.

use crate::entity::{EntityId, Kind, Status, UNSET};

use super::hierarchy::Boundary;
use super::Engine;

impl Engine<'_> {
    /// Delete `u` and everything hanging below it: children, artificial edges,
    /// the whole boundary cycle of a c-node, and for an original vertex its
    /// lower-indexed neighbors that were never routed. Parent and neighbor
    /// links are left untouched. Already deleted entities stop the cascade.
    pub(super) fn eliminate(&mut self, u: EntityId) {
        let mut work = vec![u];
        while let Some(x) = work.pop() {
            if self.arena[x].is_deleted() {
                continue;
            }
            self.arena[x].status = Status::Deleted;
            match self.arena[x].kind {
                Kind::Contracted => {
                    if let Some(&start) = self.arena[x].essentials.first() {
                        let mut prev = self.arena.neighbor(start, 0);
                        let mut cur = start;
                        loop {
                            work.push(cur);
                            let next = self.arena.next(cur, prev);
                            prev = std::mem::replace(&mut cur, next);
                            if cur == start {
                                break;
                            }
                        }
                    }
                }
                Kind::Original => {
                    let own = self.arena[x].post_index;
                    work.extend(self.arena[x].adj.iter().copied().filter(|&w| {
                        self.arena[w].post_index < own && self.arena[w].ancestor == UNSET
                    }));
                }
                Kind::Replica | Kind::VirtualRoot => {}
            }
            work.extend(self.arena[x].ae.iter().flatten().copied());
            work.extend(self.arena[x].children.iter().copied());
        }
    }

    /// Eliminate the artificial edges of `u` that lead toward `v`.
    pub(super) fn eliminate_ae(&mut self, u: EntityId, v: EntityId) {
        let v_index = self.arena[v].post_index;
        for slot in 0..2 {
            if let Some(root) = self.arena[u].ae[slot] {
                if self.arena[root].ancestor == v_index {
                    self.eliminate(root);
                    self.arena[u].ae[slot] = None;
                }
            }
        }
    }

    /// Unfold the artificial edge that `u` hangs on into the boundary cycle
    /// between its attach point `up` and the neighbor `down` it leads to.
    ///
    /// The tree path from `u` up to the virtual root becomes a boundary arc
    /// `up, path.., u, down`; `u`'s own children move onto a fresh artificial
    /// edge and everything else hanging off the path is eliminated. Returns
    /// `((up, up_prev), (down, down_prev))` with each `prev` on the arc side.
    pub(super) fn trim(&mut self, u: EntityId) -> Boundary {
        let mut path = vec![u];
        let mut curr = u;
        let (up, down) = loop {
            curr = self.arena[curr]
                .parent
                .expect("entity on an artificial edge reaches its virtual root");
            if self.arena[curr].kind == Kind::VirtualRoot {
                break self.detach_from_root(curr, &path);
            }
            path.push(curr);
        };
        let first = path[0];
        let last = path[path.len() - 1];

        let root = self.arena.alloc(Kind::VirtualRoot);
        self.arena.init_ae(root, first);
        for i in 1..path.len() {
            let children = self.arena[path[i]].children.clone();
            for ch in children {
                if ch != path[i - 1] {
                    self.eliminate(ch);
                }
            }
        }

        if path.len() == 1 {
            self.arena.set_to_boundary_path(first, up, down);
        } else {
            self.arena.set_to_boundary_path(first, down, path[1]);
            self.arena.set_to_boundary_path(last, up, path[path.len() - 2]);
            for i in 1..path.len() - 1 {
                self.arena.set_to_boundary_path(path[i], path[i - 1], path[i + 1]);
            }
        }

        // Extension may replace path entities, so remember the outer side.
        let up_next = self.arena.next(up, last);
        let down_next = self.arena.next(down, first);
        for &x in &path {
            if self.arena[x].kind == Kind::Contracted {
                self.c_node_extension(x);
            }
        }
        (
            (up, self.arena.next(up, up_next)),
            (down, self.arena.next(down, down_next)),
        )
    }

    /// Cut the link between `up`/`down` and splice the path ends in. Returns
    /// `(up, down)`.
    fn detach_from_root(&mut self, root: EntityId, path: &[EntityId]) -> (EntityId, EntityId) {
        let up = self.arena[root]
            .parent
            .expect("virtual root hangs off an entity");
        let first = path[0];
        let last = path[path.len() - 1];
        let n0 = self.arena.neighbor(up, 0);
        let n1 = self.arena.neighbor(up, 1);
        let down = if n0 == n1 {
            // Fresh c-node: a 2-cycle with a single artificial edge.
            self.arena.set_neighbors(up, n0, last);
            self.arena.set_neighbors(n0, up, first);
            self.arena.remove_child(root, last);
            if self.arena[root].children.is_empty() {
                self.arena[up].ae = [None, None];
            }
            n0
        } else {
            let down = if self.arena[n0].post_index == self.arena[root].ancestor {
                n0
            } else {
                n1
            };
            self.arena.relink(up, down, last);
            self.arena.relink(down, up, first);
            self.arena.remove_child(root, last);
            self.eliminate_ae(up, down);
            down
        };
        (up, down)
    }

    /// Unfold a c-node that `trim` just put on a boundary arc. Size-two
    /// c-nodes stay as they are; otherwise the essential member facing
    /// neither arc neighbor is eliminated together with the boundary up to the
    /// next essential member on each side, and the rest is merged upward.
    pub(super) fn c_node_extension(&mut self, c: EntityId) {
        let essentials = self.arena[c].essentials.clone();
        if essentials.len() == 2 {
            return;
        }
        let nb0 = self.arena.neighbor(c, 0);
        let nb1 = self.arena.neighbor(c, 1);
        let sentinel = essentials
            .iter()
            .copied()
            .find(|&e| !self.arena.is_same(e, nb0) && !self.arena.is_same(e, nb1))
            .expect("c-node on a trimmed path has an essential member off the path");
        self.eliminate(sentinel);
        let [side0, side1] = [0, 1].map(|slot| self.arena.neighbor(sentinel, slot));
        let s0 = self.eliminate_to_sentinel(side0, sentinel);
        let s1 = self.eliminate_to_sentinel(side1, sentinel);

        let s0_inner = self.arena.next(s0.0, s0.1);
        self.eliminate_ae(s0.0, s0_inner);
        let s1_inner = self.arena.next(s1.0, s1.1);
        self.eliminate_ae(s1.0, s1_inner);
        self.arena.set_neighbors(s0.0, s1.0, s0.1);
        self.arena.set_neighbors(s1.0, s0.0, s1.1);
        self.merge((s0, s1), c);
    }

    /// Eliminate from `n` onward (away from `prev`) up to, not including, the
    /// first essential member. Returns that member and its outer neighbor.
    fn eliminate_to_sentinel(&mut self, mut n: EntityId, mut prev: EntityId) -> (EntityId, EntityId) {
        loop {
            if self.arena.is_sentinel(n) {
                return (n, self.arena.next(n, prev));
            }
            self.eliminate(n);
            let next = self.arena.next(n, prev);
            prev = std::mem::replace(&mut n, next);
        }
    }
}
