//! Folding two routes into a new c-node, and shaving what the fold cuts off.

use crate::entity::{EntityId, Kind, Status};

use super::hierarchy::Search;
use super::Engine;

impl Engine<'_> {
    /// `u` is a tree entity already routed to a lower ancestor `i`. Fold the
    /// tree path between `u` and `i` into a fresh 2-cycle c-node `[i', u']`
    /// and hang `u` below it. The c-node's child link is left to the walk.
    pub(super) fn construct(&mut self, u: EntityId) -> EntityId {
        let node_i = self.post[self.arena[u].ancestor];
        self.parenting_labeling_shaving(u, node_i);

        let i_s = self.arena.alloc(Kind::Replica);
        let u_s = self.arena.alloc(Kind::Replica);
        let c = self.arena.new_contracted();
        let ae = self.arena.alloc(Kind::VirtualRoot);

        self.arena.init_replica(i_s, node_i, c);
        self.arena.init_replica(u_s, u, c);
        let children = self.arena[u].children.clone();
        for ch in children {
            self.arena.add_child(u_s, ch);
        }
        self.arena.init_ae(ae, u_s);

        self.arena.set_to_boundary_path(i_s, u_s, u_s);
        self.arena.set_to_boundary_path(u_s, i_s, i_s);
        self.arena[c].essentials = vec![i_s, u_s];

        self.arena[c].parent = Some(node_i);
        let e = &mut self.arena[u];
        e.parent = Some(c);
        e.children.clear();
        c
    }

    /// The walk entered top-tier c-node `c` through the freshly essential
    /// entity `p`, but `c` is routed to a lower ancestor `i`. Build the cycle
    /// `i', ch0, c, ch1` from `c`'s two remaining children, merge `c`'s own
    /// cycle into it and return a new c-node `[i', p']` that replaces `c`.
    pub(super) fn construct_from_contracted(&mut self, c: EntityId, p: EntityId) -> EntityId {
        let node_i = self.post[self.arena[c].ancestor];
        self.parenting_labeling_shaving(p, node_i);

        let i_s = self.arena.alloc(Kind::Replica);
        let nc = self.arena.new_contracted();
        self.arena.init_replica(i_s, node_i, nc);

        let (ch0, ch1) = match self.arena[c].children[..] {
            [a, b, ..] => (a, b),
            _ => panic!("shaved c-node keeps two children"),
        };
        let ae0 = self.arena.alloc(Kind::VirtualRoot);
        let ae1 = self.arena.alloc(Kind::VirtualRoot);
        self.arena.init_ae(ae0, ch0);
        self.arena.init_ae(ae1, ch1);
        self.arena.set_to_boundary_path(i_s, ch0, ch1);
        self.arena.set_to_boundary_path(ch0, i_s, c);
        self.arena.set_to_boundary_path(ch1, i_s, c);
        self.arena.set_to_boundary_path(c, ch0, ch1);

        let (mut sent_0, mut sent_1, mut sent_p) = (None, None, None);
        for &e in &self.arena[c].essentials {
            if self.arena.is_same(e, ch0) {
                sent_0 = Some(e);
            } else if self.arena.is_same(e, ch1) {
                sent_1 = Some(e);
            } else if self.arena.is_same(e, p) {
                sent_p = Some(e);
            }
        }
        let missing = "c-node keeps an essential member for each child and for the entry";
        let sent_0 = sent_0.expect(missing);
        let sent_1 = sent_1.expect(missing);
        let sent_p = sent_p.expect(missing);
        let arc = (
            (sent_0, self.arena.next(sent_0, sent_1)),
            (sent_1, self.arena.next(sent_1, sent_0)),
        );
        self.merge(arc, c);

        self.arena[nc].essentials = vec![i_s, sent_p];
        self.arena[nc].parent = Some(node_i);
        self.arena[sent_p].owner = Some(nc);
        let e = &mut self.arena[p];
        e.children.clear();
        e.parent = Some(nc);
        self.arena[c].status = Status::Deleted;
        nc
    }

    /// Reverse the parent links on the tree path `u -> .. -> node_i` so that
    /// `u` becomes the root of the detached part, then label that part as an
    /// artificial edge and shave its c-nodes.
    fn parenting_labeling_shaving(&mut self, u: EntityId, node_i: EntityId) {
        let mut path = vec![u];
        loop {
            let last = path[path.len() - 1];
            let next = self.arena[last]
                .parent
                .expect("tree path reaches the routed ancestor");
            path.push(next);
            if next == node_i {
                break;
            }
        }
        let inner = path.len() - 2;
        for i in 0..inner {
            self.arena.add_child(path[i], path[i + 1]);
            self.arena[path[i + 1]].parent = Some(path[i]);
        }
        for i in 0..inner {
            self.arena.remove_child(path[i + 1], path[i]);
        }
        self.arena[u].parent = None;

        self.arena.recursively_labeling(u);
        self.recursively_shaving(u);
    }

    /// Pre-order over the subtree of `u`. Every c-node with more than one
    /// child is cut down to the two children nearest, along its cycle, to the
    /// essential member facing its parent.
    fn recursively_shaving(&mut self, u: EntityId) {
        let mut stack = vec![u];
        while let Some(x) = stack.pop() {
            let children = self.arena[x].children.clone();
            if self.arena[x].kind == Kind::Original || children.len() == 1 {
                stack.extend(children.into_iter().rev());
                continue;
            }
            let parent = self.arena[x]
                .parent
                .expect("shaved c-node has a parent");
            let node_x = self.arena[x]
                .essentials
                .iter()
                .copied()
                .find(|&e| self.arena.is_same(e, parent))
                .expect("c-node has an essential member for its parent");
            let (a, b) = self
                .shave(node_x)
                .expect("c-node with several children shaves to two");

            let mut kept = Vec::with_capacity(2);
            for ch in children {
                if self.arena.is_same(ch, a) || self.arena.is_same(ch, b) {
                    kept.push(ch);
                } else {
                    self.eliminate(ch);
                }
            }
            assert!(kept.len() >= 2, "shaving keeps the two children next to the parent");
            kept.truncate(2);
            let e = &mut self.arena[x];
            e.essentials = vec![node_x, a, b];
            e.children = kept.clone();
            stack.extend(kept.into_iter().rev());
        }
    }

    /// Keep only the two arcs of `x`'s cycle that run from `x` to its nearest
    /// essential members `y` and `z`; the rest of the cycle is eliminated.
    /// `None` when the owning c-node has a single child.
    fn shave(&mut self, x: EntityId) -> Option<(EntityId, EntityId)> {
        let c = self.arena[x].owner.expect("essential member has an owning c-node");
        let child_count = self.arena[c].children.len();
        if child_count == 1 {
            return None;
        }
        let first = match self.search_from(x) {
            Search::Sentinel(s) => s,
            Search::TopTier(_) => panic!("c-node under an artificial edge is never top-tier"),
        };
        let second = self.count_sentinel_elimination(first, child_count);
        Some((first.0, second.0))
    }
}
