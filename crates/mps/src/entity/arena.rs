//! Arena owning every entity of one run, plus the relation primitives.
//!
//! Slot order of the boundary links matters: several engine steps start a
//! walk from `neighbors[0]`, so every splice below documents which slot
//! receives which link.

use std::ops::{Index, IndexMut};

use super::types::{Entity, EntityId, Kind, Status, UNSET};

#[derive(Clone, Debug, Default)]
pub struct Arena {
    nodes: Vec<Entity>,
    originals: usize,
}

impl Index<EntityId> for Arena {
    type Output = Entity;

    #[inline]
    fn index(&self, id: EntityId) -> &Entity {
        &self.nodes[id.0]
    }
}

impl IndexMut<EntityId> for Arena {
    #[inline]
    fn index_mut(&mut self, id: EntityId) -> &mut Entity {
        &mut self.nodes[id.0]
    }
}

impl Arena {
    /// One original entity per vertex; entity `i` is vertex `i`.
    pub fn from_adjacency(adjacency: &[Vec<usize>]) -> Self {
        let nodes = adjacency
            .iter()
            .enumerate()
            .map(|(v, adj)| Entity::original(v, adj.iter().map(|&w| EntityId(w)).collect()))
            .collect();
        Self {
            nodes,
            originals: adjacency.len(),
        }
    }

    pub fn alloc(&mut self, kind: Kind) -> EntityId {
        self.nodes.push(Entity::new(kind));
        EntityId(self.nodes.len() - 1)
    }

    /// Number of original entities (= vertices).
    pub fn originals(&self) -> usize {
        self.originals
    }

    /// Drop derived entities and clear per-run state of the originals.
    /// Adjacency lists are kept.
    pub fn reset_to_originals(&mut self) {
        self.nodes.truncate(self.originals);
        for node in &mut self.nodes {
            let adj = std::mem::take(&mut node.adj);
            *node = Entity::original(node.vertex, adj);
        }
    }

    // ---- parent / children ----

    pub fn add_child(&mut self, parent: EntityId, child: EntityId) {
        self[parent].children.push(child);
    }

    /// Swap-remove the first occurrence of `child`.
    pub fn remove_child(&mut self, parent: EntityId, child: EntityId) {
        let children = &mut self[parent].children;
        if let Some(pos) = children.iter().position(|&c| c == child) {
            children.swap_remove(pos);
        }
    }

    /// Collect `root` and every entity below it through children lists,
    /// without touching any of them.
    pub fn subtree(&self, root: EntityId) -> Vec<EntityId> {
        let mut out = vec![root];
        let mut i = 0;
        while i < out.len() {
            out.extend(self[out[i]].children.iter().copied());
            i += 1;
        }
        out
    }

    /// Label every strict descendant of `root` as lying on an artificial edge.
    pub fn recursively_labeling(&mut self, root: EntityId) {
        for id in self.subtree(root).into_iter().skip(1) {
            self[id].status = Status::ArtificialEdge;
        }
    }

    // ---- boundary cycle ----

    /// Move `x` into a boundary cycle: tree links are dropped.
    pub fn set_to_boundary_path(&mut self, x: EntityId, n0: EntityId, n1: EntityId) {
        let e = &mut self[x];
        e.parent = None;
        e.children.clear();
        e.neighbors = [Some(n0), Some(n1)];
        e.status = Status::BoundaryPath;
    }

    pub fn set_neighbors(&mut self, x: EntityId, n0: EntityId, n1: EntityId) {
        self[x].neighbors = [Some(n0), Some(n1)];
    }

    pub fn neighbor(&self, x: EntityId, slot: usize) -> EntityId {
        self[x].neighbors[slot].expect("boundary entity has both neighbor links")
    }

    /// The neighbor of `x` reached when arriving from `prev`.
    pub fn next(&self, x: EntityId, prev: EntityId) -> EntityId {
        let [n0, n1] = self[x].neighbors;
        let n0 = n0.expect("boundary entity has both neighbor links");
        if n0 != prev {
            n0
        } else {
            n1.expect("boundary entity has both neighbor links")
        }
    }

    /// Replace the link of `x` that points at `dropped` by `new`: slot 0 gets
    /// the surviving neighbor, slot 1 gets `new`.
    pub fn relink(&mut self, x: EntityId, dropped: EntityId, new: EntityId) {
        let keep = self.next(x, dropped);
        self.set_neighbors(x, keep, new);
    }

    // ---- artificial edges ----

    pub fn set_ae(&mut self, x: EntityId, slot: usize, root: Option<EntityId>) {
        self[x].ae[slot] = root;
        if let Some(r) = root {
            self[r].parent = Some(x);
        }
    }

    /// Attach `root` in the first free slot; dropped if both are taken.
    pub fn add_ae(&mut self, x: EntityId, root: EntityId) {
        if self[x].ae[0].is_none() {
            self.set_ae(x, 0, Some(root));
        } else if self[x].ae[1].is_none() {
            self.set_ae(x, 1, Some(root));
        }
    }

    /// Move the artificial edges of `from` onto `x`.
    pub fn inherit_ae(&mut self, x: EntityId, from: EntityId) {
        let [a0, a1] = std::mem::take(&mut self[from].ae);
        for root in [a0, a1].into_iter().flatten() {
            self.add_ae(x, root);
        }
    }

    /// Turn `root` into an artificial edge of `u` carrying all of `u`'s
    /// children. No-op when `u` has no children.
    pub fn init_ae(&mut self, root: EntityId, u: EntityId) {
        if self[u].children.is_empty() {
            return;
        }
        let children = std::mem::take(&mut self[u].children);
        for &c in &children {
            self[c].parent = Some(root);
        }
        let label = self[children[0]].ancestor;
        let r = &mut self[root];
        r.children = children;
        r.parent = Some(u);
        r.ancestor = label;
        r.status = Status::ArtificialEdge;
        self.add_ae(u, root);
    }

    // ---- replicas ----

    pub fn is_sentinel(&self, x: EntityId) -> bool {
        self[x].kind == Kind::Replica
    }

    pub fn origin_of(&self, x: EntityId) -> EntityId {
        match self[x].kind {
            Kind::Replica => self[x].origin.expect("replica has an origin"),
            _ => x,
        }
    }

    /// Whether `a` and `b` stand for the same underlying entity.
    pub fn is_same(&self, a: EntityId, b: EntityId) -> bool {
        self.origin_of(a) == self.origin_of(b)
    }

    /// Make `s` a replica of `u` inside c-node `c`. Neighbor links are left
    /// to the caller.
    pub fn init_replica(&mut self, s: EntityId, u: EntityId, c: EntityId) {
        let post_index = self[u].post_index;
        let origin = self.origin_of(u);
        let e = &mut self[s];
        e.post_index = post_index;
        e.status = Status::BoundaryPath;
        e.origin = Some(origin);
        e.owner = Some(c);
    }

    /// Fresh c-node carrying the default label `(UNSET, NotVisited)`.
    pub fn new_contracted(&mut self) -> EntityId {
        let c = self.alloc(Kind::Contracted);
        let e = &mut self[c];
        e.ancestor = UNSET;
        e.status = Status::NotVisited;
        c
    }
}
