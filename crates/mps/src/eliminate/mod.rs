//! Elimination engine: routes every back edge through the contraction
//! hierarchy and removes the ones that cannot be embedded.
//!
//! Purpose
//! - For each back edge (descendant, ancestor) walk from the descendant toward
//!   the ancestor. Tree entities on the way are labeled with the ancestor's
//!   index; entities already lying on a boundary cycle are lifted into their
//!   top-tier c-node first. When the walk meets an entity labeled with a lower
//!   index, the two routes are folded into a new c-node.
//! - A walk that runs into a deleted entity (or off the tree) fails: every
//!   entity on the walk is eliminated and the back edge is counted as removed.
//!
//! Layout
//! - `mod.rs`: the per-edge walk (`resolve`).
//! - `hierarchy.rs`: lifting into the top-tier c-node (`find`, `merge`,
//!   `make_essential`, sentinel searches).
//! - `contract.rs`: c-node construction and shaving.
//! - `prune.rs`: elimination cascades and artificial-edge trimming.
//!
//! Every procedure whose depth follows the tree depth runs on an explicit
//! stack, in the visiting order of its recursive formulation.

mod contract;
mod hierarchy;
mod prune;

use crate::classify::BackEdge;
use crate::entity::{Arena, EntityId, Status, UNSET};

/// Per-run elimination state over a classified arena.
pub(crate) struct Engine<'a> {
    arena: &'a mut Arena,
    /// Entities by post-order index.
    post: &'a [EntityId],
}

/// Outcome of one step of the upward walk.
enum Step {
    /// The entity is already routed to the target.
    Arrived,
    /// Continue with this entity; `None` means the walk fell off the tree.
    Climb(Option<EntityId>),
}

impl<'a> Engine<'a> {
    pub(crate) fn new(arena: &'a mut Arena, post: &'a [EntityId]) -> Self {
        Self { arena, post }
    }

    /// Route every back edge in order; returns the number of removed edges.
    pub(crate) fn run(&mut self, back: &mut [BackEdge]) -> usize {
        for edge in back.iter_mut() {
            let index = self.arena[edge.ancestor].post_index;
            if !self.resolve(edge.child, index) {
                edge.eliminated = true;
            }
        }
        back.iter().filter(|e| e.eliminated).count()
    }

    /// Walk from `start` to the entity with post-order index `index`.
    ///
    /// On success each walked entity becomes a child of the entity it climbed
    /// to (the target itself never receives children); on failure every
    /// walked entity is eliminated. Both unwind top-down.
    fn resolve(&mut self, start: EntityId, index: usize) -> bool {
        let target = self.post[index];
        let mut walk: Vec<(EntityId, Option<EntityId>)> = Vec::new();
        let mut cur = Some(start);
        let routed = loop {
            let Some(t) = cur else { break false };
            if self.arena[t].is_deleted() {
                break false;
            }
            if self.arena[t].post_index == index {
                break true;
            }
            match self.step(t, index) {
                Step::Arrived => break true,
                Step::Climb(next) => {
                    walk.push((t, next));
                    cur = next;
                }
            }
        };
        for (t, next) in walk.into_iter().rev() {
            if !routed {
                self.eliminate(t);
                continue;
            }
            let next = next.expect("a routed walk never falls off the tree");
            if next != target {
                self.arena.add_child(next, t);
            }
        }
        routed
    }

    fn step(&mut self, t: EntityId, index: usize) -> Step {
        let label = self.arena[t].ancestor;
        if self.arena[t].status == Status::NotVisited {
            if label == UNSET {
                self.arena[t].ancestor = index;
                return Step::Climb(self.arena[t].parent);
            }
            if label == index {
                return Step::Arrived;
            }
            assert!(
                label < index,
                "entity routed to ancestor {label} above current target {index}"
            );
            let c = self.construct(t);
            self.arena[t].ancestor = index;
            return Step::Climb(Some(c));
        }

        let c = self.find(t);
        self.make_essential(t, c);
        let c_label = self.arena[c].ancestor;
        let next = if c_label == index {
            c
        } else {
            assert!(
                c_label < index,
                "top-tier c-node routed to ancestor {c_label} above current target {index}"
            );
            self.construct_from_contracted(c, t)
        };
        let e = &mut self.arena[t];
        e.ancestor = index;
        e.status = Status::NotVisited;
        Step::Climb(Some(next))
    }
}
