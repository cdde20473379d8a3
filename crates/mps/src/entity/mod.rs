//! Entity model of the contraction hierarchy.
//!
//! Purpose
//! - Represent p-nodes (input vertices), c-nodes (contracted boundary cycles),
//!   replica sentinels and artificial-edge virtual roots in one arena, with
//!   every cross-link stored as an `Option<EntityId>`.
//!
//! Why this design
//! - The hierarchy is a managed graph: subtrees are detached, reparented and
//!   spliced into cyclic boundary lists all the time. Index handles keep that
//!   safe, and the whole arena is released at the end of a run.
//! - Marks live in the arena, so concurrent runs never share traversal state.

mod arena;
mod types;

pub(crate) use arena::Arena;
pub(crate) use types::{EntityId, Kind, Status, UNSET};
