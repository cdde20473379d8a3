//! Maximal planar subgraphs via DFS post-orders and a contraction hierarchy.
//!
//! Pipeline per run: graph → entity arena → traversal (plain, guided or
//! mutated) → edge classifier → elimination engine → removed-edge count.
//! The outer search varies only the traversal order.
//!
//! API Policy
//! - The stable surface is `finder`, `search`, `graph` and `error`; the
//!   entity model and the engine stay crate-private.
//! - `api` collects the re-exports callers usually need.

pub mod api;
mod classify;
mod eliminate;
mod entity;
pub mod error;
pub mod finder;
pub mod graph;
pub mod search;
mod traversal;

/// Library version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub use error::{MpsError, Result};
pub use graph::Graph;
pub use traversal::validate_order;

/// Common exports for quick imports in callers.
pub mod prelude {
    pub use crate::finder::{evaluate, generate_order, planar_subgraph, PlanarSubgraph};
    pub use crate::graph::Graph;
    pub use crate::search::{search, Acceptance, SearchCfg, SearchOutcome};
}
