//! Curated surface for drivers, benches and the CLI.
//!
//! Prefer these re-exports over reaching into individual modules.

// Input
pub use crate::error::{MpsError, Result};
pub use crate::graph::Graph;
pub use crate::traversal::validate_order;
// Orders and evaluation
pub use crate::finder::{
    compute_and_canonicalize, evaluate, generate_guided_order, generate_mutated_order,
    generate_order, planar_subgraph, PlanarSubgraph,
};
// Outer search
pub use crate::search::{search, Acceptance, MutationSchedule, SearchCfg, SearchOutcome, SearchStep};
