//! Error type shared by the public operations of the crate.
//!
//! Only malformed input is reported here. Broken hierarchy invariants inside the
//! elimination engine are programming defects and panic instead.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MpsError {
    /// An edge endpoint is not a vertex of the graph.
    VertexOutOfRange { vertex: usize, n: usize },
    /// A reference order is not a permutation of the vertex ids.
    InvalidOrder { reason: String },
    /// Search parameters that cannot drive a run.
    InvalidConfig { reason: String },
}

impl MpsError {
    pub(crate) fn order(reason: impl Into<String>) -> Self {
        Self::InvalidOrder {
            reason: reason.into(),
        }
    }

    pub(crate) fn config(reason: impl Into<String>) -> Self {
        Self::InvalidConfig {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for MpsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::VertexOutOfRange { vertex, n } => {
                write!(f, "vertex {vertex} out of range for graph with {n} vertices")
            }
            Self::InvalidOrder { reason } => write!(f, "invalid reference order: {reason}"),
            Self::InvalidConfig { reason } => write!(f, "invalid search config: {reason}"),
        }
    }
}

impl std::error::Error for MpsError {}

pub type Result<T> = std::result::Result<T, MpsError>;
