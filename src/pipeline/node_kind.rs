//! Node kind enumeration used to pick a selectivity computation.

use serde::{Deserialize, Serialize};

/// The kinds of node a sampler distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeKind {
    /// Drops tuples failing a predicate.
    Filter,
    /// Materializes windows of tuples.
    Windowing,
    /// Wraps a join function and reports partner cardinalities.
    JoinWrapping,
    /// Anything else; no selectivity is derived.
    Other,
}

impl NodeKind {
    /// Get the display name for this node kind.
    pub fn display_name(&self) -> &'static str {
        match self {
            NodeKind::Filter => "Filter",
            NodeKind::Windowing => "Windowing",
            NodeKind::JoinWrapping => "Join Wrapping",
            NodeKind::Other => "Other",
        }
    }

    /// Get all node kinds.
    pub fn all() -> &'static [NodeKind] {
        &[
            NodeKind::Filter,
            NodeKind::Windowing,
            NodeKind::JoinWrapping,
            NodeKind::Other,
        ]
    }

    /// Whether samplers for this kind report `realSelectivity`.
    pub fn has_selectivity(&self) -> bool {
        !matches!(self, NodeKind::Other)
    }
}

impl std::fmt::Display for NodeKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}
