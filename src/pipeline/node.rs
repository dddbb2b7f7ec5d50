//! Capability queries the sampler makes against the node it observes.
//!
//! The sampler never needs the node's data path, only what kind of operator
//! it is. Nodes answer through [`MonitoredNode`]; every capability defaults
//! to `false` so plain operators implement the trait with an empty body.

use crate::pipeline::node_kind::NodeKind;

/// Trait implemented by pipeline operators that host a sampler.
pub trait MonitoredNode {
    /// The node drops tuples that fail a predicate.
    fn is_filter(&self) -> bool {
        false
    }

    /// The node materializes window state before emitting.
    fn is_windowing(&self) -> bool {
        false
    }

    /// The node wraps another user function and reports join partner
    /// cardinalities through `report_join_selectivity`.
    fn wraps_join_function(&self) -> bool {
        false
    }

    /// Snapshot of all capabilities.
    fn capabilities(&self) -> NodeCapabilities {
        NodeCapabilities {
            filter: self.is_filter(),
            windowing: self.is_windowing(),
            join_wrapping: self.wraps_join_function(),
        }
    }
}

/// The raw capability flags of a node, as answered at sampler construction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NodeCapabilities {
    pub filter: bool,
    pub windowing: bool,
    pub join_wrapping: bool,
}

impl NodeCapabilities {
    pub const NONE: NodeCapabilities = NodeCapabilities {
        filter: false,
        windowing: false,
        join_wrapping: false,
    };

    pub fn filter() -> Self {
        Self {
            filter: true,
            ..Self::NONE
        }
    }

    pub fn windowing() -> Self {
        Self {
            windowing: true,
            ..Self::NONE
        }
    }

    pub fn join_wrapping() -> Self {
        Self {
            join_wrapping: true,
            ..Self::NONE
        }
    }

    /// Collapse the flags into the kind whose selectivity survives.
    ///
    /// Capabilities are applied in the order join-wrapping, filter,
    /// windowing with the later one winning, except that filter and
    /// windowing are exclusive and filter takes precedence.
    pub fn kind(self) -> NodeKind {
        let mut kind = NodeKind::Other;
        if self.join_wrapping {
            kind = NodeKind::JoinWrapping;
        }
        if self.filter {
            kind = NodeKind::Filter;
        } else if self.windowing {
            kind = NodeKind::Windowing;
        }
        kind
    }
}

impl MonitoredNode for NodeCapabilities {
    fn is_filter(&self) -> bool {
        self.filter
    }

    fn is_windowing(&self) -> bool {
        self.windowing
    }

    fn wraps_join_function(&self) -> bool {
        self.join_wrapping
    }
}

impl MonitoredNode for NodeKind {
    fn is_filter(&self) -> bool {
        matches!(self, NodeKind::Filter)
    }

    fn is_windowing(&self) -> bool {
        matches!(self, NodeKind::Windowing)
    }

    fn wraps_join_function(&self) -> bool {
        matches!(self, NodeKind::JoinWrapping)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct MapNode;
    impl MonitoredNode for MapNode {}

    struct WindowedJoin;
    impl MonitoredNode for WindowedJoin {
        fn is_windowing(&self) -> bool {
            true
        }
        fn wraps_join_function(&self) -> bool {
            true
        }
    }

    #[test]
    fn test_plain_node_is_other() {
        assert_eq!(MapNode.capabilities(), NodeCapabilities::NONE);
        assert_eq!(MapNode.capabilities().kind(), NodeKind::Other);
    }

    #[test]
    fn test_single_capabilities() {
        assert_eq!(NodeCapabilities::filter().kind(), NodeKind::Filter);
        assert_eq!(NodeCapabilities::windowing().kind(), NodeKind::Windowing);
        assert_eq!(
            NodeCapabilities::join_wrapping().kind(),
            NodeKind::JoinWrapping
        );
    }

    #[test]
    fn test_windowing_overrides_join_wrapping() {
        assert_eq!(WindowedJoin.capabilities().kind(), NodeKind::Windowing);
    }

    #[test]
    fn test_filter_beats_windowing() {
        let caps = NodeCapabilities {
            filter: true,
            windowing: true,
            join_wrapping: true,
        };
        assert_eq!(caps.kind(), NodeKind::Filter);
    }

    #[test]
    fn test_kind_round_trips_through_capabilities() {
        for kind in NodeKind::all() {
            assert_eq!(kind.capabilities().kind(), *kind);
        }
    }
}
