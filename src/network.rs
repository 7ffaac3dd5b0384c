//! The [`Network`] trait: what the depth view and the rewriting engine need from a logic network.
//!
//! [`Aig`](crate::Aig) is the main implementation, [`DepthView`](crate::depth::DepthView) forwards
//! everything to the network it wraps.

use crate::{AigEdge, NodeId};

/// A mutable, structurally hashed network of two-input AND gates with complemented edges.
pub trait Network {
    /// Upper bound (exclusive) on node ids, reclaimed nodes included.
    fn size(&self) -> usize;

    /// Whether the node has been reclaimed (or never existed).
    fn is_dead(&self, id: NodeId) -> bool;

    fn is_and(&self, id: NodeId) -> bool;

    /// Whether the node is an OR gate.
    ///
    /// Only and gates exist in an AIG, so the default implementation always answers `false`.
    fn is_or(&self, _id: NodeId) -> bool {
        false
    }

    /// Live gates in ascending id order.
    fn get_gates(&self) -> Vec<NodeId>;

    /// Ordered fanins of a node, empty for the constant node and inputs.
    fn get_fanins(&self, id: NodeId) -> Vec<AigEdge>;

    fn get_outputs(&self) -> Vec<AigEdge>;

    /// Returns a signal computing `fanin0 & fanin1`, reusing an existing gate when possible.
    fn create_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> AigEdge;

    /// Replaces every use of `old` by `new`, then reclaims what was left dangling.
    fn substitute_node(&mut self, old: NodeId, new: AigEdge);

    fn get_node_of(&self, edge: AigEdge) -> NodeId {
        edge.get_node_id()
    }

    fn is_complemented(&self, edge: AigEdge) -> bool {
        edge.get_complement()
    }

    fn get_constant(&self, value: bool) -> AigEdge {
        AigEdge::constant(value)
    }

    fn create_not(&self, a: AigEdge) -> AigEdge {
        !a
    }

    fn create_nand(&mut self, a: AigEdge, b: AigEdge) -> AigEdge {
        !self.create_and(a, b)
    }

    fn create_or(&mut self, a: AigEdge, b: AigEdge) -> AigEdge {
        !self.create_and(!a, !b)
    }
}
