use std::mem::swap;

use super::AigEdge;

/// A node id.
///
/// Ids index the node arena of an [`Aig`](crate::Aig). The constant node [`AigNode::False`] has id 0
/// by convention. Ids are never reused, so a handle to a reclaimed node stays invalid forever.
pub type NodeId = usize;

/// An AIG node.
///
/// Each node has an id. By convention, id for constant node `False` is 0.
///
/// Gates do not carry their fanouts: the owning [`Aig`](crate::Aig) keeps them in a separate table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AigNode {
    /// The constant low/false signal.
    False,
    /// A primary input.
    Input(NodeId),
    /// An AND gate with two fanins, normalized such that `fanin0 < fanin1`.
    And {
        id: NodeId,
        fanin0: AigEdge,
        fanin1: AigEdge,
    },
}

impl AigNode {
    /// Returns a new and gate, fanins are reordered so that `fanin0 < fanin1`.
    pub fn and(id: NodeId, fanin0: AigEdge, fanin1: AigEdge) -> Self {
        if id == 0 {
            panic!(
                "Hey, you are trying to create an AND gate with id=0. \
                Id=0 is reserved for the constant node AigNode::False."
            )
        }
        let mut node = AigNode::And { id, fanin0, fanin1 };
        node.reorder_fanins();
        node
    }

    pub fn is_false(&self) -> bool {
        matches!(self, AigNode::False)
    }

    pub fn is_input(&self) -> bool {
        matches!(self, AigNode::Input(_))
    }

    pub fn is_and(&self) -> bool {
        matches!(self, AigNode::And { .. })
    }

    pub fn get_id(&self) -> NodeId {
        match *self {
            AigNode::False => 0,
            AigNode::Input(id) => id,
            AigNode::And { id, .. } => id,
        }
    }

    pub fn get_fanins(&self) -> Vec<AigEdge> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => vec![*fanin0, *fanin1],
            _ => vec![],
        }
    }

    /// Structural hashing key of an and gate.
    pub(super) fn strash_key(&self) -> Option<(AigEdge, AigEdge)> {
        match self {
            AigNode::And { fanin0, fanin1, .. } => Some((*fanin0, *fanin1)),
            _ => None,
        }
    }

    /// Reorders fanins to make sure `fanin0 <= fanin1` for AND gates.
    ///
    /// Two gates computing the AND of the same pair of edges then have the same
    /// representation, which is what structural hashing relies on.
    pub(super) fn reorder_fanins(&mut self) {
        if let AigNode::And { fanin0, fanin1, .. } = self {
            if fanin1 < fanin0 {
                swap(fanin0, fanin1);
            }
        }
    }
}
