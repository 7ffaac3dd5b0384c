//! An [`AigEdge`] points at an [`AigNode`] and can be complemented (indicates the presence of a NOT gate).
//!
//! This is what the literature calls a *signal*: the same node can be read complemented by one consumer
//! and uncomplemented by another, the polarity belongs to the edge.
//!
//! [`AigNode`]: crate::AigNode

use std::{fmt::Display, ops::Not};

use crate::NodeId;

/// A directed edge representing a fanin for AIG nodes (or an output).
///
/// The edge can carry an inverter according to the value of `complement`.
/// Edges are ordered by node id first, then by complement, which matches the
/// ordering of AIGER literals (`2 * id + complement`).
///
/// ```rust
/// use depthaig::AigEdge;
/// let fanin_false = AigEdge::constant(false);
/// let fanin_true = AigEdge::constant(true);
/// assert_eq!(fanin_false, !fanin_true);
/// assert!(fanin_true.is_cst_true());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AigEdge {
    /// The node the edge is refering to.
    pub(crate) node: NodeId,
    /// Set to true if signal should be inverted.
    pub(crate) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl Display for AigEdge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.complement {
            write!(f, "!{}", self.node)
        } else {
            write!(f, "{}", self.node)
        }
    }
}

impl AigEdge {
    pub fn new(node: NodeId, complement: bool) -> Self {
        AigEdge { node, complement }
    }

    /// Edge pointing at the constant node, complemented if `value` is true.
    pub fn constant(value: bool) -> Self {
        AigEdge {
            node: 0,
            complement: value,
        }
    }

    pub fn get_node_id(&self) -> NodeId {
        self.node
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    pub fn is_cst_false(&self) -> bool {
        self.node == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.node == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.node == other.node && self.complement ^ other.complement
    }
}
