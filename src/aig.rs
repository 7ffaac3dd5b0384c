//! Module defining the [`Aig`] struct, as well as [`AigNode`], [`AigEdge`] and some others relevant structs.
//!
//! To reduce the depth of an AIG, check [`crate::rewrite`] and [`crate::depth::DepthView`] docs.

pub mod dfs;
pub mod dot;
pub mod edge;
pub mod error;
mod integrity;
pub mod node;
mod parser;
mod writer;

use std::collections::HashMap;

use log::trace;

pub use edge::AigEdge;
pub use error::{AigError, ParserError, Result};
pub use node::{AigNode, NodeId};

use crate::network::Network;

/// A whole (combinational) AIG.
///
/// Nodes live in an arena indexed by their [`NodeId`]. Reclaimed nodes leave a hole in the arena,
/// ids are never reused so a [`NodeId`] stays a stable handle for the lifetime of the AIG.
///
/// Gates are structurally hashed: [`Aig::new_and`] (or [`Network::create_and`]) returns the existing
/// gate when one with the same pair of fanins is already present, and trivial gates
/// (`x & x`, `x & !x`, `x & 0`, `x & 1`) are never created.
///
/// A gate nobody uses (no gate fanout and not an output) is called *dangling*.
/// [`Network::substitute_node`] reclaims the nodes it leaves dangling. Gates you created yourself and never used
/// are kept around until you call [`Aig::cleanup`].
///
/// ```rust
/// use depthaig::{Aig, Network};
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// let b = aig.add_input();
/// let x = aig.new_and(a, b).unwrap();
/// let y = aig.new_and(b, a).unwrap(); // same gate
/// assert_eq!(x, y);
/// assert_eq!(aig.new_and(a, !a).unwrap(), aig.get_constant(false));
/// aig.add_output(!x).unwrap();
/// assert_eq!(aig.num_gates(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct Aig {
    /// Node arena, `None` marks a reclaimed node.
    nodes: Vec<Option<AigNode>>,
    /// Gate fanouts of each node. A gate never uses the same node twice (it would be trivial),
    /// so each consumer appears at most once.
    fanouts: Vec<Vec<NodeId>>,
    /// Number of outputs pointing at each node.
    output_refs: Vec<u32>,
    /// Structural hashing table, keyed by normalized fanins.
    strash: HashMap<(AigEdge, AigEdge), NodeId>,
    inputs: Vec<NodeId>,
    outputs: Vec<AigEdge>,
}

impl Default for Aig {
    fn default() -> Self {
        Aig::new()
    }
}

impl Aig {
    /// Create a brand new AIG (constant node [`AigNode::False`] included).
    pub fn new() -> Self {
        Aig {
            nodes: vec![Some(AigNode::False)],
            fanouts: vec![Vec::new()],
            output_refs: vec![0],
            strash: HashMap::new(),
            inputs: Vec::new(),
            outputs: Vec::new(),
        }
    }

    fn alloc(&mut self, node: AigNode) -> NodeId {
        let id = self.nodes.len();
        debug_assert_eq!(node.get_id(), id);
        self.nodes.push(Some(node));
        self.fanouts.push(Vec::new());
        self.output_refs.push(0);
        id
    }

    /// Retrieves a node from its id, [`None`] if it does not exist (or has been reclaimed).
    pub fn get_node(&self, id: NodeId) -> Option<&AigNode> {
        self.nodes.get(id)?.as_ref()
    }

    fn check_edge(&self, edge: AigEdge) -> Result<()> {
        match self.get_node(edge.node) {
            Some(_) => Ok(()),
            None => Err(AigError::NodeDoesNotExist(edge.node)),
        }
    }

    /// Create a new primary input.
    pub fn add_input(&mut self) -> AigEdge {
        let id = self.nodes.len();
        self.alloc(AigNode::Input(id));
        self.inputs.push(id);
        AigEdge::new(id, false)
    }

    /// Mark an existing signal as an output.
    pub fn add_output(&mut self, edge: AigEdge) -> Result<()> {
        self.check_edge(edge)?;
        self.output_refs[edge.node] += 1;
        self.outputs.push(edge);
        Ok(())
    }

    /// Create a new and gate (or retrieve it if the exact same gate already exists).
    ///
    /// Unlike [`Network::create_and`], fanins are checked.
    pub fn new_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> Result<AigEdge> {
        self.check_edge(fanin0)?;
        self.check_edge(fanin1)?;
        Ok(self.create_and(fanin0, fanin1))
    }

    /// Retrieves inputs id, in creation order.
    pub fn get_inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Number of live and gates (dangling ones included).
    pub fn num_gates(&self) -> usize {
        self.nodes
            .iter()
            .filter(|n| matches!(n, Some(AigNode::And { .. })))
            .count()
    }

    /// Gates using the given node as a fanin.
    pub fn get_fanouts(&self, id: NodeId) -> &[NodeId] {
        self.fanouts.get(id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of references to a node: gate fanouts plus outputs.
    pub fn fanout_size(&self, id: NodeId) -> usize {
        self.get_fanouts(id).len() + self.output_refs.get(id).copied().unwrap_or(0) as usize
    }

    /// Returns a topological sort (fanins first) of the nodes reachable from the outputs,
    /// will error if a cycle is detected.
    pub fn get_topological_sort(&self) -> Result<Vec<NodeId>> {
        let roots: Vec<NodeId> = self.outputs.iter().map(|o| o.node).collect();
        dfs::topological_sort(self, &roots)
    }

    /// Reclaims every dangling gate (and the gates only they were using).
    pub fn cleanup(&mut self) {
        for id in 1..self.nodes.len() {
            self.take_out_node(id);
        }
    }

    /// Reclaims `id` if it is a gate nobody refers to anymore,
    /// then tries to reclaim its fanins in turn.
    fn take_out_node(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(id) = stack.pop() {
            let Some(AigNode::And { fanin0, fanin1, .. }) = self.get_node(id) else {
                continue;
            };
            if self.fanout_size(id) != 0 {
                continue;
            }
            let (fanin0, fanin1) = (*fanin0, *fanin1);
            trace!("reclaiming node {}", id);

            if self.strash.get(&(fanin0, fanin1)) == Some(&id) {
                self.strash.remove(&(fanin0, fanin1));
            }
            self.nodes[id] = None;
            for fanin in [fanin0, fanin1] {
                self.fanouts[fanin.node].retain(|&f| f != id);
                stack.push(fanin.node);
            }
        }
    }

    /// Rewires fanin `old` of gate `id` to `new`.
    ///
    /// Returns a substitution to perform instead when the rewired gate would be trivial
    /// or would duplicate an existing gate, in that case `id` is left untouched.
    fn replace_in_node(&mut self, id: NodeId, old: NodeId, new: AigEdge) -> Option<(NodeId, AigEdge)> {
        let Some(AigNode::And { fanin0, fanin1, .. }) = self.get_node(id) else {
            return None;
        };
        let (fanin0, fanin1) = (*fanin0, *fanin1);
        let (kept, replaced) = if fanin0.node == old {
            (fanin1, fanin0)
        } else if fanin1.node == old {
            (fanin0, fanin1)
        } else {
            return None;
        };
        let new = if replaced.complement { !new } else { new };

        let (child0, child1) = if new < kept { (new, kept) } else { (kept, new) };

        // Trivial cases
        if child0.is_complement_of(&child1) || child0.is_cst_false() {
            return Some((id, AigEdge::constant(false)));
        }
        if child0 == child1 || child0.is_cst_true() {
            return Some((id, child1));
        }

        // Structurally equal to an existing gate
        match self.strash.get(&(child0, child1)) {
            Some(&existing) if existing != old => {
                return Some((id, AigEdge::new(existing, false)));
            }
            _ => (),
        }

        if self.strash.get(&(fanin0, fanin1)) == Some(&id) {
            self.strash.remove(&(fanin0, fanin1));
        }
        self.nodes[id] = Some(AigNode::and(id, child0, child1));
        self.strash.insert((child0, child1), id);
        self.fanouts[old].retain(|&f| f != id);
        self.fanouts[new.node].push(id);
        None
    }
}

impl Network for Aig {
    fn size(&self) -> usize {
        self.nodes.len()
    }

    fn is_dead(&self, id: NodeId) -> bool {
        self.get_node(id).is_none()
    }

    fn is_and(&self, id: NodeId) -> bool {
        self.get_node(id).is_some_and(AigNode::is_and)
    }

    fn get_gates(&self) -> Vec<NodeId> {
        self.nodes
            .iter()
            .enumerate()
            .filter_map(|(id, n)| n.as_ref().filter(|n| n.is_and()).map(|_| id))
            .collect()
    }

    fn get_fanins(&self, id: NodeId) -> Vec<AigEdge> {
        self.get_node(id).map(AigNode::get_fanins).unwrap_or_default()
    }

    fn get_outputs(&self) -> Vec<AigEdge> {
        self.outputs.clone()
    }

    fn create_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> AigEdge {
        debug_assert!(!self.is_dead(fanin0.node) && !self.is_dead(fanin1.node));
        let (a, b) = if fanin1 < fanin0 {
            (fanin1, fanin0)
        } else {
            (fanin0, fanin1)
        };

        // Trivial cases, the constant node (id 0) always comes first
        if a.is_complement_of(&b) || a.is_cst_false() {
            return AigEdge::constant(false);
        }
        if a == b || a.is_cst_true() {
            return b;
        }

        if let Some(&id) = self.strash.get(&(a, b)) {
            return AigEdge::new(id, false);
        }

        let id = self.nodes.len();
        self.alloc(AigNode::and(id, a, b));
        self.strash.insert((a, b), id);
        self.fanouts[a.node].push(id);
        self.fanouts[b.node].push(id);
        AigEdge::new(id, false)
    }

    /// Replaces every use of `old` (gate fanins and outputs) by `new`.
    ///
    /// Consumers becoming trivial or structurally equal to an existing gate are substituted in turn.
    /// `old` and every node left dangling by the operation are reclaimed.
    fn substitute_node(&mut self, old: NodeId, new: AigEdge) {
        let mut to_substitute = vec![(old, new)];

        while let Some((old, new)) = to_substitute.pop() {
            if new.node == old || self.is_dead(old) || self.is_dead(new.node) {
                continue;
            }
            trace!("substituting node {} by {}", old, new);

            // Outputs
            for output in self.outputs.iter_mut() {
                if output.node == old {
                    *output = if output.complement { !new } else { new };
                    self.output_refs[old] -= 1;
                    self.output_refs[new.node] += 1;
                }
            }

            // Gate fanouts
            let consumers = self.fanouts[old].clone();
            for consumer in consumers {
                if let Some(repl) = self.replace_in_node(consumer, old, new) {
                    to_substitute.push(repl);
                }
            }

            self.take_out_node(old);
        }
    }
}
