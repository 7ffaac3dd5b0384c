//! Provides a DFS visitor and a topological sort to allow simple AIG traversal.
//!
//! Both work on anything implementing [`Network`], so they can also be used through a
//! [`DepthView`](crate::depth::DepthView).

use std::collections::HashSet;

use crate::{AigError, Network, NodeId, Result};

/// A simple DFS visitor.
///
/// Nodes are yielded in preorder. You can:
/// - start a DFS from a node using [`from_node`]
/// - or visit all the AIG by starting from the outputs using [`from_outputs`].
///
/// In the latter case, it will start by the fanin of the first output,
/// then explore all non-previously-explored nodes from the fanin of the second output,
/// and so on until all the outputs have been processed.
///
/// [`from_node`]: Dfs::from_node
/// [`from_outputs`]: Dfs::from_outputs
///
/// Example:
///
/// ```rust
/// use depthaig::{Aig, dfs::Dfs};
/// let mut aig = Aig::new();
/// let a = aig.add_input();
/// aig.add_output(a).unwrap();
/// let mut dfs = Dfs::from_outputs(&aig);
/// while let Some(id) = dfs.next(&aig) {
///     // You can still borrow mut aig here
///     assert_eq!(id, a.get_node_id());
/// }
/// ```
///
/// Inspired by [petgraph DFS](https://docs.rs/petgraph/latest/petgraph/visit/struct.Dfs.html).
pub struct Dfs {
    /// Must maintain the following invariant:
    /// - all nodes on the stack have not been visited yet
    /// - they are in `seen` to avoid adding them one more time to the stack
    /// - the different outputs from which to start a DFS are in starts
    ///   (they might have been visited already by the time we start the DFS from them,
    ///   and will simply be discarded if that's the case).
    stack: Vec<NodeId>,
    seen: HashSet<NodeId>,
    starts: Vec<NodeId>,
}

impl Dfs {
    /// Create a DFS from the initial start node.
    /// You will only browse the fanin of this node.
    pub fn from_node(start: NodeId) -> Self {
        Dfs {
            stack: vec![start],
            seen: HashSet::from([start]),
            starts: Vec::new(),
        }
    }

    /// Create a DFS from the outputs of the given network.
    pub fn from_outputs<N: Network + ?Sized>(ntk: &N) -> Self {
        let mut starts: Vec<NodeId> = ntk
            .get_outputs()
            .iter()
            .map(|output| output.get_node_id())
            .collect();
        starts.reverse();
        let mut dfs = Dfs {
            stack: Vec::new(),
            seen: HashSet::new(),
            starts,
        };
        dfs.new_start();
        dfs
    }

    /// Returns true if we are ready to start again! Else false, we are done.
    /// Should only be called when stack is empty (ie we are done with the current fanin).
    fn new_start(&mut self) -> bool {
        debug_assert!(self.stack.is_empty());

        while let Some(id) = self.starts.pop() {
            if self.seen.insert(id) {
                self.stack.push(id);
                return true;
            }
        }
        false
    }

    /// Yield the next node of the DFS, or None if it is done.
    /// If you created the DFS with the [`from_outputs`] method,
    /// this might be a new output if the current fanin has been fully explored.
    ///
    /// [`from_outputs`]: Dfs::from_outputs
    pub fn next<N: Network + ?Sized>(&mut self, ntk: &N) -> Option<NodeId> {
        loop {
            if let Some(id) = self.stack.pop() {
                for child in ntk.get_fanins(id) {
                    if self.seen.insert(child.get_node_id()) {
                        self.stack.push(child.get_node_id());
                    }
                }
                return Some(id);
            }

            // Maybe we can start from a different output?
            if !self.new_start() {
                return None;
            }
        }
    }
}

/// Returns a topological sort (fanins before fanouts) of all the nodes in the transitive fanin of `roots`.
///
/// Errors with [`AigError::InvalidState`] if a cycle is detected.
pub fn topological_sort<N: Network + ?Sized>(ntk: &N, roots: &[NodeId]) -> Result<Vec<NodeId>> {
    const NEW: u8 = 0;
    const IN_PROGRESS: u8 = 1;
    const DONE: u8 = 2;

    let mut state = vec![NEW; ntk.size()];
    let mut sort = Vec::new();
    let mut stack: Vec<(NodeId, bool)> = Vec::new();

    for &root in roots {
        stack.push((root, false));

        while let Some((id, last_time)) = stack.pop() {
            // Post order
            if last_time {
                state[id] = DONE;
                sort.push(id);
                continue;
            }

            match state[id] {
                DONE => continue,
                // Everything above the post order marker of a node is in its fanin
                IN_PROGRESS => {
                    return Err(AigError::InvalidState(format!(
                        "found a cycle through node {}",
                        id
                    )));
                }
                _ => (),
            }

            state[id] = IN_PROGRESS;
            stack.push((id, true));
            for fanin in ntk.get_fanins(id) {
                if state[fanin.get_node_id()] != DONE {
                    stack.push((fanin.get_node_id(), false));
                }
            }
        }
    }

    Ok(sort)
}
