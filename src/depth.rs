//! Levels, depth and critical path of a network.
//!
//! The level of a node is the length (in gates) of the longest path from an input (or the constant)
//! to it, inputs and the constant being at level 0. The depth of the network is the maximum level
//! among its outputs, and a node is on the critical path if some input-to-output path of length
//! exactly the depth goes through it.
//!
//! ```rust
//! use depthaig::{Aig, Network, depth::{DepthNetwork, DepthView}};
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let c = aig.add_input();
//! let ab = aig.create_and(a, b);
//! let abc = aig.create_and(ab, c);
//! aig.add_output(abc).unwrap();
//!
//! let view = DepthView::new(&mut aig);
//! assert_eq!(view.depth(), 2);
//! assert!(view.is_on_critical_path(ab.get_node_id()));
//! assert!(!view.is_on_critical_path(c.get_node_id()));
//! ```

use log::error;

use crate::{AigEdge, Network, NodeId, dfs};

/// A network which can answer level and critical path queries.
pub trait DepthNetwork: Network {
    fn level(&self, id: NodeId) -> u32;

    fn is_on_critical_path(&self, id: NodeId) -> bool;

    /// Maximum level among outputs, 0 for a network without outputs.
    fn depth(&self) -> u32;

    /// Recomputes levels and critical path from the current structure.
    ///
    /// Must be called after every substitution before querying levels again.
    fn update_levels(&mut self);
}

/// Wraps a network to provide it with levels and critical path information.
///
/// Gates created through the view get a level right away, but they only join the critical
/// path on the next [`DepthNetwork::update_levels`].
pub struct DepthView<'a, N: Network> {
    ntk: &'a mut N,
    levels: Vec<u32>,
    critical: Vec<bool>,
    depth: u32,
}

impl<'a, N: Network> DepthView<'a, N> {
    pub fn new(ntk: &'a mut N) -> Self {
        let mut view = DepthView {
            ntk,
            levels: Vec::new(),
            critical: Vec::new(),
            depth: 0,
        };
        view.update_levels();
        view
    }

    /// The wrapped network.
    pub fn network(&self) -> &N {
        self.ntk
    }

    /// Nodes currently on the critical path, in ascending id order.
    pub fn critical_nodes(&self) -> Vec<NodeId> {
        self.critical
            .iter()
            .enumerate()
            .filter_map(|(id, &c)| c.then_some(id))
            .collect()
    }

    fn compute_levels(&mut self) {
        // Dangling gates get a level too, structural hashing may hand them out again
        let order = dfs::topological_sort(&*self.ntk, &self.ntk.get_gates());
        debug_assert!(
            order.is_ok(),
            "levels need an acyclic network, which create_and and substitute_node maintain"
        );
        let order = match order {
            Ok(order) => order,
            Err(err) => {
                error!("cannot compute levels: {}", err);
                return;
            }
        };

        for id in order {
            self.levels[id] = self
                .ntk
                .get_fanins(id)
                .iter()
                .map(|f| self.levels[f.get_node_id()] + 1)
                .max()
                .unwrap_or(0);
        }

        self.depth = self
            .ntk
            .get_outputs()
            .iter()
            .map(|o| self.levels[o.get_node_id()])
            .max()
            .unwrap_or(0);
    }

    fn compute_critical_path(&mut self) {
        let mut stack: Vec<NodeId> = self
            .ntk
            .get_outputs()
            .iter()
            .map(AigEdge::get_node_id)
            .filter(|&id| self.levels[id] == self.depth)
            .collect();

        while let Some(id) = stack.pop() {
            if self.critical[id] {
                continue;
            }
            self.critical[id] = true;

            let level = self.levels[id];
            for fanin in self.ntk.get_fanins(id) {
                let child = fanin.get_node_id();
                if !self.critical[child] && self.levels[child] + 1 == level {
                    stack.push(child);
                }
            }
        }
    }
}

impl<N: Network> DepthNetwork for DepthView<'_, N> {
    fn level(&self, id: NodeId) -> u32 {
        self.levels.get(id).copied().unwrap_or(0)
    }

    fn is_on_critical_path(&self, id: NodeId) -> bool {
        self.critical.get(id).copied().unwrap_or(false)
    }

    fn depth(&self) -> u32 {
        self.depth
    }

    fn update_levels(&mut self) {
        let size = self.ntk.size();
        self.levels = vec![0; size];
        self.critical = vec![false; size];
        self.depth = 0;
        self.compute_levels();
        self.compute_critical_path();
    }
}

impl<N: Network> Network for DepthView<'_, N> {
    fn size(&self) -> usize {
        self.ntk.size()
    }

    fn is_dead(&self, id: NodeId) -> bool {
        self.ntk.is_dead(id)
    }

    fn is_and(&self, id: NodeId) -> bool {
        self.ntk.is_and(id)
    }

    fn is_or(&self, id: NodeId) -> bool {
        self.ntk.is_or(id)
    }

    fn get_gates(&self) -> Vec<NodeId> {
        self.ntk.get_gates()
    }

    fn get_fanins(&self, id: NodeId) -> Vec<AigEdge> {
        self.ntk.get_fanins(id)
    }

    fn get_outputs(&self) -> Vec<AigEdge> {
        self.ntk.get_outputs()
    }

    fn create_and(&mut self, fanin0: AigEdge, fanin1: AigEdge) -> AigEdge {
        let f = self.ntk.create_and(fanin0, fanin1);
        let id = f.get_node_id();
        if id >= self.levels.len() {
            let size = self.ntk.size();
            self.levels.resize(size, 0);
            self.critical.resize(size, false);
            let level = self.level(fanin0.get_node_id()).max(self.level(fanin1.get_node_id()));
            self.levels[id] = level + 1;
        }
        f
    }

    fn substitute_node(&mut self, old: NodeId, new: AigEdge) {
        self.ntk.substitute_node(old, new);
    }
}
