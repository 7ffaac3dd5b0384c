use crate::{Aig, AigEdge, AigError, AigNode, Network, NodeId, Result};

impl Aig {
    /// Checking if the AIG structure is correct.
    /// This function was written for debug purposes, as the library is supposed to maintain
    /// integrity of the AIG at any moment.
    pub fn check_integrity(&self) -> Result<()> {
        // Checking that all nodes have relevant id
        // and perform some individual integrity checks
        for (id, node) in self.nodes.iter().enumerate() {
            if let Some(node) = node {
                if node.get_id() != id {
                    return Err(AigError::InvalidState(format!(
                        "incoherent node id: {} in arena vs {} in node",
                        id,
                        node.get_id()
                    )));
                }
                self.check_node_integrity(node)?;
            }
        }

        for &input in &self.inputs {
            if !matches!(self.get_node(input), Some(AigNode::Input(_))) {
                return Err(AigError::InvalidState(format!(
                    "input {} is not an input node",
                    input
                )));
            }
        }

        // Checking that all outputs are registered as nodes
        let mut output_refs = vec![0u32; self.nodes.len()];
        for output in &self.outputs {
            self.check_edge_integrity(output)?;
            output_refs[output.node] += 1;
        }
        if output_refs != self.output_refs {
            return Err(AigError::InvalidState(
                "output reference counters are out of date".to_string(),
            ));
        }

        // Every strash entry points at the gate it describes
        for (&(fanin0, fanin1), &id) in &self.strash {
            match self.get_node(id) {
                Some(node) if node.strash_key() == Some((fanin0, fanin1)) => (),
                _ => {
                    return Err(AigError::InvalidState(format!(
                        "strash entry ({}, {}) -> {} is stale",
                        fanin0, fanin1, id
                    )));
                }
            }
        }

        // Checks for acyclicity
        let all: Vec<NodeId> = (0..self.nodes.len()).filter(|&id| !self.is_dead(id)).collect();
        crate::dfs::topological_sort(self, &all)?;

        Ok(())
    }

    /// Check the integrity for an individual node, that is:
    /// - check that only `False` have id 0
    /// - check that and gates are normalized, non trivial and hashed
    /// - check that fanins and fanouts are coherent with each other
    fn check_node_integrity(&self, node: &AigNode) -> Result<()> {
        let id = node.get_id();
        match node {
            AigNode::False => (),
            AigNode::Input(id) => {
                if *id == 0 {
                    return Err(AigError::InvalidState(
                        "id=0 is for node False only".to_string(),
                    ));
                }
            }
            AigNode::And {
                id, fanin0, fanin1, ..
            } => {
                if *id == 0 {
                    return Err(AigError::InvalidState(
                        "id=0 is for node False only".to_string(),
                    ));
                }
                if fanin0 >= fanin1 || fanin0.node == fanin1.node || fanin0.node == 0 {
                    return Err(AigError::InvalidState(format!(
                        "gate {} has unnormalized or trivial fanins ({}, {})",
                        id, fanin0, fanin1
                    )));
                }
                if self.strash.get(&(*fanin0, *fanin1)) != Some(id) {
                    return Err(AigError::InvalidState(format!(
                        "gate {} is missing from the strash table",
                        id
                    )));
                }
                for fanin in [fanin0, fanin1] {
                    self.check_edge_integrity(fanin)?;
                    if !self.fanouts[fanin.node].contains(id) {
                        return Err(AigError::InvalidState(format!(
                            "gate {} is not registered as a fanout of {}",
                            id, fanin.node
                        )));
                    }
                }
            }
        }

        for (k, &fanout) in self.fanouts[id].iter().enumerate() {
            if self.fanouts[id][..k].contains(&fanout) {
                return Err(AigError::InvalidState(format!(
                    "fanout {} registered twice on node {}",
                    fanout, id
                )));
            }
            if !self.get_fanins(fanout).iter().any(|f| f.node == id) {
                return Err(AigError::InvalidState(format!(
                    "fanout {} of node {} does not use it (or is no longer in the AIG)",
                    fanout, id
                )));
            }
        }
        Ok(())
    }

    fn check_edge_integrity(&self, fanin: &AigEdge) -> Result<()> {
        self.get_node(fanin.node).ok_or(AigError::InvalidState(format!(
            "edge pointing at node {} which is not in the AIG anymore",
            fanin.node
        )))?;
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use crate::{Aig, AigEdge, AigNode, Network};

    #[test]
    fn integrity_ok_test() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let x = aig.create_and(a, !b);
        aig.add_output(x).unwrap();
        assert!(aig.check_integrity().is_ok());
    }

    #[test]
    fn integrity_detects_stale_fanout() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let x = aig.create_and(a, b);
        aig.add_output(x).unwrap();

        aig.fanouts[a.node].clear();
        assert!(aig.check_integrity().is_err());
    }

    #[test]
    fn integrity_detects_cycle() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let x = aig.create_and(a, b);
        let y = aig.create_and(x, a);
        aig.add_output(y).unwrap();

        // Rewire x to use y behind the back of the AIG
        let (f0, f1) = (AigEdge::new(a.node, false), AigEdge::new(y.node, false));
        aig.strash.remove(&(a, b));
        aig.strash.insert((f0, f1), x.node);
        aig.nodes[x.node] = Some(AigNode::and(x.node, f0, f1));
        aig.fanouts[b.node].clear();
        aig.fanouts[y.node].push(x.node);
        assert!(aig.check_integrity().is_err());
    }
}
