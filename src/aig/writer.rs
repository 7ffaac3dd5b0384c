//! AIGER writers, both ASCII (.aag) and binary (.aig).
//!
//! Variables are renumbered on export: inputs first (in creation order), then the gates
//! reachable from the outputs in topological order. Dangling gates are not exported.

use std::path::Path;

use crate::{Aig, AigEdge, Network, NodeId, Result, aig::error::ParserError, dfs};

/// AIGER numbering of the nodes of an AIG.
struct Numbering {
    /// Variable of each node id, 0 for the constant node (and unexported nodes).
    vars: Vec<u64>,
    /// Exported gates, in variable order.
    gates: Vec<NodeId>,
}

impl Numbering {
    fn new(aig: &Aig) -> Result<Self> {
        let mut vars = vec![0; aig.size()];
        for (k, &id) in aig.get_inputs().iter().enumerate() {
            vars[id] = k as u64 + 1;
        }

        let roots: Vec<NodeId> = aig.get_outputs().iter().map(AigEdge::get_node_id).collect();
        let gates: Vec<NodeId> = dfs::topological_sort(aig, &roots)?
            .into_iter()
            .filter(|&id| aig.is_and(id))
            .collect();
        let first = aig.num_inputs() as u64 + 1;
        for (k, &id) in gates.iter().enumerate() {
            vars[id] = first + k as u64;
        }

        Ok(Numbering { vars, gates })
    }

    fn literal(&self, edge: AigEdge) -> u64 {
        2 * self.vars[edge.get_node_id()] + edge.get_complement() as u64
    }

    fn max_var(&self, aig: &Aig) -> u64 {
        (aig.num_inputs() + self.gates.len()) as u64
    }

    /// Gate literal with its fanin literals, largest first.
    fn and(&self, aig: &Aig, id: NodeId) -> (u64, u64, u64) {
        let fanins = aig.get_fanins(id);
        let rhs0 = self.literal(fanins[0]);
        let rhs1 = self.literal(fanins[1]);
        (2 * self.vars[id], rhs0.max(rhs1), rhs0.min(rhs1))
    }
}

fn encode_delta(buf: &mut Vec<u8>, mut x: u64) {
    while x & !0x7f != 0 {
        buf.push((x & 0x7f) as u8 | 0x80);
        x >>= 7;
    }
    buf.push(x as u8);
}

impl Aig {
    /// Serializes the AIG in ASCII AIGER format.
    pub fn to_ascii(&self) -> Result<String> {
        let numbering = Numbering::new(self)?;
        let mut out = format!(
            "aag {} {} 0 {} {}\n",
            numbering.max_var(self),
            self.num_inputs(),
            self.num_outputs(),
            numbering.gates.len()
        );
        for k in 0..self.num_inputs() {
            out += &format!("{}\n", 2 * (k + 1));
        }
        for output in self.get_outputs() {
            out += &format!("{}\n", numbering.literal(output));
        }
        for &id in &numbering.gates {
            let (lhs, rhs0, rhs1) = numbering.and(self, id);
            out += &format!("{} {} {}\n", lhs, rhs0, rhs1);
        }
        Ok(out)
    }

    /// Serializes the AIG in binary AIGER format.
    pub fn to_bin(&self) -> Result<Vec<u8>> {
        let numbering = Numbering::new(self)?;
        let mut header = format!(
            "aig {} {} 0 {} {}\n",
            numbering.max_var(self),
            self.num_inputs(),
            self.num_outputs(),
            numbering.gates.len()
        );
        for output in self.get_outputs() {
            header += &format!("{}\n", numbering.literal(output));
        }

        let mut buf = header.into_bytes();
        for &id in &numbering.gates {
            let (lhs, rhs0, rhs1) = numbering.and(self, id);
            encode_delta(&mut buf, lhs - rhs0);
            encode_delta(&mut buf, rhs0 - rhs1);
        }
        Ok(buf)
    }

    /// Writes the AIG to an .aig (resp .aag) file using bin (resp. ASCII) AIGER format.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match path.as_ref().extension().and_then(|ext| ext.to_str()) {
            Some("aag") => self.to_ascii()?.into_bytes(),
            Some("aig") => self.to_bin()?,
            _ => {
                return Err(ParserError::IoError(
                    "invalid extension, expected .aag or .aig".to_string(),
                )
                .into());
            }
        };
        std::fs::write(path, content).map_err(ParserError::from)?;
        Ok(())
    }
}
