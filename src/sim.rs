//! Bit-parallel simulation and truth tables.
//!
//! Rewrites are only valid if they preserve the function of the network. For small networks,
//! this can be checked exhaustively by comparing the truth tables of the outputs:
//!
//! ```rust
//! use depthaig::{Aig, Network};
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let x = aig.create_and(a, b);
//! aig.add_output(x).unwrap();
//!
//! let mut other = Aig::new();
//! let a = other.add_input();
//! let b = other.add_input();
//! let y = other.create_or(!a, !b);
//! other.add_output(!y).unwrap();
//!
//! assert!(aig.equivalent(&other).unwrap());
//! assert_eq!(aig.truth_tables().unwrap()[0].to_string(), "8");
//! ```

use std::fmt::Display;

use crate::{Aig, AigEdge, AigError, AigNode, Network, NodeId, Result, dfs};

/// Maximum number of inputs for exhaustive simulation.
pub const MAX_TRUTH_TABLE_INPUTS: usize = 16;

/// Simulation patterns of the first six variables within a 64-bit word.
const VAR_PATTERNS: [u64; 6] = [
    0xaaaa_aaaa_aaaa_aaaa,
    0xcccc_cccc_cccc_cccc,
    0xf0f0_f0f0_f0f0_f0f0,
    0xff00_ff00_ff00_ff00,
    0xffff_0000_ffff_0000,
    0xffff_ffff_0000_0000,
];

/// The complete truth table of a Boolean function of `num_vars` variables.
///
/// Bit `i` holds the value of the function for the assignment where variable `k` is bit `k` of `i`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TruthTable {
    num_vars: usize,
    words: Vec<u64>,
}

impl TruthTable {
    fn num_words(num_vars: usize) -> usize {
        if num_vars <= 6 { 1 } else { 1 << (num_vars - 6) }
    }

    fn mask(num_vars: usize) -> u64 {
        if num_vars >= 6 {
            u64::MAX
        } else {
            (1u64 << (1 << num_vars)) - 1
        }
    }

    /// The projection on variable `var`.
    pub fn nth_var(num_vars: usize, var: usize) -> Self {
        assert!(var < num_vars, "variable {} out of {} variables", var, num_vars);
        let words = (0..Self::num_words(num_vars))
            .map(|w| {
                if var < 6 {
                    VAR_PATTERNS[var] & Self::mask(num_vars)
                } else if (w >> (var - 6)) & 1 == 1 {
                    u64::MAX
                } else {
                    0
                }
            })
            .collect();
        TruthTable { num_vars, words }
    }

    fn from_words(num_vars: usize, mut words: Vec<u64>) -> Self {
        for word in words.iter_mut() {
            *word &= Self::mask(num_vars);
        }
        TruthTable { num_vars, words }
    }

    pub fn num_vars(&self) -> usize {
        self.num_vars
    }

    pub fn words(&self) -> &[u64] {
        &self.words
    }

    pub fn get_bit(&self, index: usize) -> bool {
        (self.words[index / 64] >> (index % 64)) & 1 == 1
    }

    /// Number of satisfying assignments.
    pub fn count_ones(&self) -> u32 {
        self.words.iter().map(|w| w.count_ones()).sum()
    }
}

impl Display for TruthTable {
    /// Hexadecimal, most significant bit first.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.num_vars <= 6 {
            let digits = ((1usize << self.num_vars) / 4).max(1);
            write!(f, "{:0width$x}", self.words[0], width = digits)
        } else {
            for word in self.words.iter().rev() {
                write!(f, "{:016x}", word)?;
            }
            Ok(())
        }
    }
}

fn edge_value(values: &[Vec<u64>], edge: AigEdge) -> impl Iterator<Item = u64> + '_ {
    let complement = if edge.complement { u64::MAX } else { 0 };
    values[edge.node].iter().map(move |w| w ^ complement)
}

impl Aig {
    /// Simulates the transitive fanin of `roots`, `input_words[k]` holding the values of the k-th input.
    ///
    /// Returns the values of every visited node, indexed by id.
    fn simulate_words(&self, roots: &[NodeId], input_words: &[Vec<u64>]) -> Result<Vec<Vec<u64>>> {
        let num_words = input_words.first().map(Vec::len).unwrap_or(1);
        let mut input_index = vec![None; self.size()];
        for (k, &id) in self.get_inputs().iter().enumerate() {
            input_index[id] = Some(k);
        }

        let mut values = vec![Vec::new(); self.size()];
        for id in dfs::topological_sort(self, roots)? {
            values[id] = match self.get_node(id) {
                Some(AigNode::False) => vec![0; num_words],
                Some(AigNode::Input(_)) => match input_index[id] {
                    Some(k) => input_words[k].clone(),
                    None => {
                        return Err(AigError::InvalidState(format!(
                            "input {} is not registered",
                            id
                        )));
                    }
                },
                Some(AigNode::And { fanin0, fanin1, .. }) => edge_value(&values, *fanin0)
                    .zip(edge_value(&values, *fanin1))
                    .map(|(a, b)| a & b)
                    .collect(),
                None => return Err(AigError::NodeDoesNotExist(id)),
            };
        }
        Ok(values)
    }

    /// Simulates 64 input patterns at once: `patterns[k]` holds the 64 values of the k-th input.
    /// Returns one word per output.
    pub fn simulate(&self, patterns: &[u64]) -> Result<Vec<u64>> {
        if patterns.len() != self.num_inputs() {
            return Err(AigError::InputsMismatch(patterns.len(), self.num_inputs()));
        }
        let input_words: Vec<Vec<u64>> = patterns.iter().map(|&p| vec![p]).collect();
        let outputs = self.get_outputs();
        let roots: Vec<NodeId> = outputs.iter().map(|o| o.node).collect();
        let values = self.simulate_words(&roots, &input_words)?;
        Ok(outputs
            .iter()
            .map(|&o| edge_value(&values, o).next().unwrap_or(0))
            .collect())
    }

    fn projections(&self) -> Result<Vec<Vec<u64>>> {
        let n = self.num_inputs();
        if n > MAX_TRUTH_TABLE_INPUTS {
            return Err(AigError::TooManyInputs(n));
        }
        Ok((0..n)
            .map(|k| TruthTable::nth_var(n, k).words)
            .collect())
    }

    /// Truth table of a signal, as a function of all the inputs.
    pub fn node_truth_table(&self, edge: AigEdge) -> Result<TruthTable> {
        if self.is_dead(edge.node) {
            return Err(AigError::NodeDoesNotExist(edge.node));
        }
        let n = self.num_inputs();
        let values = self.simulate_words(&[edge.node], &self.projections()?)?;
        let words = if edge.node == 0 && values[0].is_empty() {
            vec![0; TruthTable::num_words(n)]
        } else {
            edge_value(&values, edge).collect()
        };
        Ok(TruthTable::from_words(n, words))
    }

    /// Truth tables of all outputs.
    pub fn truth_tables(&self) -> Result<Vec<TruthTable>> {
        let n = self.num_inputs();
        let outputs = self.get_outputs();
        let roots: Vec<NodeId> = outputs.iter().map(|o| o.node).collect();
        let values = self.simulate_words(&roots, &self.projections()?)?;
        Ok(outputs
            .iter()
            .map(|&o| TruthTable::from_words(n, edge_value(&values, o).collect()))
            .collect())
    }

    /// Exhaustively checks that both AIGs compute the same functions.
    /// Inputs and outputs are matched by position.
    pub fn equivalent(&self, other: &Aig) -> Result<bool> {
        if self.num_inputs() != other.num_inputs() {
            return Err(AigError::InputsMismatch(
                self.num_inputs(),
                other.num_inputs(),
            ));
        }
        if self.num_outputs() != other.num_outputs() {
            return Err(AigError::OutputsMismatch(
                self.num_outputs(),
                other.num_outputs(),
            ));
        }
        Ok(self.truth_tables()? == other.truth_tables()?)
    }
}
