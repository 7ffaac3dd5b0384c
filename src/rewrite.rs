//! Depth-oriented algebraic rewriting.
//!
//! The engine visits every gate of the network and tries, in this order:
//! - **associativity**: `(c & d) & b -> c & (d & b)` when `c` is critical and `b` is shallower than `c`;
//! - **distributivity**: `!(x & y) & !(x & z) -> !(x & (y | z))` when `x` is the critical signal shared by both products;
//! - **three-layer distributivity**: `a & !(b & !(x & d)) -> !(!(x & (a & d)) & !(a & !b))` when `a` is at least
//!   two levels shallower than the critical branch.
//!
//! Every rule only looks at nodes on the critical path. After each successful rewrite, levels are recomputed
//! and the enumeration of gates starts over, until a whole pass finds nothing to rewrite.
//!
//! ```rust
//! use depthaig::{Aig, Network, rewrite::aig_algebraic_rewriting};
//! let mut aig = Aig::new();
//! let a = aig.add_input();
//! let b = aig.add_input();
//! let c = aig.add_input();
//! let d = aig.add_input();
//! let ab = aig.create_and(a, b);
//! let abc = aig.create_and(ab, c);
//! let abcd = aig.create_and(abc, d);
//! aig.add_output(abcd).unwrap();
//!
//! let stats = aig_algebraic_rewriting(&mut aig);
//! assert_eq!(stats.depth_before, 3);
//! assert_eq!(stats.depth_after, 2);
//! ```

use std::fmt::Display;

use log::{debug, info, trace};

use crate::{
    AigEdge, Network, NodeId,
    depth::{DepthNetwork, DepthView},
};

/// The rewriting rules, in the order they are tried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    Associativity,
    Distributivity,
    ThreeLayerDistributivity,
}

impl Display for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Rule::Associativity => write!(f, "associativity"),
            Rule::Distributivity => write!(f, "distributivity"),
            Rule::ThreeLayerDistributivity => write!(f, "three-layer distributivity"),
        }
    }
}

/// Parameters of [`AlgebraicRewriting`].
#[derive(Debug, Clone)]
pub struct AlgebraicRewritingParams {
    /// Try the associativity rule.
    pub associativity: bool,
    /// Try the distributivity rule.
    pub distributivity: bool,
    /// Try the three-layer distributivity rule.
    pub three_layer_distributivity: bool,
    /// Stop after this many rewrites, even if the network is not at a fixpoint yet.
    pub max_rewrites: Option<usize>,
}

impl Default for AlgebraicRewritingParams {
    fn default() -> Self {
        AlgebraicRewritingParams {
            associativity: true,
            distributivity: true,
            three_layer_distributivity: true,
            max_rewrites: None,
        }
    }
}

/// Statistics of an [`AlgebraicRewriting`] run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AlgebraicRewritingStats {
    pub associativity: usize,
    pub distributivity: usize,
    pub three_layer_distributivity: usize,
    /// Number of (possibly interrupted) enumerations of the gates.
    pub passes: usize,
    pub depth_before: u32,
    pub depth_after: u32,
    pub gates_before: usize,
    pub gates_after: usize,
}

impl AlgebraicRewritingStats {
    pub fn num_rewrites(&self) -> usize {
        self.associativity + self.distributivity + self.three_layer_distributivity
    }

    fn record(&mut self, rule: Rule) {
        match rule {
            Rule::Associativity => self.associativity += 1,
            Rule::Distributivity => self.distributivity += 1,
            Rule::ThreeLayerDistributivity => self.three_layer_distributivity += 1,
        }
    }
}

/// Edges of one layer of fanins, split by critical path membership.
#[derive(Debug, Default)]
struct Layer {
    critical: Vec<AigEdge>,
    non_critical: Vec<AigEdge>,
}

impl Layer {
    fn is_singleton(&self) -> bool {
        self.critical.len() == 1 && self.non_critical.len() == 1
    }
}

/// What makes an edge count as critical when classifying a layer.
#[derive(Debug, Clone, Copy)]
enum Criterion {
    /// The node is on the critical path, whatever the polarity.
    Critical,
    /// The node is on the critical path and read uncomplemented.
    CriticalPlain,
    /// The node is on the critical path and read complemented.
    CriticalComplemented,
}

impl Criterion {
    fn accepts<N: DepthNetwork>(self, ntk: &N, edge: AigEdge) -> bool {
        let critical = ntk.is_on_critical_path(ntk.get_node_of(edge));
        match self {
            Criterion::Critical => critical,
            Criterion::CriticalPlain => critical && !ntk.is_complemented(edge),
            Criterion::CriticalComplemented => critical && ntk.is_complemented(edge),
        }
    }
}

/// Splits the fanins of `id` according to `criterion`, keeping fanin order.
fn classify<N: DepthNetwork>(ntk: &N, id: NodeId, criterion: Criterion) -> Layer {
    let mut layer = Layer::default();
    for fanin in ntk.get_fanins(id) {
        if criterion.accepts(ntk, fanin) {
            layer.critical.push(fanin);
        } else {
            layer.non_critical.push(fanin);
        }
    }
    layer
}

/// Follows a chain of complemented critical fanins `layers` deep below `id`.
///
/// Each layer must hold exactly one critical and one non-critical fanin; the next layer is
/// taken below the critical one. On the last layer, polarity is ignored.
fn critical_chain<N: DepthNetwork>(ntk: &N, id: NodeId, layers: usize) -> Option<Vec<Layer>> {
    let mut chain = Vec::with_capacity(layers);
    let mut current = id;
    for depth in 0..layers {
        let criterion = if depth + 1 == layers {
            Criterion::Critical
        } else {
            Criterion::CriticalComplemented
        };
        let layer = classify(ntk, current, criterion);
        if !layer.is_singleton() {
            return None;
        }
        current = ntk.get_node_of(layer.critical[0]);
        chain.push(layer);
    }
    Some(chain)
}

/// The rewriting engine, working on a network which provides levels.
///
/// Use [`aig_algebraic_rewriting`] to run it on a plain network.
pub struct AlgebraicRewriting<'a, N: DepthNetwork> {
    ntk: &'a mut N,
    params: AlgebraicRewritingParams,
}

impl<'a, N: DepthNetwork> AlgebraicRewriting<'a, N> {
    pub fn new(ntk: &'a mut N) -> Self {
        Self::with_params(ntk, AlgebraicRewritingParams::default())
    }

    pub fn with_params(ntk: &'a mut N, params: AlgebraicRewritingParams) -> Self {
        AlgebraicRewriting { ntk, params }
    }

    /// Rewrites the network until no rule applies anymore (or `max_rewrites` is reached).
    pub fn run(&mut self) -> AlgebraicRewritingStats {
        self.ntk.update_levels();

        let mut stats = AlgebraicRewritingStats {
            depth_before: self.ntk.depth(),
            gates_before: self.ntk.get_gates().len(),
            ..Default::default()
        };

        'fixpoint: loop {
            if self
                .params
                .max_rewrites
                .is_some_and(|max| stats.num_rewrites() >= max)
            {
                info!("stopping after {} rewrites", stats.num_rewrites());
                break;
            }
            stats.passes += 1;

            for n in self.ntk.get_gates() {
                if self.ntk.is_dead(n) {
                    continue;
                }
                if let Some(rule) = self.try_algebraic_rules(n) {
                    stats.record(rule);
                    self.ntk.update_levels();
                    // Neighbourhoods and critical path changed, start over
                    continue 'fixpoint;
                }
            }

            break;
        }

        stats.depth_after = self.ntk.depth();
        stats.gates_after = self.ntk.get_gates().len();
        info!(
            "algebraic rewriting: {} rewrites ({} assoc, {} distr, {} 3-layer distr), depth {} -> {}, gates {} -> {}",
            stats.num_rewrites(),
            stats.associativity,
            stats.distributivity,
            stats.three_layer_distributivity,
            stats.depth_before,
            stats.depth_after,
            stats.gates_before,
            stats.gates_after
        );
        stats
    }

    /// Try the rules in order on node `n`, returns the one which updated the network.
    fn try_algebraic_rules(&mut self, n: NodeId) -> Option<Rule> {
        if self.params.associativity && self.try_associativity(n) {
            return Some(Rule::Associativity);
        }
        if self.params.distributivity && self.try_distributivity(n) {
            return Some(Rule::Distributivity);
        }
        if self.params.three_layer_distributivity && self.try_three_layer_distributivity(n) {
            return Some(Rule::ThreeLayerDistributivity);
        }
        None
    }

    /// Substitutes `n` by `replacement` unless structural hashing folded the replacement back onto `n`.
    fn substitute(&mut self, rule: Rule, n: NodeId, replacement: AigEdge) -> bool {
        if self.ntk.get_node_of(replacement) == n {
            trace!("{}: replacement of node {} is the node itself", rule, n);
            return false;
        }
        debug!(
            "{}: substituting node {} (level {}) by {}",
            rule,
            n,
            self.ntk.level(n),
            replacement
        );
        self.ntk.substitute_node(n, replacement);
        true
    }

    /// `(c & d) & b -> c & (d & b)`, with `c` critical and `b` shallower than `c`.
    fn try_associativity(&mut self, n: NodeId) -> bool {
        if !self.ntk.is_and(n) || !self.ntk.is_on_critical_path(n) || self.ntk.level(n) <= 1 {
            return false;
        }

        let mut critical = Vec::new();
        let mut non_critical = Vec::new();
        // Level of the last fanin kept as is
        let mut non_critical_level = None;

        for child in self.ntk.get_fanins(n) {
            if Criterion::CriticalPlain.accepts(&*self.ntk, child) {
                let layer = classify(&*self.ntk, self.ntk.get_node_of(child), Criterion::Critical);
                critical.extend(layer.critical);
                non_critical.extend(layer.non_critical);
            } else {
                non_critical.push(child);
                non_critical_level = Some(self.ntk.level(self.ntk.get_node_of(child)));
            }
        }

        if critical.len() != 1 || non_critical.len() != 2 {
            return false;
        }
        let Some(non_critical_level) = non_critical_level else {
            return false;
        };
        if non_critical_level >= self.ntk.level(self.ntk.get_node_of(critical[0])) {
            trace!("associativity: node {} has no slack", n);
            return false;
        }

        let grouped = self.ntk.create_and(non_critical[0], non_critical[1]);
        let replacement = self.ntk.create_and(critical[0], grouped);
        self.substitute(Rule::Associativity, n, replacement)
    }

    /// `!(x & y) & !(x & z) -> !(x & (y | z))`, with `x` the critical signal of both products.
    fn try_distributivity(&mut self, n: NodeId) -> bool {
        if !self.ntk.is_on_critical_path(n) || self.ntk.level(n) <= 1 {
            return false;
        }

        let mut grand_children = Layer::default();
        for child in self.ntk.get_fanins(n) {
            if Criterion::CriticalComplemented.accepts(&*self.ntk, child) {
                let layer = classify(&*self.ntk, self.ntk.get_node_of(child), Criterion::Critical);
                grand_children.critical.extend(layer.critical);
                grand_children.non_critical.extend(layer.non_critical);
            }
        }

        if grand_children.critical.len() != 2 || grand_children.non_critical.len() != 2 {
            return false;
        }
        let [shared, other] = [grand_children.critical[0], grand_children.critical[1]];
        if shared != other {
            trace!("distributivity: node {} has no shared critical signal", n);
            return false;
        }

        let [y, z] = [grand_children.non_critical[0], grand_children.non_critical[1]];
        let or = self.ntk.create_or(y, z);
        let mut replacement = self.ntk.create_nand(shared, or);
        if self.ntk.is_or(n) {
            replacement = self.ntk.create_not(replacement);
        }
        self.substitute(Rule::Distributivity, n, replacement)
    }

    /// `a & !(b & !(x & d)) -> !(!(x & (a & d)) & !(a & !b))`, when `a` is at least two levels
    /// shallower than the critical branch.
    fn try_three_layer_distributivity(&mut self, n: NodeId) -> bool {
        if !self.ntk.is_on_critical_path(n) {
            return false;
        }

        let Some(chain) = critical_chain(&*self.ntk, n, 3) else {
            return false;
        };
        debug_assert!(chain.len() == 3 && chain.iter().all(Layer::is_singleton));

        let critical_child = chain[0].critical[0];
        let a = chain[0].non_critical[0];
        let b = chain[1].non_critical[0];
        let x = chain[2].critical[0];
        let d = chain[2].non_critical[0];

        let critical_level = self.ntk.level(self.ntk.get_node_of(critical_child));
        let non_critical_level = self.ntk.level(self.ntk.get_node_of(a));
        if critical_level < non_critical_level + 2 {
            trace!("three-layer distributivity: node {} has no slack", n);
            return false;
        }

        let ad = self.ntk.create_and(a, d);
        let xad = self.ntk.create_and(x, ad);
        let node1 = self.ntk.create_not(xad);
        let not_b = self.ntk.create_not(b);
        let a_not_b = self.ntk.create_and(a, not_b);
        let node2 = self.ntk.create_not(a_not_b);
        let replacement = self.ntk.create_nand(node1, node2);
        self.substitute(Rule::ThreeLayerDistributivity, n, replacement)
    }
}

/// Reduces the depth of `ntk` in place with default parameters.
///
/// The network is wrapped into a [`DepthView`] for the duration of the run. If you already have
/// a network providing levels, use [`AlgebraicRewriting`] directly.
pub fn aig_algebraic_rewriting<N: Network>(ntk: &mut N) -> AlgebraicRewritingStats {
    aig_algebraic_rewriting_with(ntk, AlgebraicRewritingParams::default())
}

/// Same as [`aig_algebraic_rewriting`], with custom parameters.
pub fn aig_algebraic_rewriting_with<N: Network>(
    ntk: &mut N,
    params: AlgebraicRewritingParams,
) -> AlgebraicRewritingStats {
    let mut view = DepthView::new(ntk);
    AlgebraicRewriting::with_params(&mut view, params).run()
}

#[cfg(test)]
mod test {
    use rand::{Rng, SeedableRng, rngs::SmallRng};
    use test_log::test;

    use super::*;
    use crate::Aig;

    fn depth_of(aig: &mut Aig) -> u32 {
        DepthView::new(aig).depth()
    }

    /// ((a & b) & c) & d
    fn unbalanced_chain() -> Aig {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let d = aig.add_input();
        let ab = aig.create_and(a, b);
        let abc = aig.create_and(ab, c);
        let abcd = aig.create_and(abc, d);
        aig.add_output(abcd).unwrap();
        aig
    }

    #[test]
    fn associativity_test() {
        let mut aig = unbalanced_chain();
        let reference = aig.clone();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.associativity, 1);
        assert_eq!(stats.num_rewrites(), 1);
        assert_eq!(stats.passes, 2);
        assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
        assert_eq!((stats.gates_before, stats.gates_after), (3, 3));

        // (a & b) & (c & d)
        let outputs = aig.get_outputs();
        let fanins = aig.get_fanins(outputs[0].get_node_id());
        assert_eq!(fanins.len(), 2);
        assert_eq!(fanins[0], AigEdge::new(5, false));
        assert_eq!(
            aig.get_fanins(fanins[1].get_node_id()),
            vec![AigEdge::new(3, false), AigEdge::new(4, false)]
        );

        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn associativity_fanin_order_test() {
        // The shallow fanin gets a higher id than the critical one
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let ab = aig.create_and(a, b);
        let abc = aig.create_and(ab, c);
        let d = aig.add_input();
        let abcd = aig.create_and(abc, d);
        aig.add_output(abcd).unwrap();
        let reference = aig.clone();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.associativity, 1);
        assert_eq!(stats.depth_after, 2);
        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn associativity_needs_slack_test() {
        // ((a & b) & c) & (e & f): the shallow side is as deep as a & b
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let e = aig.add_input();
        let f = aig.add_input();
        let ab = aig.create_and(a, b);
        let abc = aig.create_and(ab, c);
        let ef = aig.create_and(e, f);
        let n = aig.create_and(abc, ef);
        aig.add_output(n).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.passes, 1);
        assert_eq!(stats.depth_after, 3);
        assert_eq!(aig.num_gates(), 4);
    }

    #[test]
    fn associativity_needs_plain_edge_test() {
        // !((a & b) & c) & d
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let d = aig.add_input();
        let ab = aig.create_and(a, b);
        let abc = aig.create_and(ab, c);
        let n = aig.create_and(!abc, d);
        aig.add_output(n).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 3);
    }

    /// !(x & p) & !(x & q), with x = a & b
    fn shared_critical_signal() -> (Aig, AigEdge) {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let p = aig.add_input();
        let q = aig.add_input();
        let x = aig.create_and(a, b);
        let xp = aig.create_and(x, p);
        let xq = aig.create_and(x, q);
        let n = aig.create_and(!xp, !xq);
        aig.add_output(n).unwrap();
        (aig, x)
    }

    #[test]
    fn distributivity_test() {
        let (mut aig, x) = shared_critical_signal();
        let reference = aig.clone();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.distributivity, 1);
        assert_eq!(stats.num_rewrites(), 1);
        assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
        assert_eq!((stats.gates_before, stats.gates_after), (4, 3));

        // !(x & (p | q))
        let output = aig.get_outputs()[0];
        assert!(output.get_complement());
        let fanins = aig.get_fanins(output.get_node_id());
        assert_eq!(fanins[0], x);
        assert!(fanins[1].get_complement());
        assert_eq!(
            aig.get_fanins(fanins[1].get_node_id()),
            vec![AigEdge::new(3, true), AigEdge::new(4, true)]
        );

        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn distributivity_complemented_factor_test() {
        // !(!x & p) & !(!x & q), that is (x | !p) & (x | !q)
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let p = aig.add_input();
        let q = aig.add_input();
        let x = aig.create_and(a, b);
        let xp = aig.create_and(!x, p);
        let xq = aig.create_and(!x, q);
        let n = aig.create_and(!xp, !xq);
        aig.add_output(n).unwrap();
        let reference = aig.clone();

        let params = AlgebraicRewritingParams {
            associativity: false,
            three_layer_distributivity: false,
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.distributivity, 1);
        assert_eq!(stats.num_rewrites(), 1);
        assert_eq!((stats.depth_before, stats.depth_after), (3, 2));
        assert_eq!((stats.gates_before, stats.gates_after), (4, 3));

        // !(!x & (p | q))
        let output = aig.get_outputs()[0];
        assert!(output.get_complement());
        assert_eq!(aig.get_fanins(output.get_node_id())[0], !x);
        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn distributivity_needs_same_polarity_test() {
        // !(x & p) & !(!x & q): same critical node, read with opposite polarities
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let p = aig.add_input();
        let q = aig.add_input();
        let x = aig.create_and(a, b);
        let xp = aig.create_and(x, p);
        let xq = aig.create_and(!x, q);
        let n = aig.create_and(!xp, !xq);
        aig.add_output(n).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 3);
        assert_eq!(aig.num_gates(), 4);
    }

    #[test]
    fn distributivity_needs_shared_signal_test() {
        // !(x & p) & !(y & q), x and y being distinct critical gates
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let c = aig.add_input();
        let p = aig.add_input();
        let q = aig.add_input();
        let x = aig.create_and(a, b);
        let y = aig.create_and(b, c);
        let xp = aig.create_and(x, p);
        let yq = aig.create_and(y, q);
        let n = aig.create_and(!xp, !yq);
        aig.add_output(n).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 3);
    }

    /// a & !(b & !(x & d)), with x = e & f
    fn three_layers() -> Aig {
        let mut aig = Aig::new();
        let a = aig.add_input();
        let b = aig.add_input();
        let d = aig.add_input();
        let e = aig.add_input();
        let f = aig.add_input();
        let x = aig.create_and(e, f);
        let xd = aig.create_and(x, d);
        let inner = aig.create_and(b, !xd);
        let n = aig.create_and(a, !inner);
        aig.add_output(n).unwrap();
        aig
    }

    #[test]
    fn three_layer_distributivity_test() {
        let mut aig = three_layers();
        let reference = aig.clone();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.three_layer_distributivity, 1);
        assert_eq!(stats.num_rewrites(), 1);
        assert_eq!((stats.depth_before, stats.depth_after), (4, 3));
        assert_eq!((stats.gates_before, stats.gates_after), (4, 5));

        // !(!(x & (a & d)) & !(a & !b))
        let output = aig.get_outputs()[0];
        assert!(output.get_complement());
        let fanins = aig.get_fanins(output.get_node_id());
        assert!(fanins.iter().all(AigEdge::get_complement));
        assert_eq!(
            aig.get_fanins(fanins[1].get_node_id()),
            vec![AigEdge::new(1, false), AigEdge::new(2, true)]
        );

        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn three_layer_distributivity_needs_slack_test() {
        // Same shape, but a = (g & h) & i is only one level shallower than the critical branch
        let mut aig = Aig::new();
        let b = aig.add_input();
        let d = aig.add_input();
        let e = aig.add_input();
        let f = aig.add_input();
        let g = aig.add_input();
        let h = aig.add_input();
        let i = aig.add_input();
        let x = aig.create_and(e, f);
        let xd = aig.create_and(x, d);
        let inner = aig.create_and(b, !xd);
        let gh = aig.create_and(g, h);
        let a = aig.create_and(gh, i);
        let n = aig.create_and(a, !inner);
        aig.add_output(n).unwrap();

        let mut view = DepthView::new(&mut aig);
        assert_eq!(view.level(inner.get_node_id()), 3);
        assert_eq!(view.level(a.get_node_id()), 2);

        let stats = AlgebraicRewriting::new(&mut view).run();
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 4);
    }

    #[test]
    fn balanced_network_test() {
        let mut aig = Aig::new();
        let inputs: Vec<AigEdge> = (0..8).map(|_| aig.add_input()).collect();
        let mut layer = inputs;
        while layer.len() > 1 {
            layer = layer
                .chunks(2)
                .map(|pair| aig.create_and(pair[0], pair[1]))
                .collect();
        }
        aig.add_output(layer[0]).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.passes, 1);
        assert_eq!((stats.depth_before, stats.depth_after), (3, 3));
    }

    #[test]
    fn disabled_rules_test() {
        let (mut aig, _) = shared_critical_signal();
        let params = AlgebraicRewritingParams {
            distributivity: false,
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.num_rewrites(), 0);

        let mut aig = unbalanced_chain();
        let params = AlgebraicRewritingParams {
            associativity: false,
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 3);
    }

    #[test]
    fn max_rewrites_test() {
        let mut aig = unbalanced_chain();
        let params = AlgebraicRewritingParams {
            max_rewrites: Some(0),
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.passes, 0);
        assert_eq!(stats.depth_after, 3);

        // Eight inputs chained: several rewrites are needed
        let mut aig = Aig::new();
        let mut acc = aig.add_input();
        for _ in 0..7 {
            let i = aig.add_input();
            acc = aig.create_and(acc, i);
        }
        aig.add_output(acc).unwrap();
        let params = AlgebraicRewritingParams {
            max_rewrites: Some(1),
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.num_rewrites(), 1);
        assert_eq!((stats.depth_before, stats.depth_after), (7, 6));
    }

    #[test]
    fn long_chain_test() {
        let mut aig = Aig::new();
        let mut acc = aig.add_input();
        for _ in 0..15 {
            let i = aig.add_input();
            acc = aig.create_and(acc, i);
        }
        aig.add_output(acc).unwrap();
        let reference = aig.clone();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.depth_before, 15);
        assert!(stats.depth_after < 15);
        assert_eq!(stats.num_rewrites(), stats.associativity);
        assert_eq!(depth_of(&mut aig), stats.depth_after);
        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    #[test]
    fn idempotence_test() {
        for mut aig in [unbalanced_chain(), shared_critical_signal().0, three_layers()] {
            let first = aig_algebraic_rewriting(&mut aig);
            assert!(first.num_rewrites() > 0);
            let snapshot = aig.clone();

            let second = aig_algebraic_rewriting(&mut aig);
            assert_eq!(second.num_rewrites(), 0);
            assert_eq!(second.depth_before, first.depth_after);
            assert_eq!(aig.get_outputs(), snapshot.get_outputs());
            assert_eq!(aig.get_gates(), snapshot.get_gates());
        }
    }

    #[test]
    fn constant_and_input_outputs_test() {
        let mut aig = Aig::new();
        let a = aig.add_input();
        aig.add_output(a).unwrap();
        aig.add_output(AigEdge::constant(true)).unwrap();

        let stats = aig_algebraic_rewriting(&mut aig);
        assert_eq!(stats.num_rewrites(), 0);
        assert_eq!(stats.depth_after, 0);
        assert_eq!(aig.get_outputs(), vec![a, AigEdge::constant(true)]);
    }

    #[test]
    fn adder_test() {
        let mut aig = Aig::from_file("assets/circuits/adder4.aag").unwrap();
        let reference = aig.clone();

        let params = AlgebraicRewritingParams {
            max_rewrites: Some(1000),
            ..Default::default()
        };
        let stats = aig_algebraic_rewriting_with(&mut aig, params);
        assert_eq!(stats.depth_before, 8);
        assert!(stats.depth_after <= stats.depth_before);
        assert!(aig.check_integrity().is_ok());
        assert!(aig.equivalent(&reference).unwrap());
    }

    /// A random network, mostly chaining recent signals to get some depth.
    fn random_aig(rng: &mut SmallRng, num_inputs: usize, num_gates: usize) -> Aig {
        let mut aig = Aig::new();
        let mut signals: Vec<AigEdge> = (0..num_inputs).map(|_| aig.add_input()).collect();
        for _ in 0..num_gates {
            let recent = signals.len().saturating_sub(4);
            let i = rng.gen_range(recent..signals.len());
            let j = rng.gen_range(0..signals.len());
            let fanin0 = if rng.gen_bool(0.5) { !signals[i] } else { signals[i] };
            let fanin1 = if rng.gen_bool(0.5) { !signals[j] } else { signals[j] };
            let s = aig.create_and(fanin0, fanin1);
            signals.push(s);
        }
        for &s in signals.iter().rev().take(3) {
            aig.add_output(s).unwrap();
        }
        aig.cleanup();
        aig
    }

    #[test]
    fn random_networks_test() {
        const CAP: usize = 1000;
        let mut rng = SmallRng::seed_from_u64(0x5eed);

        for _ in 0..200 {
            let num_inputs = rng.gen_range(2..=8);
            let num_gates = rng.gen_range(1..=40);
            let mut aig = random_aig(&mut rng, num_inputs, num_gates);
            let reference = aig.clone();

            let params = AlgebraicRewritingParams {
                max_rewrites: Some(CAP),
                ..Default::default()
            };
            let stats = aig_algebraic_rewriting_with(&mut aig, params);

            assert!(aig.check_integrity().is_ok());
            assert!(aig.equivalent(&reference).unwrap());
            assert!(stats.depth_after <= stats.depth_before);
            assert_eq!(depth_of(&mut aig), stats.depth_after);

            if stats.num_rewrites() < CAP {
                assert_eq!(aig_algebraic_rewriting(&mut aig).num_rewrites(), 0);
            }
        }
    }

    #[test]
    fn random_networks_step_by_step_test() {
        let mut rng = SmallRng::seed_from_u64(42);
        let one_step = AlgebraicRewritingParams {
            max_rewrites: Some(1),
            ..Default::default()
        };

        for _ in 0..50 {
            let num_inputs = rng.gen_range(3..=6);
            let num_gates = rng.gen_range(10..=30);
            let mut aig = random_aig(&mut rng, num_inputs, num_gates);
            let reference = aig.clone();
            let mut depth = depth_of(&mut aig);

            for _ in 0..100 {
                let stats = aig_algebraic_rewriting_with(&mut aig, one_step.clone());
                assert!(aig.check_integrity().is_ok());
                assert!(aig.equivalent(&reference).unwrap());
                assert!(stats.depth_after <= depth);
                depth = stats.depth_after;
                if stats.num_rewrites() == 0 {
                    break;
                }
            }
        }
    }
}
