//! You can also export AIGs to the Graphviz dot format using [`Aig::to_dot`].
//! A [`DepthView`] can be exported as well with [`DepthView::to_dot`]: gates are labelled with their level
//! and the critical path is highlighted.
//!
//! ```rust
//! use depthaig::{Aig, DepthView};
//! use depthaig::dot::GraphvizStyle;
//!
//! let mut aig = Aig::from_file("assets/circuits/half_adder.aag").unwrap();
//! println!("{}", aig.to_dot(GraphvizStyle::default()));
//!
//! let view = DepthView::new(&mut aig);
//! println!("{}", view.to_dot(GraphvizStyle::default()));
//! ```
//!
//! You can then render the graphs using the DOT engine.

use std::{fmt::Display, ops::Add};

use crate::{
    Aig, AigEdge, AigNode, Network, NodeId,
    depth::{DepthNetwork, DepthView},
    dfs::Dfs,
};

// Definining default global style.
const DEFAULT_RANKDIR: &str = "BT";

// Defining default style for nodes.
const DEFAULT_FALSE_NODE_FORMAT: &str = "[shape=point, label=\"GND\", width=1.5]";
const DEFAULT_INPUT_NODE_FORMAT: &str = "[shape=box]";
const DEFAULT_AND_NODE_FORMAT: &str = "[shape=circle]";
const DEFAULT_CRITICAL_NODE_FORMAT: &str = "[color=red, fontcolor=red]";
/// See https://stackoverflow.com/questions/50822798/how-to-use-graphviz-to-draw-a-node-pointed-by-an-arrow.
const DEFAULT_OUTPUT_NODE_FORMAT: &str = "[shape=none, height=.0, width=.0]";

// Defining default style for edges.
const DEFAULT_EDGE_ALL_FORMAT: &str = "[arrowsize=0.3]";
const DEFAULT_EDGE_COMPLEMENT_FORMAT: &str = "[headlabel=\"●\", labelangle=.0, labeldistance=1.5]";
const DEFAULT_EDGE_CRITICAL_FORMAT: &str = "[color=red, penwidth=2]";
const DEFAULT_EDGE_OUTPUT_FORMAT: &str = "[arrowhead=none]";

/// String containing the graphviz node style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of nodes can be described.
#[derive(Debug, Clone)]
pub struct GraphvizNodeStyle(pub String);

impl Display for GraphvizNodeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// String containing the graphviz edge style (you must manually include square brackets).
///
/// See [`GraphvizStyle`] for what kind of edges can be described.
#[derive(Debug, Clone, Default)]
pub struct GraphvizEdgeStyle(pub String);

impl Display for GraphvizEdgeStyle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Add for GraphvizEdgeStyle {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        GraphvizEdgeStyle(format!("{}{}", self.0, rhs.0))
    }
}

/// Parameters for Graphviz rendering.
///
/// ### Global parameters
/// - `rankdir`
///
/// ### Nodes
/// The following nodes can be rendered using [`GraphvizNodeStyle`]:
/// - [`AigNode::False`]
/// - [`AigNode::Input`]
/// - [`AigNode::And`]
/// - output (by default, invisible node just to get an arrow).
///
/// When exporting a [`DepthView`], the `critical` style is appended to nodes on the critical path.
///
/// ### Edges
/// Edge styles are additive. All edges implement the `edge_all` style. To that can be added:
/// - `edge_complement` if the edge is complemented
/// - `edge_critical` if the edge is part of the critical path (only for a [`DepthView`])
/// - `edge_output` if the edge is directed to an output.
#[derive(Debug, Clone)]
pub struct GraphvizStyle {
    // Global
    pub rankdir: String,

    // Nodes
    pub cst_false: GraphvizNodeStyle,
    pub input: GraphvizNodeStyle,
    pub and: GraphvizNodeStyle,
    pub critical: GraphvizNodeStyle,
    pub output: GraphvizNodeStyle,

    // Edges
    pub edge_all: GraphvizEdgeStyle,
    pub edge_complement: GraphvizEdgeStyle,
    pub edge_critical: GraphvizEdgeStyle,
    pub edge_output: GraphvizEdgeStyle,
}

impl Default for GraphvizStyle {
    fn default() -> Self {
        GraphvizStyle {
            rankdir: DEFAULT_RANKDIR.to_string(),

            cst_false: GraphvizNodeStyle(DEFAULT_FALSE_NODE_FORMAT.to_string()),
            input: GraphvizNodeStyle(DEFAULT_INPUT_NODE_FORMAT.to_string()),
            and: GraphvizNodeStyle(DEFAULT_AND_NODE_FORMAT.to_string()),
            critical: GraphvizNodeStyle(DEFAULT_CRITICAL_NODE_FORMAT.to_string()),
            output: GraphvizNodeStyle(DEFAULT_OUTPUT_NODE_FORMAT.to_string()),

            edge_all: GraphvizEdgeStyle(DEFAULT_EDGE_ALL_FORMAT.to_string()),
            edge_complement: GraphvizEdgeStyle(DEFAULT_EDGE_COMPLEMENT_FORMAT.to_string()),
            edge_critical: GraphvizEdgeStyle(DEFAULT_EDGE_CRITICAL_FORMAT.to_string()),
            edge_output: GraphvizEdgeStyle(DEFAULT_EDGE_OUTPUT_FORMAT.to_string()),
        }
    }
}

/// What a depth view adds on top of the structure.
trait Annotation {
    /// Label of an and gate.
    fn label(&self, id: NodeId) -> String;

    fn is_critical(&self, id: NodeId) -> bool;

    fn is_critical_edge(&self, from: NodeId, to: NodeId) -> bool;
}

/// Plain AIG: no label, nothing critical.
struct Plain;

impl Annotation for Plain {
    fn label(&self, _id: NodeId) -> String {
        "".to_string()
    }

    fn is_critical(&self, _id: NodeId) -> bool {
        false
    }

    fn is_critical_edge(&self, _from: NodeId, _to: NodeId) -> bool {
        false
    }
}

impl<N: Network> Annotation for DepthView<'_, N> {
    fn label(&self, id: NodeId) -> String {
        self.level(id).to_string()
    }

    fn is_critical(&self, id: NodeId) -> bool {
        self.is_on_critical_path(id)
    }

    fn is_critical_edge(&self, from: NodeId, to: NodeId) -> bool {
        self.is_on_critical_path(from)
            && self.is_on_critical_path(to)
            && self.level(from) + 1 == self.level(to)
    }
}

impl AigNode {
    fn graphviz_decl(&self, label: String) -> String {
        let graphviz_id = self.get_id();

        let label = match self {
            AigNode::False => return graphviz_id.to_string(), // early return, we don't '\n' because style is defined later
            AigNode::Input(id) => format!("i{}", id),
            AigNode::And { .. } => label,
        };
        format!("{} [label=\"{}\"]", graphviz_id, label)
    }
}

impl AigEdge {
    fn graphviz_decl(
        &self,
        to: String,
        to_output: bool,
        critical: bool,
        graphviz_style: &GraphvizStyle,
    ) -> String {
        let mut style = GraphvizEdgeStyle::default();
        if self.complement {
            style = style + graphviz_style.edge_complement.clone();
        }
        if critical {
            style = style + graphviz_style.edge_critical.clone();
        }
        if to_output {
            style = style + graphviz_style.edge_output.clone();
        }
        format!("{} -> {} {}\n", self.node, to, style)
    }
}

fn render(aig: &Aig, graphviz_style: &GraphvizStyle, annotation: &impl Annotation) -> String {
    let mut decl_edges = String::new();

    // Creating different subgraphs for node declarations
    let mut decl_false_node_optional = "".to_string();
    let mut decl_inputs = format!("subgraph inputs {{\n node {}\n", graphviz_style.input);
    let mut decl_outputs = format!("subgraph outputs {{\n node {}\n", graphviz_style.output);
    let mut decl_ands = format!("subgraph ands {{\n node {}\n", graphviz_style.and);

    // Adding artificial outputs to point to
    for (i, output) in aig.get_outputs().iter().enumerate() {
        let output_id = format!("o{}", i);
        let output_decl = format!("{} [label=\"o{}\"]\n", output_id, 1 + i);
        decl_outputs.push_str(&output_decl);
        decl_edges.push_str(&output.graphviz_decl(output_id, true, false, graphviz_style));
    }

    // DFS from outputs
    let mut dfs = Dfs::from_outputs(aig);
    while let Some(id) = dfs.next(aig) {
        let Some(node) = aig.get_node(id) else {
            continue;
        };
        let mut decl = node.graphviz_decl(annotation.label(id));
        if annotation.is_critical(id) && !node.is_false() {
            decl = format!("{} {}", decl, graphviz_style.critical);
        }
        match node {
            AigNode::False => decl_false_node_optional
                .push_str(&format!("{} {}\n", decl, graphviz_style.cst_false)),
            AigNode::Input(_) => decl_inputs.push_str(&(decl + "\n")),
            AigNode::And { .. } => decl_ands.push_str(&(decl + "\n")),
        }
        for fanin in node.get_fanins() {
            decl_edges.push_str(&fanin.graphviz_decl(
                id.to_string(),
                false,
                annotation.is_critical_edge(fanin.get_node_id(), id),
                graphviz_style,
            ));
        }
    }

    // Concatenating everything together
    format!(
        "
strict digraph {{
    rankdir=\"{}\"
    edge {}
    {}
    {}
    }}
    {}
    }}
    {}
    }}
    {}
}}",
        graphviz_style.rankdir,
        graphviz_style.edge_all,
        decl_false_node_optional,
        decl_inputs,
        decl_ands,
        decl_outputs,
        decl_edges
    )
}

impl Aig {
    /// Returns a DOT representation of the AIG.
    ///
    /// Only nodes reachable from the outputs are drawn.
    pub fn to_dot(&self, graphviz_style: GraphvizStyle) -> String {
        render(self, &graphviz_style, &Plain)
    }
}

impl DepthView<'_, Aig> {
    /// Returns a DOT representation of the AIG, gates labelled with their level
    /// and the critical path highlighted.
    pub fn to_dot(&self, graphviz_style: GraphvizStyle) -> String {
        render(self.network(), &graphviz_style, self)
    }
}
