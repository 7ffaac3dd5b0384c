pub mod aig;
pub mod depth;
pub mod network;
pub mod rewrite;
pub mod sim;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::dot;
pub use aig::{Aig, AigEdge, AigError, AigNode, NodeId, ParserError, Result};
pub use depth::{DepthNetwork, DepthView};
pub use network::Network;
pub use rewrite::{AlgebraicRewritingParams, AlgebraicRewritingStats, aig_algebraic_rewriting};
pub use sim::TruthTable;
