use thiserror::Error;

use super::NodeId;

/// The result of an AIG operation.
pub type Result<T> = std::result::Result<T, AigError>;

/// Error returned when an AIG operation failed.
#[derive(Debug, Error)]
pub enum AigError {
    /// The node with given id does not exist (never allocated, or already reclaimed).
    #[error("node with id={0} does not exist")]
    NodeDoesNotExist(NodeId),

    /// Exhaustive simulation was requested on too many inputs.
    #[error("exhaustive simulation supports at most {max} inputs, got {0}", max = crate::sim::MAX_TRUTH_TABLE_INPUTS)]
    TooManyInputs(usize),

    /// The two AIGs being compared do not have the same number of inputs.
    #[error("AIGs have different numbers of inputs: {0} vs {1}")]
    InputsMismatch(usize, usize),

    /// The two AIGs being compared do not have the same number of outputs.
    #[error("AIGs have different numbers of outputs: {0} vs {1}")]
    OutputsMismatch(usize, usize),

    /// The AIG has reached an invalid state. This should never happen.
    /// For example, a gate listed as a fanout of a node while not using it as a fanin.
    #[error("the AIG has reached an invalid state - this should not happen - error: {0}")]
    InvalidState(String),

    /// Just forwarding a [`ParserError`].
    #[error("{0}")]
    ParserError(#[from] ParserError),
}

/// Error returned when parsing from file failed.
///
/// It is defined here because the `parser` module is private.
#[derive(Debug, Error)]
pub enum ParserError {
    /// All features are not supported (only combinational AIGs).
    #[error("unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Invalid token, something else was expected.
    #[error("invalid token: {0}")]
    InvalidToken(String),

    /// An IO error occured (file doesn't exist, or doesn't have the right extension, ...).
    #[error("io error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for ParserError {
    fn from(value: std::io::Error) -> Self {
        ParserError::IoError(value.to_string())
    }
}
