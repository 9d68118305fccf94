//! Error types for the AIngle graph engine.
//!
//! Graph transforms never fail: malformed references degrade gracefully. This
//! type only covers the fallible edges of the API, such as JSON input and
//! explicit validation.

use thiserror::Error;

/// A specialized `Result` type for graph engine operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Defines the errors that can occur within the `aingle_graph_engine` crate.
#[derive(Error, Debug)]
pub enum Error {
    /// An error that occurred during data serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Two nodes in the same graph share an id.
    #[error("Duplicate node id: {0}")]
    DuplicateNode(String),

    /// An edge references a node that is not part of the graph.
    #[error("Edge {edge} references missing node {node}")]
    DanglingEdge {
        /// The identity key of the offending edge.
        edge: String,
        /// The missing endpoint.
        node: String,
    },

    /// An error related to pipeline or option configuration.
    #[error("Configuration error: {0}")]
    Config(String),
}
