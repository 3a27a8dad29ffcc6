use thiserror::Error;

use crate::color::VertexId;

/// errors reported by the graph model, the instance readers and the solver
#[derive(Debug, Error)]
pub enum ColoringError {
    /// a vertex index is not in [0, nb_vertices)
    #[error("vertex {index} out of range (graph has {nb_vertices} vertices)")]
    IndexOutOfRange {
        /// offending index
        index: VertexId,
        /// number of vertices of the graph
        nb_vertices: usize,
    },

    /// a bound function produced optimistic > pessimistic for some node
    #[error("bound contract violated on node {sequence_id}: optimistic {optimistic} > pessimistic {pessimistic}")]
    BoundContractViolation {
        /// creation index of the node
        sequence_id: u64,
        /// optimistic bound computed for the node
        optimistic: f64,
        /// pessimistic bound computed for the node
        pessimistic: f64,
    },

    /// the solver only colors undirected graphs
    #[error("cannot color a directed graph")]
    DirectedGraph,

    /// a vertex adjacent to itself can not be properly colored
    #[error("vertex {0} has a self-loop")]
    SelfLoop(VertexId),

    /// invalid solver option
    #[error("invalid option: {0}")]
    InvalidOption(String),

    /// malformed instance file
    #[error("parse error: {0}")]
    Parse(String),

    /// malformed JSON (options file) or serialization failure
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// I/O failure while reading an instance or writing results
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
