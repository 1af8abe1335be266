//! Error types for ndgraph.

use thiserror::Error;

/// Errors that can occur while building the computation graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GraphError {
    /// A required argument was missing or malformed.
    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    /// The requested operation cannot be performed on this function.
    #[error("unsupported operation: {operation} on {function}")]
    UnsupportedOperation {
        operation: &'static str,
        function: String,
    },

    /// Axis index is not valid for the operand rank.
    #[error("axis {axis} is out of bounds for tensor of rank {rank}")]
    AxisOutOfBounds { axis: usize, rank: usize },

    /// Axis listed more than once.
    #[error("axis {axis} appears more than once")]
    DuplicateAxis { axis: usize },

    /// Operand shapes of an elementwise operation differ.
    #[error("shape mismatch: {lhs:?} vs {rhs:?}")]
    ShapeMismatch { lhs: Vec<usize>, rhs: Vec<usize> },

    /// Operand has no concrete value and deferral is disabled.
    #[error("operand {id} is not materialized")]
    OperandNotMaterialized { id: String },

    /// Variable was already bound to a graph vertex.
    #[error("variable {name} is already materialized")]
    AlreadyMaterialized { name: String },

    /// Vertex id does not exist in the graph.
    #[error("vertex {id} not found in graph")]
    VertexNotFound { id: usize },

    /// Edge id does not exist in the graph.
    #[error("edge {id} not found in graph")]
    EdgeNotFound { id: usize },

    /// The graph contains a cycle through the given vertex.
    #[error("graph contains a cycle through vertex {vertex}")]
    Cycle { vertex: usize },
}

/// Result type for graph construction.
pub type Result<T> = std::result::Result<T, GraphError>;

impl GraphError {
    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    pub(crate) fn unsupported(operation: &'static str, function: impl Into<String>) -> Self {
        Self::UnsupportedOperation {
            operation,
            function: function.into(),
        }
    }
}
