//! Execution tree error types.

use crate::NodeId;
use thiserror::Error;

/// Errors raised while building or annotating an execution tree.
#[derive(Debug, Error)]
pub enum TreeError {
    /// A node ID that does not belong to this tree.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// A node document names a transition the model does not define.
    #[error("unknown transition '{name}' for event '{event}'")]
    UnknownTransition { event: String, name: String },

    /// A generated-code slot was written twice.
    #[error("{slot} code already set for node {node}")]
    CodeAlreadySet { node: NodeId, slot: &'static str },
}

impl TreeError {
    pub fn unknown_transition(event: impl Into<String>, name: impl Into<String>) -> Self {
        Self::UnknownTransition {
            event: event.into(),
            name: name.into(),
        }
    }
}

/// Result type for tree operations.
pub type TreeResult<T> = Result<T, TreeError>;
