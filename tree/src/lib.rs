//! MBT Execution Tree
//!
//! The execution tree consumed by test-code generation. Tree construction
//! (reachability search over the model) happens elsewhere; this crate
//! holds the resulting node graph, its test-case leaves, and the
//! write-once code slots filled during generation.

mod document;
mod error;
mod node;
mod tree;

pub use document::{NodeDocument, TreeDocument};
pub use error::{TreeError, TreeResult};
pub use node::{NodeId, NodeSpec, ParameterTable, TreeNode};
pub use tree::{ExecutionTree, TreeKind};
