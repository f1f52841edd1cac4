//! The execution tree arena.

use crate::{NodeId, NodeSpec, TreeError, TreeNode, TreeResult};
use mbt_core::{Marking, Transition};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Which search produced the tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TreeKind {
    /// An ordinary transition tree.
    #[default]
    Standard,
    /// A tree derived from a threat net; never uses object references.
    ThreatNet,
}

/// A rooted tree of execution steps. Leaves terminate test cases.
#[derive(Debug)]
pub struct ExecutionTree {
    nodes: Vec<TreeNode>,
    kind: TreeKind,
}

impl ExecutionTree {
    /// Create a tree whose synthetic root fires the constructor transition.
    pub fn new(constructor: Arc<Transition>, initial_marking: Marking) -> Self {
        Self::with_kind(TreeKind::Standard, constructor, initial_marking)
    }

    /// Create a tree of the given kind.
    pub fn with_kind(
        kind: TreeKind,
        constructor: Arc<Transition>,
        initial_marking: Marking,
    ) -> Self {
        let root = TreeNode::new(
            NodeId::new(0),
            None,
            String::new(),
            NodeSpec::new(constructor).with_marking(initial_marking),
        );
        Self {
            nodes: vec![root],
            kind,
        }
    }

    pub fn kind(&self) -> TreeKind {
        self.kind
    }

    pub fn root(&self) -> NodeId {
        NodeId::new(0)
    }

    /// Get a node by ID.
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.index())
    }

    /// Get a node by ID.
    ///
    /// # Panics
    ///
    /// Panics if the ID does not belong to this tree.
    pub fn node(&self, id: NodeId) -> &TreeNode {
        &self.nodes[id.index()]
    }

    /// Get the number of nodes, root included.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// A tree always has its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterate over all nodes in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Add a child node. Without an explicit test-case ID the child gets
    /// its parent's ID extended with its 1-based position, e.g. `1_2`.
    pub fn add_child(&mut self, parent: NodeId, spec: NodeSpec) -> TreeResult<NodeId> {
        let parent_node = self.get(parent).ok_or(TreeError::UnknownNode(parent))?;
        let position = parent_node.children.len() + 1;
        let test_case_id = match &spec.test_case_id {
            Some(id) => id.clone(),
            None if parent_node.is_root() => position.to_string(),
            None => format!("{}_{}", parent_node.test_case_id, position),
        };

        let id = NodeId::new(self.nodes.len());
        self.nodes.push(TreeNode::new(id, Some(parent), test_case_id, spec));
        self.nodes[parent.index()].children.push(id);
        Ok(id)
    }

    /// Leaves in depth-first pre-order, root excluded. Each one ends a test case.
    pub fn tests_for_code_generation(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack: Vec<NodeId> =
            self.node(self.root()).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev().copied());
            }
        }
        leaves
    }

    /// Nodes from the root's first child down to `leaf`, root excluded.
    pub fn path_to(&self, leaf: NodeId) -> TreeResult<Vec<NodeId>> {
        let mut current = self.get(leaf).ok_or(TreeError::UnknownNode(leaf))?;
        let mut path = Vec::new();
        while let Some(parent) = current.parent {
            path.push(current.id);
            current = self.node(parent);
        }
        path.reverse();
        Ok(path)
    }

    /// Every non-root node in breadth-first order.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len().saturating_sub(1));
        let mut queue: VecDeque<NodeId> = self.node(self.root()).children.iter().copied().collect();
        while let Some(id) = queue.pop_front() {
            order.push(id);
            queue.extend(self.node(id).children.iter().copied());
        }
        order
    }

    /// Reset every generated-code slot so the tree can be generated again.
    pub fn clear_generated_code(&mut self) {
        for node in &mut self.nodes {
            node.clear_generated_code();
        }
    }
}
