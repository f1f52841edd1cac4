//! Execution tree nodes.

use crate::{TreeError, TreeResult};
use mbt_core::{Marking, Substitution, Transition};
use std::fmt;
use std::sync::{Arc, OnceLock};

/// Identifier of a node within one execution tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create a new NodeId from a raw index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index.
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Values entered for a node at authoring time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParameterTable {
    /// Implementation-level parameters for the node's input action.
    pub parameters: Vec<String>,
    /// Extra statements emitted before the input action.
    pub statements: Vec<String>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn has_parameters(&self) -> bool {
        !self.parameters.is_empty()
    }
}

/// One step of a generated test path.
#[derive(Debug)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) event: String,
    pub(crate) transition: Arc<Transition>,
    pub(crate) substitution: Option<Substitution>,
    pub(crate) marking: Marking,
    pub(crate) negative: bool,
    pub(crate) test_case_id: String,
    pub(crate) parameter_table: ParameterTable,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,
    input_code: OnceLock<String>,
    oracle_code: OnceLock<String>,
}

impl TreeNode {
    pub(crate) fn new(
        id: NodeId,
        parent: Option<NodeId>,
        test_case_id: String,
        spec: NodeSpec,
    ) -> Self {
        Self {
            id,
            event: spec.event,
            transition: spec.transition,
            substitution: spec.substitution,
            marking: spec.marking,
            negative: spec.negative,
            test_case_id,
            parameter_table: spec.parameter_table,
            parent,
            children: Vec::new(),
            input_code: OnceLock::new(),
            oracle_code: OnceLock::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Name of the fired event.
    pub fn event(&self) -> &str {
        &self.event
    }

    /// The fired transition.
    pub fn transition(&self) -> &Transition {
        &self.transition
    }

    /// Bindings used to fire the transition.
    pub fn substitution(&self) -> Option<&Substitution> {
        self.substitution.as_ref()
    }

    /// Marking reached after firing.
    pub fn marking(&self) -> &Marking {
        &self.marking
    }

    /// Returns true for a negative ("dirty") test step.
    pub fn is_negative(&self) -> bool {
        self.negative
    }

    pub fn test_case_id(&self) -> &str {
        &self.test_case_id
    }

    pub fn parameter_table(&self) -> &ParameterTable {
        &self.parameter_table
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    // ==================== Generated Code Slots ====================

    /// Generated input code, if computed.
    pub fn input_code(&self) -> Option<&str> {
        self.input_code.get().map(String::as_str)
    }

    /// Generated oracle code, if computed.
    pub fn oracle_code(&self) -> Option<&str> {
        self.oracle_code.get().map(String::as_str)
    }

    /// Store input code. Each slot is written at most once.
    pub fn set_input_code(&self, code: String) -> TreeResult<()> {
        self.input_code.set(code).map_err(|_| TreeError::CodeAlreadySet {
            node: self.id,
            slot: "input",
        })
    }

    /// Store oracle code. Each slot is written at most once.
    pub fn set_oracle_code(&self, code: String) -> TreeResult<()> {
        self.oracle_code.set(code).map_err(|_| TreeError::CodeAlreadySet {
            node: self.id,
            slot: "oracle",
        })
    }

    /// Return the cached input code, computing it on first use.
    pub fn input_code_or_init(&self, init: impl FnOnce() -> String) -> &str {
        self.input_code.get_or_init(init)
    }

    /// Return the cached oracle code, computing it on first use.
    pub fn oracle_code_or_init(&self, init: impl FnOnce() -> String) -> &str {
        self.oracle_code.get_or_init(init)
    }

    pub(crate) fn clear_generated_code(&mut self) {
        self.input_code.take();
        self.oracle_code.take();
    }
}

/// Description of a node to add to a tree.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub(crate) event: String,
    pub(crate) transition: Arc<Transition>,
    pub(crate) substitution: Option<Substitution>,
    pub(crate) marking: Marking,
    pub(crate) negative: bool,
    pub(crate) test_case_id: Option<String>,
    pub(crate) parameter_table: ParameterTable,
}

impl NodeSpec {
    /// A node firing `transition`; the event name is the transition name.
    pub fn new(transition: Arc<Transition>) -> Self {
        Self {
            event: transition.name.clone(),
            transition,
            substitution: None,
            marking: Marking::new(),
            negative: false,
            test_case_id: None,
            parameter_table: ParameterTable::new(),
        }
    }

    pub fn with_event(mut self, event: impl Into<String>) -> Self {
        self.event = event.into();
        self
    }

    pub fn with_substitution(mut self, substitution: Substitution) -> Self {
        self.substitution = Some(substitution);
        self
    }

    pub fn with_marking(mut self, marking: Marking) -> Self {
        self.marking = marking;
        self
    }

    pub fn negative(mut self) -> Self {
        self.negative = true;
        self
    }

    pub fn with_negative(mut self, negative: bool) -> Self {
        self.negative = negative;
        self
    }

    pub fn with_test_case_id(mut self, id: impl Into<String>) -> Self {
        self.test_case_id = Some(id.into());
        self
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_table.parameters = parameters.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_statements<I, S>(mut self, statements: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameter_table.statements = statements.into_iter().map(Into::into).collect();
        self
    }
}
