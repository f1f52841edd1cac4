//! Serialized form of an execution tree.

use crate::{ExecutionTree, NodeId, NodeSpec, TreeError, TreeKind, TreeResult};
use mbt_core::{Marking, Substitution, Transition};
use mbt_registry::ModelIndex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A tree as loaded from JSON. Nodes reference model transitions by name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeDocument {
    pub kind: TreeKind,
    pub initial_marking: Marking,
    pub children: Vec<NodeDocument>,
}

/// One node of a serialized tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NodeDocument {
    pub event: String,
    /// Transition name; defaults to the event name.
    pub transition: Option<String>,
    pub substitution: Option<Substitution>,
    pub marking: Marking,
    pub negative: bool,
    pub test_case_id: Option<String>,
    pub parameters: Vec<String>,
    pub statements: Vec<String>,
    pub children: Vec<NodeDocument>,
}

impl TreeDocument {
    /// Build an execution tree, resolving transitions through the model index.
    ///
    /// The root fires the model's constructor transition, or a bare
    /// constructor if the model does not define one.
    pub fn build(&self, index: &ModelIndex) -> TreeResult<ExecutionTree> {
        let constructor = index
            .transition(index.constructor_event())
            .cloned()
            .unwrap_or_else(|| Arc::new(Transition::constructor(index.constructor_event())));
        let mut tree =
            ExecutionTree::with_kind(self.kind, constructor, self.initial_marking.clone());
        let root = tree.root();
        for child in &self.children {
            add_node(&mut tree, root, child, index)?;
        }
        Ok(tree)
    }
}

fn add_node(
    tree: &mut ExecutionTree,
    parent: NodeId,
    doc: &NodeDocument,
    index: &ModelIndex,
) -> TreeResult<()> {
    let name = doc.transition.as_deref().unwrap_or(&doc.event);
    let transition = index
        .transition(name)
        .cloned()
        .ok_or_else(|| TreeError::unknown_transition(&doc.event, name))?;

    let mut spec = NodeSpec::new(transition)
        .with_event(doc.event.clone())
        .with_marking(doc.marking.clone())
        .with_negative(doc.negative)
        .with_parameters(doc.parameters.iter().cloned())
        .with_statements(doc.statements.iter().cloned());
    if let Some(substitution) = &doc.substitution {
        spec = spec.with_substitution(substitution.clone());
    }
    if let Some(id) = &doc.test_case_id {
        spec = spec.with_test_case_id(id.clone());
    }

    let id = tree.add_child(parent, spec)?;
    for child in &doc.children {
        add_node(tree, id, child, index)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_core::Tuple;
    use mbt_registry::ModelIndexBuilder;

    fn bank() -> ModelIndex {
        let mut builder = ModelIndexBuilder::new("Bank");
        builder
            .transition(Transition::new("login"))
            .transition(Transition::new("withdraw").with_parameters(["A"]));
        builder.build().unwrap()
    }

    #[test]
    fn test_build_from_json() {
        let json = r#"{
            "children": [{
                "event": "login",
                "children": [{
                    "event": "withdraw",
                    "substitution": {"A": "acc1"},
                    "marking": {"balance": [["acc1", "90"]]},
                    "negative": true,
                    "parameters": ["acc1", "10"]
                }]
            }]
        }"#;
        let doc: TreeDocument = serde_json::from_str(json).unwrap();
        let tree = doc.build(&bank()).unwrap();

        let leaves = tree.tests_for_code_generation();
        assert_eq!(leaves.len(), 1);
        let leaf = tree.node(leaves[0]);
        assert_eq!(leaf.event(), "withdraw");
        assert!(leaf.is_negative());
        assert_eq!(leaf.test_case_id(), "1_1");
        assert_eq!(leaf.substitution().unwrap().binding("A"), Some("acc1"));
        assert!(leaf.marking().contains("balance", &Tuple::new(["acc1", "90"])));
        assert_eq!(leaf.parameter_table().parameters, vec!["acc1", "10"]);
        assert_eq!(tree.node(tree.root()).event(), "new");
    }

    #[test]
    fn test_unknown_transition_is_rejected() {
        let doc = TreeDocument {
            children: vec![NodeDocument {
                event: "deposit".to_string(),
                ..NodeDocument::default()
            }],
            ..TreeDocument::default()
        };
        let err = doc.build(&bank()).unwrap_err();
        assert!(matches!(err, TreeError::UnknownTransition { ref name, .. } if name == "deposit"));
    }
}
