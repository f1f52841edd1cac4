//! Goal properties used for coverage tagging.

use crate::Predicate;
use serde::{Deserialize, Serialize};

/// A named marking condition. Test cases reaching a marking that satisfies
/// the condition are tagged with the goal's name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GoalProperty {
    /// Tag name emitted for the goal.
    pub name: String,
    /// Predicates that must all hold under one substitution.
    pub condition: Vec<Predicate>,
    /// Predicates that must not hold under that substitution.
    #[serde(default)]
    pub negated: Vec<Predicate>,
}

impl GoalProperty {
    pub fn new(name: impl Into<String>, condition: Vec<Predicate>) -> Self {
        Self {
            name: name.into(),
            condition,
            negated: Vec::new(),
        }
    }

    pub fn with_negated(mut self, negated: Vec<Predicate>) -> Self {
        self.negated = negated;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}
