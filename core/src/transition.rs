//! Model events with their condition lists.

use crate::Predicate;
use serde::{Deserialize, Serialize};

/// A model-level event.
///
/// `parameters` distinguishes "not declared" (`None`: every free variable is
/// a parameter) from "declared empty" (`Some(vec![])`: no parameters).
/// The constructor transition has no precondition at all.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Transition {
    pub name: String,
    pub parameters: Option<Vec<String>>,
    pub precondition: Option<Vec<Predicate>>,
    pub delete_precondition: Vec<Predicate>,
    pub postcondition: Vec<Predicate>,
    pub effect: Vec<Predicate>,
}

impl Transition {
    /// Create a transition with an empty precondition.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            precondition: Some(Vec::new()),
            ..Self::default()
        }
    }

    /// The synthetic constructor transition (no precondition).
    pub fn constructor(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_parameters<I, S>(mut self, parameters: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters = Some(parameters.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_precondition(mut self, precondition: Vec<Predicate>) -> Self {
        self.precondition = Some(precondition);
        self
    }

    pub fn with_delete_precondition(mut self, predicates: Vec<Predicate>) -> Self {
        self.delete_precondition = predicates;
        self
    }

    pub fn with_postcondition(mut self, postcondition: Vec<Predicate>) -> Self {
        self.postcondition = postcondition;
        self
    }

    pub fn with_effect(mut self, effect: Vec<Predicate>) -> Self {
        self.effect = effect;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Distinct variables across precondition, postcondition and effect,
    /// in first-occurrence order.
    pub fn all_variables(&self) -> Vec<String> {
        let predicates = self
            .precondition
            .iter()
            .flatten()
            .chain(&self.postcondition)
            .chain(&self.effect);

        let mut variables: Vec<String> = Vec::new();
        for predicate in predicates {
            for var in predicate.variables() {
                if !variables.iter().any(|v| v == var) {
                    variables.push(var.to_string());
                }
            }
        }
        variables
    }

    /// Formal parameters, falling back to every free variable when none are declared.
    pub fn formal_parameters(&self) -> Vec<String> {
        match &self.parameters {
            Some(parameters) => parameters.clone(),
            None => self.all_variables(),
        }
    }
}
