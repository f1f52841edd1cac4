//! ModelIndexBuilder for constructing an immutable ModelIndex.

use crate::{Mapping, MappingKind, ModelIndex, DEFAULT_CONSTRUCTOR_EVENT};
use mbt_core::{GoalProperty, ParseError, Predicate, Transition};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use thiserror::Error;

/// Errors that can occur during model index construction.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Invalid {kind} pattern '{pattern}': {source}")]
    InvalidPattern {
        kind: MappingKind,
        pattern: String,
        #[source]
        source: ParseError,
    },

    #[error("Blank operator for {kind} mapping '{pattern}'")]
    BlankOperator { kind: MappingKind, pattern: String },

    #[error("Duplicate goal property: {0}")]
    DuplicateGoal(String),

    #[error("Duplicate transition: {0}")]
    DuplicateTransition(String),

    #[error("Place '{0}' is both hidden and an option")]
    HiddenOption(String),
}

/// Builder for constructing an immutable ModelIndex.
#[derive(Debug)]
pub struct ModelIndexBuilder {
    system_name: String,
    constructor_event: String,
    places: Vec<String>,
    hidden: HashSet<String>,
    options: HashSet<String>,
    goals: Vec<GoalProperty>,
    objects: HashMap<String, String>,
    parameters: HashMap<String, Vec<String>>,
    mappings: Vec<Mapping>,
    transitions: Vec<Transition>,
    /// First error seen while adding mappings; reported by `build`.
    pending_error: Option<RegistryError>,
}

impl ModelIndexBuilder {
    /// Create a new builder for the named system.
    pub fn new(system_name: impl Into<String>) -> Self {
        Self {
            system_name: system_name.into(),
            constructor_event: DEFAULT_CONSTRUCTOR_EVENT.to_string(),
            places: Vec::new(),
            hidden: HashSet::new(),
            options: HashSet::new(),
            goals: Vec::new(),
            objects: HashMap::new(),
            parameters: HashMap::new(),
            mappings: Vec::new(),
            transitions: Vec::new(),
            pending_error: None,
        }
    }

    /// Override the constructor event sentinel.
    pub fn constructor_event(&mut self, event: impl Into<String>) -> &mut Self {
        self.constructor_event = event.into();
        self
    }

    /// Declare a place. Declared places come first in the place order.
    pub fn place(&mut self, place: impl Into<String>) -> &mut Self {
        let place = place.into();
        if !self.places.contains(&place) {
            self.places.push(place);
        }
        self
    }

    /// Mark a place or event as hidden.
    pub fn hidden(&mut self, name: impl Into<String>) -> &mut Self {
        self.hidden.insert(name.into());
        self
    }

    /// Mark a place as an option place.
    pub fn option(&mut self, place: impl Into<String>) -> &mut Self {
        let place = place.into();
        self.place(place.clone());
        self.options.insert(place);
        self
    }

    /// Add a goal property.
    pub fn goal(&mut self, goal: GoalProperty) -> &mut Self {
        self.goals.push(goal);
        self
    }

    /// Bind a model value to an object name.
    pub fn object(&mut self, value: impl Into<String>, object: impl Into<String>) -> &mut Self {
        self.objects.insert(value.into(), object.into());
        self
    }

    /// Declare specification-level parameters for an event.
    pub fn parameters<I, S>(&mut self, event: impl Into<String>, parameters: I) -> &mut Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parameters.insert(
            event.into(),
            parameters.into_iter().map(Into::into).collect(),
        );
        self
    }

    /// Add an input action mapping for an event.
    pub fn action(&mut self, pattern: &str, operator: impl Into<String>) -> &mut Self {
        self.mapping(MappingKind::Action, pattern, operator)
    }

    /// Add an accessor mapping for a place.
    pub fn accessor(&mut self, pattern: &str, operator: impl Into<String>) -> &mut Self {
        self.mapping(MappingKind::Accessor, pattern, operator)
    }

    /// Add a mutator mapping for an option place.
    pub fn mutator(&mut self, pattern: &str, operator: impl Into<String>) -> &mut Self {
        self.mapping(MappingKind::Mutator, pattern, operator)
    }

    /// Add a mapping of any kind from pattern text.
    pub fn mapping(
        &mut self,
        kind: MappingKind,
        pattern: &str,
        operator: impl Into<String>,
    ) -> &mut Self {
        let operator = operator.into();
        match Predicate::parse(pattern) {
            Ok(predicate) if operator.trim().is_empty() => self.fail(RegistryError::BlankOperator {
                kind,
                pattern: predicate.to_string(),
            }),
            Ok(predicate) => {
                if kind != MappingKind::Action {
                    self.place(predicate.name().to_string());
                }
                self.mappings.push(Mapping::new(kind, predicate, operator));
            }
            Err(source) => self.fail(RegistryError::InvalidPattern {
                kind,
                pattern: pattern.to_string(),
                source,
            }),
        }
        self
    }

    /// Add a model transition.
    pub fn transition(&mut self, transition: Transition) -> &mut Self {
        self.transitions.push(transition);
        self
    }

    fn fail(&mut self, error: RegistryError) {
        if self.pending_error.is_none() {
            self.pending_error = Some(error);
        }
    }

    /// Build the immutable ModelIndex.
    pub fn build(mut self) -> Result<ModelIndex, RegistryError> {
        if let Some(error) = self.pending_error.take() {
            return Err(error);
        }

        if let Some(place) = self.options.iter().find(|p| self.hidden.contains(*p)) {
            return Err(RegistryError::HiddenOption(place.clone()));
        }

        let mut goal_names = HashSet::new();
        for goal in &self.goals {
            if !goal_names.insert(goal.name.as_str()) {
                return Err(RegistryError::DuplicateGoal(goal.name.clone()));
            }
        }

        // Places referenced only by transitions follow the declared ones.
        let mut places = self.places;
        for transition in &self.transitions {
            let predicates = transition
                .precondition
                .iter()
                .flatten()
                .chain(&transition.delete_precondition)
                .chain(&transition.postcondition)
                .chain(&transition.effect);
            for predicate in predicates {
                if !places.iter().any(|p| p == predicate.name()) {
                    places.push(predicate.name().to_string());
                }
            }
        }

        let mut transitions = HashMap::new();
        for transition in self.transitions {
            let name = transition.name.clone();
            if transitions.insert(name.clone(), Arc::new(transition)).is_some() {
                return Err(RegistryError::DuplicateTransition(name));
            }
        }

        let mut mappings: HashMap<(MappingKind, String), Vec<Mapping>> = HashMap::new();
        for mapping in self.mappings {
            mappings
                .entry((mapping.kind, mapping.name().to_string()))
                .or_default()
                .push(mapping);
        }

        Ok(ModelIndex::new(
            self.system_name,
            self.constructor_event,
            places,
            self.hidden,
            self.options,
            self.goals,
            self.objects,
            self.parameters,
            mappings,
            transitions,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mbt_core::Predicate;

    #[test]
    fn test_invalid_pattern_is_reported_at_build() {
        let mut builder = ModelIndexBuilder::new("Sys");
        builder.action("withdraw(A", "w(A)").action("login", "login()");
        let err = builder.build().unwrap_err();
        assert!(matches!(err, RegistryError::InvalidPattern { kind: MappingKind::Action, .. }));
    }

    #[test]
    fn test_blank_operator_rejected() {
        let mut builder = ModelIndexBuilder::new("Sys");
        builder.accessor("balance(X)", "   ");
        assert!(matches!(builder.build(), Err(RegistryError::BlankOperator { .. })));
    }

    #[test]
    fn test_duplicate_goal_rejected() {
        let mut builder = ModelIndexBuilder::new("Sys");
        builder
            .goal(GoalProperty::new("g", vec![]))
            .goal(GoalProperty::new("g", vec![]));
        assert!(matches!(builder.build(), Err(RegistryError::DuplicateGoal(name)) if name == "g"));
    }

    #[test]
    fn test_hidden_option_rejected() {
        let mut builder = ModelIndexBuilder::new("Sys");
        builder.option("currency").hidden("currency");
        assert!(matches!(builder.build(), Err(RegistryError::HiddenOption(_))));
    }

    #[test]
    fn test_place_order_declared_then_discovered() {
        let mut builder = ModelIndexBuilder::new("Sys");
        builder
            .place("balance")
            .accessor("limit(A)", "hasLimit(A)")
            .transition(
                Transition::new("withdraw")
                    .with_precondition(vec![Predicate::parse("session(U)").unwrap()])
                    .with_postcondition(vec![Predicate::parse("balance(A, B)").unwrap()]),
            );
        let index = builder.build().unwrap();
        assert_eq!(index.places(), &["balance", "limit", "session"]);
        assert!(index.transition("withdraw").is_some());
    }
}
