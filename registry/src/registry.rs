//! The ModelIndex - immutable mapping lookup.

use crate::{default_call_for, Mapping, MappingKind, Resolution, Resolved};
use mbt_core::{GoalProperty, Transition, Tuple};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, trace};

/// The ModelIndex provides lookup of mappings and model metadata.
/// It is immutable after construction and read-only during generation.
#[derive(Debug)]
pub struct ModelIndex {
    /// Name used for object references in generated calls.
    system_name: String,
    /// Event name of the synthetic root.
    constructor_event: String,

    /// Places in declaration order.
    places: Vec<String>,
    /// Places and events excluded from generated code.
    hidden: HashSet<String>,
    /// Places initialized through mutators before an input action.
    options: HashSet<String>,

    /// Goal properties in declaration order.
    goals: Vec<GoalProperty>,
    /// Object name per model value.
    objects: HashMap<String, String>,
    /// Specification-level parameters per event.
    parameters: HashMap<String, Vec<String>>,

    /// Mappings by kind and name, in registration order.
    mappings: HashMap<(MappingKind, String), Vec<Mapping>>,

    /// Model transitions by name.
    transitions: HashMap<String, Arc<Transition>>,
}

impl ModelIndex {
    /// Create a model index (use ModelIndexBuilder for construction).
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        system_name: String,
        constructor_event: String,
        places: Vec<String>,
        hidden: HashSet<String>,
        options: HashSet<String>,
        goals: Vec<GoalProperty>,
        objects: HashMap<String, String>,
        parameters: HashMap<String, Vec<String>>,
        mappings: HashMap<(MappingKind, String), Vec<Mapping>>,
        transitions: HashMap<String, Arc<Transition>>,
    ) -> Self {
        Self {
            system_name,
            constructor_event,
            places,
            hidden,
            options,
            goals,
            objects,
            parameters,
            mappings,
            transitions,
        }
    }

    // ==================== Model Metadata ====================

    /// Name of the system under test.
    pub fn system_name(&self) -> &str {
        &self.system_name
    }

    /// Event name of the synthetic root.
    pub fn constructor_event(&self) -> &str {
        &self.constructor_event
    }

    /// Returns true if `event` is the constructor sentinel (ASCII case-insensitive).
    pub fn is_constructor(&self, event: &str) -> bool {
        event.eq_ignore_ascii_case(&self.constructor_event)
    }

    /// Places in declaration order.
    pub fn places(&self) -> &[String] {
        &self.places
    }

    /// Returns true if the place or event is hidden.
    pub fn is_hidden(&self, name: &str) -> bool {
        self.hidden.contains(name)
    }

    /// Returns true if the place is an option place.
    pub fn is_option(&self, place: &str) -> bool {
        self.options.contains(place)
    }

    /// Goal properties in declaration order.
    pub fn goal_properties(&self) -> &[GoalProperty] {
        &self.goals
    }

    /// Object name bound to a model value, if any.
    pub fn object_for(&self, value: &str) -> Option<&str> {
        self.objects.get(value).map(String::as_str)
    }

    /// Specification-level parameters declared for an event.
    pub fn specification_parameters(&self, event: &str) -> Option<&[String]> {
        self.parameters
            .get(event)
            .filter(|params| !params.is_empty())
            .map(Vec::as_slice)
    }

    /// Returns true if the event declares specification-level parameters.
    pub fn has_parameters(&self, event: &str) -> bool {
        self.specification_parameters(event).is_some()
    }

    /// Get a transition by name.
    pub fn transition(&self, name: &str) -> Option<&Arc<Transition>> {
        self.transitions.get(name)
    }

    /// Get the number of transitions.
    pub fn transition_count(&self) -> usize {
        self.transitions.len()
    }

    // ==================== Mapping Lookups ====================

    /// All mappings of a kind registered under a name.
    pub fn mappings(&self, kind: MappingKind, name: &str) -> &[Mapping] {
        self.mappings
            .get(&(kind, name.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Get the ground mapping that names exactly this tuple.
    pub fn exact(&self, kind: MappingKind, name: &str, tuple: &Tuple) -> Option<&Mapping> {
        self.mappings(kind, name)
            .iter()
            .find(|m| !m.is_parametric() && m.pattern.matches_exactly(tuple))
    }

    /// Get the first parametric mapping registered under a name.
    pub fn parametric(&self, kind: MappingKind, name: &str) -> Option<&Mapping> {
        self.mappings(kind, name).iter().find(|m| m.is_parametric())
    }

    /// Resolve a name and concrete tuple to code.
    ///
    /// Tiers are tried strictly in order: a ground mapping equal to the
    /// tuple, then parametric mappings unified against the tuple, then a
    /// synthesized `name(args)` call. Never fails.
    pub fn resolve(&self, kind: MappingKind, name: &str, tuple: &Tuple) -> Resolution {
        if let Some(mapping) = self.exact(kind, name, tuple) {
            return Resolution::new(mapping.operator(), Resolved::Exact);
        }

        if tuple.arity() > 0 {
            if let Some(code) = self.unify_parametric(kind, name, tuple) {
                return Resolution::new(code, Resolved::Parametric);
            }
        }

        debug!(%kind, name, tuple = %tuple, "no mapping found, synthesizing default call");
        Resolution::new(default_call_for(name, tuple), Resolved::Synthesized)
    }

    fn unify_parametric(&self, kind: MappingKind, name: &str, tuple: &Tuple) -> Option<String> {
        self.mappings(kind, name)
            .iter()
            .filter(|m| m.is_parametric())
            .find_map(|mapping| match mapping.pattern.unify(tuple) {
                Ok(substitution) => {
                    let substitution = if kind.uses_objects() {
                        substitution.with_objects(|v| self.object_for(v).map(str::to_string))
                    } else {
                        substitution
                    };
                    Some(substitution.substitute_text(mapping.operator()))
                }
                Err(err) => {
                    trace!(pattern = %mapping.pattern, %err, "mapping does not unify");
                    None
                }
            })
    }
}
