//! Serialized form of a model index.

use crate::{MappingKind, ModelIndex, ModelIndexBuilder, RegistryError};
use mbt_core::{GoalProperty, Transition};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A mapping as written in a model file: pattern text and operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    pub pattern: String,
    pub operator: String,
}

/// A model index as loaded from JSON.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelDocument {
    pub system_name: String,
    pub constructor_event: Option<String>,
    pub places: Vec<String>,
    pub hidden: Vec<String>,
    pub options: Vec<String>,
    pub goals: Vec<GoalProperty>,
    pub objects: HashMap<String, String>,
    pub parameters: HashMap<String, Vec<String>>,
    pub actions: Vec<MappingEntry>,
    pub accessors: Vec<MappingEntry>,
    pub mutators: Vec<MappingEntry>,
    pub transitions: Vec<Transition>,
}

impl ModelDocument {
    /// Build the immutable index described by this document.
    pub fn build(self) -> Result<ModelIndex, RegistryError> {
        let mut builder = ModelIndexBuilder::new(self.system_name);
        if let Some(event) = self.constructor_event {
            builder.constructor_event(event);
        }
        for place in self.places {
            builder.place(place);
        }
        for name in self.hidden {
            builder.hidden(name);
        }
        for place in self.options {
            builder.option(place);
        }
        for goal in self.goals {
            builder.goal(goal);
        }
        for (value, object) in self.objects {
            builder.object(value, object);
        }
        for (event, parameters) in self.parameters {
            builder.parameters(event, parameters);
        }
        let kinds = [
            (MappingKind::Action, self.actions),
            (MappingKind::Accessor, self.accessors),
            (MappingKind::Mutator, self.mutators),
        ];
        for (kind, entries) in kinds {
            for entry in entries {
                builder.mapping(kind, &entry.pattern, entry.operator);
            }
        }
        for transition in self.transitions {
            builder.transition(transition);
        }
        builder.build()
    }
}
