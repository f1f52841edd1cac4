//! Mapping definition types.

use mbt_core::{Predicate, Tuple};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Event name of the synthetic root transition unless a model overrides it.
pub const DEFAULT_CONSTRUCTOR_EVENT: &str = "new";

/// Goal name that is never tagged inside a test.
pub const DEFAULT_GOAL_TAG: &str = "default";

/// What a mapping's operator is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// Input action code for an event ("method").
    Action,
    /// Code reading or checking a place's tuple.
    Accessor,
    /// Code setting up an option place.
    Mutator,
}

impl MappingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MappingKind::Action => "action",
            MappingKind::Accessor => "accessor",
            MappingKind::Mutator => "mutator",
        }
    }

    /// Accessor and mutator values are rendered through the object table.
    pub fn uses_objects(&self) -> bool {
        !matches!(self, MappingKind::Action)
    }
}

impl fmt::Display for MappingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Binds a predicate pattern to a code template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapping {
    pub kind: MappingKind,
    pub pattern: Predicate,
    pub operator: String,
}

impl Mapping {
    pub fn new(kind: MappingKind, pattern: Predicate, operator: impl Into<String>) -> Self {
        Self {
            kind,
            pattern,
            operator: operator.into(),
        }
    }

    pub fn name(&self) -> &str {
        self.pattern.name()
    }

    pub fn operator(&self) -> &str {
        &self.operator
    }

    /// Returns true if the pattern contains variables.
    pub fn is_parametric(&self) -> bool {
        self.pattern.has_variables()
    }
}

/// Which lookup tier produced a piece of code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resolved {
    /// A ground mapping matched the tuple.
    Exact,
    /// A parametric mapping unified with the tuple.
    Parametric,
    /// No mapping applied; a default call was synthesized.
    Synthesized,
}

/// Code produced by a lookup, tagged with its tier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
    pub code: String,
    pub resolved: Resolved,
}

impl Resolution {
    pub fn new(code: impl Into<String>, resolved: Resolved) -> Self {
        Self {
            code: code.into(),
            resolved,
        }
    }

    pub fn is_synthesized(&self) -> bool {
        self.resolved == Resolved::Synthesized
    }

    pub fn into_code(self) -> String {
        self.code
    }
}

/// Render `name(a1, a2, ...)` with no trailing comma.
pub fn default_call<S: AsRef<str>>(name: &str, arguments: &[S]) -> String {
    let arguments: Vec<&str> = arguments.iter().map(AsRef::as_ref).collect();
    format!("{}({})", name, arguments.join(", "))
}

/// Render a default call for a tuple.
pub fn default_call_for(name: &str, tuple: &Tuple) -> String {
    default_call(name, tuple.arguments())
}
