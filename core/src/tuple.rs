//! Ordered argument lists.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An immutable, ordered list of concrete argument values.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Tuple {
    arguments: Vec<String>,
}

impl Tuple {
    /// Create a tuple from its arguments.
    pub fn new<I, S>(arguments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            arguments: arguments.into_iter().map(Into::into).collect(),
        }
    }

    /// The zero-arity tuple.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Number of arguments.
    pub fn arity(&self) -> usize {
        self.arguments.len()
    }

    /// Returns true if the tuple has no arguments.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty()
    }

    /// Get the argument at a position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.arguments.get(index).map(String::as_str)
    }

    /// All arguments in order.
    pub fn arguments(&self) -> &[String] {
        &self.arguments
    }

    /// Iterate over the arguments.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.arguments.iter().map(String::as_str)
    }
}

impl From<Vec<String>> for Tuple {
    fn from(arguments: Vec<String>) -> Self {
        Self { arguments }
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({})", self.arguments.join(", "))
    }
}
