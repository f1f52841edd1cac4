//! Predicate arguments: variables and constants.

use std::fmt;

/// A single argument of a predicate pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// A free variable, bound by unification.
    Variable(String),
    /// A concrete value that must match exactly.
    Constant(String),
}

impl Term {
    /// Classify argument text. Identifiers starting with an uppercase ASCII
    /// letter or `_` are variables; everything else is a constant.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        if is_variable_name(text) {
            Term::Variable(text.to_string())
        } else {
            Term::Constant(text.to_string())
        }
    }

    /// Create a variable term.
    pub fn var(name: impl Into<String>) -> Self {
        Term::Variable(name.into())
    }

    /// Create a constant term.
    pub fn constant(value: impl Into<String>) -> Self {
        Term::Constant(value.into())
    }

    /// Returns true if this is a variable.
    pub fn is_variable(&self) -> bool {
        matches!(self, Term::Variable(_))
    }

    /// Returns true if this is a constant.
    pub fn is_constant(&self) -> bool {
        matches!(self, Term::Constant(_))
    }

    /// Get the variable name if this is a variable.
    pub fn as_variable(&self) -> Option<&str> {
        match self {
            Term::Variable(name) => Some(name),
            Term::Constant(_) => None,
        }
    }

    /// The raw text of the term.
    pub fn as_str(&self) -> &str {
        match self {
            Term::Variable(s) | Term::Constant(s) => s,
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `text` is a variable identifier.
pub fn is_variable_name(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_ascii_uppercase() || c == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
