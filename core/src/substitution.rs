//! Variable bindings produced by unification.

use crate::{Predicate, Term, Tuple};
use regex_lite::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::OnceLock;

/// A set of variable-to-value bindings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Substitution {
    bindings: HashMap<String, String>,
}

impl Substitution {
    /// Create an empty substitution.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a substitution with a single binding.
    pub fn with(variable: impl Into<String>, value: impl Into<String>) -> Self {
        let mut substitution = Self::new();
        substitution.bind(variable, value);
        substitution
    }

    /// Bind a variable, replacing any previous value.
    pub fn bind(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.bindings.insert(variable.into(), value.into());
    }

    /// Get the value bound to a variable.
    pub fn binding(&self, variable: &str) -> Option<&str> {
        self.bindings.get(variable).map(String::as_str)
    }

    /// Check if a variable is bound.
    pub fn contains(&self, variable: &str) -> bool {
        self.bindings.contains_key(variable)
    }

    /// Returns true if at least one variable is bound.
    pub fn has_bindings(&self) -> bool {
        !self.bindings.is_empty()
    }

    /// Get the number of bindings.
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Iterate over bindings.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Merge with another set of bindings. Bindings in `other` win.
    pub fn merge(&mut self, other: &Substitution) {
        for (variable, value) in &other.bindings {
            self.bindings.insert(variable.clone(), value.clone());
        }
    }

    /// Map every bound value through `resolve`, keeping the value when it
    /// has no replacement. Used to turn model values into object names.
    pub fn with_objects<F>(&self, resolve: F) -> Substitution
    where
        F: Fn(&str) -> Option<String>,
    {
        let bindings = self
            .bindings
            .iter()
            .map(|(variable, value)| {
                let object = resolve(value).unwrap_or_else(|| value.clone());
                (variable.clone(), object)
            })
            .collect();
        Substitution { bindings }
    }

    /// Instantiate a predicate into a concrete tuple.
    ///
    /// Unbound variables are kept as their own name.
    pub fn substitute(&self, predicate: &Predicate) -> Tuple {
        Tuple::new(predicate.arguments().iter().map(|term| match term {
            Term::Variable(var) => self.binding(var).unwrap_or(var).to_string(),
            Term::Constant(value) => value.clone(),
        }))
    }

    /// Replace every bound variable token in a code template.
    ///
    /// Tokens are whole identifiers, replaced in a single pass; unbound
    /// tokens are left untouched so partial templates survive.
    pub fn substitute_text(&self, template: &str) -> String {
        if self.bindings.is_empty() {
            return template.to_string();
        }
        identifier_pattern()
            .replace_all(template, |caps: &Captures| {
                let token = &caps[0];
                match self.bindings.get(token) {
                    Some(value) => value.clone(),
                    None => token.to_string(),
                }
            })
            .into_owned()
    }
}

impl FromIterator<(String, String)> for Substitution {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            bindings: iter.into_iter().collect(),
        }
    }
}

fn identifier_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"[A-Za-z_][A-Za-z0-9_]*").expect("identifier pattern is a valid regex")
    })
}
