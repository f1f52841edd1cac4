//! Snapshots of the tuples held by each place.

use crate::{GoalProperty, Predicate, Substitution, Tuple};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tuples currently present per place.
///
/// Tuples keep insertion order and duplicates are allowed, since the same
/// tuple may legitimately recur in a place.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Marking {
    places: HashMap<String, Vec<Tuple>>,
}

impl Marking {
    /// Create an empty marking.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion.
    pub fn with(mut self, place: impl Into<String>, tuple: Tuple) -> Self {
        self.add(place, tuple);
        self
    }

    /// Add a tuple to a place.
    pub fn add(&mut self, place: impl Into<String>, tuple: Tuple) {
        self.places.entry(place.into()).or_default().push(tuple);
    }

    /// Tuples held by a place, in insertion order.
    pub fn tuples(&self, place: &str) -> &[Tuple] {
        self.places.get(place).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns true if the place holds at least one tuple.
    pub fn has_tuples(&self, place: &str) -> bool {
        !self.tuples(place).is_empty()
    }

    /// Returns true if the place holds the tuple.
    pub fn contains(&self, place: &str, tuple: &Tuple) -> bool {
        self.tuples(place).contains(tuple)
    }

    /// Names of places with at least one tuple (unordered).
    pub fn places(&self) -> impl Iterator<Item = &str> {
        self.places
            .iter()
            .filter(|(_, tuples)| !tuples.is_empty())
            .map(|(place, _)| place.as_str())
    }

    /// Total number of tuples across places.
    pub fn len(&self) -> usize {
        self.places.values().map(Vec::len).sum()
    }

    /// Check if empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the goal's condition is satisfied by this marking.
    pub fn is_firable(&self, goal: &GoalProperty) -> bool {
        self.find_binding(&goal.condition, &goal.negated).is_some()
    }

    /// Search for a substitution that instantiates every predicate in
    /// `condition` to a present tuple while no predicate in `negated` is
    /// present under the same substitution.
    pub fn find_binding(
        &self,
        condition: &[Predicate],
        negated: &[Predicate],
    ) -> Option<Substitution> {
        self.search(condition, negated, Substitution::new())
    }

    fn search(
        &self,
        condition: &[Predicate],
        negated: &[Predicate],
        bindings: Substitution,
    ) -> Option<Substitution> {
        let Some((first, rest)) = condition.split_first() else {
            let blocked = negated.iter().any(|p| {
                let tuple = bindings.substitute(p);
                self.contains(p.name(), &tuple)
            });
            return (!blocked).then_some(bindings);
        };

        self.tuples(first.name())
            .iter()
            .filter_map(|tuple| first.unify_with(tuple, &bindings).ok())
            .find_map(|extended| self.search(rest, negated, extended))
    }
}
