//! MBT Core Types
//!
//! This crate provides the structural values shared by every stage of
//! test-code generation:
//! - Terms, tuples and predicates (patterns over a place or event)
//! - Substitutions produced by unification
//! - Markings (tuples held per place) and goal properties
//! - Transitions with their condition lists
//! - Common error types

mod error;
mod goal;
mod marking;
mod predicate;
mod substitution;
mod term;
mod transition;
mod tuple;

pub use error::*;
pub use goal::*;
pub use marking::*;
pub use predicate::*;
pub use substitution::*;
pub use term::*;
pub use transition::*;
pub use tuple::*;
