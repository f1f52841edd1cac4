//! MBT Registry
//!
//! The model index: an immutable registry of model-to-code mappings plus
//! the model metadata consulted during test-code generation.
//!
//! Responsibilities:
//! - Store action, accessor and mutator mappings keyed by name
//! - Resolve a name and concrete tuple to code through the exact,
//!   parametric and synthesized tiers
//! - Answer hidden/option place, constructor and object-name queries
//! - Hold goal properties and model transitions

mod builder;
mod document;
mod registry;
mod types;

pub use builder::{ModelIndexBuilder, RegistryError};
pub use document::{MappingEntry, ModelDocument};
pub use registry::ModelIndex;
pub use types::*;
