//! Test-Code Generation for MBT
//!
//! This crate turns an execution tree and a model index into executable
//! test code:
//! - Resolves each node's input action through a prioritized parameter pipeline
//! - Derives oracle code from postconditions, markings and effects
//! - Tags tests with the goal properties their paths reach
//! - Selects a generator variant per target language and renders suites
//! - Writes suites to disk, cooperatively cancellable

pub mod bundle;
pub mod cancel;
pub mod config;
pub mod context;
pub mod dialect;
pub mod error;
pub mod generator;
pub mod goals;
pub mod input;
pub mod oracle;
pub mod output;
pub mod step;
pub mod suite;

pub use bundle::{BundleError, ModelBundle};
pub use cancel::CancellationToken;
pub use config::{GenerationOptions, TagPlacement};
pub use context::RenderContext;
pub use dialect::{select_variant, DialectHooks, GeneratorVariant, TargetLanguage};
pub use error::{GenerationError, GenerationResult};
pub use generator::{CodeGenerator, RunState, DEFAULT_SUITE_NAME};
pub use goals::{goal_tags_at_start, goal_tags_code, goal_tags_inside};
pub use output::write_suite;
pub use step::StepRenderer;
pub use suite::{GeneratedFile, GeneratedSuite, SuiteInfo, SuiteLayout, GENERATED_HEADER};
