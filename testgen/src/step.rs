//! Per-node code rendering shared by every dialect.

use crate::{DialectHooks, GenerationOptions, GeneratorVariant, RenderContext, TargetLanguage};
use mbt_registry::ModelIndex;

/// Renders the input and oracle code of single tree nodes.
///
/// Holds only read-only run inputs; the rendered text is stored in the
/// nodes' write-once slots by the caller.
#[derive(Debug, Clone)]
pub struct StepRenderer<'a> {
    pub(crate) index: &'a ModelIndex,
    pub(crate) options: &'a GenerationOptions,
    pub(crate) variant: GeneratorVariant,
    pub(crate) ctx: RenderContext,
}

impl<'a> StepRenderer<'a> {
    pub fn new(
        index: &'a ModelIndex,
        options: &'a GenerationOptions,
        variant: GeneratorVariant,
        ctx: RenderContext,
    ) -> Self {
        Self {
            index,
            options,
            variant,
            ctx,
        }
    }

    pub fn index(&self) -> &ModelIndex {
        self.index
    }

    pub fn variant(&self) -> GeneratorVariant {
        self.variant
    }

    pub fn context(&self) -> &RenderContext {
        &self.ctx
    }

    pub(crate) fn language(&self) -> TargetLanguage {
        self.options.language
    }

    pub(crate) fn hooks(&self) -> &'static DialectHooks {
        self.variant.hooks()
    }

    /// Events that never produce code: hidden events and the constructor.
    pub(crate) fn is_silent(&self, event: &str) -> bool {
        self.index.is_hidden(event) || self.index.is_constructor(event)
    }
}
