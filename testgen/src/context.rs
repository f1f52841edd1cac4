//! Per-run rendering context.

use crate::TargetLanguage;

/// Newline and indentation used while rendering a block of code.
///
/// A context is created once per run and passed by reference; nested
/// blocks derive a deeper context with [`RenderContext::indented`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderContext {
    newline: String,
    indent_unit: String,
}

impl RenderContext {
    /// Context whose lines start with `indentation`.
    pub fn new(indentation: &str, indent_unit: &str) -> Self {
        Self {
            newline: format!("\n{indentation}"),
            indent_unit: indent_unit.to_string(),
        }
    }

    /// Context for a test body in the given language.
    pub fn for_language(language: TargetLanguage) -> Self {
        Self::new(language.body_indentation(), language.indent_unit())
    }

    /// Line break followed by the current indentation.
    pub fn newline(&self) -> &str {
        &self.newline
    }

    /// Current indentation without the line break.
    pub fn tab(&self) -> &str {
        &self.newline[1..]
    }

    /// Code on a new line at the current indentation.
    pub fn line(&self, code: &str) -> String {
        format!("{}{}", self.newline, code)
    }

    /// Context one level deeper.
    pub fn indented(&self) -> Self {
        Self {
            newline: format!("{}{}", self.newline, self.indent_unit),
            indent_unit: self.indent_unit.clone(),
        }
    }

    /// Indent every line break of already rendered code by one level.
    pub fn indent_block(&self, code: &str) -> String {
        code.replace('\n', &format!("\n{}", self.indent_unit))
    }

    /// Replace each line break with a line break at the current indentation.
    pub fn reindent(&self, text: &str) -> String {
        text.replace('\n', &self.newline)
    }
}
