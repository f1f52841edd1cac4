//! Target languages, generator variants and their capability tables.
//!
//! The shared pipeline never branches on a concrete language to shape
//! code; it calls through the [`DialectHooks`] table of the selected
//! [`GeneratorVariant`].

use crate::RenderContext;
use mbt_tree::TreeKind;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Language of the generated test code.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetLanguage {
    #[default]
    Java,
    CSharp,
    Cpp,
    Python,
    Vb,
    C,
    Html,
    Kbt,
    Rpc,
    SeleniumDriver,
    Uft,
}

impl TargetLanguage {
    pub const ALL: [TargetLanguage; 11] = [
        TargetLanguage::Java,
        TargetLanguage::CSharp,
        TargetLanguage::Cpp,
        TargetLanguage::Python,
        TargetLanguage::Vb,
        TargetLanguage::C,
        TargetLanguage::Html,
        TargetLanguage::Kbt,
        TargetLanguage::Rpc,
        TargetLanguage::SeleniumDriver,
        TargetLanguage::Uft,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "java",
            TargetLanguage::CSharp => "csharp",
            TargetLanguage::Cpp => "cpp",
            TargetLanguage::Python => "python",
            TargetLanguage::Vb => "vb",
            TargetLanguage::C => "c",
            TargetLanguage::Html => "html",
            TargetLanguage::Kbt => "kbt",
            TargetLanguage::Rpc => "rpc",
            TargetLanguage::SeleniumDriver => "selenium_driver",
            TargetLanguage::Uft => "uft",
        }
    }

    pub fn is_object_oriented(&self) -> bool {
        matches!(
            self,
            TargetLanguage::Java
                | TargetLanguage::CSharp
                | TargetLanguage::Cpp
                | TargetLanguage::Python
                | TargetLanguage::Vb
        )
    }

    /// Indentation of statements inside a generated test body.
    pub fn body_indentation(&self) -> &'static str {
        match self {
            TargetLanguage::Java | TargetLanguage::CSharp | TargetLanguage::Vb => "\t\t",
            TargetLanguage::Python => "        ",
            TargetLanguage::Cpp | TargetLanguage::C => "\t",
            _ => "",
        }
    }

    /// One level of block indentation.
    pub fn indent_unit(&self) -> &'static str {
        match self {
            TargetLanguage::Python => "    ",
            _ => "\t",
        }
    }

    /// Expression prefix that qualifies a call on the system object.
    pub fn object_reference(&self, system_name: &str) -> String {
        match self {
            TargetLanguage::Cpp => format!("{system_name}->"),
            TargetLanguage::Python => format!("self.{system_name}."),
            _ => format!("{system_name}."),
        }
    }

    /// Terminator appended to plain statements.
    pub fn statement_terminator(&self) -> &'static str {
        match self {
            TargetLanguage::Java
            | TargetLanguage::CSharp
            | TargetLanguage::Cpp
            | TargetLanguage::C => ";",
            _ => "",
        }
    }

    /// Line comment prefix.
    pub fn comment_prefix(&self) -> &'static str {
        match self {
            TargetLanguage::Python | TargetLanguage::Kbt | TargetLanguage::Rpc => "#",
            TargetLanguage::Vb | TargetLanguage::Uft => "'",
            TargetLanguage::Html => "<!--",
            _ => "//",
        }
    }

    pub fn file_extension(&self) -> &'static str {
        match self {
            TargetLanguage::Java => "java",
            TargetLanguage::CSharp => "cs",
            TargetLanguage::Cpp => "cpp",
            TargetLanguage::Python => "py",
            TargetLanguage::Vb => "vb",
            TargetLanguage::C => "c",
            TargetLanguage::Html => "html",
            TargetLanguage::Kbt | TargetLanguage::Rpc => "txt",
            TargetLanguage::SeleniumDriver => "side",
            TargetLanguage::Uft => "vbs",
        }
    }

    /// Append the statement terminator unless the code already ends a statement or block.
    pub fn terminate(&self, code: &str) -> String {
        let terminator = self.statement_terminator();
        if terminator.is_empty() || code.ends_with(terminator) || code.ends_with('}') {
            code.to_string()
        } else {
            format!("{code}{terminator}")
        }
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetLanguage {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.to_ascii_lowercase().replace('-', "_");
        let alias = match lowered.as_str() {
            "c#" | "cs" => "csharp",
            "c++" => "cpp",
            "selenium" => "selenium_driver",
            other => other,
        };
        TargetLanguage::ALL
            .into_iter()
            .find(|lang| lang.as_str() == alias)
            .ok_or_else(|| format!("unknown target language '{s}'"))
    }
}

/// Shape of generator chosen for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GeneratorVariant {
    /// HTML tables of keyword rows; assertions and negation are not meaningful.
    Html,
    /// Procedural C with `assert`.
    C,
    /// Object-oriented unit tests qualifying calls with an object reference.
    ObjectOriented,
    /// Object-oriented unit tests calling system methods directly.
    ObjectOrientedSystem,
    /// Keyword-driven tables.
    KeywordDriven,
    /// Record-and-playback (UI-driven) scripts.
    RecordPlayback,
}

/// Choose the generator variant for a language, object-reference setting and tree kind.
pub fn select_variant(
    language: TargetLanguage,
    create_object_reference: bool,
    tree_kind: TreeKind,
) -> GeneratorVariant {
    if language.is_object_oriented() {
        if tree_kind == TreeKind::ThreatNet || !create_object_reference {
            GeneratorVariant::ObjectOrientedSystem
        } else {
            GeneratorVariant::ObjectOriented
        }
    } else {
        match language {
            TargetLanguage::C => GeneratorVariant::C,
            TargetLanguage::Kbt | TargetLanguage::Rpc | TargetLanguage::SeleniumDriver => {
                GeneratorVariant::KeywordDriven
            }
            TargetLanguage::Uft => GeneratorVariant::RecordPlayback,
            _ => GeneratorVariant::Html,
        }
    }
}

/// Code-shaping hooks for one variant.
pub struct DialectHooks {
    /// Predicates render as bare accessor text: no assertion or effect shaping.
    pub raw_predicates: bool,
    /// Turn an input action expression into a statement line.
    pub format_input_action: fn(TargetLanguage, &RenderContext, &str) -> String,
    /// Wrap a negative step's input code so an expected exception passes.
    pub wrap_exception: fn(TargetLanguage, &RenderContext, &str, String) -> String,
    /// Render a condition as an assertion for a test.
    pub assert_predicate: fn(TargetLanguage, &RenderContext, &str, &str, bool) -> String,
    /// Render an effect; empty output means effects are not checked.
    pub normalize_effect: fn(TargetLanguage, &RenderContext, &str) -> String,
    /// Render option setup code.
    pub normalize_setup: fn(TargetLanguage, &str) -> String,
}

impl fmt::Debug for DialectHooks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DialectHooks")
            .field("raw_predicates", &self.raw_predicates)
            .finish_non_exhaustive()
    }
}

static HTML_HOOKS: DialectHooks = DialectHooks {
    raw_predicates: true,
    format_input_action: plain_input_action,
    wrap_exception: no_exception_wrap,
    assert_predicate: plain_assertion,
    normalize_effect: no_effect,
    normalize_setup: identity_setup,
};

static C_HOOKS: DialectHooks = DialectHooks {
    raw_predicates: false,
    format_input_action: statement_input_action,
    wrap_exception: no_exception_wrap,
    assert_predicate: c_assertion,
    normalize_effect: no_effect,
    normalize_setup: terminated_setup,
};

static OO_HOOKS: DialectHooks = DialectHooks {
    raw_predicates: false,
    format_input_action: statement_input_action,
    wrap_exception: oo_exception_wrap,
    assert_predicate: oo_assertion,
    normalize_effect: oo_effect,
    normalize_setup: terminated_setup,
};

static KEYWORD_HOOKS: DialectHooks = DialectHooks {
    raw_predicates: false,
    format_input_action: plain_input_action,
    wrap_exception: no_exception_wrap,
    assert_predicate: plain_assertion,
    normalize_effect: no_effect,
    normalize_setup: identity_setup,
};

static RECORD_PLAYBACK_HOOKS: DialectHooks = DialectHooks {
    raw_predicates: false,
    format_input_action: plain_input_action,
    wrap_exception: no_exception_wrap,
    assert_predicate: checkpoint_assertion,
    normalize_effect: no_effect,
    normalize_setup: identity_setup,
};

impl GeneratorVariant {
    /// The capability table for this variant.
    pub fn hooks(&self) -> &'static DialectHooks {
        match self {
            GeneratorVariant::Html => &HTML_HOOKS,
            GeneratorVariant::C => &C_HOOKS,
            GeneratorVariant::ObjectOriented | GeneratorVariant::ObjectOrientedSystem => &OO_HOOKS,
            GeneratorVariant::KeywordDriven => &KEYWORD_HOOKS,
            GeneratorVariant::RecordPlayback => &RECORD_PLAYBACK_HOOKS,
        }
    }

    pub fn is_object_oriented(&self) -> bool {
        matches!(
            self,
            GeneratorVariant::ObjectOriented | GeneratorVariant::ObjectOrientedSystem
        )
    }
}

// ==================== Input Actions ====================

fn plain_input_action(_: TargetLanguage, ctx: &RenderContext, action: &str) -> String {
    ctx.line(action)
}

fn statement_input_action(language: TargetLanguage, ctx: &RenderContext, action: &str) -> String {
    ctx.line(&language.terminate(action))
}

fn no_exception_wrap(_: TargetLanguage, _: &RenderContext, _: &str, input: String) -> String {
    input
}

fn oo_exception_wrap(
    language: TargetLanguage,
    ctx: &RenderContext,
    test_id: &str,
    input: String,
) -> String {
    let body = ctx.indent_block(&input);
    let inner = ctx.indented();
    match language {
        TargetLanguage::Python => format!(
            "{}{}",
            ctx.line("with self.assertRaises(Exception):"),
            body
        ),
        TargetLanguage::Cpp => format!(
            "{}{}{}",
            ctx.line("EXPECT_ANY_THROW({"),
            body,
            ctx.line("});")
        ),
        TargetLanguage::CSharp => format!(
            "{}{}{}{}",
            ctx.line("try {"),
            body,
            inner.line(&format!("Assert.Fail(\"Test {test_id}: exception expected\");")),
            ctx.line("} catch (Exception) { }")
        ),
        TargetLanguage::Vb => format!(
            "{}{}{}{}{}",
            ctx.line("Try"),
            body,
            inner.line(&format!("Assert.Fail(\"Test {test_id}: exception expected\")")),
            ctx.line("Catch ex As Exception"),
            ctx.line("End Try")
        ),
        _ => format!(
            "{}{}{}{}",
            ctx.line("try {"),
            body,
            inner.line(&format!("fail(\"Test {test_id}: exception expected\");")),
            ctx.line("} catch (Exception e) { }")
        ),
    }
}

// ==================== Predicates ====================

fn plain_assertion(
    _: TargetLanguage,
    ctx: &RenderContext,
    _: &str,
    condition: &str,
    _: bool,
) -> String {
    format!("{}{}", ctx.tab(), condition)
}

fn c_assertion(
    _: TargetLanguage,
    ctx: &RenderContext,
    _: &str,
    condition: &str,
    negated: bool,
) -> String {
    if negated {
        format!("{}assert(!({}));", ctx.tab(), condition)
    } else {
        format!("{}assert({});", ctx.tab(), condition)
    }
}

fn oo_assertion(
    language: TargetLanguage,
    ctx: &RenderContext,
    test_id: &str,
    condition: &str,
    negated: bool,
) -> String {
    let assertion = match (language, negated) {
        (TargetLanguage::CSharp, false) => format!("Assert.IsTrue({condition}, \"{test_id}\");"),
        (TargetLanguage::CSharp, true) => format!("Assert.IsFalse({condition}, \"{test_id}\");"),
        (TargetLanguage::Cpp, false) => format!("ASSERT_TRUE({condition});"),
        (TargetLanguage::Cpp, true) => format!("ASSERT_FALSE({condition});"),
        (TargetLanguage::Python, false) => format!("self.assertTrue({condition}, \"{test_id}\")"),
        (TargetLanguage::Python, true) => format!("self.assertFalse({condition}, \"{test_id}\")"),
        (TargetLanguage::Vb, false) => format!("Assert.IsTrue({condition}, \"{test_id}\")"),
        (TargetLanguage::Vb, true) => format!("Assert.IsFalse({condition}, \"{test_id}\")"),
        (_, false) => format!("assertTrue(\"{test_id}\", {condition});"),
        (_, true) => format!("assertFalse(\"{test_id}\", {condition});"),
    };
    format!("{}{}", ctx.tab(), assertion)
}

fn checkpoint_assertion(
    _: TargetLanguage,
    ctx: &RenderContext,
    test_id: &str,
    condition: &str,
    negated: bool,
) -> String {
    let check = if negated { format!("Not ({condition})") } else { condition.to_string() };
    format!(
        "{}Reporter.ReportEvent IIf({}, micPass, micFail), \"{}\", \"{}\"",
        ctx.tab(),
        check,
        test_id,
        condition.replace('"', "\"\"")
    )
}

fn no_effect(_: TargetLanguage, _: &RenderContext, _: &str) -> String {
    String::new()
}

fn oo_effect(language: TargetLanguage, ctx: &RenderContext, code: &str) -> String {
    format!("{}{}", ctx.tab(), language.terminate(code))
}

// ==================== Option Setup ====================

fn identity_setup(_: TargetLanguage, code: &str) -> String {
    code.to_string()
}

fn terminated_setup(language: TargetLanguage, code: &str) -> String {
    language.terminate(code)
}
