//! Configuration for test-code generation

use crate::TargetLanguage;
use serde::{Deserialize, Serialize};

/// Where goal tags are emitted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TagPlacement {
    /// Once per test, listing every goal reached along its path.
    #[default]
    AtStart,
    /// After each node's oracle, listing the goals firable at that node.
    Inline,
}

/// Configuration for test-code generation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationOptions {
    /// Language of the generated code
    pub language: TargetLanguage,

    /// Assert transition postconditions after each step
    pub verify_postconditions: bool,
    /// Check transition effects after each step
    pub verify_effects: bool,
    /// Assert the full marking when postconditions are not verified
    pub verify_markings: bool,
    /// Assert that delete-preconditions no longer hold
    pub verify_negated_conditions: bool,
    /// Assert the marking after a negative step
    pub verify_dirty_test_state: bool,

    /// Use parameters entered on tree nodes before anything else
    pub prefer_gui_parameters: bool,
    /// Build call parameters from the firing substitution
    pub derive_parameters_from_trace: bool,

    /// Qualify calls with an object reference to the system under test
    pub create_object_reference: bool,
    /// Prefix each input action with the object reference
    pub generate_reference_for_method_call: bool,
    /// Wrap negative steps so that an expected exception passes
    pub expect_exceptions_for_dirty_tests: bool,

    /// Emit goal tags at all
    pub create_goal_tags: bool,
    /// Tag template containing `[NAME]` or `[NAME,]`
    pub tag_template: String,
    pub tag_placement: TagPlacement,
    /// Delimiter between goal names substituted for `[NAME]`
    pub tag_name_separator: String,

    /// One file per test instead of a single suite file
    pub separate_test_files: bool,
    /// Prefix test identifiers with the tree's test-case ID
    pub include_sequence_indices: bool,
    /// Compute the code for every node before rendering any test
    pub eager: bool,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            language: TargetLanguage::Java,
            verify_postconditions: true,
            verify_effects: false,
            verify_markings: false,
            verify_negated_conditions: false,
            verify_dirty_test_state: true,
            prefer_gui_parameters: true,
            derive_parameters_from_trace: true,
            create_object_reference: true,
            generate_reference_for_method_call: true,
            expect_exceptions_for_dirty_tests: true,
            create_goal_tags: false,
            tag_template: String::new(),
            tag_placement: TagPlacement::AtStart,
            tag_name_separator: " ".to_string(),
            separate_test_files: false,
            include_sequence_indices: true,
            eager: false,
        }
    }
}

impl GenerationOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Defaults for a language.
    pub fn for_language(language: TargetLanguage) -> Self {
        Self::default().with_language(language)
    }

    /// Only plain calls: no references, no oracle beyond postconditions.
    pub fn minimal(language: TargetLanguage) -> Self {
        Self {
            language,
            verify_dirty_test_state: false,
            create_object_reference: false,
            generate_reference_for_method_call: false,
            expect_exceptions_for_dirty_tests: false,
            include_sequence_indices: false,
            ..Self::default()
        }
    }

    /// Every verification switched on.
    pub fn thorough(language: TargetLanguage) -> Self {
        Self {
            language,
            verify_effects: true,
            verify_markings: true,
            verify_negated_conditions: true,
            ..Self::default()
        }
    }

    pub fn with_language(mut self, language: TargetLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_postconditions(mut self, verify: bool) -> Self {
        self.verify_postconditions = verify;
        self
    }

    pub fn with_effects(mut self, verify: bool) -> Self {
        self.verify_effects = verify;
        self
    }

    pub fn with_markings(mut self, verify: bool) -> Self {
        self.verify_markings = verify;
        self
    }

    pub fn with_negated_conditions(mut self, verify: bool) -> Self {
        self.verify_negated_conditions = verify;
        self
    }

    pub fn with_dirty_test_state(mut self, verify: bool) -> Self {
        self.verify_dirty_test_state = verify;
        self
    }

    pub fn with_gui_parameters(mut self, prefer: bool) -> Self {
        self.prefer_gui_parameters = prefer;
        self
    }

    pub fn with_trace_parameters(mut self, derive: bool) -> Self {
        self.derive_parameters_from_trace = derive;
        self
    }

    pub fn with_object_reference(mut self, create: bool) -> Self {
        self.create_object_reference = create;
        self
    }

    pub fn with_reference_for_method_call(mut self, generate: bool) -> Self {
        self.generate_reference_for_method_call = generate;
        self
    }

    pub fn with_expected_exceptions(mut self, expect: bool) -> Self {
        self.expect_exceptions_for_dirty_tests = expect;
        self
    }

    /// Enable goal tags with a template and placement.
    pub fn with_goal_tags(mut self, template: impl Into<String>, placement: TagPlacement) -> Self {
        self.create_goal_tags = true;
        self.tag_template = template.into();
        self.tag_placement = placement;
        self
    }

    pub fn with_tag_name_separator(mut self, separator: impl Into<String>) -> Self {
        self.tag_name_separator = separator.into();
        self
    }

    pub fn with_separate_test_files(mut self, separate: bool) -> Self {
        self.separate_test_files = separate;
        self
    }

    pub fn with_sequence_indices(mut self, include: bool) -> Self {
        self.include_sequence_indices = include;
        self
    }

    pub fn with_eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Returns true if goal tags are enabled and a template is configured.
    pub fn has_tag_template(&self) -> bool {
        self.create_goal_tags && !self.tag_template.is_empty()
    }

    /// Returns true if tags go at the start of each test.
    pub fn tags_at_start(&self) -> bool {
        self.has_tag_template() && self.tag_placement == TagPlacement::AtStart
    }

    /// Returns true if tags go after each node's oracle.
    pub fn tags_inline(&self) -> bool {
        self.has_tag_template() && self.tag_placement == TagPlacement::Inline
    }
}
