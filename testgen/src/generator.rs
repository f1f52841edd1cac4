//! The code generator: traversal, caching and suite assembly.

use crate::{
    goal_tags_at_start, goal_tags_code, select_variant, write_suite, CancellationToken,
    GeneratedFile, GeneratedSuite, GenerationError, GenerationOptions, GenerationResult,
    GeneratorVariant, RenderContext, StepRenderer, SuiteInfo, SuiteLayout,
};
use mbt_registry::ModelIndex;
use mbt_tree::{ExecutionTree, NodeId};
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Suite name used when a destination has no usable file stem.
pub const DEFAULT_SUITE_NAME: &str = "TestSuite";

/// Progress of a generation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum RunState {
    #[default]
    Idle,
    /// Eagerly computing the code of every node.
    Traversing,
    /// Rendering test sequences into files.
    Rendering,
    Done,
    Cancelled,
    /// The output destination could not be written.
    Failed,
}

impl RunState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, RunState::Done | RunState::Cancelled | RunState::Failed)
    }
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RunState::Idle => "idle",
            RunState::Traversing => "traversing",
            RunState::Rendering => "rendering",
            RunState::Done => "done",
            RunState::Cancelled => "cancelled",
            RunState::Failed => "failed",
        };
        f.write_str(name)
    }
}

/// Generates test code for execution trees of one model.
///
/// Node code is cached in each node's write-once slots for the length of
/// one run. Every run starts by clearing them, so a tree can be generated
/// again under different options.
#[derive(Debug)]
pub struct CodeGenerator<'a> {
    index: &'a ModelIndex,
    options: &'a GenerationOptions,
    cancel: CancellationToken,
    state: RunState,
}

impl<'a> CodeGenerator<'a> {
    pub fn new(index: &'a ModelIndex, options: &'a GenerationOptions) -> Self {
        Self {
            index,
            options,
            cancel: CancellationToken::new(),
            state: RunState::Idle,
        }
    }

    /// Use a token shared with the host.
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancel = token;
        self
    }

    /// A handle that cancels this generator's runs.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn options(&self) -> &GenerationOptions {
        self.options
    }

    /// The variant used for a tree.
    pub fn variant_for(&self, tree: &ExecutionTree) -> GeneratorVariant {
        select_variant(self.options.language, self.options.create_object_reference, tree.kind())
    }

    fn renderer(&self, tree: &ExecutionTree) -> StepRenderer<'a> {
        StepRenderer::new(
            self.index,
            self.options,
            self.variant_for(tree),
            RenderContext::for_language(self.options.language),
        )
    }

    fn transition_to(&mut self, state: RunState) {
        debug_assert!(
            !self.state.is_terminal() || state == RunState::Idle,
            "run state {} is terminal",
            self.state
        );
        debug!(from = %self.state, to = %state, "run state");
        self.state = state;
    }

    fn check_cancelled(&self) -> GenerationResult<()> {
        if self.cancel.is_cancelled() {
            Err(GenerationError::Cancelled)
        } else {
            Ok(())
        }
    }

    /// Record the outcome of a run in the state machine.
    fn finish<T>(&mut self, result: GenerationResult<T>) -> GenerationResult<T> {
        let state = match &result {
            Ok(_) => RunState::Done,
            Err(GenerationError::Cancelled) => RunState::Cancelled,
            Err(_) => RunState::Failed,
        };
        self.transition_to(state);
        result
    }

    /// Reset the state machine and drop node code left by an earlier run.
    fn start(&mut self, tree: &mut ExecutionTree) {
        self.transition_to(RunState::Idle);
        tree.clear_generated_code();
    }

    // ==================== Traversal ====================

    /// Compute and cache input and oracle code for every node, breadth first.
    pub fn generate_tree_code(&self, tree: &ExecutionTree) -> GenerationResult<()> {
        let renderer = self.renderer(tree);
        let mut count = 0usize;
        for id in tree.breadth_first() {
            self.check_cancelled()?;
            let node = tree.node(id);
            if self.index.is_constructor(node.event()) {
                continue;
            }
            node.input_code_or_init(|| renderer.input_code(node));
            node.oracle_code_or_init(|| renderer.oracle_code(node));
            count += 1;
        }
        debug!(nodes = count, "computed node code");
        Ok(())
    }

    /// The body of one test: goal tags, then each node's input and oracle code.
    fn sequence_code(
        &self,
        renderer: &StepRenderer,
        tree: &ExecutionTree,
        path: &[NodeId],
    ) -> GenerationResult<String> {
        let mut code = String::new();
        let goals = self.index.goal_properties();
        if !goals.is_empty() && self.options.tags_at_start() {
            let reached = goal_tags_at_start(goals, tree, path);
            code.push_str(&goal_tags_code(&reached, self.options, renderer.context()));
        }
        for id in path {
            self.check_cancelled()?;
            let node = tree.node(*id);
            if self.index.is_constructor(node.event()) {
                continue;
            }
            code.push_str(node.input_code_or_init(|| renderer.input_code(node)));
            code.push_str(node.oracle_code_or_init(|| renderer.oracle_code(node)));
        }
        Ok(code)
    }

    /// Identifier of the `number`-th test (1-based) ending at `leaf`.
    pub fn test_id(&self, number: usize, tree: &ExecutionTree, leaf: NodeId) -> String {
        if self.options.include_sequence_indices {
            format!("{}_{}", number, tree.node(leaf).test_case_id())
        } else {
            number.to_string()
        }
    }

    /// Render the test ending at `leaf` without any suite scaffolding.
    pub fn review_sequence(
        &self,
        tree: &mut ExecutionTree,
        leaf: NodeId,
    ) -> GenerationResult<String> {
        tree.clear_generated_code();
        let path = tree.path_to(leaf)?;
        self.sequence_code(&self.renderer(tree), tree, &path)
    }

    // ==================== Suites ====================

    /// Render every test of the tree into in-memory files.
    pub fn generate(
        &mut self,
        tree: &mut ExecutionTree,
        suite_name: &str,
    ) -> GenerationResult<GeneratedSuite> {
        self.start(tree);
        let result = self.render_suite(tree, suite_name);
        self.finish(result)
    }

    fn render_suite(
        &mut self,
        tree: &ExecutionTree,
        suite_name: &str,
    ) -> GenerationResult<GeneratedSuite> {
        let variant = self.variant_for(tree);
        info!(
            suite = suite_name,
            language = %self.options.language,
            ?variant,
            eager = self.options.eager,
            "generating test suite"
        );

        if self.options.eager {
            self.transition_to(RunState::Traversing);
            self.generate_tree_code(tree)?;
        }
        self.transition_to(RunState::Rendering);

        let renderer = self.renderer(tree);
        let mut tests = Vec::new();
        for (position, leaf) in tree.tests_for_code_generation().into_iter().enumerate() {
            let path = tree.path_to(leaf)?;
            let body = self.sequence_code(&renderer, tree, &path)?;
            tests.push((self.test_id(position + 1, tree, leaf), body));
        }

        let layout = SuiteLayout::for_language(self.options.language);
        let extension = self.options.language.file_extension();
        let mut suite = GeneratedSuite::new(suite_name);
        let info = SuiteInfo {
            name: suite_name,
            system_name: self.index.system_name(),
        };

        if self.options.separate_test_files {
            let mut stems = Vec::with_capacity(tests.len());
            for test in &tests {
                let stem = format!("{}_{}", suite_name, test.0);
                let file_info = SuiteInfo { name: &stem, ..info };
                let contents = layout.render(&file_info, std::slice::from_ref(test));
                suite.push(GeneratedFile::new(format!("{stem}.{extension}"), contents));
                stems.push(stem);
            }
            suite.push(GeneratedFile::new(
                format!("{suite_name}.{extension}"),
                (layout.index)(&info, &stems),
            ));
        } else {
            suite.push(GeneratedFile::new(
                format!("{suite_name}.{extension}"),
                layout.render(&info, &tests),
            ));
        }

        info!(tests = tests.len(), files = suite.len(), "rendered test suite");
        Ok(suite)
    }

    /// Generate the suite and write it next to `destination`.
    ///
    /// The file stem of `destination` names the suite; the language decides
    /// the extension. Content is rendered completely before any file is
    /// created.
    pub fn save(
        &mut self,
        tree: &mut ExecutionTree,
        destination: &Path,
    ) -> GenerationResult<Vec<PathBuf>> {
        let suite_name = destination
            .file_stem()
            .and_then(|stem| stem.to_str())
            .filter(|stem| !stem.is_empty())
            .unwrap_or(DEFAULT_SUITE_NAME)
            .to_string();
        let directory = match destination.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        self.start(tree);
        let result = self
            .render_suite(tree, &suite_name)
            .and_then(|suite| write_suite(&suite, &directory));
        if let Ok(paths) = &result {
            info!(
                files = paths.len(),
                directory = %directory.display(),
                "saved test suite"
            );
        }
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TargetLanguage;
    use mbt_core::{Marking, Transition};
    use mbt_registry::ModelIndexBuilder;
    use mbt_tree::NodeSpec;
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn login_index() -> ModelIndex {
        let mut builder = ModelIndexBuilder::new("Bank");
        builder
            .transition(Transition::new("login"))
            .transition(Transition::new("logout"));
        builder.build().unwrap()
    }

    fn login_tree(index: &ModelIndex) -> ExecutionTree {
        let root = Arc::new(Transition::constructor("new"));
        let mut tree = ExecutionTree::new(root, Marking::new());
        let login = index.transition("login").cloned().unwrap();
        let logout = index.transition("logout").cloned().unwrap();
        let a = tree.add_child(tree.root(), NodeSpec::new(login)).unwrap();
        tree.add_child(a, NodeSpec::new(logout)).unwrap();
        tree
    }

    #[test]
    fn test_state_machine_reaches_done() {
        let index = login_index();
        let mut tree = login_tree(&index);
        let options = GenerationOptions::for_language(TargetLanguage::Java).with_eager(true);
        let mut generator = CodeGenerator::new(&index, &options);
        assert_eq!(generator.state(), RunState::Idle);

        let suite = generator.generate(&mut tree, "BankTest").unwrap();
        assert_eq!(generator.state(), RunState::Done);
        assert_eq!(suite.len(), 1);
        assert!(suite.files()[0].contents.contains("\t\tBank.login();\n\t\tBank.logout();"));
    }

    #[test]
    fn test_cancelled_run_reports_cancellation() {
        let index = login_index();
        let mut tree = login_tree(&index);
        let options = GenerationOptions::for_language(TargetLanguage::Java);
        let mut generator = CodeGenerator::new(&index, &options);
        generator.cancellation_token().cancel();

        let err = generator.generate(&mut tree, "BankTest").unwrap_err();
        assert!(err.is_cancelled());
        assert_eq!(generator.state(), RunState::Cancelled);
        assert!(generator.state().is_terminal());
    }

    #[test]
    fn test_ids_with_and_without_sequence_indices() {
        let index = login_index();
        let tree = login_tree(&index);
        let leaf = tree.tests_for_code_generation()[0];

        let options = GenerationOptions::new();
        assert_eq!(CodeGenerator::new(&index, &options).test_id(1, &tree, leaf), "1_1_1");

        let options = GenerationOptions::new().with_sequence_indices(false);
        assert_eq!(CodeGenerator::new(&index, &options).test_id(1, &tree, leaf), "1");
    }

    #[test]
    fn test_review_sequence_has_no_scaffolding() {
        let index = login_index();
        let mut tree = login_tree(&index);
        let options =
            GenerationOptions::for_language(TargetLanguage::Python).with_object_reference(false);
        let generator = CodeGenerator::new(&index, &options);
        let leaf = tree.tests_for_code_generation()[0];
        assert_eq!(
            generator.review_sequence(&mut tree, leaf).unwrap(),
            "\n        login()\n        logout()"
        );
    }

    #[test]
    fn test_failed_save_goes_from_rendering_to_failed() {
        let index = login_index();
        let mut tree = login_tree(&index);
        let options = GenerationOptions::for_language(TargetLanguage::Java);
        let mut generator = CodeGenerator::new(&index, &options);
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, "not a directory").unwrap();

        let err = generator.save(&mut tree, &blocker.join("BankTest.java")).unwrap_err();
        assert!(matches!(err, GenerationError::DestinationUnavailable { .. }));
        assert_eq!(generator.state(), RunState::Failed);

        let written = generator.save(&mut tree, &dir.path().join("BankTest.java")).unwrap();
        assert_eq!(written.len(), 1);
        assert_eq!(generator.state(), RunState::Done);
    }

    #[test]
    fn test_each_run_starts_from_empty_node_code() {
        let index = login_index();
        let mut tree = login_tree(&index);
        let java = GenerationOptions::for_language(TargetLanguage::Java).with_eager(true);
        CodeGenerator::new(&index, &java).generate(&mut tree, "BankTest").unwrap();

        let python =
            GenerationOptions::for_language(TargetLanguage::Python).with_object_reference(false);
        let suite = CodeGenerator::new(&index, &python).generate(&mut tree, "BankTest").unwrap();
        let leaf = tree.tests_for_code_generation()[0];
        assert_eq!(tree.node(leaf).input_code(), Some("\n        logout()"));
        assert!(!suite.files()[0].contents.contains("Bank.login();"));
    }
}
