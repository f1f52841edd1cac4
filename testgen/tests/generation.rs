//! End-to-end tests: model and tree in, test files out.

use mbt_core::{GoalProperty, Marking, Predicate, Substitution, Transition, Tuple};
use mbt_registry::{ModelIndex, ModelIndexBuilder};
use mbt_testgen::{
    CodeGenerator, GenerationError, GenerationOptions, GeneratorVariant, ModelBundle,
    RenderContext, RunState, StepRenderer, TagPlacement, TargetLanguage,
};
use mbt_tree::{ExecutionTree, NodeId, NodeSpec};
use pretty_assertions::assert_eq;
use std::fs;
use std::sync::Arc;

fn pred(text: &str) -> Predicate {
    Predicate::parse(text).unwrap()
}

fn bank_index() -> ModelIndex {
    let mut builder = ModelIndexBuilder::new("Bank");
    builder
        .place("balance")
        .object("amount", "acc1")
        .parameters("withdraw", ["amount"])
        .action("withdraw(acc1)", "account.withdraw(acc1)")
        .action("deposit(A, N)", "deposit(A, N)")
        .accessor("balance(X, Y)", "getBalance(X)==Y")
        .goal(GoalProperty::new("goalReachLimit", vec![pred("balance(A, 0)")]))
        .transition(Transition::new("login"))
        .transition(Transition::new("withdraw").with_postcondition(vec![pred("balance(acc1, 0)")]))
        .transition(
            Transition::new("deposit")
                .with_parameters(["A", "N"])
                .with_postcondition(vec![pred("balance(A, N)")]),
        );
    builder.build().unwrap()
}

fn with_balance(value: &str) -> Marking {
    Marking::new().with("balance", Tuple::new(["acc1", value]))
}

/// new -> login -> withdraw (reaches the limit), new -> login -> deposit (dirty)
fn bank_tree(index: &ModelIndex) -> ExecutionTree {
    let step = |name: &str| NodeSpec::new(index.transition(name).cloned().unwrap());
    let mut tree = ExecutionTree::new(Arc::new(Transition::constructor("new")), Marking::new());
    let login = tree
        .add_child(tree.root(), step("login").with_marking(with_balance("100")))
        .unwrap();
    tree.add_child(
        login,
        step("withdraw")
            .with_substitution(Substitution::new())
            .with_marking(with_balance("0")),
    )
    .unwrap();
    let mut substitution = Substitution::with("A", "acc1");
    substitution.bind("N", "50");
    tree.add_child(
        login,
        step("deposit")
            .with_substitution(substitution)
            .with_marking(with_balance("100"))
            .negative(),
    )
    .unwrap();
    tree
}

fn first_node(tree: &ExecutionTree, event: &str) -> NodeId {
    tree.breadth_first()
        .into_iter()
        .find(|id| tree.node(*id).event() == event)
        .unwrap()
}

fn renderer<'a>(index: &'a ModelIndex, options: &'a GenerationOptions) -> StepRenderer<'a> {
    let variant = mbt_testgen::select_variant(
        options.language,
        options.create_object_reference,
        Default::default(),
    );
    StepRenderer::new(index, options, variant, RenderContext::for_language(options.language))
}

#[test]
fn zero_parameter_event_without_mapping_is_called_directly() {
    let index = bank_index();
    let tree = bank_tree(&index);
    let options =
        GenerationOptions::for_language(TargetLanguage::Java).with_object_reference(false);
    let login = first_node(&tree, "login");
    assert_eq!(renderer(&index, &options).input_action_expression(tree.node(login)), "login()");
}

#[test]
fn specification_parameters_resolve_to_objects_and_exact_mapping() {
    let index = bank_index();
    let tree = bank_tree(&index);
    let options =
        GenerationOptions::for_language(TargetLanguage::Java).with_object_reference(false);
    let withdraw = first_node(&tree, "withdraw");
    assert_eq!(
        renderer(&index, &options).input_action_expression(tree.node(withdraw)),
        "account.withdraw(acc1)"
    );
}

#[test]
fn node_parameters_win_over_specification_and_trace_parameters() {
    let index = bank_index();
    let mut tree = ExecutionTree::new(Arc::new(Transition::constructor("new")), Marking::new());
    let spec = NodeSpec::new(index.transition("withdraw").cloned().unwrap())
        .with_substitution(Substitution::with("A", "acc9"))
        .with_parameters(["acc7"]);
    let id = tree.add_child(tree.root(), spec).unwrap();

    let options =
        GenerationOptions::for_language(TargetLanguage::Java).with_object_reference(false);
    assert_eq!(renderer(&index, &options).input_action_expression(tree.node(id)), "withdraw(acc7)");
}

#[test]
fn dirty_step_asserts_the_marking() {
    let index = bank_index();
    let tree = bank_tree(&index);
    let options =
        GenerationOptions::for_language(TargetLanguage::Java).with_object_reference(false);
    let deposit = first_node(&tree, "deposit");
    assert_eq!(
        renderer(&index, &options).oracle_code(tree.node(deposit)),
        "\n\t\tassertTrue(\"1_2\", getBalance(acc1)==100);"
    );
}

#[test]
fn dirty_step_input_expects_an_exception() {
    let index = bank_index();
    let tree = bank_tree(&index);
    let options =
        GenerationOptions::for_language(TargetLanguage::Java).with_object_reference(false);
    let deposit = first_node(&tree, "deposit");
    assert_eq!(
        renderer(&index, &options).input_code(tree.node(deposit)),
        "\n\t\ttry {\n\t\t\tdeposit(acc1, 50);\n\t\t\tfail(\"Test 1_2: exception expected\");\
         \n\t\t} catch (Exception e) { }"
    );
}

#[test]
fn inline_goal_tag_follows_the_reaching_step() {
    let index = bank_index();
    let tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java)
        .with_object_reference(false)
        .with_postconditions(false)
        .with_goal_tags("// reached: [NAME]", TagPlacement::Inline);
    let withdraw = first_node(&tree, "withdraw");
    assert_eq!(
        renderer(&index, &options).oracle_code(tree.node(withdraw)),
        "\n\t\t// reached: goalReachLimit"
    );
}

#[test]
fn goal_tags_fire_from_exactly_one_placement() {
    let index = bank_index();
    for placement in [TagPlacement::AtStart, TagPlacement::Inline] {
        let mut tree = bank_tree(&index);
        let options = GenerationOptions::for_language(TargetLanguage::Java)
            .with_object_reference(false)
            .with_goal_tags("// reached: [NAME]", placement);
        let suite = CodeGenerator::new(&index, &options).generate(&mut tree, "BankTest").unwrap();
        let contents = &suite.files()[0].contents;
        assert_eq!(contents.matches("// reached: goalReachLimit").count(), 1, "{placement:?}");
    }

    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java)
        .with_goal_tags("", TagPlacement::Inline);
    let suite = CodeGenerator::new(&index, &options).generate(&mut tree, "BankTest").unwrap();
    assert!(!suite.files()[0].contents.contains("reached"));
}

#[test]
fn constructor_never_produces_code() {
    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java).with_eager(true);
    let mut generator = CodeGenerator::new(&index, &options);
    generator.generate(&mut tree, "BankTest").unwrap();

    let root = tree.node(tree.root());
    assert_eq!(root.input_code(), None);
    assert_eq!(root.oracle_code(), None);
    for id in tree.breadth_first() {
        assert!(tree.node(id).input_code().is_some());
    }
}

#[test]
fn single_file_suite_for_java() {
    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java);
    let suite = CodeGenerator::new(&index, &options).generate(&mut tree, "BankTest").unwrap();

    assert_eq!(suite.len(), 1);
    let file = suite.file("BankTest.java").unwrap();
    assert!(file.contents.starts_with("// Test code generated by mbt\n"));
    assert!(file.contents.contains(
        "\tpublic void test1_1_1() throws Exception {\n\
         \t\tBank.login();\n\
         \t\tBank.account.withdraw(acc1);\n\
         \t\tassertTrue(\"1_1\", getBalance(acc1)==0);\n\
         \t}"
    ));
    assert!(file.contents.contains("public void test2_1_2()"));
}

#[test]
fn separate_files_with_index() {
    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Python)
        .with_separate_test_files(true)
        .with_sequence_indices(false);
    let suite = CodeGenerator::new(&index, &options).generate(&mut tree, "bank_test").unwrap();

    let names: Vec<&str> = suite.files().iter().map(|f| f.name.as_str()).collect();
    assert_eq!(names, vec!["bank_test_1.py", "bank_test_2.py", "bank_test.py"]);
    assert!(suite.files()[0].contents.contains("class bank_test_1(unittest.TestCase):"));
    assert!(suite.files()[2].contents.contains("from bank_test_2 import *"));
}

#[test]
fn save_writes_files_next_to_destination() {
    let dir = tempfile::tempdir().unwrap();
    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::C);
    let mut generator = CodeGenerator::new(&index, &options);

    let written = generator.save(&mut tree, &dir.path().join("out").join("bank_suite.c")).unwrap();
    assert_eq!(written, vec![dir.path().join("out").join("bank_suite.c")]);
    let contents = fs::read_to_string(&written[0]).unwrap();
    assert!(contents.contains("\tassert(getBalance(acc1)==0);"));
    assert!(contents.contains("\ttest1_1_1();\n\ttest2_1_2();"));
    assert_eq!(generator.state(), RunState::Done);
}

#[test]
fn unavailable_destination_fails_the_run() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, "").unwrap();

    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java);
    let mut generator = CodeGenerator::new(&index, &options);

    let err = generator.save(&mut tree, &blocker.join("BankTest.java")).unwrap_err();
    assert!(matches!(err, GenerationError::DestinationUnavailable { .. }));
    assert_eq!(generator.state(), RunState::Failed);
}

#[test]
fn cancellation_is_distinct_from_io_failure() {
    let dir = tempfile::tempdir().unwrap();
    let index = bank_index();
    let mut tree = bank_tree(&index);
    let options = GenerationOptions::for_language(TargetLanguage::Java).with_eager(true);
    let mut generator = CodeGenerator::new(&index, &options);
    generator.cancellation_token().cancel();

    let destination = dir.path().join("BankTest.java");
    let err = generator.save(&mut tree, &destination).unwrap_err();
    assert!(matches!(err, GenerationError::Cancelled));
    assert_eq!(generator.state(), RunState::Cancelled);
    assert!(!destination.exists());
}

#[test]
fn threat_net_trees_never_use_object_references() {
    let index = bank_index();
    let options = GenerationOptions::for_language(TargetLanguage::Java);
    let tree = ExecutionTree::with_kind(
        mbt_tree::TreeKind::ThreatNet,
        Arc::new(Transition::constructor("new")),
        Marking::new(),
    );
    let generator = CodeGenerator::new(&index, &options);
    assert_eq!(generator.variant_for(&tree), GeneratorVariant::ObjectOrientedSystem);
}

#[test]
fn bundle_drives_a_keyword_suite() {
    let json = r#"{
        "model": {
            "system_name": "Shop",
            "actions": [{"pattern": "add(I)", "operator": "Add Item  I"}],
            "transitions": [{"name": "add", "parameters": ["I"]}, {"name": "checkout"}]
        },
        "tree": {
            "children": [{
                "event": "add",
                "substitution": {"I": "apple"},
                "children": [{"event": "checkout"}]
            }]
        },
        "options": {"language": "kbt", "include_sequence_indices": false}
    }"#;
    let (index, mut tree, options) = ModelBundle::from_json(json).unwrap().into_parts().unwrap();
    let options = options.unwrap();
    let suite = CodeGenerator::new(&index, &options).generate(&mut tree, "shop").unwrap();

    assert_eq!(
        suite.file("shop.txt").unwrap().contents,
        "# Test code generated by mbt\n\n*** Test 1 ***\nAdd Item  apple\ncheckout\n"
    );
}

#[test]
fn regenerating_a_tree_for_another_language_renders_fresh_code() {
    let index = bank_index();
    let mut tree = bank_tree(&index);

    let java = GenerationOptions::for_language(TargetLanguage::Java).with_eager(true);
    let mut generator = CodeGenerator::new(&index, &java);
    let suite = generator.generate(&mut tree, "BankTest").unwrap();
    assert!(suite.files()[0].contents.contains("catch (Exception e)"));

    let python = GenerationOptions::for_language(TargetLanguage::Python)
        .with_object_reference(false)
        .with_eager(true);
    let mut generator = CodeGenerator::new(&index, &python);
    let suite = generator.generate(&mut tree, "BankTest").unwrap();
    let contents = &suite.file("BankTest.py").unwrap().contents;

    assert!(contents.contains("        self.assertTrue(getBalance(acc1)==100, \"1_2\")"));
    assert!(contents.contains("\n        login()"));
    assert!(contents.contains("with self.assertRaises(Exception):"));
    assert!(!contents.contains("\t\tlogin();"));
    assert!(!contents.contains("catch (Exception e)"));
    assert!(!contents.contains("assertTrue(\"1_2\""));
}
