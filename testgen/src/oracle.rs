//! Oracle code: assertions over postconditions, markings and effects.

use crate::{goal_tags_code, goal_tags_inside, StepRenderer};
use mbt_core::{Predicate, Tuple};
use mbt_registry::MappingKind;
use mbt_tree::TreeNode;

/// How a resolved accessor is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Check {
    /// An assertion that the accessor holds.
    Holds,
    /// An assertion that the accessor no longer holds.
    Negated,
    /// A plain effect statement.
    Effect,
}

impl StepRenderer<'_> {
    /// Oracle code for one node. Hidden events and the constructor yield nothing.
    pub fn oracle_code(&self, node: &TreeNode) -> String {
        if self.is_silent(node.event()) {
            return String::new();
        }
        let options = self.options;
        let transition = node.transition();

        if node.is_negative() {
            return if options.verify_dirty_test_state {
                self.marking_verification_code(node)
            } else {
                String::new()
            };
        }

        let mut code = String::new();
        if options.verify_postconditions {
            code.push_str(&self.condition_verification_code(
                node,
                &transition.postcondition,
                Check::Holds,
            ));
        } else if options.verify_markings {
            code.push_str(&self.marking_verification_code(node));
        }
        if self.variant.is_object_oriented() && options.verify_negated_conditions {
            code.push_str(&self.condition_verification_code(
                node,
                &transition.delete_precondition,
                Check::Negated,
            ));
        }
        if options.verify_effects {
            code.push_str(&self.condition_verification_code(
                node,
                &transition.effect,
                Check::Effect,
            ));
        }
        if !self.index.goal_properties().is_empty() && options.tags_inline() {
            let reached = goal_tags_inside(self.index.goal_properties(), node.marking());
            code.push_str(&goal_tags_code(&reached, options, &self.ctx));
        }
        code
    }

    /// Assert every tuple of every visible place in the node's marking.
    fn marking_verification_code(&self, node: &TreeNode) -> String {
        let marking = node.marking();
        let mut code = String::new();
        for place in self.index.places() {
            if self.index.is_hidden(place) || !marking.has_tuples(place) {
                continue;
            }
            for tuple in marking.tuples(place) {
                self.push_check(&mut code, node.test_case_id(), place, tuple, Check::Holds);
            }
        }
        code
    }

    /// Instantiate each visible predicate under the node's substitution and check it.
    fn condition_verification_code(
        &self,
        node: &TreeNode,
        conditions: &[Predicate],
        check: Check,
    ) -> String {
        let Some(substitution) = node.substitution() else {
            return String::new();
        };
        let mut code = String::new();
        for predicate in conditions.iter().filter(|p| !self.index.is_hidden(p.name())) {
            let tuple = substitution.substitute(predicate);
            self.push_check(&mut code, node.test_case_id(), predicate.name(), &tuple, check);
        }
        code
    }

    fn push_check(
        &self,
        code: &mut String,
        test_id: &str,
        place: &str,
        tuple: &Tuple,
        check: Check,
    ) {
        let line = self.predicate_accessor_code(test_id, place, tuple, check);
        if !line.is_empty() {
            code.push('\n');
            code.push_str(&line);
        }
    }

    /// Resolve a place tuple through the accessor mappings and shape it.
    fn predicate_accessor_code(
        &self,
        test_id: &str,
        place: &str,
        tuple: &Tuple,
        check: Check,
    ) -> String {
        let accessor = self.index.resolve(MappingKind::Accessor, place, tuple).into_code();
        let hooks = self.hooks();
        let language = self.language();

        if hooks.raw_predicates {
            return format!("{}{}", self.ctx.tab(), accessor);
        }
        let assert = hooks.assert_predicate;
        match check {
            Check::Holds => assert(language, &self.ctx, test_id, &accessor, false),
            Check::Negated => assert(language, &self.ctx, test_id, &accessor, true),
            Check::Effect => (hooks.normalize_effect)(language, &self.ctx, &accessor),
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{GenerationOptions, RenderContext, StepRenderer, TagPlacement, TargetLanguage};
    use mbt_core::{GoalProperty, Marking, Predicate, Substitution, Transition, Tuple};
    use mbt_registry::{ModelIndex, ModelIndexBuilder};
    use mbt_tree::{ExecutionTree, NodeId, NodeSpec};
    use pretty_assertions::assert_eq;
    use std::sync::Arc;

    fn pred(text: &str) -> Predicate {
        Predicate::parse(text).unwrap()
    }

    fn bank() -> ModelIndex {
        let mut builder = ModelIndexBuilder::new("Bank");
        builder
            .place("balance")
            .place("log")
            .hidden("log")
            .accessor("balance(X, Y)", "getBalance(X)==Y")
            .accessor("open(X)", "isOpen(X)")
            .goal(GoalProperty::new("goalReachLimit", vec![pred("balance(A, 0)")]))
            .transition(
                Transition::new("withdraw")
                    .with_parameters(["A"])
                    .with_postcondition(vec![pred("balance(A, 0)"), pred("log(A)")])
                    .with_delete_precondition(vec![pred("balance(A, 100)")])
                    .with_effect(vec![pred("open(A)")]),
            );
        builder.build().unwrap()
    }

    fn withdraw_node(index: &ModelIndex, negative: bool) -> (ExecutionTree, NodeId) {
        let mut tree = ExecutionTree::new(Arc::new(Transition::constructor("new")), Marking::new());
        let marking = Marking::new()
            .with("balance", Tuple::new(["acc1", "0"]))
            .with("log", Tuple::new(["acc1"]));
        let spec = NodeSpec::new(index.transition("withdraw").cloned().unwrap())
            .with_substitution(Substitution::with("A", "acc1"))
            .with_marking(marking)
            .with_negative(negative);
        let id = tree.add_child(tree.root(), spec).unwrap();
        (tree, id)
    }

    fn oracle(options: &GenerationOptions, negative: bool) -> String {
        let index = bank();
        let (tree, id) = withdraw_node(&index, negative);
        let variant =
            crate::select_variant(options.language, options.create_object_reference, tree.kind());
        let ctx = RenderContext::for_language(options.language);
        let renderer = StepRenderer::new(&index, options, variant, ctx);
        renderer.oracle_code(tree.node(id))
    }

    #[test]
    fn test_postconditions_skip_hidden_places() {
        let options = GenerationOptions::for_language(TargetLanguage::Java);
        assert_eq!(oracle(&options, false), "\n\t\tassertTrue(\"1\", getBalance(acc1)==0);");
    }

    #[test]
    fn test_marking_fallback_when_postconditions_are_off() {
        let options = GenerationOptions::for_language(TargetLanguage::CSharp)
            .with_postconditions(false)
            .with_markings(true);
        assert_eq!(oracle(&options, false), "\n\t\tAssert.IsTrue(getBalance(acc1)==0, \"1\");");
    }

    #[test]
    fn test_negated_conditions_and_effects() {
        let options = GenerationOptions::thorough(TargetLanguage::Java);
        assert_eq!(
            oracle(&options, false),
            "\n\t\tassertTrue(\"1\", getBalance(acc1)==0);\
             \n\t\tassertFalse(\"1\", getBalance(acc1)==100);\
             \n\t\tisOpen(acc1);"
        );
    }

    #[test]
    fn test_c_ignores_negated_conditions_and_effects() {
        let options = GenerationOptions::thorough(TargetLanguage::C);
        assert_eq!(oracle(&options, false), "\n\tassert(getBalance(acc1)==0);");
    }

    #[test]
    fn test_html_renders_raw_accessors() {
        let options = GenerationOptions::for_language(TargetLanguage::Html).with_effects(true);
        assert_eq!(oracle(&options, false), "\ngetBalance(acc1)==0\nisOpen(acc1)");
    }

    #[test]
    fn test_dirty_step_verifies_marking() {
        let options = GenerationOptions::for_language(TargetLanguage::Java);
        assert_eq!(oracle(&options, true), "\n\t\tassertTrue(\"1\", getBalance(acc1)==0);");

        let quiet = options.with_dirty_test_state(false);
        assert_eq!(oracle(&quiet, true), "");
    }

    #[test]
    fn test_inline_goal_tags() {
        let options = GenerationOptions::for_language(TargetLanguage::Java)
            .with_postconditions(false)
            .with_goal_tags("// reached: [NAME]", TagPlacement::Inline);
        assert_eq!(oracle(&options, false), "\n\t\t// reached: goalReachLimit");

        let at_start = options.with_goal_tags("// reached: [NAME]", TagPlacement::AtStart);
        assert_eq!(oracle(&at_start, false), "");
    }
}
