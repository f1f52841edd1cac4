//! Input code: option setup, user statements and the input action.

use crate::{GeneratorVariant, StepRenderer, TargetLanguage};
use mbt_core::{Substitution, Tuple};
use mbt_registry::{default_call, MappingKind};
use mbt_tree::TreeNode;
use tracing::trace;

impl StepRenderer<'_> {
    /// Input code for one node. Hidden events and the constructor yield nothing.
    pub fn input_code(&self, node: &TreeNode) -> String {
        if self.is_silent(node.event()) {
            return String::new();
        }
        let hooks = self.hooks();
        let language = self.language();

        let mut code = self.option_setup_code(node);
        for statement in &node.parameter_table().statements {
            code.push_str(&self.ctx.line(statement));
        }
        let action = self.input_action_expression(node);
        code.push_str(&(hooks.format_input_action)(language, &self.ctx, &action));

        if node.is_negative() && self.options.expect_exceptions_for_dirty_tests {
            code = (hooks.wrap_exception)(language, &self.ctx, node.test_case_id(), code);
        }
        code
    }

    /// The call expression for a node's event, before statement formatting.
    ///
    /// Parameters come from the first available source: values entered on
    /// the node, specification parameters declared for the event, the
    /// firing substitution, and finally none at all.
    pub fn input_action_expression(&self, node: &TreeNode) -> String {
        let event = node.event();
        let table = node.parameter_table();

        let code = if self.options.prefer_gui_parameters && table.has_parameters() {
            trace!(event, "input action from node parameters");
            self.action_with_parameters(event, &table.parameters)
        } else if let Some(parameters) = self.index.specification_parameters(event) {
            trace!(event, "input action from specification parameters");
            self.action_with_specification_parameters(event, parameters)
        } else if self.options.derive_parameters_from_trace {
            self.action_from_firing(node)
        } else {
            self.action_without_parameters(event)
        };

        if self.variant == GeneratorVariant::ObjectOriented
            && self.options.generate_reference_for_method_call
        {
            self.qualify(code)
        } else {
            code
        }
    }

    // ==================== Parameter Tiers ====================

    /// Implementation-level parameters unified against the event's parametric action.
    fn action_with_parameters(&self, event: &str, parameters: &[String]) -> String {
        let Some(mapping) = self.index.parametric(MappingKind::Action, event) else {
            return default_call(event, parameters);
        };
        match mapping.pattern.unify(&Tuple::new(parameters.iter().cloned())) {
            Ok(substitution) => substitution.substitute_text(mapping.operator()),
            Err(err) => {
                trace!(event, %err, "node parameters do not fit the action mapping");
                if self.language() == TargetLanguage::Html {
                    mapping.operator().to_string()
                } else {
                    default_call(mapping.operator(), parameters)
                }
            }
        }
    }

    /// Specification parameters mapped to objects, then an exact lookup.
    fn action_with_specification_parameters(&self, event: &str, parameters: &[String]) -> String {
        let resolved: Vec<String> = parameters
            .iter()
            .map(|parameter| self.index.object_for(parameter).unwrap_or(parameter).to_string())
            .collect();
        match self.index.exact(MappingKind::Action, event, &Tuple::new(resolved.iter().cloned())) {
            Some(mapping) => mapping.operator().to_string(),
            None => self.action_with_parameters(event, &resolved),
        }
    }

    /// Actual parameters taken from the substitution the node fired with.
    fn action_from_firing(&self, node: &TreeNode) -> String {
        match node.substitution() {
            Some(substitution) if substitution.has_bindings() => {
                let actual = self.actual_parameters(node, substitution);
                self.index
                    .resolve(MappingKind::Action, node.event(), &actual)
                    .into_code()
            }
            _ => self.action_without_parameters(node.event()),
        }
    }

    fn actual_parameters(&self, node: &TreeNode, substitution: &Substitution) -> Tuple {
        Tuple::new(node.transition().formal_parameters().into_iter().map(|variable| {
            match substitution.binding(&variable) {
                Some(value) => self.index.object_for(value).unwrap_or(value).to_string(),
                None => variable,
            }
        }))
    }

    fn action_without_parameters(&self, event: &str) -> String {
        let action = self
            .index
            .exact(MappingKind::Action, event, &Tuple::empty())
            .map(|mapping| mapping.operator().trim().to_string())
            .unwrap_or_else(|| event.to_string());

        let ends_statement = |text: &str| text.ends_with([')', ';', '}']);
        if self.language().is_object_oriented() && !ends_statement(&action) {
            format!("{action}()")
        } else {
            action
        }
    }

    /// Prefix the system's object reference unless already present.
    fn qualify(&self, code: String) -> String {
        let reference = self.language().object_reference(self.index.system_name());
        if code.starts_with(&reference) {
            code
        } else {
            format!("{reference}{code}")
        }
    }

    // ==================== Option Setup ====================

    /// Mutator code initializing the option places in the precondition.
    pub fn option_setup_code(&self, node: &TreeNode) -> String {
        let Some(precondition) = &node.transition().precondition else {
            return String::new();
        };
        let empty = Substitution::new();
        let substitution = node.substitution().unwrap_or(&empty);
        let hooks = self.hooks();

        let mut code = String::new();
        for predicate in precondition.iter().filter(|p| self.index.is_option(p.name())) {
            let tuple = substitution.substitute(predicate);
            let setup = self
                .index
                .resolve(MappingKind::Mutator, predicate.name(), &tuple)
                .into_code();
            code.push_str(&self.ctx.line(&(hooks.normalize_setup)(self.language(), &setup)));
        }
        code
    }
}
