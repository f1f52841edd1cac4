//! Goal-tag tracking.
//!
//! Goal properties are marking conditions; a test is tagged with the goals
//! its path reaches. Tags are rendered either once at the start of a test
//! or after each node, depending on [`TagPlacement`](crate::TagPlacement).

use crate::{GenerationOptions, RenderContext};
use mbt_core::{GoalProperty, Marking};
use mbt_registry::DEFAULT_GOAL_TAG;
use mbt_tree::{ExecutionTree, NodeId};

/// Placeholder replaced by the names joined with the configured separator.
const NAME_PLACEHOLDER: &str = "[NAME]";
/// Placeholder replaced by the names joined with `", "`.
const NAME_LIST_PLACEHOLDER: &str = "[NAME,]";

/// Goals reached somewhere along `path`, in declaration order.
///
/// Each goal is removed from the pending set the first time a node's
/// marking satisfies it; the scan stops once nothing is pending.
pub fn goal_tags_at_start<'a>(
    goals: &'a [GoalProperty],
    tree: &ExecutionTree,
    path: &[NodeId],
) -> Vec<&'a str> {
    let mut pending: Vec<usize> = (0..goals.len()).collect();
    let mut reached = vec![false; goals.len()];
    for id in path {
        if pending.is_empty() {
            break;
        }
        let marking = tree.node(*id).marking();
        pending.retain(|&i| {
            let firable = marking.is_firable(&goals[i]);
            reached[i] |= firable;
            !firable
        });
    }
    goals
        .iter()
        .zip(reached)
        .filter(|(_, hit)| *hit)
        .map(|(goal, _)| goal.name())
        .collect()
}

/// Non-default goals firable in a single node's marking.
pub fn goal_tags_inside<'a>(goals: &'a [GoalProperty], marking: &Marking) -> Vec<&'a str> {
    goals
        .iter()
        .filter(|goal| goal.name() != DEFAULT_GOAL_TAG && marking.is_firable(goal))
        .map(GoalProperty::name)
        .collect()
}

/// Render the tag template for a list of goal names.
///
/// Returns an empty string when there are no names or no template.
pub fn goal_tags_code(names: &[&str], options: &GenerationOptions, ctx: &RenderContext) -> String {
    if names.is_empty() || options.tag_template.is_empty() {
        return String::new();
    }
    let template = format!("\n{}", options.tag_template);
    let rendered = if template.contains(NAME_PLACEHOLDER) {
        template.replace(NAME_PLACEHOLDER, &names.join(options.tag_name_separator.as_str()))
    } else {
        template.replace(NAME_LIST_PLACEHOLDER, &names.join(", "))
    };
    ctx.reindent(&rendered)
}
