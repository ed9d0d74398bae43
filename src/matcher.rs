//! Matcher — walks the pattern index over every URL suffix
//!
//! Grounded on `ContentBlockingAdBlockResolver::checkUrl` / `checkUrlSubstring`.
//! The outer suffix loop gives "contains" semantics; `walk` reproduces the
//! inner per-node traversal including its child-iteration order, which
//! matters: a literal match breaks out of the children loop, so a `*` child
//! placed after the matching literal child in insertion order is skipped for
//! that step, exactly as in the source.

use crate::evaluator::{self, is_separator, MatchContext};
use crate::index::{Node, PatternIndex, SEPARATOR, WILDCARD};
use crate::rule::{CosmeticOverride, Decision, Rule, ResourceType};
use crate::url::Url;

enum WalkOutcome {
    None,
    Block(Rule),
    Except(Rule, Option<CosmeticOverride>),
}

/// Checks a single request against the index and returns the final decision.
pub fn check(index: &PatternIndex, base_url: &Url, request_url: &Url, resource_type: ResourceType) -> Decision {
    let full_owned;
    let full_url: &str = match request_url.as_str().strip_prefix("//") {
        Some(stripped) => {
            full_owned = stripped.to_string();
            &full_owned
        }
        None => request_url.as_str(),
    };

    let ctx = MatchContext {
        full_url,
        host: request_url.host(),
        base_host: base_url.host(),
        resource_type,
    };

    let mut best_block: Option<Rule> = None;
    let offsets: Vec<usize> = full_url.char_indices().map(|(i, _)| i).collect();

    for &start in &offsets {
        match walk(index.root(), &full_url[start..], String::new(), &ctx) {
            WalkOutcome::Except(rule, cosmetic_override) => return Decision::Except(rule, cosmetic_override),
            WalkOutcome::Block(rule) => best_block = Some(rule),
            WalkOutcome::None => {}
        }
    }

    match best_block {
        Some(rule) => Decision::Block(rule),
        None => Decision::Ignore,
    }
}

fn walk(mut node: &Node, input: &str, mut current_rule: String, ctx: &MatchContext) -> WalkOutcome {
    let mut best: Option<Rule> = None;
    let positions: Vec<(usize, char)> = input.char_indices().collect();

    for idx in 0..positions.len() {
        if let Some(outcome) = evaluate_node_rules(node, &current_rule, ctx, &mut best) {
            return outcome;
        }

        let tree_char = positions[idx].1;
        let remaining = &input[positions[idx].0..];
        let mut children_exists = false;

        for child in node.children() {
            if child.value() == WILDCARD {
                let splits: Vec<usize> = remaining.char_indices().map(|(i, _)| i).collect();
                for &split in &splits {
                    let sub = &remaining[split..];
                    let prefix = &remaining[..split];
                    if let Some(outcome) = recurse(child, sub, format!("{current_rule}{prefix}"), ctx, &mut best) {
                        return outcome;
                    }
                }
            }

            if child.value() == SEPARATOR && is_separator(tree_char) {
                if let Some(outcome) = recurse(child, remaining, current_rule.clone(), ctx, &mut best) {
                    return outcome;
                }
            }

            if child.value() == tree_char {
                node = child;
                children_exists = true;
                break;
            }
        }

        if !children_exists {
            return finish(best);
        }

        current_rule.push(tree_char);
    }

    if let Some(outcome) = evaluate_node_rules(node, &current_rule, ctx, &mut best) {
        return outcome;
    }

    finish(best)
}

fn evaluate_node_rules(node: &Node, current_rule: &str, ctx: &MatchContext, best: &mut Option<Rule>) -> Option<WalkOutcome> {
    for rule in node.rules() {
        match evaluator::evaluate(rule, current_rule, ctx) {
            Decision::Except(rule, cosmetic_override) => return Some(WalkOutcome::Except(rule, cosmetic_override)),
            Decision::Block(rule) => *best = Some(rule),
            Decision::Ignore => {}
        }
    }
    None
}

fn recurse(child: &Node, input: &str, current_rule: String, ctx: &MatchContext, best: &mut Option<Rule>) -> Option<WalkOutcome> {
    match walk(child, input, current_rule, ctx) {
        WalkOutcome::Except(rule, cosmetic_override) => Some(WalkOutcome::Except(rule, cosmetic_override)),
        WalkOutcome::Block(rule) => {
            *best = Some(rule);
            None
        }
        WalkOutcome::None => None,
    }
}

fn finish(best: Option<Rule>) -> WalkOutcome {
    match best {
        Some(rule) => WalkOutcome::Block(rule),
        None => WalkOutcome::None,
    }
}
