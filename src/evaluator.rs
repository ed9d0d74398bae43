//! Rule Evaluator — per-candidate-rule accept/reject logic
//!
//! Grounded on `ContentBlockingAdBlockResolver::checkRuleMatch`. The matcher
//! calls `evaluate` once per rule reachable at a trie node; this module owns
//! no state, it is a pure function of the rule and the request context.

use crate::domain::{domain_matches_any, subdomain_list};
use crate::rule::{Anchor, CosmeticOverride, Decision, Rule, ResourceType, ALL_RESOURCE_TYPES};

const DOMAIN_ANCHOR_DELIMITERS: [char; 5] = [':', '?', '&', '/', '='];

/// A character that terminates a `^` separator edge: anything that is not a
/// letter, digit, or one of `_ - . %`.
pub(crate) fn is_separator(c: char) -> bool {
    !(c.is_alphanumeric() || matches!(c, '_' | '-' | '.' | '%'))
}

/// The request-scoped facts the evaluator needs; independent of any single rule.
pub struct MatchContext<'a> {
    pub full_url: &'a str,
    pub host: &'a str,
    pub base_host: &'a str,
    pub resource_type: ResourceType,
}

/// Evaluates `rule` against `current_rule` (the substring accumulated by the
/// trie walk so far) and the request context. Never errors: an unmatched
/// rule simply yields `Decision::Ignore`.
pub fn evaluate(rule: &Rule, current_rule: &str, ctx: &MatchContext) -> Decision {
    if !anchor_holds(rule.anchor, ctx.full_url, current_rule) {
        return Decision::Ignore;
    }

    if rule.is_domain_anchored {
        let prefix_end = current_rule.find(DOMAIN_ANCHOR_DELIMITERS).unwrap_or(current_rule.len());
        let prefix = &current_rule[..prefix_end];
        if !subdomain_list(ctx.host).contains(&prefix) {
            return Decision::Ignore;
        }
    }

    let has_blocked_domains = !rule.blocked_domains.is_empty();
    let has_allowed_domains = !rule.allowed_domains.is_empty();

    let mut is_blocked = if has_blocked_domains {
        domain_matches_any(ctx.base_host, &rule.blocked_domains)
    } else {
        true
    };
    if has_allowed_domains {
        is_blocked = !domain_matches_any(ctx.base_host, &rule.allowed_domains);
    }

    if rule.options.contains(crate::rule::RuleOptions::THIRD_PARTY)
        || rule.options.contains(crate::rule::RuleOptions::THIRD_PARTY_EXCEPTION)
    {
        let is_same_party = ctx.base_host.is_empty() || subdomain_list(ctx.host).contains(&ctx.base_host);
        if is_same_party {
            is_blocked = rule.options.contains(crate::rule::RuleOptions::THIRD_PARTY_EXCEPTION);
        } else if !has_blocked_domains && !has_allowed_domains {
            is_blocked = rule.options.contains(crate::rule::RuleOptions::THIRD_PARTY);
        }
    }

    for &resource_type in ALL_RESOURCE_TYPES {
        let Some((inclusion, exception)) = resource_type.option_bits() else {
            continue;
        };
        let supports_exception = !exception.is_empty();
        let has_inclusion = rule.options.contains(inclusion);
        let has_exception = supports_exception && rule.options.contains(exception);

        if !(has_inclusion || has_exception) {
            continue;
        }

        if ctx.resource_type == resource_type {
            if is_blocked {
                is_blocked = has_inclusion;
            }
        } else if supports_exception && is_blocked {
            is_blocked = has_exception;
        }
    }

    if !is_blocked {
        return Decision::Ignore;
    }

    if rule.is_exception {
        let cosmetic_override = if rule.options.contains(crate::rule::RuleOptions::ELEMENT_HIDE) {
            Some(CosmeticOverride::NoFilters)
        } else if rule.options.contains(crate::rule::RuleOptions::GENERIC_HIDE) {
            Some(CosmeticOverride::DomainOnlyFilters)
        } else {
            None
        };
        return Decision::Except(rule.clone(), cosmetic_override);
    }

    Decision::Block(rule.clone())
}

fn anchor_holds(anchor: Anchor, full_url: &str, current_rule: &str) -> bool {
    match anchor {
        Anchor::StartAnchored => full_url.starts_with(current_rule),
        Anchor::EndAnchored => full_url.ends_with(current_rule),
        Anchor::ExactAnchored => full_url == current_rule,
        Anchor::Contains => full_url.contains(current_rule),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rule::RuleOptions;

    fn rule() -> Rule {
        Rule {
            pattern: String::new(),
            anchor: Anchor::Contains,
            is_domain_anchored: false,
            is_exception: false,
            options: RuleOptions::empty(),
            blocked_domains: Vec::new(),
            allowed_domains: Vec::new(),
            raw_text: "test".to_string(),
        }
    }

    fn ctx<'a>(full_url: &'a str, host: &'a str, base_host: &'a str, resource_type: ResourceType) -> MatchContext<'a> {
        MatchContext {
            full_url,
            host,
            base_host,
            resource_type,
        }
    }

    #[test]
    fn plain_blocking_rule_blocks() {
        let r = rule();
        let decision = evaluate(&r, "/ads/", &ctx("http://cdn.example/ads/banner.gif", "cdn.example", "news.example", ResourceType::Image));
        assert!(decision.is_blocked());
    }

    #[test]
    fn domain_anchor_rejects_when_host_does_not_match() {
        let mut r = rule();
        r.is_domain_anchored = true;
        let decision = evaluate(&r, "other.example", &ctx("http://other.example/x", "cdn.example", "base.example", ResourceType::Other));
        assert!(!decision.is_blocked());
    }

    #[test]
    fn domain_anchor_accepts_subdomain_of_host() {
        let mut r = rule();
        r.is_domain_anchored = true;
        let decision = evaluate(&r, "trackers.example", &ctx("http://a.trackers.example/x", "a.trackers.example", "base.example", ResourceType::Other));
        assert!(decision.is_blocked());
    }

    #[test]
    fn allowed_domain_list_suppresses_block_on_listed_base_host() {
        let mut r = rule();
        r.allowed_domains = vec!["bar.foo.test".to_string()];
        let decision = evaluate(&r, "banner", &ctx("http://cdn/banner", "cdn", "bar.foo.test", ResourceType::Image));
        assert!(!decision.is_blocked());
    }

    #[test]
    fn blocked_domain_list_requires_match_on_base_host() {
        let mut r = rule();
        r.blocked_domains = vec!["foo.test".to_string()];
        let decision = evaluate(&r, "banner", &ctx("http://cdn/banner", "cdn", "other.test", ResourceType::Image));
        assert!(!decision.is_blocked());
    }

    #[test]
    fn third_party_option_ignores_same_party_requests() {
        let mut r = rule();
        r.options = RuleOptions::THIRD_PARTY;
        let decision = evaluate(&r, "ads.example", &ctx("http://ads.example/a.js", "ads.example", "ads.example", ResourceType::Script));
        assert!(!decision.is_blocked());
    }

    #[test]
    fn resource_type_mask_selects_image_only() {
        let mut r = rule();
        r.options = RuleOptions::IMAGE | RuleOptions::SCRIPT_EXCEPTION;

        let as_image = evaluate(&r, "/track", &ctx("http://x/track?id=1", "x", "", ResourceType::Image));
        assert!(as_image.is_blocked());

        let as_script = evaluate(&r, "/track", &ctx("http://x/track?id=1", "x", "", ResourceType::Script));
        assert!(!as_script.is_blocked());
    }

    #[test]
    fn exception_rule_with_elemhide_sets_cosmetic_override() {
        let mut r = rule();
        r.is_exception = true;
        r.options = RuleOptions::ELEMENT_HIDE;
        match evaluate(&r, "", &ctx("http://x/y", "x", "", ResourceType::Other)) {
            Decision::Except(_, Some(CosmeticOverride::NoFilters)) => {}
            other => panic!("expected NoFilters override, got {other:?}"),
        }
    }

    #[test]
    fn exact_anchor_requires_whole_url_equality() {
        let mut r = rule();
        r.anchor = Anchor::ExactAnchored;
        let decision = evaluate(&r, "http://x/y", &ctx("http://x/y/z", "x", "", ResourceType::Other));
        assert!(!decision.is_blocked());
    }
}
