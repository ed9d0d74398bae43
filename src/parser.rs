//! Rule Parser — tokenizes one filter-list line
//!
//! Grounded on `ContentBlockingAdBlockResolver::parseRuleLine` /
//! `parseStyleSheetRule` in the original engine. Line classification and
//! option tokenization follow that function's precedence exactly.

use crate::config::{CosmeticFiltersMode, EngineConfig};
use crate::rule::{Anchor, Rule, RuleOptions};

/// The classified result of parsing one filter-list line.
pub enum ParsedLine {
    /// Comment, metadata, or a rule rejected for any reason (unsupported
    /// option, disabled wildcard, cosmetic rule suppressed by config). Dropped silently.
    Dropped,
    /// A network (blocking/exception) rule.
    Network(Rule),
    /// `##selector` with no domain scoping.
    CosmeticGeneric(String),
    /// `domain1,domain2##selector`.
    CosmeticBlacklist(Vec<String>, String),
    /// `domain1,domain2#@#selector`.
    CosmeticWhitelist(Vec<String>, String),
}

/// Parses one line of filter-list text under the given configuration.
pub fn parse_line(line: &str, config: &EngineConfig) -> ParsedLine {
    if line.is_empty() || line.starts_with('!') {
        return ParsedLine::Dropped;
    }

    if let Some(selector) = line.strip_prefix("##") {
        return if config.cosmetic_filters_mode == CosmeticFiltersMode::AllFilters {
            ParsedLine::CosmeticGeneric(selector.to_string())
        } else {
            ParsedLine::Dropped
        };
    }

    if line.contains("##") {
        return if config.cosmetic_filters_mode != CosmeticFiltersMode::NoFilters {
            let (domains, selector) = split_cosmetic_rule(line, "##");
            ParsedLine::CosmeticBlacklist(domains, selector)
        } else {
            ParsedLine::Dropped
        };
    }

    if line.contains("#@#") {
        return if config.cosmetic_filters_mode != CosmeticFiltersMode::NoFilters {
            let (domains, selector) = split_cosmetic_rule(line, "#@#");
            ParsedLine::CosmeticWhitelist(domains, selector)
        } else {
            ParsedLine::Dropped
        };
    }

    match parse_network_rule(line, config) {
        Some(rule) => ParsedLine::Network(rule),
        None => ParsedLine::Dropped,
    }
}

fn split_cosmetic_rule(line: &str, separator: &str) -> (Vec<String>, String) {
    let mut parts = line.splitn(2, separator);
    let domains_part = parts.next().unwrap_or("");
    let selector = parts.next().unwrap_or("").to_string();
    let domains = if domains_part.is_empty() {
        Vec::new()
    } else {
        domains_part.split(',').map(str::to_string).collect()
    };
    (domains, selector)
}

fn parse_network_rule(raw_text: &str, config: &EngineConfig) -> Option<Rule> {
    let (mut pattern, options_str) = match raw_text.find('$') {
        Some(pos) => (&raw_text[..pos], Some(&raw_text[pos + 1..])),
        None => (raw_text, None),
    };

    // A pattern of only `*` strips down to empty and is kept as a match-any
    // rule at the index root, not dropped.
    let is_wildcard_only = !pattern.is_empty() && pattern.chars().all(|c| c == '*');
    if is_wildcard_only && !config.wildcards_enabled {
        return None;
    }

    if let Some(stripped) = pattern.strip_suffix('*') {
        pattern = stripped;
    }
    if let Some(stripped) = pattern.strip_prefix('*') {
        pattern = stripped;
    }

    if !config.wildcards_enabled && pattern.contains('*') {
        return None;
    }

    let mut is_exception = false;
    let mut is_domain_anchored = false;
    let mut anchor = Anchor::Contains;

    if let Some(stripped) = pattern.strip_prefix("@@") {
        pattern = stripped;
        is_exception = true;
    }
    if let Some(stripped) = pattern.strip_prefix("||") {
        pattern = stripped;
        is_domain_anchored = true;
    }
    if let Some(stripped) = pattern.strip_prefix('|') {
        pattern = stripped;
        anchor = Anchor::StartAnchored;
    }
    if let Some(stripped) = pattern.strip_suffix('|') {
        pattern = stripped;
        anchor = if anchor == Anchor::StartAnchored {
            Anchor::ExactAnchored
        } else {
            Anchor::EndAnchored
        };
    }

    let mut options = RuleOptions::empty();
    let mut blocked_domains = Vec::new();
    let mut allowed_domains = Vec::new();

    if let Some(options_str) = options_str {
        for option in options_str.split(',') {
            let option = option.trim();
            if option.is_empty() {
                continue;
            }

            let is_negated = option.starts_with('~');
            let option_name = if is_negated { &option[1..] } else { option };

            if option_name.starts_with("domain") {
                let domains_str = match option.find('=') {
                    Some(eq) => &option[eq + 1..],
                    None => return None,
                };
                for entry in domains_str.split('|').filter(|e| !e.is_empty()) {
                    if let Some(excluded) = entry.strip_prefix('~') {
                        allowed_domains.push(excluded.to_string());
                    } else {
                        blocked_domains.push(entry.to_string());
                    }
                }
                continue;
            }

            let (inclusion, exception) = known_option(option_name)?;

            let is_hide_option = inclusion == RuleOptions::ELEMENT_HIDE || inclusion == RuleOptions::GENERIC_HIDE;
            if is_hide_option {
                if !is_exception || is_negated {
                    continue;
                }
                options |= inclusion;
                continue;
            }

            if !is_negated {
                options |= inclusion;
            } else if inclusion != RuleOptions::WEB_SOCKET {
                options |= exception;
            }
            // negated websocket: silently ignored, matches source.
        }
    }

    if pattern.is_empty() && !is_wildcard_only {
        return None;
    }

    Some(Rule {
        pattern: pattern.to_string(),
        anchor,
        is_domain_anchored,
        is_exception,
        options,
        blocked_domains,
        allowed_domains,
        raw_text: raw_text.to_string(),
    })
}

/// Maps a recognized option keyword to its (inclusion, exception) bit pair.
/// `ElementHide`/`GenericHide`/`WebSocket` return an empty exception bit —
/// callers must special-case them, matching the source's `supportsException` logic.
fn known_option(name: &str) -> Option<(RuleOptions, RuleOptions)> {
    use RuleOptions as O;
    Some(match name {
        "third-party" => (O::THIRD_PARTY, O::THIRD_PARTY_EXCEPTION),
        "stylesheet" => (O::STYLE_SHEET, O::STYLE_SHEET_EXCEPTION),
        "image" => (O::IMAGE, O::IMAGE_EXCEPTION),
        "script" => (O::SCRIPT, O::SCRIPT_EXCEPTION),
        "object" => (O::OBJECT, O::OBJECT_EXCEPTION),
        "object-subrequest" | "object_subrequest" => (O::OBJECT_SUBREQUEST, O::OBJECT_SUBREQUEST_EXCEPTION),
        "subdocument" => (O::SUB_DOCUMENT, O::SUB_DOCUMENT_EXCEPTION),
        "xmlhttprequest" => (O::XML_HTTP_REQUEST, O::XML_HTTP_REQUEST_EXCEPTION),
        "websocket" => (O::WEB_SOCKET, O::empty()),
        "elemhide" => (O::ELEMENT_HIDE, O::empty()),
        "generichide" => (O::GENERIC_HIDE, O::empty()),
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_config() -> EngineConfig {
        EngineConfig::default()
    }

    #[test]
    fn drops_comments_and_empty_lines() {
        assert!(matches!(parse_line("", &default_config()), ParsedLine::Dropped));
        assert!(matches!(parse_line("! a comment", &default_config()), ParsedLine::Dropped));
    }

    #[test]
    fn parses_generic_cosmetic_rule() {
        match parse_line("##.ad-banner", &default_config()) {
            ParsedLine::CosmeticGeneric(sel) => assert_eq!(sel, ".ad-banner"),
            _ => panic!("expected generic cosmetic rule"),
        }
    }

    #[test]
    fn generic_cosmetic_dropped_outside_all_filters_mode() {
        let mut config = default_config();
        config.cosmetic_filters_mode = CosmeticFiltersMode::DomainOnlyFilters;
        assert!(matches!(parse_line("##.ad-banner", &config), ParsedLine::Dropped));
    }

    #[test]
    fn parses_domain_scoped_blacklist_rule() {
        match parse_line("example.test,other.test##.sponsored", &default_config()) {
            ParsedLine::CosmeticBlacklist(domains, sel) => {
                assert_eq!(domains, vec!["example.test", "other.test"]);
                assert_eq!(sel, ".sponsored");
            }
            _ => panic!("expected blacklist cosmetic rule"),
        }
    }

    #[test]
    fn parses_domain_scoped_whitelist_rule() {
        match parse_line("example.test#@#.sponsored", &default_config()) {
            ParsedLine::CosmeticWhitelist(domains, sel) => {
                assert_eq!(domains, vec!["example.test"]);
                assert_eq!(sel, ".sponsored");
            }
            _ => panic!("expected whitelist cosmetic rule"),
        }
    }

    #[test]
    fn parses_simple_network_rule() {
        match parse_line("/ads/*", &default_config()) {
            ParsedLine::Network(rule) => {
                assert_eq!(rule.pattern, "/ads/");
                assert_eq!(rule.anchor, Anchor::Contains);
            }
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn parses_domain_anchored_exception_rule() {
        match parse_line("@@||trackers.example^$image", &default_config()) {
            ParsedLine::Network(rule) => {
                assert!(rule.is_exception);
                assert!(rule.is_domain_anchored);
                assert_eq!(rule.pattern, "trackers.example^");
                assert!(rule.options.contains(RuleOptions::IMAGE));
            }
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn parses_start_and_exact_anchors() {
        match parse_line("|http://example.com|", &default_config()) {
            ParsedLine::Network(rule) => assert_eq!(rule.anchor, Anchor::ExactAnchored),
            _ => panic!("expected network rule"),
        }
        match parse_line("|http://example.com/x", &default_config()) {
            ParsedLine::Network(rule) => assert_eq!(rule.anchor, Anchor::StartAnchored),
            _ => panic!("expected network rule"),
        }
        match parse_line("example.com/x|", &default_config()) {
            ParsedLine::Network(rule) => assert_eq!(rule.anchor, Anchor::EndAnchored),
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn parses_domain_option_into_blocked_and_allowed() {
        match parse_line("banner$domain=foo.test|~bar.foo.test", &default_config()) {
            ParsedLine::Network(rule) => {
                assert_eq!(rule.blocked_domains, vec!["foo.test"]);
                assert_eq!(rule.allowed_domains, vec!["bar.foo.test"]);
            }
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn elemhide_option_ignored_on_blocking_rule() {
        match parse_line("||example.com^$elemhide", &default_config()) {
            ParsedLine::Network(rule) => assert!(!rule.options.contains(RuleOptions::ELEMENT_HIDE)),
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn elemhide_option_accepted_on_exception_rule() {
        match parse_line("@@||example.com^$elemhide", &default_config()) {
            ParsedLine::Network(rule) => assert!(rule.options.contains(RuleOptions::ELEMENT_HIDE)),
            _ => panic!("expected network rule"),
        }
    }

    #[test]
    fn negated_websocket_is_silently_ignored_not_rejected() {
        match parse_line("banner$~websocket", &default_config()) {
            ParsedLine::Network(rule) => assert!(!rule.options.contains(RuleOptions::WEB_SOCKET)),
            _ => panic!("expected network rule, option should be ignored not cause rejection"),
        }
    }

    #[test]
    fn unknown_option_drops_the_rule() {
        assert!(matches!(
            parse_line("banner$bogus-option", &default_config()),
            ParsedLine::Dropped
        ));
    }

    #[test]
    fn disabled_wildcards_drop_rules_containing_a_star() {
        let mut config = default_config();
        config.wildcards_enabled = false;
        assert!(matches!(parse_line("/ad*banner/", &config), ParsedLine::Dropped));
    }

    #[test]
    fn empty_pattern_with_no_wildcards_is_dropped() {
        assert!(matches!(parse_line("$image", &default_config()), ParsedLine::Dropped));
    }

    #[test]
    fn wildcard_only_pattern_degenerates_to_a_match_any_rule() {
        match parse_line("*", &default_config()) {
            ParsedLine::Network(rule) => {
                assert_eq!(rule.pattern, "");
                assert_eq!(rule.anchor, Anchor::Contains);
            }
            _ => panic!("expected a match-any network rule"),
        }
        match parse_line("**", &default_config()) {
            ParsedLine::Network(rule) => assert_eq!(rule.pattern, ""),
            _ => panic!("expected a match-any network rule"),
        }
    }

    #[test]
    fn wildcard_only_pattern_is_dropped_when_wildcards_disabled() {
        let mut config = default_config();
        config.wildcards_enabled = false;
        assert!(matches!(parse_line("*", &config), ParsedLine::Dropped));
    }
}
