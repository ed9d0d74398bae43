//! Content-filtering match engine for an ad-blocking subsystem
//!
//! Given a network request (base page URL, request URL, resource type), the
//! [`Engine`] decides whether the request should be blocked, explicitly
//! excepted, or ignored, against a ruleset expressed in AdBlock Plus filter
//! syntax. It also serves the cosmetic (element-hide) selector store that
//! shares the same parser.

pub mod config;
pub mod cosmetic;
pub mod domain;
pub mod error;
pub mod evaluator;
pub mod index;
pub mod loader;
pub mod matcher;
pub mod metrics;
pub mod parser;
pub mod rule;
pub mod url;

pub use config::{CosmeticFiltersMode, EngineConfig};
pub use error::EngineError;
pub use loader::LoadStats;
pub use metrics::{MetricsSnapshot, PerformanceMetrics};
pub use rule::{CosmeticOverride, Decision, ResourceType};
pub use url::Url;

use std::io::BufRead;
use std::sync::Arc;

use arc_swap::ArcSwap;

use cosmetic::CosmeticStore;
use index::PatternIndex;
use metrics::PerfTimer;

struct EngineState {
    index: PatternIndex,
    cosmetic: CosmeticStore,
}

/// The result of a [`Engine::check_url`] query.
#[derive(Debug, Clone)]
pub struct CheckResult {
    pub blocked: bool,
    pub exception: bool,
    pub matched_rule_text: Option<String>,
    pub cosmetic_mode_override: Option<CosmeticOverride>,
}

impl CheckResult {
    fn from_decision(decision: Decision) -> Self {
        match decision {
            Decision::Ignore => Self {
                blocked: false,
                exception: false,
                matched_rule_text: None,
                cosmetic_mode_override: None,
            },
            Decision::Block(rule) => Self {
                blocked: true,
                exception: false,
                matched_rule_text: Some(rule.raw_text),
                cosmetic_mode_override: None,
            },
            Decision::Except(rule, cosmetic_mode_override) => Self {
                blocked: false,
                exception: true,
                matched_rule_text: Some(rule.raw_text),
                cosmetic_mode_override,
            },
        }
    }
}

/// Owns the active pattern index and cosmetic store behind a swappable,
/// reference-counted handle, plus the config and metrics threaded through it.
///
/// Readers (`check_url`, the style-sheet queries) clone the `Arc` once per
/// call and are unaffected by a concurrent [`Engine::reload`].
pub struct Engine {
    state: Arc<ArcSwap<EngineState>>,
    config: EngineConfig,
    metrics: PerformanceMetrics,
}

impl Engine {
    /// An engine with no rules loaded; every query returns `Ignore`.
    pub fn empty(config: EngineConfig) -> Self {
        Self {
            state: Arc::new(ArcSwap::from_pointee(EngineState {
                index: PatternIndex::new(),
                cosmetic: CosmeticStore::new(),
            })),
            config,
            metrics: PerformanceMetrics::new(),
        }
    }

    /// Builds an engine by streaming a filter list through the [`loader`].
    pub fn from_filter_list<R: BufRead>(reader: R, config: EngineConfig) -> Result<Self, EngineError> {
        let (index, cosmetic, stats) = loader::load(reader, &config)?;
        let metrics = PerformanceMetrics::new();
        metrics.set_rule_count(index.rule_count());

        log::info!(
            "engine initialized: {} rules, {} cosmetic rules",
            stats.rules_accepted,
            stats.cosmetic_rules
        );

        Ok(Self {
            state: Arc::new(ArcSwap::from_pointee(EngineState { index, cosmetic })),
            config,
            metrics,
        })
    }

    /// Parses a fresh filter list into a new index/store pair and publishes
    /// it atomically. Readers in flight keep using the previous generation
    /// until they finish; it is dropped once the last reference is released.
    pub fn reload<R: BufRead>(&self, reader: R) -> Result<LoadStats, EngineError> {
        let (index, cosmetic, stats) = loader::load(reader, &self.config)?;
        let rule_count = index.rule_count();
        self.state.store(Arc::new(EngineState { index, cosmetic }));
        self.metrics.set_rule_count(rule_count);
        log::debug!("index swapped: {rule_count} rules now active");
        Ok(stats)
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn metrics(&self) -> &PerformanceMetrics {
        &self.metrics
    }

    /// Decides whether `request_url` should be blocked, excepted, or ignored.
    /// Never fails: there is no error path on the query hot path.
    pub fn check_url(&self, base_url: &Url, request_url: &Url, resource_type: ResourceType) -> CheckResult {
        let timer = PerfTimer::start();
        let state = self.state.load();
        let decision = matcher::check(&state.index, base_url, request_url, resource_type);
        self.metrics.record_request(&decision, timer.elapsed());
        CheckResult::from_decision(decision)
    }

    /// Selectors that apply regardless of domain.
    pub fn style_sheet(&self) -> Vec<String> {
        self.state.load().cosmetic.selectors_always_on().to_vec()
    }

    /// Blacklist selectors registered for `domain`.
    pub fn style_sheet_blacklist(&self, domain: &str) -> Vec<String> {
        self.state.load().cosmetic.selectors_for_domain_blacklist(domain).to_vec()
    }

    /// Whitelist selectors registered for `domain`.
    pub fn style_sheet_whitelist(&self, domain: &str) -> Vec<String> {
        self.state.load().cosmetic.selectors_for_domain_whitelist(domain).to_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_list() -> &'static str {
        "[Adblock Plus 2.0]\n/ads/*\n||trackers.example^\n@@||trackers.example^$image\nexample.test##.sponsored\n"
    }

    #[test]
    fn empty_engine_ignores_every_request() {
        let engine = Engine::empty(EngineConfig::default());
        let result = engine.check_url(&Url::parse("http://x"), &Url::parse("http://y/ads/a.gif"), ResourceType::Image);
        assert!(!result.blocked);
        assert!(!result.exception);
    }

    #[test]
    fn engine_built_from_filter_list_blocks_and_excepts() {
        let engine = Engine::from_filter_list(sample_list().as_bytes(), EngineConfig::default()).expect("load");

        let blocked = engine.check_url(
            &Url::parse("http://news.example"),
            &Url::parse("http://cdn.example/ads/a.gif"),
            ResourceType::Image,
        );
        assert!(blocked.blocked);
        assert_eq!(blocked.matched_rule_text.as_deref(), Some("/ads/*"));

        let excepted = engine.check_url(
            &Url::parse("http://x.test"),
            &Url::parse("http://trackers.example/pixel.gif"),
            ResourceType::Image,
        );
        assert!(excepted.exception);
    }

    #[test]
    fn reload_swaps_the_active_index_atomically() {
        let engine = Engine::empty(EngineConfig::default());
        assert!(!engine.check_url(&Url::parse("http://x"), &Url::parse("http://y/ads/a.gif"), ResourceType::Image).blocked);

        engine.reload(sample_list().as_bytes()).expect("reload");

        assert!(engine.check_url(&Url::parse("http://x"), &Url::parse("http://y/ads/a.gif"), ResourceType::Image).blocked);
    }

    #[test]
    fn style_sheet_queries_reflect_loaded_cosmetic_rules() {
        let engine = Engine::from_filter_list(sample_list().as_bytes(), EngineConfig::default()).expect("load");
        assert_eq!(
            engine.style_sheet_blacklist("example.test"),
            vec![".sponsored".to_string()]
        );
        assert!(engine.style_sheet().is_empty());
    }

    #[test]
    fn invalid_header_is_rejected_without_panicking() {
        match Engine::from_filter_list("not a filter list\n".as_bytes(), EngineConfig::default()) {
            Err(EngineError::InvalidHeader) => {}
            other => panic!("expected InvalidHeader, got {}", other.is_ok()),
        }
    }
}
