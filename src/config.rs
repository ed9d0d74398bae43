//! Process-wide configuration threaded explicitly through parser and loader
//!
//! The source engine reads these as process-wide globals; here they are an
//! explicit handle so tests can exercise every combination without shared
//! mutable state, and so a config change can be a plain value swap.

/// How aggressively cosmetic (element-hiding) rules are collected and applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum CosmeticFiltersMode {
    /// No cosmetic rules are parsed or applied.
    NoFilters,
    /// Only domain-scoped cosmetic rules are parsed; generic (`##`) rules are dropped.
    DomainOnlyFilters,
    /// All cosmetic rules, generic and domain-scoped, are parsed.
    AllFilters,
}

/// Engine-wide configuration consumed by the parser and loader.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct EngineConfig {
    /// When false, rules containing `*` after anchor stripping are dropped at parse time.
    pub wildcards_enabled: bool,
    /// Governs which cosmetic rules the parser keeps.
    pub cosmetic_filters_mode: CosmeticFiltersMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            wildcards_enabled: true,
            cosmetic_filters_mode: CosmeticFiltersMode::AllFilters,
        }
    }
}
