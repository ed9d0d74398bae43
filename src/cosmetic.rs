//! Cosmetic-filter (element-hide) store
//!
//! Grounded on `m_styleSheet` / `m_styleSheetBlackList` / `m_styleSheetWhiteList`
//! in the original resolver: a flat list of generic selectors plus two
//! domain-keyed multimaps, populated by the parser and consulted per page.

use std::collections::HashMap;

/// Domain-keyed multimaps of CSS selector strings plus the generic list.
///
/// The store does no network logic and no subdomain expansion: callers
/// query by the exact domain string(s) they care about.
#[derive(Debug, Default, Clone)]
pub struct CosmeticStore {
    generic: Vec<String>,
    blacklist: HashMap<String, Vec<String>>,
    whitelist: HashMap<String, Vec<String>>,
}

impl CosmeticStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a selector with no domain scoping (`##selector`).
    pub fn add_generic(&mut self, selector: impl Into<String>) {
        self.generic.push(selector.into());
    }

    /// Appends a domain-scoped blacklist selector (`domain##selector`).
    pub fn add_blacklist(&mut self, domain: impl Into<String>, selector: impl Into<String>) {
        self.blacklist.entry(domain.into()).or_default().push(selector.into());
    }

    /// Appends a domain-scoped whitelist selector (`domain#@#selector`).
    pub fn add_whitelist(&mut self, domain: impl Into<String>, selector: impl Into<String>) {
        self.whitelist.entry(domain.into()).or_default().push(selector.into());
    }

    /// Selectors that apply regardless of domain.
    pub fn selectors_always_on(&self) -> &[String] {
        &self.generic
    }

    /// Blacklist selectors registered for the exact domain string `domain`.
    pub fn selectors_for_domain_blacklist(&self, domain: &str) -> &[String] {
        self.blacklist.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whitelist selectors registered for the exact domain string `domain`.
    pub fn selectors_for_domain_whitelist(&self, domain: &str) -> &[String] {
        self.whitelist.get(domain).map(Vec::as_slice).unwrap_or(&[])
    }
}
