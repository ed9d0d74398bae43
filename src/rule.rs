//! Network-rule data model
//!
//! Mirrors `AdBlockRule` / `RuleOption` / `RuleMatch` from the original
//! resolver, with the option mask expressed as a `bitflags` type instead of
//! a Qt flag enum.

use bitflags::bitflags;

/// Where in the URL a rule's pattern must match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    /// Pattern may appear anywhere in the URL.
    Contains,
    /// Pattern must be a prefix of the URL.
    StartAnchored,
    /// Pattern must be a suffix of the URL.
    EndAnchored,
    /// Pattern must equal the whole URL.
    ExactAnchored,
}

bitflags! {
    /// Resource-type / third-party option mask.
    ///
    /// Each option occupies two adjacent bits: `2^k` is the inclusion bit,
    /// `2^(k+1)` is its negated ("exception") form. `WebSocket`, `ElementHide`
    /// and `GenericHide` have no exception bit, matching the source.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RuleOptions: u32 {
        const THIRD_PARTY            = 1 << 0;
        const THIRD_PARTY_EXCEPTION   = 1 << 1;
        const STYLE_SHEET            = 1 << 2;
        const STYLE_SHEET_EXCEPTION   = 1 << 3;
        const SCRIPT                 = 1 << 4;
        const SCRIPT_EXCEPTION        = 1 << 5;
        const IMAGE                  = 1 << 6;
        const IMAGE_EXCEPTION         = 1 << 7;
        const OBJECT                 = 1 << 8;
        const OBJECT_EXCEPTION        = 1 << 9;
        const OBJECT_SUBREQUEST      = 1 << 10;
        const OBJECT_SUBREQUEST_EXCEPTION = 1 << 11;
        const SUB_DOCUMENT           = 1 << 12;
        const SUB_DOCUMENT_EXCEPTION  = 1 << 13;
        const XML_HTTP_REQUEST       = 1 << 14;
        const XML_HTTP_REQUEST_EXCEPTION = 1 << 15;
        const WEB_SOCKET             = 1 << 16;
        const ELEMENT_HIDE           = 1 << 17;
        const GENERIC_HIDE           = 1 << 18;
    }
}

/// The type of resource a request is being made for, as passed in by the caller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceType {
    Image,
    Script,
    StyleSheet,
    Object,
    XmlHttpRequest,
    SubFrame,
    ObjectSubrequest,
    WebSocket,
    Other,
}

impl ResourceType {
    /// The (inclusion, exception) bit pair this resource type is gated by, if any.
    pub(crate) fn option_bits(self) -> Option<(RuleOptions, RuleOptions)> {
        use RuleOptions as O;
        match self {
            ResourceType::Image => Some((O::IMAGE, O::IMAGE_EXCEPTION)),
            ResourceType::Script => Some((O::SCRIPT, O::SCRIPT_EXCEPTION)),
            ResourceType::StyleSheet => Some((O::STYLE_SHEET, O::STYLE_SHEET_EXCEPTION)),
            ResourceType::Object => Some((O::OBJECT, O::OBJECT_EXCEPTION)),
            ResourceType::XmlHttpRequest => Some((O::XML_HTTP_REQUEST, O::XML_HTTP_REQUEST_EXCEPTION)),
            ResourceType::SubFrame => Some((O::SUB_DOCUMENT, O::SUB_DOCUMENT_EXCEPTION)),
            ResourceType::ObjectSubrequest => Some((O::OBJECT_SUBREQUEST, O::OBJECT_SUBREQUEST_EXCEPTION)),
            ResourceType::WebSocket => Some((O::WEB_SOCKET, RuleOptions::empty())),
            ResourceType::Other => None,
        }
    }
}

/// All resource-type entries the evaluator iterates over (§4.4 step 5).
pub(crate) const ALL_RESOURCE_TYPES: &[ResourceType] = &[
    ResourceType::Image,
    ResourceType::Script,
    ResourceType::StyleSheet,
    ResourceType::Object,
    ResourceType::XmlHttpRequest,
    ResourceType::SubFrame,
    ResourceType::ObjectSubrequest,
    ResourceType::WebSocket,
];

/// A single parsed network (blocking/exception) rule.
#[derive(Debug, Clone)]
pub struct Rule {
    /// The stripped pattern: no anchors, no `$options`.
    pub pattern: String,
    pub anchor: Anchor,
    pub is_domain_anchored: bool,
    pub is_exception: bool,
    pub options: RuleOptions,
    pub blocked_domains: Vec<String>,
    pub allowed_domains: Vec<String>,
    /// The original filter-list line, kept for diagnostics.
    pub raw_text: String,
}

/// The cosmetic-mode override carried by an `Except` decision when the
/// matched rule had `$elemhide` or `$generichide`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CosmeticOverride {
    NoFilters,
    DomainOnlyFilters,
}

/// The outcome of a match query.
#[derive(Debug, Clone)]
pub enum Decision {
    /// No rule applied.
    Ignore,
    /// A blocking rule matched and no exception overrode it.
    Block(Rule),
    /// An exception rule matched.
    Except(Rule, Option<CosmeticOverride>),
}

impl Decision {
    pub fn is_blocked(&self) -> bool {
        matches!(self, Decision::Block(_))
    }

    pub fn is_exception(&self) -> bool {
        matches!(self, Decision::Except(_, _))
    }

    pub fn matched_rule_text(&self) -> Option<&str> {
        match self {
            Decision::Ignore => None,
            Decision::Block(rule) | Decision::Except(rule, _) => Some(&rule.raw_text),
        }
    }
}
