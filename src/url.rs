//! Minimal URL handling
//!
//! The engine is not a general-purpose URL library: it only needs the full
//! URL string (for anchor checks) and the host (for domain/third-party
//! checks). Grounded on `utils::extract_domain` in the teacher crate.

/// A request or base-page URL, decomposed just enough for matching.
#[derive(Debug, Clone)]
pub struct Url {
    full: String,
    host: String,
}

impl Url {
    /// Parses `raw` into its full-string and host parts.
    ///
    /// Protocol-relative URLs (`//host/path`) are accepted; a bare host with
    /// no scheme is treated as the whole string being the host.
    pub fn parse(raw: &str) -> Self {
        let full = raw.to_string();
        let host = extract_host(raw).to_string();
        Self { full, host }
    }

    /// The URL as originally supplied, unmodified.
    pub fn as_str(&self) -> &str {
        &self.full
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn extract_host(url: &str) -> &str {
    let after_scheme = match url.find("://") {
        Some(idx) => &url[idx + 3..],
        None => url.strip_prefix("//").unwrap_or(url),
    };

    match after_scheme.find(['/', '?', '#']) {
        Some(idx) => &after_scheme[..idx],
        None => after_scheme,
    }
}
