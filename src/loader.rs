//! Filter-list Loader — file framing around the Rule Parser
//!
//! Grounded on `ContentBlockingAdBlockResolver::loadRules` for header/title
//! handling and on `fop_checksum::calculate_checksum` for the MD5/base64
//! digest (same normalization: strip `\r`, collapse consecutive `\n`).

use std::io::BufRead;
use std::time::{Duration, Instant};

use base64::engine::general_purpose::STANDARD;
use base64::Engine;

use crate::config::EngineConfig;
use crate::cosmetic::CosmeticStore;
use crate::error::EngineError;
use crate::index::PatternIndex;
use crate::parser::{parse_line, ParsedLine};

const HEADER_PREFIX: &str = "[adblock plus";

/// Diagnostics returned alongside a successful [`load`].
#[derive(Debug, Clone, Default)]
pub struct LoadStats {
    pub rules_accepted: usize,
    pub rules_dropped: usize,
    pub cosmetic_rules: usize,
    pub title: Option<String>,
    pub elapsed: Duration,
}

/// Reads just the header and an optional `! Title:` line, without building
/// an index. Useful for a cheap pre-flight check before committing to a full
/// [`load`].
pub fn validate<R: BufRead>(reader: R) -> Result<Option<String>, EngineError> {
    let mut lines = reader.lines();
    check_header(lines.next().transpose()?)?;

    for line in lines {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('!') {
            if let Some(title) = extract_title(trimmed) {
                return Ok(Some(title));
            }
            continue;
        }
        break;
    }
    Ok(None)
}

/// Streams `reader` line by line, parsing every rule into a fresh
/// [`PatternIndex`]/[`CosmeticStore`] pair. I/O failures propagate as
/// [`EngineError::Io`]; per-line parse failures are silently counted in the
/// returned [`LoadStats`].
pub fn load<R: BufRead>(reader: R, config: &EngineConfig) -> Result<(PatternIndex, CosmeticStore, LoadStats), EngineError> {
    let started = Instant::now();
    let mut lines = reader.lines();
    check_header(lines.next().transpose()?)?;

    let mut index = PatternIndex::new();
    let mut cosmetic = CosmeticStore::new();
    let mut stats = LoadStats::default();
    let mut scanning_header_comments = true;

    for line in lines {
        let line = line?;
        let trimmed = line.trim();

        if scanning_header_comments {
            if trimmed.is_empty() || trimmed.starts_with('!') {
                if let Some(title) = extract_title(trimmed) {
                    stats.title = Some(title);
                }
                continue;
            }
            scanning_header_comments = false;
        }

        match parse_line(trimmed, config) {
            ParsedLine::Dropped => {
                stats.rules_dropped += 1;
            }
            ParsedLine::Network(rule) => {
                index.insert(rule);
                stats.rules_accepted += 1;
            }
            ParsedLine::CosmeticGeneric(selector) => {
                cosmetic.add_generic(selector);
                stats.cosmetic_rules += 1;
            }
            ParsedLine::CosmeticBlacklist(domains, selector) => {
                for domain in domains {
                    cosmetic.add_blacklist(domain, selector.clone());
                }
                stats.cosmetic_rules += 1;
            }
            ParsedLine::CosmeticWhitelist(domains, selector) => {
                for domain in domains {
                    cosmetic.add_whitelist(domain, selector.clone());
                }
                stats.cosmetic_rules += 1;
            }
        }
    }

    stats.elapsed = started.elapsed();
    log::info!(
        "filter list loaded: {} rules accepted, {} dropped, {} cosmetic rules in {:?}",
        stats.rules_accepted,
        stats.rules_dropped,
        stats.cosmetic_rules,
        stats.elapsed
    );

    Ok((index, cosmetic, stats))
}

fn check_header(first_line: Option<String>) -> Result<(), EngineError> {
    let header = first_line.ok_or(EngineError::InvalidHeader)?;
    if header.trim().to_ascii_lowercase().starts_with(HEADER_PREFIX) {
        Ok(())
    } else {
        Err(EngineError::InvalidHeader)
    }
}

fn extract_title(line: &str) -> Option<String> {
    line.strip_prefix("! Title:").map(|rest| rest.trim().to_string())
}

/// Verifies the embedded MD5/base64 checksum of a filter list: `header` is
/// the first line, `body` is everything else (with the `! Checksum:` line
/// itself excluded), `checksum` is the base64 digest found in that line.
pub fn verify_checksum(header: &str, body: &str, checksum: &str) -> Result<(), EngineError> {
    let mut normalized = String::with_capacity(header.len() + body.len() + 1);
    normalized.push_str(header);
    normalized.push('\n');
    normalized.push_str(body);

    let computed = compute_checksum(&normalized);
    let expected = checksum.trim_end_matches('=').to_string();

    if computed == expected {
        Ok(())
    } else {
        Err(EngineError::ChecksumMismatch { expected, computed })
    }
}

fn compute_checksum(data: &str) -> String {
    let mut hasher = md5::Context::new();
    let mut prev_newline = false;

    for byte in data.bytes() {
        match byte {
            b'\r' => continue,
            b'\n' if prev_newline => continue,
            b'\n' => {
                hasher.consume(b"\n");
                prev_newline = true;
            }
            _ => {
                hasher.consume([byte]);
                prev_newline = false;
            }
        }
    }

    let digest = hasher.finalize();
    let mut encoded = STANDARD.encode(digest.0);
    while encoded.ends_with('=') {
        encoded.pop();
    }
    encoded
}
