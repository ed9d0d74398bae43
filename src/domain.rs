//! Host/subdomain helpers shared by the matcher and rule evaluator
//!
//! Grounded on `ContentFilteringManager::createSubdomainList` and
//! `ContentBlockingResolver::resolveDomainExceptions` in the original engine.

/// Builds the subdomain list of `host`: `host` itself plus every suffix
/// obtained by stripping leading labels at each `.`.
///
/// `"a.b.example.com"` yields `["b.example.com", "example.com", "a.b.example.com"]`
/// in that order (shortest suffixes first, full host last), matching the
/// source's append order.
pub fn subdomain_list(host: &str) -> Vec<&str> {
    let mut list = Vec::new();

    let mut dot_position = host.rfind('.').and_then(|last| host[..last].rfind('.'));
    while let Some(pos) = dot_position {
        list.push(&host[pos + 1..]);
        dot_position = host[..pos].rfind('.');
    }

    list.push(host);
    list
}

/// Substring containment test used for `domain=` list entries: an entry `e`
/// matches host `h` iff `e` appears anywhere in `h`, not only as a suffix.
pub fn domain_matches_any(host: &str, entries: &[String]) -> bool {
    entries.iter().any(|entry| host.contains(entry.as_str()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subdomain_list_of_bare_host_is_itself() {
        assert_eq!(subdomain_list("example.com"), vec!["example.com"]);
    }

    #[test]
    fn subdomain_list_includes_every_parent() {
        assert_eq!(
            subdomain_list("a.b.example.com"),
            vec!["example.com", "b.example.com", "a.b.example.com"]
        );
    }

    #[test]
    fn domain_matches_any_is_substring_not_suffix() {
        assert!(domain_matches_any("foo.example.com", &["example.com".to_string()]));
        assert!(domain_matches_any("myexample.com.evil.test", &["example.com".to_string()]));
        assert!(!domain_matches_any("example.org", &["example.com".to_string()]));
    }
}
