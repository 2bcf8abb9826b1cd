//! Cross-origin allow-list
//!
//! Entries are either exact origins (`https://app.example.com`) or a
//! wildcard subdomain pattern (`https://*.example.com`). A wildcard never
//! matches the bare domain itself.

/// One allow-list entry
#[derive(Debug, Clone, PartialEq, Eq)]
enum OriginRule {
    Exact(String),
    /// `scheme://` and `.domain` around the `*`
    Subdomain { scheme: String, suffix: String },
}

impl OriginRule {
    fn parse(entry: &str) -> Self {
        let entry = entry.trim().trim_end_matches('/');
        match entry.split_once("*.") {
            Some((scheme, domain)) if scheme.ends_with("://") && !domain.is_empty() => {
                OriginRule::Subdomain {
                    scheme: scheme.to_ascii_lowercase(),
                    suffix: format!(".{}", domain.to_ascii_lowercase()),
                }
            }
            _ => OriginRule::Exact(entry.to_ascii_lowercase()),
        }
    }

    fn matches(&self, origin: &str) -> bool {
        match self {
            OriginRule::Exact(o) => o == origin,
            OriginRule::Subdomain { scheme, suffix } => origin
                .strip_prefix(scheme.as_str())
                .and_then(|rest| rest.strip_suffix(suffix.as_str()))
                .is_some_and(|sub| {
                    !sub.is_empty()
                        && !sub.starts_with('.')
                        && !sub.ends_with('.')
                        && sub
                            .chars()
                            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '.')
                }),
        }
    }
}

/// Set of origins allowed to call the API from a browser
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    rules: Vec<OriginRule>,
}

impl OriginPolicy {
    pub fn new<S: AsRef<str>>(entries: &[S]) -> Self {
        Self {
            rules: entries
                .iter()
                .map(|e| e.as_ref())
                .filter(|e| !e.trim().is_empty())
                .map(OriginRule::parse)
                .collect(),
        }
    }

    /// Check an `Origin` header value
    pub fn is_allowed(&self, origin: &str) -> bool {
        let origin = origin.trim().to_ascii_lowercase();
        self.rules.iter().any(|rule| rule.matches(&origin))
    }
}
