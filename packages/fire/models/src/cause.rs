//! Cause taxonomy configuration.
//!
//! Datasets label causes differently, so the canonical categories are
//! configured per dataset rather than fixed in an enum.

use serde::{Deserialize, Serialize};

/// One canonical cause category and the keywords that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseRule {
    /// Canonical label (e.g. `"Lightning"`).
    pub label: String,
    /// Lowercase substrings; a raw cause containing any of them maps here.
    pub keywords: Vec<String>,
}

/// Ordered cause rules plus a fallback label for unmatched values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CauseTaxonomy {
    /// Rules, tried in order. First match wins.
    pub categories: Vec<CauseRule>,
    /// Label for raw causes no rule matches.
    pub fallback: String,
}

impl Default for CauseTaxonomy {
    fn default() -> Self {
        let rule = |label: &str, keywords: &[&str]| CauseRule {
            label: label.to_string(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        };
        Self {
            categories: vec![
                rule("Human", &["human"]),
                rule("Lightning", &["lightning"]),
                rule("Under Investigation", &["under invest", "investigation"]),
            ],
            fallback: "Unknown".to_string(),
        }
    }
}

impl CauseTaxonomy {
    /// Every label this taxonomy can produce, rules first, fallback last.
    #[must_use]
    pub fn labels(&self) -> Vec<&str> {
        self.categories
            .iter()
            .map(|c| c.label.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }
}
