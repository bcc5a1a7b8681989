//! Cause mapping utilities.
//!
//! Maps raw cause strings to a dataset's canonical [`CauseTaxonomy`] labels.
//! Matching is case-insensitive keyword detection, first rule wins.

use fire_stats_fire_models::CauseTaxonomy;

/// Maps a raw cause string to its canonical label.
///
/// Returns the taxonomy's fallback label when no rule matches.
#[must_use]
pub fn map_cause<'a>(taxonomy: &'a CauseTaxonomy, raw: &str) -> &'a str {
    let lower = raw.to_lowercase();

    taxonomy
        .categories
        .iter()
        .find(|rule| contains_any(&lower, &rule.keywords))
        .map_or_else(
            || {
                log::debug!("No cause rule matched '{raw}', using '{}'", taxonomy.fallback);
                taxonomy.fallback.as_str()
            },
            |rule| rule.label.as_str(),
        )
}

/// Checks if `haystack` contains any of the given lowercase `needles`.
fn contains_any(haystack: &str, needles: &[String]) -> bool {
    needles
        .iter()
        .any(|needle| haystack.contains(needle.to_lowercase().as_str()))
}
