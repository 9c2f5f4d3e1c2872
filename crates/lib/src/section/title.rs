//! Default section index title derivation.

/// Derives the index title shown for a section: the first character of its
/// name, uppercased. The empty name yields the empty title.
///
/// Uppercasing is Unicode-aware, so a single character may expand (`'ß'`
/// becomes `"SS"`).
pub fn default_index_title(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_default()
}
