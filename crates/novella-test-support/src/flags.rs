//! Flag state helpers.

use std::collections::BTreeSet;

/// Builds a flag set from string literals.
#[must_use]
pub fn flag_set(flags: &[&str]) -> BTreeSet<String> {
    flags.iter().map(|flag| (*flag).to_owned()).collect()
}
