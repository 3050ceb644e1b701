//! Choice views for the rendering layer.
//!
//! Evaluated on every render, so this stays pure: no mutation, no I/O, and
//! the views borrow the choices instead of cloning them.

use std::collections::{BTreeSet, HashMap, HashSet};
use std::hash::BuildHasher;

use novella_content::domain::choice::Choice;
use novella_content::domain::scene::Line;
use serde::Serialize;

/// Flags ending in this suffix track "scene visited" in general and never
/// mark a specific choice as taken.
const VISITED_ANY_SUFFIX: &str = "visited_any";

/// Read-only view of the external narrative flag state.
pub trait FlagSet {
    /// Returns true if the named flag is currently set.
    fn is_set(&self, flag: &str) -> bool;
}

impl<S: BuildHasher> FlagSet for HashSet<String, S> {
    fn is_set(&self, flag: &str) -> bool {
        self.contains(flag)
    }
}

impl FlagSet for BTreeSet<String> {
    fn is_set(&self, flag: &str) -> bool {
        self.contains(flag)
    }
}

impl<S: BuildHasher> FlagSet for HashMap<String, bool, S> {
    fn is_set(&self, flag: &str) -> bool {
        self.get(flag).copied().unwrap_or(false)
    }
}

/// A choice annotated against the current flag state.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceView<'a> {
    pub choice: &'a Choice,
    pub is_disabled: bool,
    pub lock_reason: Option<String>,
    pub is_visited: bool,
}

fn lock_reason<F: FlagSet + ?Sized>(choice: &Choice, flags: &F) -> Option<String> {
    let missing: Vec<&str> = choice
        .requirements
        .flags
        .iter()
        .map(String::as_str)
        .filter(|flag| !flags.is_set(flag))
        .collect();
    if !missing.is_empty() {
        return Some(format!("Requires: {}", missing.join(", ")));
    }

    let blocking: Vec<&str> = choice
        .requirements
        .not_flags
        .iter()
        .map(String::as_str)
        .filter(|flag| flags.is_set(flag))
        .collect();
    if !blocking.is_empty() {
        return Some(format!("Blocked by: {}", blocking.join(", ")));
    }

    None
}

fn is_visited<F: FlagSet + ?Sized>(choice: &Choice, flags: &F) -> bool {
    let blocked = choice
        .requirements
        .not_flags
        .iter()
        .any(|flag| flags.is_set(flag));

    blocked
        || choice
            .effects
            .iter()
            .filter_map(|effect| effect.raised_flag())
            .any(|flag| {
                flags.is_set(flag) && !flag.to_lowercase().ends_with(VISITED_ANY_SUFFIX)
            })
}

/// Annotates every choice on `line`: disabled with a lock reason when a
/// required flag is missing or a forbidden flag is set, and visited when a
/// forbidden flag is set or one of the choice's own raised flags already is.
#[must_use]
pub fn build_choice_views<'a, F: FlagSet + ?Sized>(line: &'a Line, flags: &F) -> Vec<ChoiceView<'a>> {
    line.choices()
        .iter()
        .map(|choice| {
            let lock_reason = lock_reason(choice, flags);
            ChoiceView {
                choice,
                is_disabled: lock_reason.is_some(),
                lock_reason,
                is_visited: is_visited(choice, flags),
            }
        })
        .collect()
}
