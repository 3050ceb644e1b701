//! Speaker resolution.
//!
//! Maps the free-text speaker names found in dialogue to character ids. A
//! name that matches no declared character gets a derived character, created
//! once per scene and reused for every later line by the same speaker.

use std::collections::HashMap;

use sha2::{Digest, Sha256};

use super::raw::RawCharacter;
use super::scene::Character;

/// Id every narrator alias resolves to.
pub const NARRATOR_ID: &str = "narrator";

const NARRATOR_ALIASES: [&str; 2] = ["рассказчик", "narrator"];

const DERIVED_ID_PREFIX: &str = "auto_";

/// Colors handed out to derived characters.
pub const SPEAKER_PALETTE: [&str; 8] = [
    "#e57373", "#64b5f6", "#81c784", "#ffb74d", "#ba68c8", "#4db6ac", "#f06292", "#a1887f",
];

/// Trims, lowercases and collapses inner whitespace.
#[must_use]
pub fn normalize_speaker_name(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// ASCII slug: lowercase alphanumerics, every other run collapsed to `_`.
#[must_use]
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_separator = false;
    for ch in name.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_separator && !slug.is_empty() {
                slug.push('_');
            }
            pending_separator = false;
            slug.push(ch.to_ascii_lowercase());
        } else {
            pending_separator = true;
        }
    }
    slug
}

/// Picks a palette color from a SHA-256 of the name. Same name, same color.
#[must_use]
pub fn palette_color(name: &str) -> &'static str {
    let digest = Sha256::digest(name.as_bytes());
    let bucket = digest
        .iter()
        .take(8)
        .fold(0_u64, |acc, byte| (acc << 8) | u64::from(*byte));
    let len = SPEAKER_PALETTE.len() as u64;
    #[allow(clippy::cast_possible_truncation)]
    let index = (bucket % len) as usize;
    SPEAKER_PALETTE[index]
}

/// Per-scene speaker resolver. Accumulates derived characters and hands them
/// over exactly once through [`SpeakerResolver::finish`].
#[derive(Debug)]
pub struct SpeakerResolver {
    declared: Vec<(String, String)>,
    derived: Vec<Character>,
    derived_by_name: HashMap<String, usize>,
    derived_by_slug: HashMap<String, usize>,
}

impl SpeakerResolver {
    /// Creates a resolver over the scene's declared characters.
    #[must_use]
    pub fn new(characters: &[RawCharacter]) -> Self {
        let declared = characters
            .iter()
            .map(|character| (normalize_speaker_name(&character.name), character.id.clone()))
            .filter(|(name, _)| !name.is_empty())
            .collect();
        Self {
            declared,
            derived: Vec::new(),
            derived_by_name: HashMap::new(),
            derived_by_slug: HashMap::new(),
        }
    }

    /// Resolves one dialogue line's speaker.
    ///
    /// An explicit character id always wins. Otherwise the name is matched
    /// exactly, then loosely (containment either way), against declared
    /// characters before a derived character is synthesized.
    pub fn resolve(
        &mut self,
        name: Option<&str>,
        explicit_id: Option<&str>,
        line_index: usize,
    ) -> Option<String> {
        if let Some(id) = explicit_id.map(str::trim).filter(|id| !id.is_empty()) {
            return Some(id.to_owned());
        }

        let raw_name = name?;
        let normalized = normalize_speaker_name(raw_name);
        if normalized.is_empty() {
            return None;
        }
        if NARRATOR_ALIASES.contains(&normalized.as_str()) {
            return Some(NARRATOR_ID.to_owned());
        }

        if let Some((_, id)) = self.declared.iter().find(|(declared, _)| *declared == normalized) {
            return Some(id.clone());
        }
        if let Some((_, id)) = self.declared.iter().find(|(declared, _)| {
            declared.contains(normalized.as_str()) || normalized.contains(declared.as_str())
        }) {
            return Some(id.clone());
        }

        Some(self.derive(raw_name, normalized, line_index))
    }

    fn derive(&mut self, raw_name: &str, normalized: String, line_index: usize) -> String {
        if let Some(&index) = self.derived_by_name.get(&normalized) {
            return self.derived[index].id.clone();
        }

        let slug = slugify(&normalized);
        // Distinct spellings can share a slug, and then share a character.
        let shared = if slug.is_empty() {
            None
        } else {
            self.derived_by_slug.get(&slug).copied()
        };
        let index = match shared {
            Some(existing) => existing,
            None => {
                let base = if slug.is_empty() {
                    format!("{DERIVED_ID_PREFIX}{line_index}")
                } else {
                    format!("{DERIVED_ID_PREFIX}{slug}")
                };
                let id = self.unique_id(base);
                self.derived.push(Character {
                    id,
                    name: raw_name.split_whitespace().collect::<Vec<_>>().join(" "),
                    color: Some(palette_color(&normalized).to_owned()),
                    portrait_url: None,
                    is_derived: true,
                });
                let index = self.derived.len() - 1;
                if !slug.is_empty() {
                    self.derived_by_slug.insert(slug, index);
                }
                index
            }
        };
        self.derived_by_name.insert(normalized, index);
        self.derived[index].id.clone()
    }

    /// `base`, or `base_2`, `base_3`, ... if a derived character already
    /// holds it. Slug ids and line-index ids share one namespace.
    fn unique_id(&self, base: String) -> String {
        let taken = |id: &str| self.derived.iter().any(|character| character.id == id);
        if !taken(&base) {
            return base;
        }
        let mut suffix = 2;
        loop {
            let candidate = format!("{base}_{suffix}");
            if !taken(&candidate) {
                return candidate;
            }
            suffix += 1;
        }
    }

    /// Consumes the resolver, returning derived characters in creation order.
    #[must_use]
    pub fn finish(self) -> Vec<Character> {
        self.derived
    }
}
