//! Chapter and scene identifiers.
//!
//! Scenes live in chapter namespaces and are addressed either by their short
//! id (`exit_to_map`) or by their fully-qualified name (`chapter1:exit_to_map`).
//! All parsing and formatting of that convention happens here, so the
//! `.`/`:`/`END` restrictions are enforced in exactly one place.

use std::borrow::Borrow;
use std::fmt;

use serde::Serialize;

use crate::error::ContentError;

/// The canonical terminal marker. Navigating to it ends the narrative.
pub const END_SCENE_ID: &str = "END";

/// Separator between the chapter and scene parts of an FQN.
pub const NAMESPACE_SEPARATOR: char = ':';

/// Authored spellings of the terminal marker.
const TERMINAL_ALIASES: [&str; 3] = ["END", "EXIT", "EXIT_SCENE"];

/// A validated chapter namespace key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ChapterId(String);

impl ChapterId {
    /// Validates a raw chapter id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Validation` if the id is empty or contains a
    /// `.` or `:`.
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        if raw.is_empty() {
            return Err(ContentError::Validation(
                "chapter id must not be empty".to_owned(),
            ));
        }
        if raw.contains('.') {
            return Err(ContentError::Validation(format!(
                "chapter id '{raw}' must not contain '.'"
            )));
        }
        if raw.contains(NAMESPACE_SEPARATOR) {
            return Err(ContentError::Validation(format!(
                "chapter id '{raw}' must not contain '{NAMESPACE_SEPARATOR}'"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A validated short scene id, unique within its chapter.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Validates a raw short scene id.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Validation` if the id is empty, contains a `.`
    /// or `:`, or is the reserved terminal marker `END`.
    pub fn parse(raw: &str) -> Result<Self, ContentError> {
        if raw.is_empty() {
            return Err(ContentError::Validation(
                "scene id must not be empty".to_owned(),
            ));
        }
        if raw.contains('.') {
            return Err(ContentError::Validation(format!(
                "scene id '{raw}' must not contain '.'"
            )));
        }
        if raw.contains(NAMESPACE_SEPARATOR) {
            return Err(ContentError::Validation(format!(
                "scene id '{raw}' must not contain '{NAMESPACE_SEPARATOR}'"
            )));
        }
        if raw == END_SCENE_ID {
            return Err(ContentError::Validation(format!(
                "scene id '{END_SCENE_ID}' is reserved"
            )));
        }
        Ok(Self(raw.to_owned()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

macro_rules! impl_id_traits {
    ($ty:ty) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl AsRef<str> for $ty {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $ty {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_id_traits!(ChapterId);
impl_id_traits!(SceneId);

/// Formats the fully-qualified name `chapter:scene`.
#[must_use]
pub fn format_fqn(chapter_id: &ChapterId, scene_id: &SceneId) -> String {
    format!("{chapter_id}{NAMESPACE_SEPARATOR}{scene_id}")
}

/// A parsed navigation target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneRef<'a> {
    /// End of narrative (`END` or an empty target).
    End,
    /// `chapter:scene`, looked up in exactly that chapter.
    Qualified {
        /// Chapter part.
        chapter: &'a str,
        /// Short scene part.
        scene: &'a str,
    },
    /// A bare short id, resolved by precedence rules.
    Unqualified(&'a str),
}

impl<'a> SceneRef<'a> {
    /// Splits a target string into its namespace parts. Never fails; whether
    /// the parts name a registered scene is the registry's concern.
    #[must_use]
    pub fn parse(target: &'a str) -> Self {
        if target.is_empty() || target == END_SCENE_ID {
            return Self::End;
        }
        match target.split_once(NAMESPACE_SEPARATOR) {
            Some((chapter, scene)) => Self::Qualified { chapter, scene },
            None => Self::Unqualified(target),
        }
    }
}

/// Returns true for every authored spelling of the terminal marker.
#[must_use]
pub fn is_terminal_alias(target: &str) -> bool {
    TERMINAL_ALIASES.contains(&target)
}

/// Normalizes an authored scene target: trims it, maps `END`/`EXIT`/
/// `EXIT_SCENE` to [`END_SCENE_ID`] and drops empty targets.
#[must_use]
pub fn normalize_scene_target(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else if is_terminal_alias(trimmed) {
        Some(END_SCENE_ID.to_owned())
    } else {
        Some(trimmed.to_owned())
    }
}
