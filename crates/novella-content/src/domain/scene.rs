//! Runtime scene graph.

use serde::Serialize;

use super::choice::Choice;

/// Mood used when an author does not specify one.
pub const DEFAULT_MOOD: &str = "neutral";

/// A character appearing in a scene, either authored or derived from a
/// free-text speaker name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Character {
    pub id: String,
    pub name: String,
    pub color: Option<String>,
    pub portrait_url: Option<String>,
    /// True for characters synthesized by the speaker resolver.
    pub is_derived: bool,
}

/// A character hint attached to a terminal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Advice {
    pub character_id: String,
    pub text: String,
    pub mood: String,
    pub min_level: Option<u32>,
}

/// Implicit navigation from a terminal line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transition {
    pub next_scene_id: String,
}

/// One runtime dialogue line.
///
/// Only the terminal line carries choices, a transition, or advices.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Line {
    /// `fqn__line{n}`.
    pub id: String,
    pub text: String,
    pub speaker_id: Option<String>,
    pub mood: String,
    pub background: Option<String>,
    pub next_line_id: Option<String>,
    pub choices: Option<Vec<Choice>>,
    pub transition: Option<Transition>,
    pub advices: Option<Vec<Advice>>,
}

impl Line {
    /// Returns the choices on this line, or an empty slice.
    #[must_use]
    pub fn choices(&self) -> &[Choice] {
        self.choices.as_deref().unwrap_or_default()
    }
}

/// A fully converted scene.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDefinition {
    /// Fully-qualified id, `chapter:scene`.
    pub id: String,
    pub chapter_id: String,
    pub title: String,
    pub location: String,
    pub background: Option<String>,
    pub music: Option<String>,
    pub entry_line_id: String,
    /// Authored characters followed by derived ones.
    pub characters: Vec<Character>,
    pub lines: Vec<Line>,
    pub is_terminal: bool,
}

impl SceneDefinition {
    /// Looks up a line by id.
    #[must_use]
    pub fn line(&self, line_id: &str) -> Option<&Line> {
        self.lines.iter().find(|line| line.id == line_id)
    }

    /// The last line; it exists because conversion never yields an empty scene.
    #[must_use]
    pub fn terminal_line(&self) -> Option<&Line> {
        self.lines.last()
    }
}
