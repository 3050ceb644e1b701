//! Authoring-time scene format.
//!
//! These types mirror chapter content files one-to-one. They are read once
//! and never mutated; the scene converter turns them into runtime scenes.

use std::collections::BTreeMap;

use serde::Deserialize;

/// A scene as written by an author.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawScene {
    /// Short scene id, or an FQN already carrying the chapter prefix.
    pub id: String,
    /// Display title; defaults to the scene id.
    pub title: Option<String>,
    /// Display location.
    pub location: Option<String>,
    /// Background image path.
    pub background: Option<String>,
    /// Music track path.
    pub music: Option<String>,
    /// Characters declared for this scene.
    pub characters: Vec<RawCharacter>,
    /// Ordered dialogue entries.
    pub dialogue: Vec<RawDialogue>,
    /// Choices offered at the end of the scene.
    pub choices: Option<Vec<RawChoice>>,
    /// Implicit transition target when the scene has no choices.
    pub next_scene: Option<String>,
    /// Character advices shown on the terminal line.
    pub advices: Vec<RawAdvice>,
    /// Explicit terminal marker; a terminal scene is never a dead end.
    pub is_terminal: bool,
}

impl RawScene {
    /// Returns the declared choices, treating an empty list as undeclared.
    #[must_use]
    pub fn declared_choices(&self) -> Option<&[RawChoice]> {
        self.choices.as_deref().filter(|choices| !choices.is_empty())
    }
}

/// A character declared by the author.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawCharacter {
    pub id: String,
    pub name: String,
    pub portrait_url: Option<String>,
    pub color: Option<String>,
}

/// One line of dialogue.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawDialogue {
    /// Free-text speaker name.
    pub speaker: Option<String>,
    /// Explicit character id; wins over `speaker`.
    pub character_id: Option<String>,
    pub text: String,
    pub mood: Option<String>,
    /// Per-line background override.
    pub background: Option<String>,
}

/// A hint from a character, attached to the terminal line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawAdvice {
    pub character_id: String,
    pub text: String,
    pub mood: Option<String>,
    pub min_level: Option<u32>,
}

/// A choice as written by an author.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawChoice {
    pub id: String,
    /// Label shown on the button.
    pub text: String,
    pub next_scene: Option<String>,
    pub presentation: Option<RawPresentation>,
    pub requirements: Option<RawRequirements>,
    pub skill_check: Option<RawSkillCheck>,
    pub effects: Option<RawEffects>,
}

/// Presentation hints for a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawPresentation {
    pub tooltip: Option<String>,
}

/// Flag gates for a choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawRequirements {
    /// Flags that must all be set.
    pub flags: Vec<String>,
    /// Flags that must all be unset.
    pub not_flags: Vec<String>,
}

/// A skill check block.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawSkillCheck {
    pub skill: String,
    /// Difficulty on either the legacy (1–20) or percentile scale.
    pub difficulty: f64,
    pub success_text: Option<String>,
    pub failure_text: Option<String>,
}

/// A keyed flag write: `value: true` sets the flag, `false` clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawFlagWrite {
    pub key: String,
    pub value: bool,
}

/// An immediate action handed to the game-state reducer.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawImmediateAction {
    #[serde(rename = "type")]
    pub action: String,
    pub payload: serde_json::Value,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawItemGrant {
    pub item_id: String,
    pub quantity: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawQuestUpdate {
    pub quest_id: String,
    pub status: String,
}

/// Flag writes and target override for one skill-check outcome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawBranch {
    pub add_flags: Vec<String>,
    pub remove_flags: Vec<String>,
    pub flags: Vec<RawFlagWrite>,
    pub next_scene: Option<String>,
}

/// The nested effect block of a choice.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RawEffects {
    pub add_flags: Vec<String>,
    pub remove_flags: Vec<String>,
    pub flags: Vec<RawFlagWrite>,
    pub xp: i32,
    /// Relationship deltas keyed by character id.
    pub reputation: BTreeMap<String, i32>,
    pub immediate: Vec<RawImmediateAction>,
    pub narrative: Option<String>,
    pub items: Vec<RawItemGrant>,
    pub quests: Vec<RawQuestUpdate>,
    pub on_success: Option<RawBranch>,
    pub on_failure: Option<RawBranch>,
}
