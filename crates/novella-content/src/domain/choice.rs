//! Runtime choices and their effect descriptors.

use serde::Serialize;

/// A typed effect descriptor. This crate only produces them; an external
/// game-state reducer applies them.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Effect {
    /// Set (`true`) or clear (`false`) a narrative flag.
    SetFlag { flag: String, value: bool },
    AddXp { amount: i32 },
    ChangeRelationship { character_id: String, delta: i32 },
    ImmediateAction {
        action: String,
        payload: serde_json::Value,
    },
    NarrativeText { text: String },
    GrantItem { item_id: String, quantity: i32 },
    UpdateQuest { quest_id: String, status: String },
}

impl Effect {
    /// Returns the flag name if this effect sets a flag to `true`.
    #[must_use]
    pub fn raised_flag(&self) -> Option<&str> {
        match self {
            Self::SetFlag { flag, value: true } => Some(flag),
            _ => None,
        }
    }
}

/// A normalized skill check, with outcome-specific effects kept apart from
/// the unconditional ones.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SkillCheck {
    pub skill: String,
    /// Difficulty class on the 5–95 scale.
    pub dc: u8,
    /// True when the authored difficulty used the legacy 1–20 scale.
    pub is_legacy: bool,
    pub raw_difficulty: f64,
    pub success_text: Option<String>,
    pub failure_text: Option<String>,
    pub success_effects: Vec<Effect>,
    pub failure_effects: Vec<Effect>,
    pub success_next_scene_id: Option<String>,
    pub failure_next_scene_id: Option<String>,
}

/// Gates on a choice.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceRequirements {
    pub flags: Vec<String>,
    pub not_flags: Vec<String>,
    pub skill_check: Option<SkillCheck>,
}

/// A runtime choice.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Choice {
    pub id: String,
    pub text: String,
    pub description: Option<String>,
    pub next_scene_id: Option<String>,
    pub effects: Vec<Effect>,
    pub requirements: ChoiceRequirements,
}

impl Choice {
    /// Every navigation target this choice can lead to, including skill-check
    /// branch targets.
    pub fn targets(&self) -> impl Iterator<Item = &str> {
        let branches = self.requirements.skill_check.iter().flat_map(|check| {
            [
                check.success_next_scene_id.as_deref(),
                check.failure_next_scene_id.as_deref(),
            ]
        });
        std::iter::once(self.next_scene_id.as_deref())
            .chain(branches)
            .flatten()
    }
}
