//! Choice compilation.
//!
//! Turns one authored choice into a runtime [`Choice`]: composes its
//! description, picks its navigation target, consolidates flag writes and
//! normalizes the skill-check difficulty.

use novella_core::ids::normalize_scene_target;

use crate::domain::choice::{Choice, ChoiceRequirements, Effect, SkillCheck};
use crate::domain::raw::{RawBranch, RawChoice, RawEffects, RawFlagWrite, RawSkillCheck};

/// Joins the tooltip and skill-check texts in a choice description.
pub const DESCRIPTION_SEPARATOR: &str = " · ";

/// DC used when the authored difficulty is missing or nonsensical.
pub const FALLBACK_DC: u8 = 50;
/// Lowest DC after normalization.
pub const MIN_DC: u8 = 5;
/// Highest DC after normalization.
pub const MAX_DC: u8 = 95;

/// Difficulties at or below this value are on the legacy d20 scale.
const LEGACY_SCALE_MAX: f64 = 20.0;
const LEGACY_MULTIPLIER: f64 = 5.0;

/// A difficulty mapped onto the 5–95 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizedDifficulty {
    pub dc: u8,
    pub is_legacy: bool,
}

/// Maps a raw difficulty onto the 5–95 DC scale.
///
/// Values up to 20 are legacy d20 difficulties and are scaled by 5. Larger
/// values are used as-is. Non-finite or non-positive values fall back to
/// [`FALLBACK_DC`].
#[must_use]
pub fn normalize_difficulty(raw: f64) -> NormalizedDifficulty {
    if !raw.is_finite() || raw <= 0.0 {
        return NormalizedDifficulty {
            dc: FALLBACK_DC,
            is_legacy: false,
        };
    }

    let (scaled, is_legacy) = if raw <= LEGACY_SCALE_MAX {
        (raw * LEGACY_MULTIPLIER, true)
    } else {
        (raw, false)
    };
    let clamped = scaled.round().clamp(f64::from(MIN_DC), f64::from(MAX_DC));

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let dc = clamped as u8;
    NormalizedDifficulty { dc, is_legacy }
}

/// Pending flag writes. A flag is never in both lists: the last write for a
/// key wins.
#[derive(Debug, Default)]
struct FlagWrites {
    set: Vec<String>,
    cleared: Vec<String>,
}

impl FlagWrites {
    fn collect(add: &[String], remove: &[String], keyed: &[RawFlagWrite]) -> Self {
        let mut writes = Self::default();
        for flag in add {
            writes.write(flag, true);
        }
        for flag in remove {
            writes.write(flag, false);
        }
        for entry in keyed {
            writes.write(&entry.key, entry.value);
        }
        writes
    }

    fn write(&mut self, flag: &str, value: bool) {
        let flag = flag.trim();
        if flag.is_empty() {
            return;
        }
        let (target, other) = if value {
            (&mut self.set, &mut self.cleared)
        } else {
            (&mut self.cleared, &mut self.set)
        };
        other.retain(|existing| existing != flag);
        if !target.iter().any(|existing| existing == flag) {
            target.push(flag.to_owned());
        }
    }

    fn into_effects(self) -> Vec<Effect> {
        let set = self.set.into_iter().map(|flag| Effect::SetFlag { flag, value: true });
        let cleared = self
            .cleared
            .into_iter()
            .map(|flag| Effect::SetFlag { flag, value: false });
        set.chain(cleared).collect()
    }
}

fn branch_effects(branch: Option<&RawBranch>) -> Vec<Effect> {
    branch.map_or_else(Vec::new, |branch| {
        FlagWrites::collect(&branch.add_flags, &branch.remove_flags, &branch.flags).into_effects()
    })
}

fn branch_target(branch: Option<&RawBranch>) -> Option<String> {
    branch
        .and_then(|branch| branch.next_scene.as_deref())
        .and_then(normalize_scene_target)
}

/// Unconditional effects, in fixed order: set flags, cleared flags, xp,
/// relationship changes, immediate actions, narrative text, then items and
/// quests.
fn compile_effects(effects: &RawEffects) -> Vec<Effect> {
    let mut compiled =
        FlagWrites::collect(&effects.add_flags, &effects.remove_flags, &effects.flags)
            .into_effects();

    if effects.xp != 0 {
        compiled.push(Effect::AddXp { amount: effects.xp });
    }
    compiled.extend(effects.reputation.iter().map(|(character_id, delta)| {
        Effect::ChangeRelationship {
            character_id: character_id.clone(),
            delta: *delta,
        }
    }));
    compiled.extend(effects.immediate.iter().map(|action| Effect::ImmediateAction {
        action: action.action.clone(),
        payload: action.payload.clone(),
    }));
    if let Some(text) = effects.narrative.as_deref().filter(|text| !text.trim().is_empty()) {
        compiled.push(Effect::NarrativeText {
            text: text.to_owned(),
        });
    }
    compiled.extend(effects.items.iter().map(|item| Effect::GrantItem {
        item_id: item.item_id.clone(),
        quantity: item.quantity,
    }));
    compiled.extend(effects.quests.iter().map(|quest| Effect::UpdateQuest {
        quest_id: quest.quest_id.clone(),
        status: quest.status.clone(),
    }));
    compiled
}

fn compile_skill_check(check: &RawSkillCheck, effects: Option<&RawEffects>) -> SkillCheck {
    let difficulty = normalize_difficulty(check.difficulty);
    let on_success = effects.and_then(|effects| effects.on_success.as_ref());
    let on_failure = effects.and_then(|effects| effects.on_failure.as_ref());
    SkillCheck {
        skill: check.skill.clone(),
        dc: difficulty.dc,
        is_legacy: difficulty.is_legacy,
        raw_difficulty: check.difficulty,
        success_text: check.success_text.clone(),
        failure_text: check.failure_text.clone(),
        success_effects: branch_effects(on_success),
        failure_effects: branch_effects(on_failure),
        success_next_scene_id: branch_target(on_success),
        failure_next_scene_id: branch_target(on_failure),
    }
}

fn compose_description(choice: &RawChoice) -> Option<String> {
    let tooltip = choice
        .presentation
        .as_ref()
        .and_then(|presentation| presentation.tooltip.as_deref());
    let success = choice
        .skill_check
        .as_ref()
        .and_then(|check| check.success_text.as_deref());
    let failure = choice
        .skill_check
        .as_ref()
        .and_then(|check| check.failure_text.as_deref());

    let parts: Vec<&str> = [tooltip, success, failure]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join(DESCRIPTION_SEPARATOR))
    }
}

fn resolve_next_scene(choice: &RawChoice) -> Option<String> {
    let own = choice.next_scene.as_deref().and_then(normalize_scene_target);
    if choice.skill_check.is_some() {
        return own;
    }
    let effects = choice.effects.as_ref();
    branch_target(effects.and_then(|effects| effects.on_success.as_ref()))
        .or(own)
        .or_else(|| branch_target(effects.and_then(|effects| effects.on_failure.as_ref())))
}

/// Compiles one authored choice.
#[must_use]
pub fn compile_choice(raw: &RawChoice) -> Choice {
    let effects = raw.effects.as_ref();

    if raw.skill_check.is_none()
        && effects.is_some_and(|effects| effects.on_success.is_some() || effects.on_failure.is_some())
    {
        tracing::warn!(
            choice_id = %raw.id,
            "choice has outcome branches but no skill check; branch effects dropped"
        );
    }

    let requirements = raw.requirements.as_ref();
    Choice {
        id: raw.id.clone(),
        text: raw.text.clone(),
        description: compose_description(raw),
        next_scene_id: resolve_next_scene(raw),
        effects: effects.map_or_else(Vec::new, compile_effects),
        requirements: ChoiceRequirements {
            flags: requirements.map_or_else(Vec::new, |r| r.flags.clone()),
            not_flags: requirements.map_or_else(Vec::new, |r| r.not_flags.clone()),
            skill_check: raw
                .skill_check
                .as_ref()
                .map(|check| compile_skill_check(check, effects)),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::domain::raw::{
        RawImmediateAction, RawItemGrant, RawPresentation, RawQuestUpdate, RawRequirements,
    };

    fn skill_check(difficulty: f64) -> RawSkillCheck {
        RawSkillCheck {
            skill: "perception".to_owned(),
            difficulty,
            success_text: Some("You spot the tripwire.".to_owned()),
            failure_text: Some("You miss it.".to_owned()),
        }
    }

    fn set(flag: &str) -> Effect {
        Effect::SetFlag {
            flag: flag.to_owned(),
            value: true,
        }
    }

    fn clear(flag: &str) -> Effect {
        Effect::SetFlag {
            flag: flag.to_owned(),
            value: false,
        }
    }

    // --- difficulty normalization ---

    #[test]
    fn test_legacy_difficulty_is_scaled() {
        assert_eq!(
            normalize_difficulty(11.0),
            NormalizedDifficulty {
                dc: 55,
                is_legacy: true
            }
        );
    }

    #[test]
    fn test_percentile_difficulty_is_used_directly() {
        assert_eq!(
            normalize_difficulty(70.0),
            NormalizedDifficulty {
                dc: 70,
                is_legacy: false
            }
        );
    }

    #[test]
    fn test_invalid_difficulty_falls_back() {
        for raw in [0.0, -3.0, f64::NAN, f64::INFINITY] {
            assert_eq!(
                normalize_difficulty(raw),
                NormalizedDifficulty {
                    dc: FALLBACK_DC,
                    is_legacy: false
                }
            );
        }
    }

    #[test]
    fn test_difficulty_is_clamped() {
        assert_eq!(normalize_difficulty(0.4).dc, MIN_DC);
        assert!(normalize_difficulty(0.4).is_legacy);
        assert_eq!(normalize_difficulty(20.0).dc, 95);
        assert_eq!(normalize_difficulty(250.0).dc, MAX_DC);
    }

    // --- description and target ---

    #[test]
    fn test_description_joins_tooltip_and_check_texts() {
        // Arrange
        let raw = RawChoice {
            id: "look".to_owned(),
            presentation: Some(RawPresentation {
                tooltip: Some("Take a closer look".to_owned()),
            }),
            skill_check: Some(skill_check(12.0)),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert_eq!(
            choice.description.as_deref(),
            Some("Take a closer look · You spot the tripwire. · You miss it.")
        );
    }

    #[test]
    fn test_description_absent_without_parts() {
        // Act
        let choice = compile_choice(&RawChoice::default());

        // Assert
        assert_eq!(choice.description, None);
    }

    #[test]
    fn test_target_prefers_success_branch_without_skill_check() {
        // Arrange
        let raw = RawChoice {
            next_scene: Some("own".to_owned()),
            effects: Some(RawEffects {
                on_success: Some(RawBranch {
                    next_scene: Some("success".to_owned()),
                    ..RawBranch::default()
                }),
                on_failure: Some(RawBranch {
                    next_scene: Some("failure".to_owned()),
                    ..RawBranch::default()
                }),
                ..RawEffects::default()
            }),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert_eq!(choice.next_scene_id.as_deref(), Some("success"));
    }

    #[test]
    fn test_target_falls_back_to_failure_branch() {
        // Arrange
        let raw = RawChoice {
            effects: Some(RawEffects {
                on_failure: Some(RawBranch {
                    next_scene: Some("EXIT".to_owned()),
                    ..RawBranch::default()
                }),
                ..RawEffects::default()
            }),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert_eq!(choice.next_scene_id.as_deref(), Some("END"));
    }

    #[test]
    fn test_skill_check_keeps_own_target_and_carries_branches() {
        // Arrange
        let raw = RawChoice {
            next_scene: Some("own".to_owned()),
            skill_check: Some(skill_check(70.0)),
            effects: Some(RawEffects {
                on_success: Some(RawBranch {
                    add_flags: vec!["trap_disarmed".to_owned()],
                    next_scene: Some("vault".to_owned()),
                    ..RawBranch::default()
                }),
                on_failure: Some(RawBranch {
                    remove_flags: vec!["unharmed".to_owned()],
                    next_scene: Some("infirmary".to_owned()),
                    ..RawBranch::default()
                }),
                ..RawEffects::default()
            }),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert_eq!(choice.next_scene_id.as_deref(), Some("own"));
        assert!(choice.effects.is_empty());
        let check = choice.requirements.skill_check.unwrap();
        assert_eq!(check.dc, 70);
        assert!(!check.is_legacy);
        assert_eq!(check.success_effects, vec![set("trap_disarmed")]);
        assert_eq!(check.failure_effects, vec![clear("unharmed")]);
        assert_eq!(check.success_next_scene_id.as_deref(), Some("vault"));
        assert_eq!(check.failure_next_scene_id.as_deref(), Some("infirmary"));
    }

    #[test]
    fn test_branches_without_skill_check_are_not_merged() {
        // Arrange
        let raw = RawChoice {
            effects: Some(RawEffects {
                on_success: Some(RawBranch {
                    add_flags: vec!["lucky".to_owned()],
                    ..RawBranch::default()
                }),
                ..RawEffects::default()
            }),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert!(choice.effects.is_empty());
        assert!(choice.requirements.skill_check.is_none());
    }

    // --- effects ---

    #[test]
    fn test_flag_writes_last_write_wins() {
        // Arrange
        let raw = RawEffects {
            add_flags: vec!["a".to_owned(), "b".to_owned()],
            remove_flags: vec!["a".to_owned(), "c".to_owned()],
            flags: vec![
                RawFlagWrite {
                    key: "c".to_owned(),
                    value: true,
                },
                RawFlagWrite {
                    key: "b".to_owned(),
                    value: false,
                },
            ],
            ..RawEffects::default()
        };

        // Act
        let effects = compile_effects(&raw);

        // Assert
        assert_eq!(effects, vec![set("c"), clear("a"), clear("b")]);
    }

    #[test]
    fn test_effect_order_is_fixed() {
        // Arrange
        let raw = RawEffects {
            add_flags: vec!["met_mira".to_owned()],
            remove_flags: vec!["stranger".to_owned()],
            xp: 25,
            reputation: BTreeMap::from([("mira".to_owned(), 2), ("guard".to_owned(), -1)]),
            immediate: vec![RawImmediateAction {
                action: "open_map".to_owned(),
                payload: serde_json::Value::Null,
            }],
            narrative: Some("Mira nods.".to_owned()),
            items: vec![RawItemGrant {
                item_id: "lantern".to_owned(),
                quantity: 1,
            }],
            quests: vec![RawQuestUpdate {
                quest_id: "find_mira".to_owned(),
                status: "completed".to_owned(),
            }],
            ..RawEffects::default()
        };

        // Act
        let effects = compile_effects(&raw);

        // Assert
        assert_eq!(
            effects,
            vec![
                set("met_mira"),
                clear("stranger"),
                Effect::AddXp { amount: 25 },
                Effect::ChangeRelationship {
                    character_id: "guard".to_owned(),
                    delta: -1
                },
                Effect::ChangeRelationship {
                    character_id: "mira".to_owned(),
                    delta: 2
                },
                Effect::ImmediateAction {
                    action: "open_map".to_owned(),
                    payload: serde_json::Value::Null
                },
                Effect::NarrativeText {
                    text: "Mira nods.".to_owned()
                },
                Effect::GrantItem {
                    item_id: "lantern".to_owned(),
                    quantity: 1
                },
                Effect::UpdateQuest {
                    quest_id: "find_mira".to_owned(),
                    status: "completed".to_owned()
                },
            ]
        );
    }

    #[test]
    fn test_zero_xp_is_omitted() {
        // Act
        let effects = compile_effects(&RawEffects::default());

        // Assert
        assert!(effects.is_empty());
    }

    #[test]
    fn test_requirements_are_copied() {
        // Arrange
        let raw = RawChoice {
            requirements: Some(RawRequirements {
                flags: vec!["has_key".to_owned()],
                not_flags: vec!["door_open".to_owned()],
            }),
            ..RawChoice::default()
        };

        // Act
        let choice = compile_choice(&raw);

        // Assert
        assert_eq!(choice.requirements.flags, vec!["has_key".to_owned()]);
        assert_eq!(choice.requirements.not_flags, vec!["door_open".to_owned()]);
    }
}
