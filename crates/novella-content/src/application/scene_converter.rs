//! Scene conversion.
//!
//! Builds the runtime line graph for one authored scene. Conversion is a pure
//! function of `(chapter_id, raw scene)`: converting the same input twice
//! yields structurally equal output, derived characters included.

use novella_core::error::ContentError;
use novella_core::ids::{ChapterId, SceneId, format_fqn, normalize_scene_target};

use super::choice_compiler::compile_choice;
use crate::domain::assets::normalize_optional;
use crate::domain::raw::{RawCharacter, RawScene};
use crate::domain::scene::{Advice, Character, DEFAULT_MOOD, Line, SceneDefinition, Transition};
use crate::domain::speakers::SpeakerResolver;

/// Formats the id of the `index`-th line of a scene.
#[must_use]
pub fn line_id(fqn: &str, index: usize) -> String {
    format!("{fqn}__line{index}")
}

fn empty_line(fqn: &str) -> Line {
    Line {
        id: line_id(fqn, 0),
        text: String::new(),
        speaker_id: None,
        mood: DEFAULT_MOOD.to_owned(),
        background: None,
        next_line_id: None,
        choices: None,
        transition: None,
        advices: None,
    }
}

fn authored_character(raw: &RawCharacter) -> Character {
    Character {
        id: raw.id.clone(),
        name: raw.name.clone(),
        color: raw.color.clone(),
        portrait_url: normalize_optional(raw.portrait_url.as_deref()),
        is_derived: false,
    }
}

/// Converts an authored scene into a [`SceneDefinition`].
///
/// # Errors
///
/// Returns `ContentError::Validation` if the chapter id or the scene id is
/// malformed (contains a `.`, for instance).
pub fn convert_scene(chapter_id: &str, raw: &RawScene) -> Result<SceneDefinition, ContentError> {
    let chapter = ChapterId::parse(chapter_id)?;
    let scene = SceneId::parse(&raw.id)?;
    let fqn = format_fqn(&chapter, &scene);

    let mut speakers = SpeakerResolver::new(&raw.characters);
    let mut lines: Vec<Line> = raw
        .dialogue
        .iter()
        .enumerate()
        .map(|(index, entry)| Line {
            id: line_id(&fqn, index),
            text: entry.text.clone(),
            speaker_id: speakers.resolve(
                entry.speaker.as_deref(),
                entry.character_id.as_deref(),
                index,
            ),
            mood: entry
                .mood
                .clone()
                .unwrap_or_else(|| DEFAULT_MOOD.to_owned()),
            background: normalize_optional(entry.background.as_deref()),
            next_line_id: None,
            choices: None,
            transition: None,
            advices: None,
        })
        .collect();

    if lines.is_empty() {
        lines.push(empty_line(&fqn));
    }

    let next_ids: Vec<String> = lines.iter().skip(1).map(|line| line.id.clone()).collect();
    for (line, next_id) in lines.iter_mut().zip(next_ids) {
        line.next_line_id = Some(next_id);
    }

    if let Some(terminal) = lines.last_mut() {
        if let Some(choices) = raw.declared_choices() {
            terminal.choices = Some(choices.iter().map(compile_choice).collect());
        } else if let Some(next_scene_id) =
            raw.next_scene.as_deref().and_then(normalize_scene_target)
        {
            terminal.transition = Some(Transition { next_scene_id });
        }

        if !raw.advices.is_empty() {
            terminal.advices = Some(
                raw.advices
                    .iter()
                    .map(|advice| Advice {
                        character_id: advice.character_id.clone(),
                        text: advice.text.clone(),
                        mood: advice
                            .mood
                            .clone()
                            .unwrap_or_else(|| DEFAULT_MOOD.to_owned()),
                        min_level: advice.min_level,
                    })
                    .collect(),
            );
        }
    }

    let mut characters: Vec<Character> = raw.characters.iter().map(authored_character).collect();
    characters.extend(speakers.finish());

    let entry_line_id = lines
        .first()
        .map_or_else(|| line_id(&fqn, 0), |line| line.id.clone());

    Ok(SceneDefinition {
        title: raw.title.clone().unwrap_or_else(|| scene.to_string()),
        location: raw.location.clone().unwrap_or_default(),
        background: normalize_optional(raw.background.as_deref()),
        music: normalize_optional(raw.music.as_deref()),
        chapter_id: chapter.to_string(),
        entry_line_id,
        characters,
        lines,
        is_terminal: raw.is_terminal,
        id: fqn,
    })
}
