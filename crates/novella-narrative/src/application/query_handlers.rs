//! Query handlers for the Narrative context.
//!
//! Read-only entry points used by the rendering layer.

use novella_content::domain::scene::{Line, SceneDefinition};

use crate::domain::choice_views::{ChoiceView, FlagSet, build_choice_views};
use crate::domain::registry::SceneRegistry;

/// Looks up a scene for display by FQN or globally unique short id.
#[must_use]
pub fn get_visual_novel_scene<'r>(registry: &'r SceneRegistry, id: &str) -> Option<&'r SceneDefinition> {
    registry.get(id)
}

/// Looks up a line within a scene.
#[must_use]
pub fn get_line_by_id<'s>(scene: &'s SceneDefinition, line_id: &str) -> Option<&'s Line> {
    scene.line(line_id)
}

/// Choice views for one line of one scene, or `None` if either is unknown.
#[must_use]
pub fn get_choice_views<'r, F: FlagSet + ?Sized>(
    registry: &'r SceneRegistry,
    scene_id: &str,
    line_id: &str,
    flags: &F,
) -> Option<Vec<ChoiceView<'r>>> {
    let scene = get_visual_novel_scene(registry, scene_id)?;
    let line = get_line_by_id(scene, line_id)?;
    Some(build_choice_views(line, flags))
}
