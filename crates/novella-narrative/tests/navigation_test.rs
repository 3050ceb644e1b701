//! Navigation over chapters loaded from disk.

use std::fs;

use novella_content::application::loader::load_content_dir;
use novella_core::error::ContentError;
use novella_narrative::application::query_handlers::{get_choice_views, get_visual_novel_scene};
use novella_narrative::domain::registry::SceneRegistry;
use novella_test_support::flag_set;

const CHAPTER1: &str = r"
start:
  dialogue:
    - speaker: Mira
      text: Where to?
  choices:
    - id: map
      text: Open the map
      nextScene: exit_to_map
    - id: camp
      text: Return to camp
      nextScene: camp
      requirements:
        flags: [camp_found]
    - id: quit
      text: Leave
      nextScene: EXIT
exit_to_map:
  isTerminal: true
camp:
  isTerminal: true
";

const CHAPTER2: &str = r"
camp:
  dialogue:
    - text: Embers.
  nextScene: chapter1:start
";

fn registry() -> SceneRegistry {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("chapter1.yaml"), CHAPTER1).unwrap();
    fs::write(dir.path().join("chapter2.yml"), CHAPTER2).unwrap();

    let mut registry = SceneRegistry::new();
    for chapter in load_content_dir(dir.path()).unwrap() {
        registry
            .register_chapter(&chapter.chapter_id, &chapter.scenes)
            .unwrap();
    }
    registry
}

#[test]
fn test_qualified_and_unique_short_ids_resolve_to_same_scene() {
    // Arrange
    let registry = registry();

    // Act
    let qualified = registry.resolve(None, "chapter1:exit_to_map").unwrap().unwrap();
    let short = registry.resolve(None, "exit_to_map").unwrap().unwrap();

    // Assert
    assert_eq!(qualified.id, "chapter1:exit_to_map");
    assert!(std::ptr::eq(qualified, short));
    assert_eq!(registry.get_chapter_id("exit_to_map"), Some("chapter1"));
}

#[test]
fn test_shared_short_id_needs_context() {
    // Arrange
    let registry = registry();

    // Act
    let from_chapter2 = registry.resolve(Some("chapter2"), "camp").unwrap().unwrap();
    let without_context = registry.resolve(None, "camp");

    // Assert
    assert_eq!(from_chapter2.id, "chapter2:camp");
    match without_context {
        Err(ContentError::AmbiguousReference { chapters, .. }) => {
            assert_eq!(chapters, vec!["chapter1".to_owned(), "chapter2".to_owned()]);
        }
        other => panic!("expected AmbiguousReference, got {other:?}"),
    }
    assert!(get_visual_novel_scene(&registry, "camp").is_none());
}

#[test]
fn test_choice_views_for_loaded_scene() {
    // Arrange
    let registry = registry();
    let scene = get_visual_novel_scene(&registry, "chapter1:start").unwrap();
    let line_id = scene.terminal_line().unwrap().id.clone();

    // Act
    let views = get_choice_views(&registry, "chapter1:start", &line_id, &flag_set(&[])).unwrap();

    // Assert
    let ids: Vec<&str> = views.iter().map(|view| view.choice.id.as_str()).collect();
    assert_eq!(ids, vec!["map", "camp", "quit"]);
    assert!(views[1].is_disabled);
    assert_eq!(views[1].lock_reason.as_deref(), Some("Requires: camp_found"));
    assert_eq!(views[2].choice.next_scene_id.as_deref(), Some("END"));
}

#[test]
fn test_cross_chapter_transition_resolves() {
    // Arrange
    let registry = registry();
    let camp = registry.get("chapter2:camp").unwrap();

    // Act
    let target = &camp.terminal_line().unwrap().transition.as_ref().unwrap().next_scene_id;
    let resolved = registry.resolve(Some(camp.chapter_id.as_str()), target).unwrap().unwrap();

    // Assert
    assert_eq!(resolved.id, "chapter1:start");
}
