//! Scene-graph validation.
//!
//! One pass over every registered scene. Issues are collected, never thrown,
//! so authors see every defect from a single run.

use novella_content::domain::scene::SceneDefinition;
use novella_core::error::ContentError;
use novella_core::ids::END_SCENE_ID;
use novella_narrative::domain::registry::SceneRegistry;

use crate::assets::{AssetChecker, AssetStatus};
use crate::report::{Issue, IssueKind, Severity, ValidationReport};

/// Validates a registry against the asset tree.
#[derive(Debug)]
pub struct GraphValidator<'a> {
    registry: &'a SceneRegistry,
    assets: AssetChecker<'a>,
}

impl<'a> GraphValidator<'a> {
    #[must_use]
    pub fn new(registry: &'a SceneRegistry, assets: AssetChecker<'a>) -> Self {
        Self { registry, assets }
    }

    /// Runs every check and aggregates the findings.
    #[must_use]
    pub fn validate(&self) -> ValidationReport {
        let mut issues = Vec::new();

        for warning in self.registry.warnings() {
            record(
                &mut issues,
                Severity::Warning,
                &format!("{}:{}", warning.chapter_id, warning.scene_id),
                IssueKind::Registration {
                    message: warning.to_string(),
                },
            );
        }

        let scenes = self.registry.get_all_scenes_flat();
        for scene in scenes.values() {
            self.check_assets(scene, &mut issues);
            check_dead_end(scene, &mut issues);
            self.check_links(scene, &mut issues);
            check_legacy_difficulty(scene, &mut issues);
        }

        ValidationReport {
            chapters: self.registry.chapter_ids().map(str::to_owned).collect(),
            scene_count: scenes.len(),
            version_hash: self.registry.version_hash(),
            issues,
        }
    }

    fn check_assets(&self, scene: &SceneDefinition, issues: &mut Vec<Issue>) {
        let mut fields: Vec<(String, &str)> = Vec::new();
        if let Some(background) = scene.background.as_deref() {
            fields.push(("background".to_owned(), background));
        }
        if let Some(music) = scene.music.as_deref() {
            fields.push(("music".to_owned(), music));
        }
        for line in &scene.lines {
            if let Some(background) = line.background.as_deref() {
                fields.push((format!("background of line '{}'", line.id), background));
            }
        }
        for character in &scene.characters {
            if let Some(portrait) = character.portrait_url.as_deref() {
                fields.push((format!("portrait of '{}'", character.id), portrait));
            }
        }

        for (field, path) in fields {
            let kind = match self.assets.check(path) {
                AssetStatus::Remote | AssetStatus::Found => continue,
                AssetStatus::Missing => IssueKind::MissingAsset {
                    field,
                    path: path.to_owned(),
                },
                AssetStatus::UnknownRoot => IssueKind::UnknownAssetRoot {
                    field,
                    path: path.to_owned(),
                },
            };
            record(issues, Severity::Error, &scene.id, kind);
        }
    }

    fn check_links(&self, scene: &SceneDefinition, issues: &mut Vec<Issue>) {
        let mut links: Vec<(String, &str)> = Vec::new();
        for line in &scene.lines {
            if let Some(transition) = &line.transition {
                links.push(("transition".to_owned(), transition.next_scene_id.as_str()));
            }
            for choice in line.choices() {
                for target in choice.targets() {
                    links.push((format!("choice '{}'", choice.id), target));
                }
            }
        }

        for (via, target) in links {
            if target == END_SCENE_ID {
                continue;
            }
            let kind = match self.registry.resolve(Some(scene.chapter_id.as_str()), target) {
                Ok(Some(_)) => continue,
                Ok(None) => IssueKind::BrokenLink {
                    via,
                    target: target.to_owned(),
                },
                Err(ContentError::AmbiguousReference { chapters, .. }) => IssueKind::AmbiguousLink {
                    via,
                    target: target.to_owned(),
                    chapters,
                },
                Err(other) => IssueKind::BrokenLink {
                    via: format!("{via} ({other})"),
                    target: target.to_owned(),
                },
            };
            record(issues, Severity::Error, &scene.id, kind);
        }
    }
}

fn check_dead_end(scene: &SceneDefinition, issues: &mut Vec<Issue>) {
    let Some(terminal) = scene.terminal_line() else {
        return;
    };
    if terminal.choices().is_empty() && terminal.transition.is_none() && !scene.is_terminal {
        record(issues, Severity::Error, &scene.id, IssueKind::DeadEnd);
    }
}

fn check_legacy_difficulty(scene: &SceneDefinition, issues: &mut Vec<Issue>) {
    for choice in scene.lines.iter().flat_map(|line| line.choices()) {
        if let Some(check) = choice
            .requirements
            .skill_check
            .as_ref()
            .filter(|check| check.is_legacy)
        {
            record(
                issues,
                Severity::Warning,
                &scene.id,
                IssueKind::LegacyDifficulty {
                    choice_id: choice.id.clone(),
                    raw: check.raw_difficulty.to_string(),
                },
            );
        }
    }
}

fn record(issues: &mut Vec<Issue>, severity: Severity, scene_id: &str, kind: IssueKind) {
    let issue = Issue {
        severity,
        scene_id: scene_id.to_owned(),
        kind,
    };
    match severity {
        Severity::Error => tracing::error!(scene_id = %issue.scene_id, "{issue}"),
        Severity::Warning => tracing::warn!(scene_id = %issue.scene_id, "{issue}"),
    }
    issues.push(issue);
}
