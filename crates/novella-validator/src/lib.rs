//! Novella — offline scene-graph validator.
//!
//! Walks every registered scene and reports missing assets, dead ends and
//! broken navigation targets in one pass.

pub mod assets;
pub mod config;
pub mod error;
pub mod graph;
pub mod report;

use std::process::ExitCode;

use novella_content::application::loader::{ChapterSource, load_content_dir};
use novella_narrative::domain::registry::SceneRegistry;

use crate::assets::AssetChecker;
use crate::config::ValidatorConfig;
use crate::error::AppError;
use crate::graph::GraphValidator;
use crate::report::ValidationReport;

/// Registers every loaded chapter into a fresh registry.
///
/// # Errors
///
/// Returns `AppError::Content` on the first malformed chapter or scene id.
pub fn build_registry(chapters: &[ChapterSource]) -> Result<SceneRegistry, AppError> {
    let mut registry = SceneRegistry::new();
    for chapter in chapters {
        registry.register_chapter(&chapter.chapter_id, &chapter.scenes)?;
    }
    Ok(registry)
}

/// Loads the content directory, builds the registry and validates it.
///
/// # Errors
///
/// Returns `AppError::Content` if content cannot be loaded or registered.
/// Content-quality problems are not errors; they are in the report.
pub fn run(config: &ValidatorConfig) -> Result<ValidationReport, AppError> {
    let chapters = load_content_dir(&config.content_dir)?;
    let registry = build_registry(&chapters)?;
    tracing::info!(
        chapters = chapters.len(),
        scenes = registry.scene_count(),
        "registry built"
    );

    let assets = AssetChecker::new(&config.asset_roots, &config.asset_dirs);
    Ok(GraphValidator::new(&registry, assets).validate())
}

/// Process exit status for a finished run: success only when the report
/// holds no errors. Warnings never fail the run.
#[must_use]
pub fn exit_status(report: &ValidationReport) -> ExitCode {
    if report.has_errors() {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::{Issue, IssueKind, Severity};

    fn report_with(issues: Vec<Issue>) -> ValidationReport {
        ValidationReport {
            chapters: vec!["c1".to_owned()],
            scene_count: 1,
            version_hash: "abc".to_owned(),
            issues,
        }
    }

    #[test]
    fn test_exit_status_succeeds_with_only_warnings() {
        // Arrange
        let report = report_with(vec![Issue {
            severity: Severity::Warning,
            scene_id: "c1:a".to_owned(),
            kind: IssueKind::Registration {
                message: "duplicate".to_owned(),
            },
        }]);

        // Act
        let status = exit_status(&report);

        // Assert
        assert_eq!(status, ExitCode::SUCCESS);
    }

    #[test]
    fn test_exit_status_fails_on_any_error() {
        // Arrange
        let report = report_with(vec![Issue {
            severity: Severity::Error,
            scene_id: "c1:a".to_owned(),
            kind: IssueKind::DeadEnd,
        }]);

        // Act
        let status = exit_status(&report);

        // Assert
        assert_eq!(status, ExitCode::FAILURE);
    }
}
