//! Validation issues and the aggregated report.

use std::fmt;
use std::io::Write;

use serde::Serialize;

/// Issue severity. Any error fails the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Warning => f.write_str("WARNING"),
            Self::Error => f.write_str("ERROR"),
        }
    }
}

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum IssueKind {
    /// An asset path does not exist under any base directory.
    MissingAsset { field: String, path: String },
    /// An asset path starts with none of the known asset roots.
    UnknownAssetRoot { field: String, path: String },
    /// The terminal line leads nowhere and the scene is not marked terminal.
    DeadEnd,
    /// A navigation target resolves to no scene.
    BrokenLink { via: String, target: String },
    /// A navigation target matches scenes in several chapters.
    AmbiguousLink {
        via: String,
        target: String,
        chapters: Vec<String>,
    },
    /// A skill check authored on the legacy 1–20 scale.
    LegacyDifficulty { choice_id: String, raw: String },
    /// A warning raised while registering content.
    Registration { message: String },
}

/// One finding, attributed to a scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Issue {
    pub severity: Severity,
    pub scene_id: String,
    #[serde(flatten)]
    pub kind: IssueKind,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}: ", self.severity, self.scene_id)?;
        match &self.kind {
            IssueKind::MissingAsset { field, path } => {
                write!(f, "missing {field} asset '{path}'")
            }
            IssueKind::UnknownAssetRoot { field, path } => {
                write!(f, "{field} asset '{path}' is outside every known asset root")
            }
            IssueKind::DeadEnd => {
                f.write_str("dead end: terminal line has no choices and no transition")
            }
            IssueKind::BrokenLink { via, target } => {
                write!(f, "broken link via {via}: '{target}' does not resolve")
            }
            IssueKind::AmbiguousLink {
                via,
                target,
                chapters,
            } => write!(
                f,
                "ambiguous link via {via}: '{target}' matches chapters {}",
                chapters.join(", ")
            ),
            IssueKind::LegacyDifficulty { choice_id, raw } => write!(
                f,
                "choice '{choice_id}' uses legacy difficulty {raw}; rescaled to the 5-95 range"
            ),
            IssueKind::Registration { message } => f.write_str(message),
        }
    }
}

/// The result of one validation pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// Registered chapters, in id order.
    pub chapters: Vec<String>,
    pub scene_count: usize,
    pub version_hash: String,
    pub issues: Vec<Issue>,
}

impl ValidationReport {
    fn count(&self, severity: Severity) -> usize {
        self.issues
            .iter()
            .filter(|issue| issue.severity == severity)
            .count()
    }

    #[must_use]
    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    #[must_use]
    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.error_count() > 0
    }

    /// Issues about one scene.
    pub fn issues_for<'a>(&'a self, scene_id: &'a str) -> impl Iterator<Item = &'a Issue> {
        self.issues
            .iter()
            .filter(move |issue| issue.scene_id == scene_id)
    }

    /// Writes the human-readable report: counts first, then every issue,
    /// errors before warnings.
    ///
    /// # Errors
    ///
    /// Returns any I/O error from `out`.
    pub fn write_text<W: Write>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "Chapters:       {}", self.chapters.join(", "))?;
        writeln!(out, "Scenes checked: {}", self.scene_count)?;
        writeln!(out, "Content hash:   {}", self.version_hash)?;
        writeln!(out, "Errors:         {}", self.error_count())?;
        writeln!(out, "Warnings:       {}", self.warning_count())?;

        let mut sorted: Vec<&Issue> = self.issues.iter().collect();
        sorted.sort_by(|a, b| b.severity.cmp(&a.severity));
        if !sorted.is_empty() {
            writeln!(out)?;
        }
        for issue in sorted {
            writeln!(out, "{issue}")?;
        }
        Ok(())
    }
}
