//! Validator configuration, read from environment variables.

use std::path::PathBuf;

use crate::error::AppError;

const DEFAULT_CONTENT_DIR: &str = "content";
const DEFAULT_ASSET_DIRS: &str = "public,.";
const DEFAULT_ASSET_ROOTS: &str = "/images/,/audio/,/music/,/video/,/assets/";

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

/// Report output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

/// Everything the validator needs to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatorConfig {
    /// Directory of chapter files (`NOVELLA_CONTENT_DIR`).
    pub content_dir: PathBuf,
    /// Candidate base directories for asset files (`NOVELLA_ASSET_DIRS`).
    pub asset_dirs: Vec<PathBuf>,
    /// Known asset-root prefixes (`NOVELLA_ASSET_ROOTS`).
    pub asset_roots: Vec<String>,
    /// `NOVELLA_LOG_FORMAT`.
    pub log_format: LogFormat,
    /// `NOVELLA_REPORT_FORMAT`.
    pub report_format: ReportFormat,
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_format(name: &str, raw: Option<String>) -> Result<bool, AppError> {
    match raw.as_deref().map(str::trim) {
        None | Some("" | "text") => Ok(false),
        Some("json") => Ok(true),
        Some(other) => Err(AppError::Config(format!(
            "{name} must be 'text' or 'json', got '{other}'"
        ))),
    }
}

impl ValidatorConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name
    /// to its value.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a variable holds an invalid value or a
    /// list variable is empty.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let content_dir = lookup("NOVELLA_CONTENT_DIR")
            .filter(|dir| !dir.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CONTENT_DIR.to_owned());

        let asset_dirs: Vec<PathBuf> = split_list(
            &lookup("NOVELLA_ASSET_DIRS").unwrap_or_else(|| DEFAULT_ASSET_DIRS.to_owned()),
        )
        .into_iter()
        .map(PathBuf::from)
        .collect();
        if asset_dirs.is_empty() {
            return Err(AppError::Config(
                "NOVELLA_ASSET_DIRS must name at least one directory".to_owned(),
            ));
        }

        let asset_roots =
            split_list(&lookup("NOVELLA_ASSET_ROOTS").unwrap_or_else(|| DEFAULT_ASSET_ROOTS.to_owned()));
        if asset_roots.is_empty() {
            return Err(AppError::Config(
                "NOVELLA_ASSET_ROOTS must name at least one prefix".to_owned(),
            ));
        }
        if let Some(root) = asset_roots.iter().find(|root| !root.starts_with('/')) {
            return Err(AppError::Config(format!(
                "asset root '{root}' must start with '/'"
            )));
        }

        let log_format = if parse_format("NOVELLA_LOG_FORMAT", lookup("NOVELLA_LOG_FORMAT"))? {
            LogFormat::Json
        } else {
            LogFormat::Text
        };
        let report_format =
            if parse_format("NOVELLA_REPORT_FORMAT", lookup("NOVELLA_REPORT_FORMAT"))? {
                ReportFormat::Json
            } else {
                ReportFormat::Text
            };

        Ok(Self {
            content_dir: PathBuf::from(content_dir),
            asset_dirs,
            asset_roots,
            log_format,
            report_format,
        })
    }
}
