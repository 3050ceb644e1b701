//! Shared helpers for validator integration tests.
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use novella_validator::config::{LogFormat, ReportFormat, ValidatorConfig};
use tempfile::TempDir;

/// A throwaway project tree: `content/` for chapters, `public/` for assets.
pub struct Project {
    pub root: TempDir,
}

impl Project {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        fs::create_dir_all(root.path().join("content")).unwrap();
        fs::create_dir_all(root.path().join("public")).unwrap();
        Self { root }
    }

    pub fn content_dir(&self) -> PathBuf {
        self.root.path().join("content")
    }

    /// Writes a chapter file under `content/`.
    pub fn chapter(&self, file_name: &str, body: &str) -> &Self {
        fs::write(self.content_dir().join(file_name), body).unwrap();
        self
    }

    /// Creates an empty asset file under `public/`.
    pub fn asset(&self, public_path: &str) -> &Self {
        let path = self.root.path().join("public").join(public_path.trim_start_matches('/'));
        fs::create_dir_all(path.parent().unwrap_or(Path::new("."))).unwrap();
        fs::write(path, b"asset").unwrap();
        self
    }

    pub fn config(&self) -> ValidatorConfig {
        ValidatorConfig {
            content_dir: self.content_dir(),
            asset_dirs: vec![self.root.path().join("public")],
            asset_roots: vec!["/images/".to_owned(), "/audio/".to_owned()],
            log_format: LogFormat::Text,
            report_format: ReportFormat::Text,
        }
    }
}
