//! Asset existence checks.

use std::path::PathBuf;

use novella_content::domain::assets::is_remote;

/// Outcome of checking one asset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetStatus {
    /// Remote URL; not checked.
    Remote,
    Found,
    Missing,
    /// The path starts with none of the known asset roots.
    UnknownRoot,
}

/// Checks normalized asset paths against the filesystem.
#[derive(Debug, Clone)]
pub struct AssetChecker<'a> {
    roots: &'a [String],
    base_dirs: &'a [PathBuf],
}

impl<'a> AssetChecker<'a> {
    /// `roots` are the known prefixes (`/images/`); `base_dirs` the candidate
    /// directories an asset may live under.
    #[must_use]
    pub fn new(roots: &'a [String], base_dirs: &'a [PathBuf]) -> Self {
        Self { roots, base_dirs }
    }

    #[must_use]
    pub fn check(&self, path: &str) -> AssetStatus {
        if is_remote(path) {
            return AssetStatus::Remote;
        }
        if !self.roots.iter().any(|root| path.starts_with(root.as_str())) {
            return AssetStatus::UnknownRoot;
        }

        let relative = path.trim_start_matches('/');
        if self
            .base_dirs
            .iter()
            .any(|base| base.join(relative).is_file())
        {
            AssetStatus::Found
        } else {
            AssetStatus::Missing
        }
    }
}
