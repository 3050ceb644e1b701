//! Chapter content loading.
//!
//! A content directory holds one file per chapter. The file stem is the
//! chapter id and the body maps scene ids to authored scenes, in YAML or
//! JSON.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use novella_core::error::ContentError;

use crate::domain::raw::RawScene;

/// Supported chapter file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Yaml,
    Json,
}

impl SourceFormat {
    /// Picks a format from a file extension; `None` for anything else.
    #[must_use]
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "yaml" | "yml" => Some(Self::Yaml),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// The raw scenes of one chapter, ready for registration.
#[derive(Debug, Clone, PartialEq)]
pub struct ChapterSource {
    pub chapter_id: String,
    pub scenes: Vec<RawScene>,
}

/// Parses a chapter body. Scenes without an `id` take their map key.
///
/// # Errors
///
/// Returns `ContentError::Source` if the body does not deserialize.
pub fn parse_chapter(
    chapter_id: &str,
    format: SourceFormat,
    body: &str,
) -> Result<ChapterSource, ContentError> {
    let scenes: BTreeMap<String, RawScene> = match format {
        SourceFormat::Yaml => serde_yaml::from_str(body)
            .map_err(|e| ContentError::Source(format!("chapter '{chapter_id}': {e}")))?,
        SourceFormat::Json => serde_json::from_str(body)
            .map_err(|e| ContentError::Source(format!("chapter '{chapter_id}': {e}")))?,
    };

    let scenes = scenes
        .into_iter()
        .map(|(key, mut scene)| {
            if scene.id.is_empty() {
                scene.id = key;
            }
            scene
        })
        .collect();

    Ok(ChapterSource {
        chapter_id: chapter_id.to_owned(),
        scenes,
    })
}

/// Loads one chapter file.
///
/// # Errors
///
/// Returns `ContentError::Source` if the file has an unsupported extension,
/// cannot be read, or does not parse.
pub fn load_chapter_file(path: &Path) -> Result<ChapterSource, ContentError> {
    let format = path
        .extension()
        .and_then(|ext| ext.to_str())
        .and_then(SourceFormat::from_extension)
        .ok_or_else(|| {
            ContentError::Source(format!("unsupported chapter file: {}", path.display()))
        })?;
    let chapter_id = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| ContentError::Source(format!("invalid file name: {}", path.display())))?;
    let body = fs::read_to_string(path)
        .map_err(|e| ContentError::Source(format!("failed to read {}: {e}", path.display())))?;

    let chapter = parse_chapter(chapter_id, format, &body)?;
    tracing::debug!(
        chapter_id = %chapter.chapter_id,
        scenes = chapter.scenes.len(),
        path = %path.display(),
        "loaded chapter file"
    );
    Ok(chapter)
}

/// Loads every chapter file in `dir`, in file-name order. Files with other
/// extensions are skipped.
///
/// # Errors
///
/// Returns `ContentError::Source` if the directory cannot be listed or any
/// chapter file fails to load.
pub fn load_content_dir(dir: &Path) -> Result<Vec<ChapterSource>, ContentError> {
    let entries = fs::read_dir(dir).map_err(|e| {
        ContentError::Source(format!("failed to list {}: {e}", dir.display()))
    })?;

    let mut paths = Vec::new();
    for entry in entries {
        let path = entry
            .map_err(|e| ContentError::Source(format!("failed to list {}: {e}", dir.display())))?
            .path();
        let supported = path
            .extension()
            .and_then(|ext| ext.to_str())
            .and_then(SourceFormat::from_extension)
            .is_some();
        if path.is_file() && supported {
            paths.push(path);
        }
    }
    paths.sort();

    paths.iter().map(|path| load_chapter_file(path)).collect()
}
