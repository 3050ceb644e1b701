//! Namespaced scene registry.
//!
//! Scenes are stored per chapter under their short id, with a global index
//! from short id to the chapters that define it. The registry is built once
//! at startup and passed by reference to every consumer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use novella_content::application::scene_converter::convert_scene;
use novella_content::domain::raw::RawScene;
use novella_content::domain::scene::SceneDefinition;
use novella_core::error::ContentError;
use novella_core::ids::{ChapterId, SceneId, SceneRef};
use sha2::{Digest, Sha256};

/// Non-fatal registration problems.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationWarningKind {
    /// A scene with the same short id was already registered in the chapter
    /// and has been overwritten.
    DuplicateScene,
    /// The scene id carried a chapter prefix naming another chapter.
    NamespaceMismatch {
        /// The chapter named by the prefix.
        declared_chapter: String,
    },
}

/// A warning emitted during registration, kept for later reporting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationWarning {
    pub chapter_id: String,
    pub scene_id: String,
    pub kind: RegistrationWarningKind,
}

impl fmt::Display for RegistrationWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            RegistrationWarningKind::DuplicateScene => write!(
                f,
                "duplicate scene '{}' in chapter '{}' overwritten",
                self.scene_id, self.chapter_id
            ),
            RegistrationWarningKind::NamespaceMismatch { declared_chapter } => write!(
                f,
                "scene '{declared_chapter}:{}' registered under chapter '{}'",
                self.scene_id, self.chapter_id
            ),
        }
    }
}

/// Registry of converted scenes, keyed by chapter and short scene id.
#[derive(Debug, Default)]
pub struct SceneRegistry {
    chapters: BTreeMap<ChapterId, BTreeMap<SceneId, SceneDefinition>>,
    global_index: BTreeMap<SceneId, BTreeSet<ChapterId>>,
    warnings: Vec<RegistrationWarning>,
}

impl SceneRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Converts and registers every scene of a chapter.
    ///
    /// Scene ids may already carry a chapter prefix; it is stripped, with a
    /// warning when it names a different chapter. A short id registered
    /// twice in one chapter is overwritten with a warning. The chapter is
    /// registered all-or-nothing: on error nothing is inserted.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Validation` if the chapter id or any short
    /// scene id is malformed or reserved.
    pub fn register_chapter<'a, I>(
        &mut self,
        chapter_id: &str,
        scenes: I,
    ) -> Result<usize, ContentError>
    where
        I: IntoIterator<Item = &'a RawScene>,
    {
        let chapter = ChapterId::parse(chapter_id)?;

        let mut converted = Vec::new();
        let mut warnings = Vec::new();
        for raw in scenes {
            let short = match SceneRef::parse(&raw.id) {
                SceneRef::Qualified {
                    chapter: declared,
                    scene,
                } => {
                    if declared != chapter.as_str() {
                        warnings.push(RegistrationWarning {
                            chapter_id: chapter.to_string(),
                            scene_id: scene.to_owned(),
                            kind: RegistrationWarningKind::NamespaceMismatch {
                                declared_chapter: declared.to_owned(),
                            },
                        });
                    }
                    scene
                }
                SceneRef::Unqualified(_) | SceneRef::End => raw.id.as_str(),
            };
            let scene_id = SceneId::parse(short)?;

            let definition = if short == raw.id {
                convert_scene(chapter.as_str(), raw)?
            } else {
                let mut renamed = raw.clone();
                renamed.id = short.to_owned();
                convert_scene(chapter.as_str(), &renamed)?
            };
            converted.push((scene_id, definition));
        }

        let count = converted.len();
        let chapter_scenes = self.chapters.entry(chapter.clone()).or_default();
        for (scene_id, definition) in converted {
            if chapter_scenes.contains_key(&scene_id) {
                warnings.push(RegistrationWarning {
                    chapter_id: chapter.to_string(),
                    scene_id: scene_id.to_string(),
                    kind: RegistrationWarningKind::DuplicateScene,
                });
            }
            self.global_index
                .entry(scene_id.clone())
                .or_default()
                .insert(chapter.clone());
            chapter_scenes.insert(scene_id, definition);
        }

        for warning in &warnings {
            tracing::warn!(
                chapter_id = %warning.chapter_id,
                scene_id = %warning.scene_id,
                "{warning}"
            );
        }
        self.warnings.extend(warnings);

        tracing::debug!(chapter_id = %chapter, scenes = count, "registered chapter");
        Ok(count)
    }

    fn lookup(&self, chapter_id: &str, scene_id: &str) -> Option<&SceneDefinition> {
        self.chapters.get(chapter_id)?.get(scene_id)
    }

    /// Resolves a scene reference.
    ///
    /// Precedence: `END`/empty resolves to `None`; `chapter:scene` is looked
    /// up in exactly that chapter; a bare id is tried in `current_chapter_id`
    /// first, then in the global index.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::AmbiguousReference` if a bare id that did not
    /// resolve locally is defined in two or more chapters.
    pub fn resolve(
        &self,
        current_chapter_id: Option<&str>,
        target: &str,
    ) -> Result<Option<&SceneDefinition>, ContentError> {
        let short = match SceneRef::parse(target) {
            SceneRef::End => return Ok(None),
            SceneRef::Qualified { chapter, scene } => return Ok(self.lookup(chapter, scene)),
            SceneRef::Unqualified(short) => short,
        };

        if let Some(local) = current_chapter_id.and_then(|chapter| self.lookup(chapter, short)) {
            return Ok(Some(local));
        }

        let Some(candidates) = self.global_index.get(short) else {
            return Ok(None);
        };
        let mut chapters = candidates.iter();
        match (chapters.next(), chapters.next()) {
            (None, _) => Ok(None),
            (Some(only), None) => Ok(self.lookup(only.as_str(), short)),
            (Some(_), Some(_)) => Err(ContentError::AmbiguousReference {
                reference: target.to_owned(),
                chapters: candidates.iter().map(ToString::to_string).collect(),
            }),
        }
    }

    /// Context-free lookup for legacy callers. Ambiguity is logged and
    /// treated as a miss.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&SceneDefinition> {
        match self.resolve(None, id) {
            Ok(scene) => scene,
            Err(err) => {
                tracing::warn!(scene_id = %id, "{err}");
                None
            }
        }
    }

    /// Returns the owning chapter of a scene id: the prefix of a registered
    /// FQN, or the single chapter defining a globally unique short id.
    #[must_use]
    pub fn get_chapter_id(&self, scene_id: &str) -> Option<&str> {
        match SceneRef::parse(scene_id) {
            SceneRef::End => None,
            SceneRef::Qualified { chapter, scene } => {
                let (owner, scenes) = self.chapters.get_key_value(chapter)?;
                scenes.contains_key(scene).then_some(owner.as_str())
            }
            SceneRef::Unqualified(short) => {
                let candidates = self.global_index.get(short)?;
                if candidates.len() == 1 {
                    candidates.first().map(ChapterId::as_str)
                } else {
                    None
                }
            }
        }
    }

    /// Every registered scene keyed by FQN, in FQN order.
    #[must_use]
    pub fn get_all_scenes_flat(&self) -> BTreeMap<&str, &SceneDefinition> {
        self.chapters
            .values()
            .flat_map(BTreeMap::values)
            .map(|scene| (scene.id.as_str(), scene))
            .collect()
    }

    /// Number of registered scenes across all chapters.
    #[must_use]
    pub fn scene_count(&self) -> usize {
        self.chapters.values().map(BTreeMap::len).sum()
    }

    /// Registered chapter ids, sorted.
    pub fn chapter_ids(&self) -> impl Iterator<Item = &str> {
        self.chapters.keys().map(ChapterId::as_str)
    }

    /// Warnings emitted so far, in emission order.
    #[must_use]
    pub fn warnings(&self) -> &[RegistrationWarning] {
        &self.warnings
    }

    /// SHA-256 over the canonical JSON of all scenes in FQN order. Identical
    /// content yields an identical hash.
    ///
    /// # Panics
    ///
    /// Never in practice: scene definitions always serialize.
    #[must_use]
    pub fn version_hash(&self) -> String {
        let mut hasher = Sha256::new();
        for (fqn, scene) in self.get_all_scenes_flat() {
            // Serialization of derived Serialize types is infallible.
            let body =
                serde_json::to_vec(scene).expect("SceneDefinition serialization is infallible");
            hasher.update(fqn.as_bytes());
            hasher.update(&body);
        }
        format!("{:x}", hasher.finalize())
    }
}
