//! Asset path normalization.
//!
//! Authors write asset paths in several shapes (`public/images/a.png`,
//! `./images\a.PNG`, `/images//a.png`). They all canonicalize to a rooted,
//! forward-slashed path with a lowercase extension: `/images/a.png`.

const PUBLIC_SEGMENT: &str = "public";

/// Returns true for remote assets, which are never touched or checked.
#[must_use]
pub fn is_remote(path: &str) -> bool {
    path.starts_with("http")
}

/// Canonicalizes an authored asset path. Empty input yields `None`; remote
/// URLs are returned trimmed but otherwise unchanged.
#[must_use]
pub fn normalize_asset_path(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if is_remote(trimmed) {
        return Some(trimmed.to_owned());
    }

    let forward = trimmed.replace('\\', "/");
    let mut segments: Vec<&str> = forward
        .split('/')
        .filter(|segment| !segment.is_empty() && *segment != ".")
        .collect();
    if segments.first() == Some(&PUBLIC_SEGMENT) {
        segments.remove(0);
    }
    if segments.is_empty() {
        return None;
    }

    Some(format!("/{}", lowercase_extension(&segments.join("/"))))
}

/// Normalizes an optional authored path.
#[must_use]
pub fn normalize_optional(raw: Option<&str>) -> Option<String> {
    raw.and_then(normalize_asset_path)
}

fn lowercase_extension(path: &str) -> String {
    let file_start = path.rfind('/').map_or(0, |idx| idx + 1);
    match path[file_start..].rfind('.') {
        Some(dot) if dot > 0 => {
            let split = file_start + dot;
            format!("{}{}", &path[..split], path[split..].to_ascii_lowercase())
        }
        _ => path.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_public_prefix() {
        assert_eq!(
            normalize_asset_path("public/images/bg/forest.png").as_deref(),
            Some("/images/bg/forest.png")
        );
        assert_eq!(
            normalize_asset_path("/public/images/bg/forest.png").as_deref(),
            Some("/images/bg/forest.png")
        );
    }

    #[test]
    fn test_normalize_fixes_slashes_and_extension_case() {
        assert_eq!(
            normalize_asset_path(r".\images\\Bg\Forest.PNG").as_deref(),
            Some("/images/Bg/Forest.png")
        );
        assert_eq!(
            normalize_asset_path("images//audio.v2/theme.MP3").as_deref(),
            Some("/images/audio.v2/theme.mp3")
        );
    }

    #[test]
    fn test_normalize_keeps_dotfiles_and_extensionless_paths() {
        assert_eq!(
            normalize_asset_path("/images/.hidden").as_deref(),
            Some("/images/.hidden")
        );
        assert_eq!(
            normalize_asset_path("audio/theme").as_deref(),
            Some("/audio/theme")
        );
    }

    #[test]
    fn test_normalize_leaves_remote_urls_alone() {
        let url = "https://cdn.example.com/Images/A.PNG";
        assert_eq!(normalize_asset_path(url).as_deref(), Some(url));
    }

    #[test]
    fn test_normalize_drops_empty_paths() {
        assert_eq!(normalize_asset_path("   "), None);
        assert_eq!(normalize_asset_path("public/"), None);
        assert_eq!(normalize_optional(None), None);
    }

    #[test]
    fn test_normalize_treats_bare_public_dir_as_absent() {
        for raw in ["public", "/public", "./public/", r"public\", "public/./"] {
            // Act
            let normalized = normalize_asset_path(raw);

            // Assert
            assert_eq!(normalized, None, "{raw:?}");
        }
        assert_eq!(
            normalize_asset_path("public/publicity.png").as_deref(),
            Some("/publicity.png")
        );
    }
}
