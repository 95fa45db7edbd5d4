//! Local file selection and content types
//!
//! Expands the include patterns of a static website against its root
//! directory, and guesses the content type each uploaded object is served
//! with.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use glob::{MatchOptions, Pattern};
use tracing::debug;

use crate::error::{Error, Result};

/// Pattern used when no include patterns are given: every file, recursively
pub const DEFAULT_PATTERN: &str = "**/*";

/// Content type used when the extension is unknown or absent
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// A file matched under the website root
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    /// Path relative to the root, `/`-separated; also the object key
    pub key: String,

    /// Path as matched on disk, used as the upload source
    pub path: PathBuf,
}

/// Select the files under `static_directory` matching `included_files`.
///
/// Returns files in pattern order and then glob order, without duplicate
/// keys. Directories never match. A directory that does not exist simply
/// yields no files. A match outside the root, or one whose name is not
/// UTF-8, is an `InvalidPattern` error rather than a rewritten key.
pub fn select_files(
    static_directory: &Path,
    included_files: Option<&[String]>,
) -> Result<Vec<SelectedFile>> {
    let patterns: Vec<&str> = match included_files {
        Some(patterns) => patterns.iter().map(String::as_str).collect(),
        None => vec![DEFAULT_PATTERN],
    };

    let root = static_directory.to_string_lossy();
    let root = if root.is_empty() { ".".into() } else { root };
    let base = Pattern::escape(root.trim_end_matches('/'));

    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for pattern in patterns {
        let full = format!("{base}/{}", widen(pattern));
        let entries = glob::glob_with(&full, MatchOptions::new())
            .map_err(|e| Error::InvalidPattern(format!("{pattern}: {e}")))?;

        for entry in entries {
            let path = match entry {
                Ok(path) => path,
                Err(e) => {
                    debug!(error = %e, "skipping unreadable path");
                    continue;
                }
            };
            if !path.is_file() {
                continue;
            }

            let key = relative_key(static_directory, &path)
                .map_err(|reason| Error::InvalidPattern(format!("{pattern}: {reason}")))?;
            if seen.insert(key.clone()) {
                files.push(SelectedFile { key, path });
            }
        }
    }

    debug!(directory = %static_directory.display(), count = files.len(), "selected files");
    Ok(files)
}

/// Guess the content type of a file from its extension.
pub fn content_type_for(path: &str) -> String {
    mime_guess::from_path(path)
        .first_raw()
        .unwrap_or(DEFAULT_CONTENT_TYPE)
        .to_string()
}

/// A trailing `**` only matches directories; widen it so it yields files.
fn widen(pattern: &str) -> String {
    let pattern = pattern.strip_prefix("./").unwrap_or(pattern);
    if pattern == "**" || pattern.ends_with("/**") {
        format!("{pattern}/*")
    } else {
        pattern.to_string()
    }
}

fn relative_key(root: &Path, path: &Path) -> std::result::Result<String, String> {
    // glob may or may not keep a leading `./` of the root
    let bare_root: PathBuf = root
        .components()
        .filter(|c| !matches!(c, Component::CurDir))
        .collect();
    let relative = path
        .strip_prefix(root)
        .or_else(|_| path.strip_prefix(&bare_root))
        .map_err(|_| format!("{} is outside {}", path.display(), root.display()))?;

    let mut parts = Vec::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => match part.to_str() {
                Some(part) => parts.push(part),
                None => return Err(format!("{} is not valid UTF-8", path.display())),
            },
            Component::CurDir => {}
            _ => return Err(format!("{} is outside {}", path.display(), root.display())),
        }
    }
    Ok(parts.join("/"))
}
