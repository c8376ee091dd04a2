//! Cross-platform path utilities for stackup
//!
//! This module provides utilities for handling paths across different platforms
//! (Windows, macOS, Linux) with consistent behavior.

use std::path::{Component, Path, PathBuf};

/// Characters that are unsafe in filesystem paths
/// Replaced with hyphens and collapsed: `/`, `\`, `:`, `*`, `?`, `"`, `<`, `>`, `|`
const PATH_UNSAFE_CHARS: &[char] = &['/', '\\', ':', '*', '?', '"', '<', '>', '|'];

/// Make a module name safe for use as a file name.
///
/// Replaces unsafe characters with hyphens, collapses consecutive hyphens and
/// removes leading/trailing hyphens. Returns "unknown" if the result is empty.
///
/// ```text
/// "@org/sub/pkg" -> "org-sub-pkg"
/// ":::"          -> "unknown"
/// ```
pub fn make_path_safe(name: &str) -> String {
    let key: String = name
        .trim_start_matches('@')
        .chars()
        .map(|c| if PATH_UNSAFE_CHARS.contains(&c) { '-' } else { c })
        .collect();

    let key = key
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");

    if key.is_empty() {
        "unknown".to_string()
    } else {
        key
    }
}

/// Unique file stem for per-module state files (markers, installer logs)
///
/// Names that [`make_path_safe`] leaves untouched, that are lowercase and
/// that contain no `~` are used as-is. Every other name becomes
/// `<safe>~<blake3 prefix of the raw name>`, so `a-b`, `a/b` and `A-B` never
/// share a file, not even on a case-insensitive filesystem.
pub fn state_file_stem(name: &str) -> String {
    let safe = make_path_safe(name);
    if safe == name && !name.contains('~') && !name.chars().any(char::is_uppercase) {
        return safe;
    }
    let digest = blake3::hash(name.as_bytes()).to_hex();
    format!("{}~{}", safe.to_lowercase(), &digest[..16])
}

/// Express `to` relative to the directory `from_dir`
///
/// Both paths are expected to be absolute and free of `..` components.
/// Returns `.` when they are the same directory.
pub fn relative_path(from_dir: &Path, to: &Path) -> PathBuf {
    let from: Vec<Component> = from_dir.components().collect();
    let target: Vec<Component> = to.components().collect();

    let common = from
        .iter()
        .zip(&target)
        .take_while(|(a, b)| a == b)
        .count();

    let mut relative = PathBuf::new();
    for _ in common..from.len() {
        relative.push("..");
    }
    for component in &target[common..] {
        relative.push(component.as_os_str());
    }

    if relative.as_os_str().is_empty() {
        relative.push(".");
    }
    relative
}

/// Join path components with `/` regardless of the host platform
pub fn to_forward_slashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("/")
}

/// Join path components with `\` regardless of the host platform
pub fn to_backslashes(path: &Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect::<Vec<_>>()
        .join("\\")
}
