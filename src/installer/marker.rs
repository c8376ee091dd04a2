//! Idempotency markers stored inside the environment
//!
//! One JSON file per installed module under `.stackup/installed/`. The
//! orchestrator only asks whether a marker exists; the contents serve
//! `stackup list` and proxy regeneration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::domain::ModuleDescriptor;
use crate::environment::Environment;
use crate::error::{Result, StackupError};
use crate::hash;
use crate::installer::MarkerStore;
use crate::path_utils::state_file_stem;

/// Marker directory inside the environment's state directory
pub const MARKER_DIR: &str = "installed";

/// What was recorded when a module was installed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstallMarker {
    pub name: String,
    pub path: PathBuf,
    pub editable: bool,
    #[serde(default)]
    pub entry_points: Vec<String>,
    /// BLAKE3 fingerprint of the source tree at install time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

impl InstallMarker {
    /// Whether the module source differs from what was installed
    ///
    /// Returns `None` when either side cannot be fingerprinted.
    pub fn source_changed(&self) -> Option<bool> {
        let recorded = self.fingerprint.as_deref()?;
        let current = hash::hash_directory(&self.path).ok()?;
        Some(recorded != current)
    }
}

/// File-backed marker store
#[derive(Debug, Clone)]
pub struct FileMarkerStore {
    dir: PathBuf,
}

impl FileMarkerStore {
    pub fn new(env: &Environment) -> Self {
        Self::in_dir(env.state_dir().join(MARKER_DIR))
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    fn marker_path(&self, module: &str) -> PathBuf {
        self.dir.join(format!("{}.json", state_file_stem(module)))
    }

    /// Read the marker of `module`, if one exists and belongs to it
    pub fn read(&self, module: &str) -> Option<InstallMarker> {
        let content = fs::read_to_string(self.marker_path(module)).ok()?;
        match serde_json::from_str::<InstallMarker>(&content) {
            Ok(marker) if marker.name == module => Some(marker),
            Ok(_) => None,
            Err(e) => {
                warn!(module, error = %e, "ignoring unreadable install marker");
                None
            }
        }
    }

    /// All readable markers, sorted by module name
    pub fn list(&self) -> Result<Vec<InstallMarker>> {
        if !self.dir.is_dir() {
            return Ok(Vec::new());
        }

        let mut markers = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_none_or(|ext| ext != "json") {
                continue;
            }
            match read_marker_file(&path) {
                Some(marker) => markers.push(marker),
                None => warn!(path = %path.display(), "ignoring unreadable install marker"),
            }
        }
        markers.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(markers)
    }
}

fn read_marker_file(path: &Path) -> Option<InstallMarker> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
}

impl MarkerStore for FileMarkerStore {
    fn is_installed(&self, module: &str) -> bool {
        self.read(module).is_some()
    }

    fn record(&mut self, module: &ModuleDescriptor) -> Result<()> {
        let path = self.marker_path(module.name());
        let write_failed = |e: &dyn std::fmt::Display| StackupError::MarkerWriteFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        };

        let marker = InstallMarker {
            name: module.name().to_string(),
            path: module.path().to_path_buf(),
            editable: module.editable(),
            entry_points: module.entry_points().to_vec(),
            fingerprint: hash::hash_directory(module.path()).ok(),
        };
        let json = serde_json::to_string_pretty(&marker).map_err(|e| write_failed(&e))?;

        fs::create_dir_all(&self.dir).map_err(|e| write_failed(&e))?;
        // Write then rename so a crash never leaves a truncated marker.
        let tmp = path.with_extension("json.tmp");
        fs::write(&tmp, json).map_err(|e| write_failed(&e))?;
        fs::rename(&tmp, &path).map_err(|e| write_failed(&e))?;

        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::expect_used)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn module_in(temp: &TempDir, name: &str) -> ModuleDescriptor {
        let path = temp.path().join("modules").join(name);
        fs::create_dir_all(&path).expect("Failed to create module directory");
        fs::write(path.join("setup.py"), "setup()").expect("Failed to write source");
        ModuleDescriptor::new(name, path).with_entry_points(["serve"])
    }

    #[test]
    fn test_unknown_module_is_not_installed() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let store = FileMarkerStore::in_dir(temp.path().join("installed"));
        assert!(!store.is_installed("api"));
        assert!(store.list().expect("list works").is_empty());
    }

    #[test]
    fn test_record_then_installed() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let mut store = FileMarkerStore::in_dir(temp.path().join("installed"));
        let module = module_in(&temp, "api");

        store.record(&module).expect("record should succeed");

        assert!(store.is_installed("api"));
        let marker = store.read("api").expect("marker should exist");
        assert_eq!(marker.path, module.path());
        assert_eq!(marker.entry_points, vec!["serve"]);
        assert!(marker.fingerprint.is_some());
        assert_eq!(marker.source_changed(), Some(false));
    }

    #[test]
    fn test_source_change_detected() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let mut store = FileMarkerStore::in_dir(temp.path().join("installed"));
        let module = module_in(&temp, "api");
        store.record(&module).expect("record should succeed");

        fs::write(module.path().join("setup.py"), "setup(name='api')").expect("Failed to edit");

        let marker = store.read("api").expect("marker should exist");
        assert_eq!(marker.source_changed(), Some(true));
    }

    #[test]
    fn test_marker_for_similar_name_is_not_shared() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let mut store = FileMarkerStore::in_dir(temp.path().join("installed"));
        let module = module_in(&temp, "a-b");
        store.record(&module).expect("record should succeed");

        assert!(store.is_installed("a-b"));
        assert!(!store.is_installed("a/b"));
    }

    #[test]
    fn test_similar_names_keep_separate_markers() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let mut store = FileMarkerStore::in_dir(temp.path().join("installed"));
        let path = temp.path().join("modules/ab");
        fs::create_dir_all(&path).expect("Failed to create module directory");
        let names = ["a-b", "a/b", "a--b", "@a-b", "a:b"];

        for name in names {
            store
                .record(&ModuleDescriptor::new(name, &path))
                .expect("record should succeed");
        }

        for name in names {
            assert!(store.is_installed(name), "{name} should be installed");
        }
        assert_eq!(store.list().expect("list works").len(), names.len());
    }

    #[test]
    fn test_list_sorted_and_skips_garbage() {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let mut store = FileMarkerStore::in_dir(temp.path().join("installed"));
        store.record(&module_in(&temp, "web")).expect("record should succeed");
        store.record(&module_in(&temp, "api")).expect("record should succeed");
        fs::write(temp.path().join("installed/broken.json"), "{").expect("Failed to write");
        fs::write(temp.path().join("installed/notes.txt"), "hi").expect("Failed to write");

        let names: Vec<String> = store
            .list()
            .expect("list works")
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["api", "web"]);
    }

    #[cfg(unix)]
    #[test]
    fn test_record_into_read_only_dir_fails() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().expect("Failed to create temp directory");
        let dir = temp.path().join("installed");
        fs::create_dir_all(&dir).expect("Failed to create marker dir");
        fs::set_permissions(&dir, fs::Permissions::from_mode(0o555)).expect("chmod");
        if fs::write(dir.join("probe"), "").is_ok() {
            // Running as root; permissions are not enforced.
            return;
        }

        let mut store = FileMarkerStore::in_dir(&dir);
        let result = store.record(&module_in(&temp, "api"));

        fs::set_permissions(&dir, fs::Permissions::from_mode(0o755)).expect("chmod");
        assert!(matches!(
            result,
            Err(StackupError::MarkerWriteFailed { .. })
        ));
    }
}
