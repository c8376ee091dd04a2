//! Module descriptor (module.yaml) parsing
//!
//! A module directory is recognised by a `module.yaml` file:
//!
//! ```yaml
//! name: api
//! dependencies: [core, db]
//! entry_points: [api-serve, api-migrate]
//! editable: true
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;
use walkdir::WalkDir;

use crate::domain::ModuleDescriptor;
use crate::error::{Result, StackupError};

/// Module descriptor filename
pub const DESCRIPTOR_FILE: &str = "module.yaml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    name: String,
    #[serde(default)]
    dependencies: Vec<String>,
    #[serde(default)]
    entry_points: Vec<String>,
    #[serde(default = "default_editable")]
    editable: bool,
}

fn default_editable() -> bool {
    true
}

/// Parse a descriptor from YAML for the module rooted at `module_dir`
pub fn parse_descriptor(yaml: &str, module_dir: &Path) -> Result<ModuleDescriptor> {
    let invalid = |reason: String| StackupError::DescriptorParseFailed {
        path: module_dir.join(DESCRIPTOR_FILE).display().to_string(),
        reason,
    };

    let raw: RawDescriptor = serde_yaml::from_str(yaml).map_err(|e| invalid(e.to_string()))?;

    let name = raw.name.trim();
    if name.is_empty() {
        return Err(invalid("'name' cannot be empty".to_string()));
    }
    if let Some(dep) = raw.dependencies.iter().find(|dep| dep.trim().is_empty()) {
        return Err(invalid(format!("empty dependency name '{dep}'")));
    }

    Ok(ModuleDescriptor::new(name, module_dir)
        .with_dependencies(raw.dependencies.iter().map(|dep| dep.trim()))
        .with_entry_points(raw.entry_points)
        .with_editable(raw.editable))
}

/// Load the descriptor of a single module directory
pub fn load_descriptor(module_dir: &Path) -> Result<ModuleDescriptor> {
    let path = module_dir.join(DESCRIPTOR_FILE);
    let content = fs::read_to_string(&path).map_err(|e| StackupError::DescriptorParseFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;
    parse_descriptor(&content, module_dir)
}

/// Discover every module directly under `modules_dir`
///
/// Directories are visited in name order; those without a `module.yaml`
/// are skipped.
pub fn discover_modules(modules_dir: &Path) -> Result<Vec<ModuleDescriptor>> {
    if !modules_dir.is_dir() {
        return Err(StackupError::ModulesDirNotFound {
            path: modules_dir.display().to_string(),
        });
    }

    let dirs: Vec<PathBuf> = WalkDir::new(modules_dir)
        .min_depth(1)
        .max_depth(1)
        .sort_by_file_name()
        .into_iter()
        .filter_map(std::result::Result::ok)
        .filter(|entry| entry.file_type().is_dir())
        .map(walkdir::DirEntry::into_path)
        .collect();

    let mut modules = Vec::new();
    for dir in dirs {
        if !dir.join(DESCRIPTOR_FILE).is_file() {
            debug!(path = %dir.display(), "skipping directory without {DESCRIPTOR_FILE}");
            continue;
        }
        let module = load_descriptor(&dir)?;
        debug!(module = module.name(), path = %dir.display(), "discovered module");
        modules.push(module);
    }

    Ok(modules)
}
