//! Module domain types

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

/// Normalized view of one installable module
///
/// Built once by the descriptor loader and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleDescriptor {
    name: String,
    path: PathBuf,
    dependencies: BTreeSet<String>,
    entry_points: Vec<String>,
    editable: bool,
}

impl ModuleDescriptor {
    /// Create a descriptor with no dependencies or entry points
    pub fn new(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            dependencies: BTreeSet::new(),
            entry_points: Vec::new(),
            editable: true,
        }
    }

    #[must_use]
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_entry_points<I, S>(mut self, entry_points: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.entry_points = entry_points.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub fn with_editable(mut self, editable: bool) -> Self {
        self.editable = editable;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Names of the modules this one depends on, sorted
    pub fn dependencies(&self) -> &BTreeSet<String> {
        &self.dependencies
    }

    /// Console commands exposed by this module, in declaration order
    pub fn entry_points(&self) -> &[String] {
        &self.entry_points
    }

    /// Install by reference (`true`) or by copy (`false`)
    pub fn editable(&self) -> bool {
        self.editable
    }
}
