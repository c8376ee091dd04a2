//! Workspace management for stackup
//!
//! A workspace is the directory holding `stackup.yaml`. Every other path
//! (modules, environment, proxy directory) is resolved against it.
//!
//! ## Workspace Structure
//!
//! ```text
//! stackup.yaml          # Optional workspace configuration
//! modules/              # One directory per module, each with module.yaml
//! .venv/                # Isolated environment
//! └── .stackup/         # Lock, install markers and installer logs
//! bin/                  # Generated proxy scripts
//! ```

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::config::descriptor::discover_modules;
use crate::config::{WORKSPACE_CONFIG_FILE, WorkspaceConfig};
use crate::environment::Environment;
use crate::error::{Result, StackupError};
use crate::resolver::DependencyGraph;

/// Represents a stackup workspace
#[derive(Debug)]
pub struct Workspace {
    root: PathBuf,
    config: WorkspaceConfig,
}

/// Find the nearest ancestor of `start` (inclusive) holding `stackup.yaml`
pub fn find_from(start: &Path) -> Option<PathBuf> {
    start
        .ancestors()
        .find(|dir| dir.join(WORKSPACE_CONFIG_FILE).is_file())
        .map(Path::to_path_buf)
}

impl Workspace {
    /// Open the workspace containing `start`, or the current directory
    ///
    /// Without any `stackup.yaml` above the start directory, the start
    /// directory itself is used with default configuration.
    pub fn open(start: Option<PathBuf>) -> Result<Self> {
        let start = match start {
            Some(dir) => dir,
            None => std::env::current_dir()?,
        };
        let start = dunce::canonicalize(&start).map_err(|e| StackupError::IoError {
            message: format!("Cannot open workspace {}: {}", start.display(), e),
        })?;

        match find_from(&start) {
            Some(root) => {
                let config = WorkspaceConfig::load(&root.join(WORKSPACE_CONFIG_FILE))?;
                debug!(root = %root.display(), "using workspace configuration");
                Ok(Self { root, config })
            }
            None => {
                debug!(root = %start.display(), "no {WORKSPACE_CONFIG_FILE} found, using defaults");
                Ok(Self::with_config(start, WorkspaceConfig::default()))
            }
        }
    }

    pub fn with_config(root: impl Into<PathBuf>, config: WorkspaceConfig) -> Self {
        Self {
            root: root.into(),
            config,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config(&self) -> &WorkspaceConfig {
        &self.config
    }

    pub fn modules_dir(&self) -> PathBuf {
        self.root.join(&self.config.modules_dir)
    }

    pub fn environment(&self) -> Environment {
        Environment::at(self.root.join(&self.config.environment))
    }

    pub fn proxy_dir(&self) -> PathBuf {
        self.root.join(&self.config.proxy_dir)
    }

    /// Discover every module and build the dependency graph
    pub fn load_graph(&self) -> Result<DependencyGraph> {
        let modules = discover_modules(&self.modules_dir())?;
        let graph = DependencyGraph::build(modules)?;
        if graph.is_empty() {
            warn!(dir = %self.modules_dir().display(), "no modules found");
        }
        Ok(graph)
    }
}
