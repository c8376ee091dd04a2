//! Configuration file handling for stackup
//!
//! This module handles:
//! - `stackup.yaml`: workspace configuration (directories, installer command)
//! - `module.yaml`: per-module descriptors (see [`descriptor`])

pub mod descriptor;

use std::fs;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{Result, StackupError};

/// Workspace configuration filename
pub const WORKSPACE_CONFIG_FILE: &str = "stackup.yaml";

/// Workspace configuration from stackup.yaml
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorkspaceConfig {
    /// Directory whose immediate children are modules
    pub modules_dir: String,

    /// Root of the isolated environment
    pub environment: String,

    /// Directory that receives generated proxy scripts
    pub proxy_dir: String,

    /// How a single module gets installed into the environment
    pub installer: InstallerConfig,

    /// Wall-clock limit for one installer invocation
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

/// Installer command template
///
/// `program` and `args` may contain `{python}`, `{env}` and `{env_bin}`.
/// The module path is always appended as the last argument, preceded by
/// `editable_args` when the module is installed by reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InstallerConfig {
    pub program: String,
    pub args: Vec<String>,
    pub editable_args: Vec<String>,
}

impl Default for WorkspaceConfig {
    fn default() -> Self {
        Self {
            modules_dir: "modules".to_string(),
            environment: ".venv".to_string(),
            proxy_dir: "bin".to_string(),
            installer: InstallerConfig::default(),
            timeout_secs: None,
        }
    }
}

impl Default for InstallerConfig {
    fn default() -> Self {
        Self {
            program: "{python}".to_string(),
            args: ["-m", "pip", "install", "--no-deps"]
                .iter()
                .map(ToString::to_string)
                .collect(),
            editable_args: vec!["-e".to_string()],
        }
    }
}

impl WorkspaceConfig {
    /// Parse workspace configuration from YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| StackupError::ConfigReadFailed {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        Self::from_yaml(&content).map_err(|e| match e {
            StackupError::ConfigParseFailed { reason, .. } => StackupError::ConfigParseFailed {
                path: path.display().to_string(),
                reason,
            },
            other => other,
        })
    }

    /// Per-install timeout, if configured
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        let required = [
            ("modules_dir", &self.modules_dir),
            ("environment", &self.environment),
            ("proxy_dir", &self.proxy_dir),
            ("installer.program", &self.installer.program),
        ];

        for (field, value) in required {
            if value.trim().is_empty() {
                return Err(StackupError::ConfigParseFailed {
                    path: WORKSPACE_CONFIG_FILE.to_string(),
                    reason: format!("'{field}' cannot be empty"),
                });
            }
        }

        if self.timeout_secs == Some(0) {
            return Err(StackupError::ConfigParseFailed {
                path: WORKSPACE_CONFIG_FILE.to_string(),
                reason: "'timeout_secs' must be greater than zero".to_string(),
            });
        }

        Ok(())
    }
}
