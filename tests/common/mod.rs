//! Common test utilities for stackup integration tests

use assert_cmd::Command;
use std::path::PathBuf;
use tempfile::TempDir;

/// Installer that records each module it is asked to install in
/// `<env>/install.log` and fails for modules containing a `fail` file.
pub const FAKE_INSTALLER_CONFIG: &str = r#"installer:
  program: sh
  args:
    - -c
    - |
      name=$(basename "$1")
      echo "$name" >> "{env}/install.log"
      if [ -f "$1/fail" ]; then
        echo "cannot build $name" >&2
        exit 1
      fi
    - sh
  editable_args: []
"#;

/// A test workspace for integration tests
#[allow(dead_code)]
pub struct TestWorkspace {
    /// Temporary directory
    pub temp: TempDir,
    /// Path to workspace root
    pub path: PathBuf,
}

#[allow(dead_code)]
impl TestWorkspace {
    /// Workspace with the fake installer, an environment and a `core` module
    pub fn new() -> Self {
        let workspace = Self::empty();
        workspace.write_file("stackup.yaml", FAKE_INSTALLER_CONFIG);
        std::fs::create_dir_all(workspace.env_path()).expect("Failed to create environment");
        workspace.add_module("core", &[], &[]);
        workspace
    }

    /// Bare temporary directory
    pub fn empty() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let path = dunce::canonicalize(temp.path()).expect("Failed to canonicalize temp dir");
        Self { temp, path }
    }

    /// Write `modules/<name>/module.yaml`
    pub fn add_module(&self, name: &str, dependencies: &[&str], entry_points: &[&str]) {
        self.add_module_in_dir(name, name, dependencies, entry_points);
    }

    pub fn add_module_in_dir(
        &self,
        dir: &str,
        name: &str,
        dependencies: &[&str],
        entry_points: &[&str],
    ) {
        let yaml = format!(
            "name: {name}\ndependencies: [{}]\nentry_points: [{}]\n",
            dependencies.join(", "),
            entry_points.join(", ")
        );
        self.write_file(&format!("modules/{dir}/module.yaml"), &yaml);
        self.write_file(
            &format!("modules/{dir}/setup.py"),
            "from setuptools import setup\nsetup()\n",
        );
    }

    /// Make the fake installer fail for the module in `dir`
    pub fn break_module(&self, dir: &str) {
        self.write_file(&format!("modules/{dir}/fail"), "");
    }

    pub fn env_path(&self) -> PathBuf {
        self.path.join(".venv")
    }

    /// Module directories the fake installer was invoked for, in order
    pub fn install_log(&self) -> Vec<String> {
        std::fs::read_to_string(self.env_path().join("install.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    /// Write a file in workspace
    pub fn write_file(&self, path: &str, content: &str) {
        let file_path = self.path.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    /// Read a file from workspace
    pub fn read_file(&self, path: &str) -> String {
        std::fs::read_to_string(self.path.join(path)).expect("Failed to read file")
    }

    /// Check if a file exists in workspace
    pub fn file_exists(&self, path: &str) -> bool {
        self.path.join(path).exists()
    }

    /// stackup command running inside this workspace
    pub fn stackup(&self) -> Command {
        let mut cmd = stackup_cmd();
        cmd.current_dir(&self.path);
        cmd
    }
}

impl Default for TestWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// stackup command isolated from the caller's environment variables
// Temporary fix for deprecated cargo_bin - will be updated when build-dir issues are resolved
#[allow(deprecated, dead_code)]
pub fn stackup_cmd() -> Command {
    let mut cmd = Command::cargo_bin("stackup").expect("stackup binary should be built");
    cmd.env_remove("STACKUP_LOG").env_remove("STACKUP_WORKSPACE");
    cmd
}

/// Place an executable shell script at `path`
#[cfg(unix)]
#[allow(dead_code)]
pub fn write_executable(path: &std::path::Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    std::fs::create_dir_all(path.parent().expect("path has a parent")).expect("mkdir");
    std::fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o755)).expect("chmod");
}
