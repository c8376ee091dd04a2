//! Dispatcher script generation
//!
//! For every entry point of a usable module, one small script per host shell
//! family is written into the proxy directory. A dispatcher runs the
//! environment's own copy of the command when it exists and otherwise falls
//! back to the same name on the ambient `PATH`.
//!
//! Scripts locate the environment through a path relative to their own
//! directory, so the proxy directory can be moved together with the
//! environment. Output depends only on its inputs, so regenerating with
//! unchanged inputs rewrites identical bytes.

mod templates;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::domain::InstallReport;
use crate::environment::Environment;
use crate::error::StackupError;
use crate::installer::FileMarkerStore;
use crate::path_utils::relative_path;
use crate::resolver::DependencyGraph;

/// Lookup of the console entry points a module exposes
pub trait EntryPointSource {
    /// Entry points of `module`, empty when it is unknown
    fn entry_points(&self, module: &str) -> Vec<String>;
}

impl EntryPointSource for DependencyGraph {
    fn entry_points(&self, module: &str) -> Vec<String> {
        self.get(module)
            .map(|descriptor| descriptor.entry_points().to_vec())
            .unwrap_or_default()
    }
}

/// Entry points as recorded when the module was last installed
impl EntryPointSource for FileMarkerStore {
    fn entry_points(&self, module: &str) -> Vec<String> {
        self.read(module)
            .map(|marker| marker.entry_points)
            .unwrap_or_default()
    }
}

/// Host shell families a dispatcher is written for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellFamily {
    Posix,
    Cmd,
    PowerShell,
}

impl ShellFamily {
    pub const ALL: [ShellFamily; 3] = [ShellFamily::Posix, ShellFamily::Cmd, ShellFamily::PowerShell];

    /// File name of the dispatcher for `entry`
    pub fn file_name(self, entry: &str) -> String {
        match self {
            ShellFamily::Posix => entry.to_string(),
            ShellFamily::Cmd => format!("{entry}.cmd"),
            ShellFamily::PowerShell => format!("{entry}.ps1"),
        }
    }

    fn render(self, module: &str, entry: &str, env_rel: &Path) -> String {
        match self {
            ShellFamily::Posix => templates::posix(module, entry, env_rel),
            ShellFamily::Cmd => templates::cmd(module, entry, env_rel),
            ShellFamily::PowerShell => templates::powershell(module, entry, env_rel),
        }
    }
}

/// Result of one generation pass
#[derive(Debug, Default)]
pub struct ProxyReport {
    /// Every dispatcher written, in generation order
    pub written: Vec<PathBuf>,
    /// One `ProxyGeneration` error per dispatcher that could not be written
    pub failures: Vec<StackupError>,
}

impl ProxyReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Writes dispatchers into a fixed output directory
#[derive(Debug, Clone)]
pub struct ProxyGenerator {
    out_dir: PathBuf,
    env_root: PathBuf,
}

impl ProxyGenerator {
    pub fn new(out_dir: impl Into<PathBuf>, env: &Environment) -> Self {
        Self {
            out_dir: out_dir.into(),
            env_root: env.root().to_path_buf(),
        }
    }

    /// Generate dispatchers for the modules a run left usable
    ///
    /// Failed modules contribute nothing.
    pub fn generate_for_report(
        &self,
        report: &InstallReport,
        source: &dyn EntryPointSource,
    ) -> ProxyReport {
        self.generate(report.eligible_modules(), source)
    }

    /// Generate dispatchers for every entry point of `modules`
    ///
    /// Each dispatcher is written independently; a failure is recorded and
    /// generation moves on to the next one.
    pub fn generate<'m>(
        &self,
        modules: impl IntoIterator<Item = &'m str>,
        source: &dyn EntryPointSource,
    ) -> ProxyReport {
        let mut report = ProxyReport::default();
        let target = self.prepare_out_dir();
        let mut owners: HashMap<String, &str> = HashMap::new();

        for module in modules {
            for entry in source.entry_points(module) {
                if let Some(previous) = owners.insert(entry.clone(), module) {
                    warn!(
                        entry = %entry,
                        previous,
                        module,
                        "entry point declared by more than one module, last one wins"
                    );
                }

                if let Err(reason) = validate_entry_name(&entry) {
                    report.failures.push(generation_error(&entry, reason));
                    continue;
                }

                let (out_dir, env_rel) = match &target {
                    Ok(target) => target,
                    Err(reason) => {
                        report.failures.push(generation_error(&entry, reason.clone()));
                        continue;
                    }
                };

                for family in ShellFamily::ALL {
                    let path = out_dir.join(family.file_name(&entry));
                    let content = family.render(module, &entry, env_rel);
                    match write_dispatcher(&path, &content, family) {
                        Ok(()) => {
                            debug!(module, entry = %entry, path = %path.display(), "wrote proxy");
                            report.written.push(path);
                        }
                        Err(reason) => {
                            warn!(entry = %entry, path = %path.display(), reason = %reason, "failed to write proxy");
                            report.failures.push(generation_error(
                                &entry,
                                format!("{}: {}", path.display(), reason),
                            ));
                        }
                    }
                }
            }
        }

        report
    }

    /// Create the output directory and compute the environment path relative to it
    fn prepare_out_dir(&self) -> std::result::Result<(PathBuf, PathBuf), String> {
        fs::create_dir_all(&self.out_dir)
            .map_err(|e| format!("cannot create {}: {}", self.out_dir.display(), e))?;
        let out_dir = dunce::canonicalize(&self.out_dir)
            .map_err(|e| format!("cannot resolve {}: {}", self.out_dir.display(), e))?;
        let env_root = absolute(&self.env_root);
        Ok((out_dir.clone(), relative_path(&out_dir, &env_root)))
    }
}

fn absolute(path: &Path) -> PathBuf {
    dunce::canonicalize(path)
        .or_else(|_| std::path::absolute(path))
        .unwrap_or_else(|_| path.to_path_buf())
}

fn generation_error(entry: &str, reason: String) -> StackupError {
    StackupError::ProxyGeneration {
        entry_point: entry.to_string(),
        reason,
    }
}

/// Entry names are embedded in scripts and file names unquoted
fn validate_entry_name(entry: &str) -> std::result::Result<(), String> {
    if entry.is_empty() {
        return Err("entry point name is empty".to_string());
    }
    if entry.starts_with(['-', '.']) {
        return Err("entry point name must not start with '-' or '.'".to_string());
    }
    if let Some(c) = entry
        .chars()
        .find(|c| !(c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-')))
    {
        return Err(format!("entry point name contains unsupported character {c:?}"));
    }
    Ok(())
}

fn write_dispatcher(path: &Path, content: &str, family: ShellFamily) -> std::io::Result<()> {
    fs::write(path, content)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if family == ShellFamily::Posix {
            fs::set_permissions(path, fs::Permissions::from_mode(0o755))?;
        }
    }
    #[cfg(not(unix))]
    let _ = family;

    Ok(())
}
