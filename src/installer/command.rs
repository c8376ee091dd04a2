//! Installation primitive backed by an external command
//!
//! The configured command (pip by default) is run once per module with the
//! module path as its last argument. Its combined output goes to a per-module
//! log file, whose tail becomes the failure detail.

use std::ffi::OsString;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::config::InstallerConfig;
use crate::domain::ModuleDescriptor;
use crate::environment::Environment;
use crate::error::{Result, StackupError};
use crate::installer::InstallPrimitive;
use crate::path_utils::state_file_stem;

const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Number of trailing log lines quoted in a failure
const DETAIL_LINES: usize = 5;

/// Runs an installer program for each module
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
    editable_args: Vec<String>,
    timeout: Option<Duration>,
    log_dir: PathBuf,
}

impl CommandInstaller {
    /// Build an installer from configuration, expanding environment placeholders
    pub fn from_config(
        config: &InstallerConfig,
        env: &Environment,
        timeout: Option<Duration>,
    ) -> Self {
        let expand = |template: &str| expand_placeholders(template, env);
        Self {
            program: expand(&config.program),
            args: config.args.iter().map(|arg| expand(arg)).collect(),
            editable_args: config.editable_args.iter().map(|arg| expand(arg)).collect(),
            timeout,
            log_dir: env.state_dir().join("logs"),
        }
    }

    /// Program and arguments used for `module`
    pub fn command_line(&self, module: &ModuleDescriptor) -> (&str, Vec<OsString>) {
        let mut args: Vec<OsString> = self.args.iter().map(OsString::from).collect();
        if module.editable() {
            args.extend(self.editable_args.iter().map(OsString::from));
        }
        args.push(module.path().as_os_str().to_owned());
        (self.program.as_str(), args)
    }

    /// Where the output of installing `module` is written
    pub fn log_path(&self, module: &str) -> PathBuf {
        self.log_dir.join(format!("{}.log", state_file_stem(module)))
    }
}

impl InstallPrimitive for CommandInstaller {
    fn install(&self, module: &ModuleDescriptor) -> Result<()> {
        let (program, args) = self.command_line(module);
        let log_path = self.log_path(module.name());
        debug!(module = module.name(), program, ?args, log = %log_path.display(), "running installer");

        let log = open_log(&log_path)?;
        let mut child = Command::new(program)
            .args(&args)
            .current_dir(module.path())
            .stdin(Stdio::null())
            .stdout(log.try_clone()?)
            .stderr(log)
            .spawn()
            .map_err(|e| StackupError::InstallerSpawnFailed {
                program: program.to_string(),
                reason: e.to_string(),
            })?;

        let Some(status) = wait_with_timeout(&mut child, self.timeout)? else {
            return Err(StackupError::InstallTimedOut {
                seconds: self.timeout.map_or(0, |t| t.as_secs()),
            });
        };

        if status.success() {
            Ok(())
        } else {
            Err(StackupError::InstallCommandFailed {
                status: status.to_string(),
                detail: log_tail(&log_path),
            })
        }
    }
}

fn expand_placeholders(template: &str, env: &Environment) -> String {
    template
        .replace("{python}", &env.python().display().to_string())
        .replace("{env_bin}", &env.bin_dir().display().to_string())
        .replace("{env}", &env.root().display().to_string())
}

fn open_log(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path).map_err(|e| StackupError::FileWriteFailed {
        path: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// Wait for `child`, killing it once `timeout` elapses
///
/// Returns `None` when the child was killed.
fn wait_with_timeout(child: &mut Child, timeout: Option<Duration>) -> Result<Option<ExitStatus>> {
    let Some(timeout) = timeout else {
        return Ok(Some(child.wait()?));
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(Some(status));
        }
        if Instant::now() >= deadline {
            let _ = child.kill();
            let _ = child.wait();
            return Ok(None);
        }
        thread::sleep(POLL_INTERVAL);
    }
}

fn log_tail(path: &Path) -> String {
    let content = fs::read_to_string(path).unwrap_or_default();
    let lines: Vec<&str> = content
        .lines()
        .map(str::trim_end)
        .filter(|line| !line.is_empty())
        .collect();

    if lines.is_empty() {
        return "no output".to_string();
    }
    lines[lines.len().saturating_sub(DETAIL_LINES)..].join(" | ")
}
