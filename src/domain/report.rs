//! Install outcomes accumulated over one run

use std::fmt;

use crate::error::{Result, StackupError};

/// What happened to a single module during a run
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Installed,
    SkippedAlreadyInstalled,
    Failed(String),
}

impl InstallOutcome {
    /// Whether the module is usable inside the environment after the run
    pub fn is_usable(&self) -> bool {
        !matches!(self, InstallOutcome::Failed(_))
    }
}

impl fmt::Display for InstallOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InstallOutcome::Installed => f.write_str("installed"),
            InstallOutcome::SkippedAlreadyInstalled => f.write_str("skipped (already installed)"),
            InstallOutcome::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Append-only record of a run
///
/// Entries are kept in plan order. Modules that were never attempted
/// (because a fail-fast run halted) have no entry at all.
#[derive(Debug, Default)]
pub struct InstallReport {
    entries: Vec<(String, InstallOutcome)>,
    halted: bool,
    proxy_failures: Vec<StackupError>,
}

impl InstallReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, module: impl Into<String>, outcome: InstallOutcome) {
        self.entries.push((module.into(), outcome));
    }

    /// Mark the run as stopped early by fail-fast
    pub fn halt(&mut self) {
        self.halted = true;
    }

    pub fn halted(&self) -> bool {
        self.halted
    }

    pub fn entries(&self) -> &[(String, InstallOutcome)] {
        &self.entries
    }

    #[cfg(test)]
    pub fn outcome(&self, module: &str) -> Option<&InstallOutcome> {
        self.entries
            .iter()
            .find(|(name, _)| name == module)
            .map(|(_, outcome)| outcome)
    }

    pub fn failed_modules(&self) -> Vec<String> {
        self.entries
            .iter()
            .filter(|(_, outcome)| !outcome.is_usable())
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Modules that may contribute proxies: installed or already present
    pub fn eligible_modules(&self) -> impl Iterator<Item = &str> {
        self.entries
            .iter()
            .filter(|(_, outcome)| outcome.is_usable())
            .map(|(name, _)| name.as_str())
    }

    pub fn add_proxy_failures(&mut self, failures: impl IntoIterator<Item = StackupError>) {
        self.proxy_failures.extend(failures);
    }

    pub fn proxy_failures(&self) -> &[StackupError] {
        &self.proxy_failures
    }

    /// Overall status; proxy failures do not count against it
    pub fn is_success(&self) -> bool {
        self.entries.iter().all(|(_, outcome)| outcome.is_usable())
    }

    /// Convert the overall status into an error suitable for the exit code
    pub fn ensure_success(&self) -> Result<()> {
        if self.is_success() {
            Ok(())
        } else {
            Err(StackupError::InstallFailure {
                modules: self.failed_modules(),
            })
        }
    }
}
