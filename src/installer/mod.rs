//! Installation orchestration for stackup
//!
//! This module handles:
//! - Walking a resolved plan in order
//! - Skipping modules that are already installed (unless forced)
//! - Invoking the installation primitive and recording markers
//! - Fail-fast vs. continue-on-error policy
//!
//! The orchestrator never touches the environment directly. It is handed an
//! [`InstallPrimitive`] and a [`MarkerStore`], which keeps the environment an
//! explicit resource and lets tests substitute fakes.

pub mod command;
pub mod marker;

pub use command::CommandInstaller;
pub use marker::FileMarkerStore;

use tracing::{debug, info, warn};

use crate::domain::{InstallOutcome, InstallReport, ModuleDescriptor};
use crate::error::Result;
use crate::progress::ProgressDisplay;
use crate::resolver::InstallPlan;

/// Installs one module into the isolated environment
pub trait InstallPrimitive {
    /// Install `module` from its path, by reference when it is editable
    ///
    /// # Errors
    ///
    /// Any error is recorded as the module's failure reason.
    fn install(&self, module: &ModuleDescriptor) -> Result<()>;
}

/// Remembers which modules have been installed successfully
pub trait MarkerStore {
    fn is_installed(&self, module: &str) -> bool;

    /// Persist the marker for a freshly installed module
    ///
    /// # Errors
    ///
    /// Returns an error if the marker cannot be written.
    fn record(&mut self, module: &ModuleDescriptor) -> Result<()>;
}

/// Flags controlling a run
#[derive(Debug, Clone, Copy, Default)]
pub struct InstallOptions {
    /// Reinstall modules even if a marker exists
    pub force: bool,
    /// Stop at the first failed module
    pub fail_fast: bool,
}

/// Walks an install plan and produces an [`InstallReport`]
pub struct InstallOrchestrator<'a> {
    installer: &'a dyn InstallPrimitive,
    markers: &'a mut dyn MarkerStore,
    progress: Option<ProgressDisplay>,
}

impl<'a> InstallOrchestrator<'a> {
    pub fn new(installer: &'a dyn InstallPrimitive, markers: &'a mut dyn MarkerStore) -> Self {
        Self {
            installer,
            markers,
            progress: None,
        }
    }

    #[must_use]
    pub fn with_progress(mut self, progress: ProgressDisplay) -> Self {
        self.progress = Some(progress);
        self
    }

    /// Install every module of `plan`, strictly one after another
    pub fn run(&mut self, plan: &InstallPlan, options: InstallOptions) -> InstallReport {
        let mut report = InstallReport::new();
        let total = plan.len();

        for (index, module) in plan.modules().iter().enumerate() {
            let name = module.name();
            if let Some(progress) = &self.progress {
                progress.update_module(name, index + 1, total);
            }

            let outcome = self.install_one(module, options.force);
            let failed = !outcome.is_usable();
            report.record(name, outcome);

            if let Some(progress) = &self.progress {
                progress.inc_module();
            }

            if failed && options.fail_fast {
                warn!(
                    module = name,
                    remaining = total - index - 1,
                    "stopping after failed install"
                );
                report.halt();
                break;
            }
        }

        if let Some(progress) = &self.progress {
            if report.halted() {
                progress.abandon();
            } else {
                progress.finish();
            }
        }

        report
    }

    fn install_one(&mut self, module: &ModuleDescriptor, force: bool) -> InstallOutcome {
        let name = module.name();

        if !force && self.markers.is_installed(name) {
            debug!(module = name, "already installed, skipping");
            return InstallOutcome::SkippedAlreadyInstalled;
        }

        info!(
            module = name,
            path = %module.path().display(),
            editable = module.editable(),
            "installing"
        );
        if let Err(e) = self.installer.install(module) {
            warn!(module = name, error = %e, "install failed");
            return InstallOutcome::Failed(e.to_string());
        }

        // No marker means the module does not count as installed.
        if let Err(e) = self.markers.record(module) {
            warn!(module = name, error = %e, "installed but marker could not be recorded");
            return InstallOutcome::Failed(e.to_string());
        }

        InstallOutcome::Installed
    }
}
