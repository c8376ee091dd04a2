//! Install command implementation
//!
//! The installation process:
//! 1. Open the workspace and discover module descriptors
//! 2. Build the dependency graph and resolve the install plan
//! 3. Acquire the environment lock
//! 4. Install modules one by one in plan order
//! 5. Generate proxy scripts for every usable module
//! 6. Print the report; exit non-zero if any module failed
//!
//! Steps 1-2 fail before anything is installed, so a malformed graph never
//! leaves a partial install behind.

use std::path::PathBuf;

use tracing::debug;

use crate::cli::InstallArgs;
use crate::environment::Environment;
use crate::error::Result;
use crate::installer::{CommandInstaller, FileMarkerStore, InstallOptions, InstallOrchestrator};
use crate::progress::ProgressDisplay;
use crate::proxy::ProxyGenerator;
use crate::resolver::Resolver;
use crate::ui::display;
use crate::workspace::Workspace;

/// Run install command
pub fn run(workspace: Option<PathBuf>, args: InstallArgs) -> Result<()> {
    let workspace = Workspace::open(workspace)?;
    debug!(root = %workspace.root().display(), "installing workspace");
    let graph = workspace.load_graph()?;
    let plan = Resolver::default().resolve(&graph)?;
    debug!(order = ?plan.names(), "resolved install plan");

    let env = Environment::open(workspace.environment().root())?;
    let guard = env.lock()?;
    debug!(lock = %guard.lock_path().display(), "environment locked");

    let config = workspace.config();
    let installer = CommandInstaller::from_config(&config.installer, &env, config.timeout());
    let mut markers = FileMarkerStore::new(&env);
    let options = InstallOptions {
        force: args.force,
        fail_fast: args.fail_fast,
    };

    let mut report = InstallOrchestrator::new(&installer, &mut markers)
        .with_progress(ProgressDisplay::new(plan.len() as u64))
        .run(&plan, options);

    if !args.no_proxies {
        let proxies = ProxyGenerator::new(workspace.proxy_dir(), &env)
            .generate_for_report(&report, &graph);
        debug!(written = proxies.written.len(), "generated proxies");
        report.add_proxy_failures(proxies.failures);
    }

    print!("{}", display::render_report(&report, plan.len()));
    report.ensure_success()
}
