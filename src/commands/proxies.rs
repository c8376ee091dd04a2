//! Proxies command implementation
//!
//! Regenerates proxy scripts for every module with an install marker, using
//! the entry points recorded when the module was installed.

use std::path::PathBuf;

use tracing::warn;

use crate::environment::Environment;
use crate::error::Result;
use crate::installer::FileMarkerStore;
use crate::proxy::ProxyGenerator;
use crate::ui::display;
use crate::workspace::Workspace;

/// Run proxies command
///
/// Proxy failures are reported but do not fail the command.
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::open(workspace)?;
    let env = Environment::open(workspace.environment().root())?;
    let markers = FileMarkerStore::new(&env);

    let installed: Vec<String> = markers.list()?.into_iter().map(|m| m.name).collect();
    let report = ProxyGenerator::new(workspace.proxy_dir(), &env)
        .generate(installed.iter().map(String::as_str), &markers);

    if !report.is_success() {
        warn!(failed = report.failures.len(), "some proxies could not be written");
    }
    print!("{}", display::render_proxy_report(&report));
    Ok(())
}
