//! Plan command implementation
//!
//! Resolves the install order exactly as `install` would, without touching
//! the environment.

use std::path::PathBuf;

use crate::error::Result;
use crate::resolver::Resolver;
use crate::ui::display;
use crate::workspace::Workspace;

/// Run plan command
pub fn run(workspace: Option<PathBuf>) -> Result<()> {
    let workspace = Workspace::open(workspace)?;
    let graph = workspace.load_graph()?;
    let plan = Resolver::default().resolve(&graph)?;

    print!("{}", display::render_plan(&plan));
    Ok(())
}
