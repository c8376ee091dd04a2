//! List command implementation
//!
//! Lists installed modules from the environment's install markers, flagging
//! modules whose source changed since they were installed.

use std::path::PathBuf;

use crate::cli::ListArgs;
use crate::environment::Environment;
use crate::error::Result;
use crate::installer::FileMarkerStore;
use crate::ui::display;
use crate::workspace::Workspace;

/// Run list command
pub fn run(workspace: Option<PathBuf>, args: ListArgs) -> Result<()> {
    let workspace = Workspace::open(workspace)?;
    let env = Environment::open(workspace.environment().root())?;
    let markers = FileMarkerStore::new(&env).list()?;

    print!("{}", display::render_markers(&markers, args.detailed));
    Ok(())
}
