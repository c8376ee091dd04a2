//! CLI definitions using clap derive API
//!
//! Argument types with more than a flag or two live in submodules:
//! - install: Install command arguments
//! - list: List command arguments
//! - completions: Completions command arguments

use clap::builder::{Styles, styling::AnsiColor};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

pub mod completions;
pub mod install;
pub mod list;

pub use completions::CompletionsArgs;
pub use install::InstallArgs;
pub use list::ListArgs;

/// stackup - local module installer
///
/// Installs a workspace's modules into one isolated environment in dependency order.
#[derive(Parser, Debug)]
#[command(
    name = "stackup",
    author,
    version,
    color = clap::ColorChoice::Auto,
    styles = Styles::styled()
        .header(AnsiColor::Green.on_default().bold())
        .usage(AnsiColor::Green.on_default().bold())
        .literal(AnsiColor::Cyan.on_default().bold())
        .placeholder(AnsiColor::Cyan.on_default()),
    about = "Install local modules into an isolated environment in dependency order",
    long_about = "stackup discovers the modules of a workspace, orders them so every module follows \
                  its dependencies, installs them one by one into a single isolated environment and \
                  generates proxy scripts for the commands they expose.",
    after_help = "\x1b[1m\x1b[32mExamples:\x1b[0m\n   \
                  stackup install                \x1b[90m# Install every module not yet installed\x1b[0m\n   \
                  stackup install --force        \x1b[90m# Reinstall everything\x1b[0m\n   \
                  stackup plan                   \x1b[90m# Show the install order\x1b[0m\n   \
                  stackup proxies                \x1b[90m# Regenerate proxy scripts\x1b[0m\n   \
                  stackup list                   \x1b[90m# List installed modules\x1b[0m\n"
)]
pub struct Cli {
    /// Workspace directory (defaults to current directory)
    #[arg(long, short = 'w', global = true, env = "STACKUP_WORKSPACE")]
    pub workspace: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long, short = 'v', global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Install all modules in dependency order
    Install(InstallArgs),

    /// Show the resolved install order without installing
    Plan,

    /// Regenerate proxy scripts for installed modules
    Proxies,

    /// List installed modules
    List(ListArgs),

    /// Show version information
    #[command(hide = true)]
    Version,

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parsing_plan() {
        let cli = Cli::try_parse_from(["stackup", "plan"]).unwrap();
        assert!(matches!(cli.command, Commands::Plan));
    }

    #[test]
    fn test_cli_parsing_proxies() {
        let cli = Cli::try_parse_from(["stackup", "proxies"]).unwrap();
        assert!(matches!(cli.command, Commands::Proxies));
    }

    #[test]
    fn test_cli_parsing_version() {
        let cli = Cli::try_parse_from(["stackup", "version"]).unwrap();
        assert!(matches!(cli.command, Commands::Version));
    }

    #[test]
    fn test_cli_global_options() {
        let cli = Cli::try_parse_from(["stackup", "-v", "-w", "/tmp/workspace", "list"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.workspace, Some(PathBuf::from("/tmp/workspace")));
    }

    #[test]
    fn test_cli_global_options_after_subcommand() {
        let cli = Cli::try_parse_from(["stackup", "install", "--verbose"]).unwrap();
        assert!(cli.verbose);
    }

    #[test]
    fn test_cli_requires_subcommand() {
        assert!(Cli::try_parse_from(["stackup"]).is_err());
    }

    #[test]
    fn test_cli_rejects_unknown_subcommand() {
        assert!(Cli::try_parse_from(["stackup", "uninstall", "api"]).is_err());
    }
}
