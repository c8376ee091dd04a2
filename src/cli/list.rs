use clap::Parser;

/// Arguments for the list command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  List installed modules:\n    stackup list\n\n\
                  Include paths and entry points:\n    stackup list --detailed")]
pub struct ListArgs {
    /// Show source path, install mode and entry points
    #[arg(long)]
    pub detailed: bool,
}
