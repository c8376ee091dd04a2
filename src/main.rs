//! stackup - local module installer
//!
//! Installs a workspace's local modules into one isolated environment, in an
//! order where every module follows its dependencies, and generates proxy
//! scripts for the commands those modules expose.

use clap::Parser;
use miette::Diagnostic;

mod cli;
mod commands;
mod config;
mod domain;
mod environment;
mod error;
mod hash;
mod installer;
mod logging;
mod path_utils;
mod progress;
mod proxy;
mod resolver;
mod ui;
mod workspace;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Install(args) => commands::install::run(cli.workspace, args),
        Commands::Plan => commands::plan::run(cli.workspace),
        Commands::Proxies => commands::proxies::run(cli.workspace),
        Commands::List(args) => commands::list::run(cli.workspace, args),
        Commands::Version => commands::version::run(),
        Commands::Completions(args) => commands::completions::run(args),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if let Some(help) = e.help() {
            eprintln!("  help: {}", help);
        }
        std::process::exit(1);
    }
}
