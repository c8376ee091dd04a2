use clap::Parser;

/// Arguments for the install command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                   Install modules that are not installed yet:\n    stackup install\n\n\
                   Reinstall every module:\n    stackup install --force\n\n\
                   Stop at the first failure (CI):\n    stackup install --fail-fast\n\n\
                   Skip proxy generation:\n    stackup install --no-proxies")]
pub struct InstallArgs {
    /// Reinstall modules even if they are already installed
    #[arg(long, short = 'f')]
    pub force: bool,

    /// Stop at the first module that fails to install
    #[arg(long)]
    pub fail_fast: bool,

    /// Do not generate proxy scripts after installing
    #[arg(long)]
    pub no_proxies: bool,
}
