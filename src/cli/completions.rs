use clap::Parser;
use clap_complete::Shell;

/// Arguments for completions command
#[derive(Parser, Debug)]
#[command(after_help = "EXAMPLES:\n  \
                  Generate bash completions:\n    stackup completions --shell bash > ~/.bash_completion.d/stackup\n\n\
                  Generate zsh completions:\n    stackup completions --shell zsh > ~/.zfunc/_stackup\n\n\
                  Generate fish completions:\n    stackup completions --shell fish > ~/.config/fish/completions/stackup.fish\n\n\
                  Generate PowerShell completions:\n    stackup completions --shell powershell")]
pub struct CompletionsArgs {
    /// Shell type
    #[arg(long, short = 's', value_enum)]
    pub shell: Shell,
}
