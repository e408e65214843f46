use crate::cli::{Cli, Shell};
use clap::CommandFactory;
use clap_complete::{generate, Shell as ClapShell};
use std::io;

pub fn execute(shell: Shell) {
    let mut cmd = Cli::command();
    let bin_name = "swapdesk";

    let clap_shell = match shell {
        Shell::Bash => ClapShell::Bash,
        Shell::Zsh => ClapShell::Zsh,
        Shell::Fish => ClapShell::Fish,
        Shell::PowerShell => ClapShell::PowerShell,
        Shell::Elvish => ClapShell::Elvish,
    };

    generate(clap_shell, &mut cmd, bin_name, &mut io::stdout());

    match shell {
        Shell::Bash => eprintln!("# Add to ~/.bashrc:\n#   eval \"$(swapdesk completions bash)\""),
        Shell::Zsh => eprintln!("# Add to ~/.zshrc:\n#   eval \"$(swapdesk completions zsh)\""),
        Shell::Fish => eprintln!(
            "# Save to:\n#   swapdesk completions fish > ~/.config/fish/completions/swapdesk.fish"
        ),
        Shell::PowerShell => eprintln!(
            "# Add to PowerShell profile:\n#   swapdesk completions powershell | Out-String | Invoke-Expression"
        ),
        Shell::Elvish => eprintln!("# Add to Elvish config:\n#   eval (swapdesk completions elvish | slurp)"),
    }
}
