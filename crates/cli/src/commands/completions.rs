//! completions command - Print a shell completion script
//!
//! The script covers every subcommand and the website flags shared by
//! `preview` and `up`.

use std::io::Write;

use clap::CommandFactory;
use clap_complete::Shell;

use super::Cli;
use crate::exit_code::ExitCode;

/// Arguments for the completions command
#[derive(clap::Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

/// Print the completion script for the requested shell
pub fn execute(args: CompletionsArgs) -> ExitCode {
    let script = script(args.shell);
    match std::io::stdout().lock().write_all(&script) {
        Ok(()) => ExitCode::Success,
        Err(e) => {
            eprintln!("Failed to write completions: {e}");
            ExitCode::GeneralError
        }
    }
}

fn script(shell: Shell) -> Vec<u8> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    let mut buf = Vec::new();
    clap_complete::generate(shell, &mut cmd, name, &mut buf);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;

    fn script_text(shell: Shell) -> String {
        String::from_utf8(script(shell)).unwrap()
    }

    #[test]
    fn test_every_shell_offers_the_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let text = script_text(shell);
            for subcommand in ["init", "preview", "up"] {
                assert!(text.contains(subcommand), "{shell}: missing {subcommand}");
            }
        }
    }

    #[test]
    fn test_website_flags_are_completed() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::PowerShell] {
            let text = script_text(shell);
            assert!(text.contains("--static-directory"), "{shell}");
            assert!(text.contains("--include"), "{shell}");
        }

        // fish spells long flags as `-l name`
        let fish = script_text(Shell::Fish);
        assert!(fish.contains("-l static-directory"));
        assert!(fish.contains("-l include"));
    }
}
