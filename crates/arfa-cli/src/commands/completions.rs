//! Shell completion generation.

use std::io;

use clap::CommandFactory;
use clap_complete::{Generator, generate, shells};

use crate::cli::{Cli, CompletionsArgs, Shell};
use crate::error::CliResult;

const BIN_NAME: &str = "arfa";

pub fn execute(args: CompletionsArgs) -> CliResult<()> {
    write_completions(args.shell, &mut io::stdout());
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn io::Write) {
    match shell {
        Shell::Bash => render(shells::Bash, out),
        Shell::Zsh => render(shells::Zsh, out),
        Shell::Fish => render(shells::Fish, out),
        Shell::PowerShell => render(shells::PowerShell, out),
        Shell::Elvish => render(shells::Elvish, out),
    }
}

fn render(generator: impl Generator, out: &mut dyn io::Write) {
    let mut cmd = Cli::command();
    generate(generator, &mut cmd, BIN_NAME, out);
}
