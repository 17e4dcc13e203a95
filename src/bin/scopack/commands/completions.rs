//! `scopack completions` command

use std::io::Write;

use anyhow::{Context, Result};
use clap::CommandFactory;

use scopack::util::fs::write_string;

use crate::cli::{Cli, CompletionsArgs};

pub fn execute(args: CompletionsArgs) -> Result<()> {
    let mut script = Vec::new();
    clap_complete::generate(args.shell, &mut Cli::command(), "scopack", &mut script);

    match args.output {
        Some(path) => {
            let text = String::from_utf8(script).context("completion script is not UTF-8")?;
            write_string(&path, &text)
        }
        None => std::io::stdout()
            .write_all(&script)
            .context("failed to write completions"),
    }
}
