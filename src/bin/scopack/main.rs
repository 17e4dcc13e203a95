//! scopack CLI - SCORM packaging for S1000D content

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands, MessageFormat};
use scopack::resolver::ResolveError;
use scopack::sources::MapError;
use scopack::util::diagnostic::emit;
use scopack::util::Shell;

fn main() {
    let cli = Cli::parse();
    let shell = Arc::new(Shell::from_flags(
        cli.quiet,
        cli.verbose,
        cli.color,
        cli.message_format == MessageFormat::Json,
    ));

    if let Err(e) = run(cli, &shell) {
        report(&e, &shell);
        std::process::exit(1);
    }
}

fn run(cli: Cli, shell: &Arc<Shell>) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("scopack=debug")
    } else if cli.quiet {
        EnvFilter::new("scopack=error")
    } else {
        EnvFilter::new("scopack=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    // Execute command
    match cli.command {
        Commands::Convert(args) => commands::convert::execute(args, shell),
        Commands::Resolve(args) => commands::resolve::execute(args, shell),
        Commands::Map(args) => commands::map::execute(args, shell),
        Commands::Tree(args) => commands::tree::execute(args),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

/// Print a failed command's error, with a full diagnostic where one exists.
fn report(e: &anyhow::Error, shell: &Shell) {
    if shell.is_json() {
        shell.error(format!("{:#}", e));
        return;
    }

    if let Some(err) = e.downcast_ref::<ResolveError>() {
        emit(&err.to_diagnostic(), shell.use_color());
    } else if let Some(err) = e.downcast_ref::<MapError>() {
        emit(&err.to_diagnostic(), shell.use_color());
    } else {
        eprintln!("error: {:#}", e);
    }
}
