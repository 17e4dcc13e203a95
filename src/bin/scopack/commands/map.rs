//! `scopack map` command

use std::sync::Arc;

use anyhow::{Context, Result};

use crate::cli::MapArgs;
use scopack::sources::scan_package;
use scopack::util::fs::write_string;
use scopack::util::{GlobalContext, Shell, Status};

pub fn execute(args: MapArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.config();
    let package = ctx.resolve_path(&args.package);

    shell.status(Status::Mapping, package.display());
    let map = scan_package(&package, &config)?;

    let mut text = if args.json {
        map.to_json().context("failed to serialize URN map")?
    } else {
        map.to_xml().context("failed to serialize URN map")?
    };
    if !text.ends_with('\n') {
        text.push('\n');
    }

    match args.output {
        Some(path) => {
            let path = ctx.resolve_path(&path);
            write_string(&path, &text)?;
            shell.status(
                Status::Wrote,
                format!("{} ({} entries)", path.display(), map.len()),
            );
        }
        None => print!("{}", text),
    }

    Ok(())
}
