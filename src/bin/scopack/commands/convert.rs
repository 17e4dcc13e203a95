//! `scopack convert` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::ConvertArgs;
use crate::commands::UnitProgress;
use scopack::ops::convert::{convert, ConvertOptions};
use scopack::util::{GlobalContext, Shell, Status};

pub fn execute(args: ConvertArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.config();

    let opts = ConvertOptions {
        scpm: ctx.resolve_path(&args.scpm),
        package: ctx.resolve_path(&args.package),
        output: ctx.resolve_path(&args.output),
        urn_map: args.urn_map.map(|p| ctx.resolve_path(&p)),
    };

    let span = shell.span();
    shell.status(Status::Building, opts.scpm.display());

    let mut progress = UnitProgress::new(shell);
    let result = convert(&opts, &config, |event| progress.update(event))?;
    progress.finish();

    if shell.is_verbose() {
        shell.note(format!("{} package files added as assets", result.assets));
    }
    if let Some(path) = &opts.urn_map {
        shell.status(Status::Wrote, path.display());
    }
    shell.status(Status::Wrote, opts.output.display());

    shell.json_event(&serde_json::json!({
        "reason": "manifest-written",
        "manifest": result.manifest.identifier,
        "path": opts.output,
        "resources": result.manifest.resources().len(),
        "dependencies-added": result.report.total_added(),
    }));

    span.finish_with_message(format!(
        "{} ({} units, {} dependencies added)",
        result.manifest.identifier,
        result.report.units.len(),
        result.report.total_added()
    ));

    Ok(())
}
