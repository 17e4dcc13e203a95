//! `scopack resolve` command

use std::sync::Arc;

use anyhow::Result;

use crate::cli::ResolveArgs;
use crate::commands::UnitProgress;
use scopack::ops::resolve::{resolve_manifest, ResolveOptions};
use scopack::util::{GlobalContext, Shell, Status};

pub fn execute(args: ResolveArgs, shell: &Arc<Shell>) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let config = ctx.config();

    let opts = ResolveOptions {
        manifest: ctx.resolve_path(&args.manifest),
        package: ctx.resolve_path(&args.package),
        output: args.output.map(|p| ctx.resolve_path(&p)),
    };

    let span = shell.span();

    let mut progress = UnitProgress::new(shell);
    let result = resolve_manifest(&opts, &config, |event| progress.update(event))?;
    progress.finish();

    if shell.is_verbose() {
        for unit in result.report.units.iter().filter(|u| u.added > 0) {
            shell.note(format!("`{}`: {} dependencies added", unit.unit, unit.added));
        }
    }
    shell.status(Status::Wrote, result.output.display());

    shell.json_event(&serde_json::json!({
        "reason": "manifest-written",
        "path": result.output,
        "dependencies-added": result.report.total_added(),
    }));

    span.finish_with_message(format!(
        "{} dependencies added",
        result.report.total_added()
    ));

    Ok(())
}
