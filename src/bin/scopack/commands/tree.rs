//! `scopack tree` command

use std::collections::HashSet;

use anyhow::{bail, Result};

use crate::cli::TreeArgs;
use scopack::core::{Manifest, ResourceId};
use scopack::resolver::DependencyGraph;
use scopack::util::GlobalContext;

pub fn execute(args: TreeArgs) -> Result<()> {
    let ctx = GlobalContext::new()?;
    let manifest = Manifest::load(&ctx.resolve_path(&args.manifest))?;
    let graph = DependencyGraph::from_manifest(&manifest);

    let roots: Vec<&ResourceId> = match &args.sco {
        Some(id) => match manifest.resource(id) {
            Some(resource) => vec![&resource.identifier],
            None => bail!(
                "no resource `{}` in manifest {}",
                id,
                manifest.identifier
            ),
        },
        None if args.invert => manifest
            .resources()
            .iter()
            .filter(|r| !r.is_sco())
            .map(|r| &r.identifier)
            .collect(),
        None => manifest.scos().map(|r| &r.identifier).collect(),
    };

    let opts = TreeOptions {
        max_depth: args.depth.unwrap_or(usize::MAX),
        invert: args.invert,
    };

    for root in roots {
        // Duplicates are marked per root
        let mut seen = HashSet::new();
        print_tree(&graph, root, 0, &opts, &mut seen);
    }

    Ok(())
}

struct TreeOptions {
    max_depth: usize,
    invert: bool,
}

fn print_tree<'g>(
    graph: &'g DependencyGraph,
    id: &'g ResourceId,
    depth: usize,
    opts: &TreeOptions,
    seen: &mut HashSet<&'g ResourceId>,
) {
    if depth > opts.max_depth {
        return;
    }

    let is_duplicate = !seen.insert(id);

    let prefix = if depth == 0 {
        String::new()
    } else {
        format!("{}├── ", "│   ".repeat(depth - 1))
    };

    let marker = if is_duplicate {
        " (*)"
    } else if graph.is_dangling(id.as_str()) {
        " (missing)"
    } else {
        ""
    };

    let summary = if depth == 0 && !opts.invert {
        format!(" [{} resources]", graph.transitive_deps(id.as_str()).len())
    } else {
        String::new()
    };

    println!("{}{}{}{}", prefix, id, summary, marker);

    if is_duplicate {
        return;
    }

    let next = if opts.invert {
        graph.dependents(id.as_str())
    } else {
        graph.deps(id.as_str())
    };
    for child in next {
        print_tree(graph, child, depth + 1, opts, seen);
    }
}
