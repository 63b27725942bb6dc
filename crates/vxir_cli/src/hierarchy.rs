//! The `vxir hierarchy` command.

use std::path::Path;

use crate::pipeline::{build_file, resolve_config};
use crate::summary::render_hierarchy;
use crate::{GlobalArgs, HierarchyArgs};

/// Prints every hierarchy tree of the document named by `args`.
pub fn run(args: &HierarchyArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let unit = build_file(Path::new(&args.file), &config)?;
    let roots = unit.hierarchy_roots();
    if roots.is_empty() {
        if !global.quiet {
            eprintln!("no hierarchy in {}", args.file);
        }
        return Ok(0);
    }
    for (_, root) in roots {
        print!("{}", render_hierarchy(&unit, root));
    }
    Ok(0)
}
