//! The `vxir parse` command.

use std::path::Path;

use crate::pipeline::{build_file, resolve_config};
use crate::summary::{render_text, to_json};
use crate::{GlobalArgs, ParseArgs, ReportFormat};

/// Builds the document named by `args` and prints its summary.
pub fn run(args: &ParseArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let config = resolve_config(global)?;
    let unit = build_file(Path::new(&args.file), &config)?;
    if global.quiet {
        return Ok(0);
    }
    match args.format {
        ReportFormat::Text => print!("{}", render_text(&unit)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&to_json(&unit))?),
    }
    Ok(0)
}
