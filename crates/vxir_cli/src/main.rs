//! vxir CLI: reads Verilator XML netlist dumps and reports what they contain.
//!
//! `vxir parse` builds the IR and prints a summary of files, types, modules
//! and hierarchies; `vxir hierarchy` prints the instance tree.

#![warn(missing_docs)]

mod hierarchy;
mod parse;
mod pipeline;
mod summary;

use std::process;

use clap::{Parser, Subcommand, ValueEnum};

/// vxir: Verilator XML to IR front-end.
#[derive(Parser, Debug)]
#[command(name = "vxir", version, about = "Verilator XML netlist reader")]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable verbose (debug-level) output.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to a `vxir.toml` configuration file.
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// The subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Build the IR from a document and print a summary.
    Parse(ParseArgs),
    /// Print the instance hierarchy of a document.
    Hierarchy(HierarchyArgs),
}

/// Arguments for the `vxir parse` subcommand.
#[derive(Parser, Debug)]
pub struct ParseArgs {
    /// The XML document to read.
    pub file: String,

    /// Output format for the summary.
    #[arg(short, long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

/// Arguments for the `vxir hierarchy` subcommand.
#[derive(Parser, Debug)]
pub struct HierarchyArgs {
    /// The XML document to read.
    pub file: String,
}

/// Summary output format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    /// Human-readable terminal output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Global settings derived from CLI flags.
pub struct GlobalArgs {
    /// Whether to suppress non-error output.
    pub quiet: bool,
    /// Whether to print verbose/debug information.
    pub verbose: bool,
    /// Optional path to a custom config file.
    pub config: Option<String>,
}

fn main() {
    let cli = Cli::parse();

    let global = GlobalArgs {
        quiet: cli.quiet,
        verbose: cli.verbose,
        config: cli.config,
    };
    init_tracing(&global);

    let result = match cli.command {
        Command::Parse(ref args) => parse::run(args, &global),
        Command::Hierarchy(ref args) => hierarchy::run(args, &global),
    };

    match result {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("error: {e}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber.
///
/// `RUST_LOG` picks the filter unless `-v` or `-q` is given.
fn init_tracing(global: &GlobalArgs) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = if global.verbose {
        EnvFilter::new("debug")
    } else if global.quiet {
        EnvFilter::new("error")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    let _ = tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_level(true)
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .try_init();
}
