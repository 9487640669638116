//! mask: command-line interface for the mask mesh engine.
//!
//! Inspect, validate, and export mask projects outside the interactive
//! editor, suitable for scripting and build pipelines.
//!
//! # Logging
//!
//! Set the `RUST_LOG` environment variable (or pass `-v`/`-vv`) to
//! control log output:
//! - `RUST_LOG=mask_mesh=info` - basic operation logging
//! - `RUST_LOG=mask_mesh=debug` - detailed progress logging
//!
//! # Example
//!
//! ```bash
//! mask info face.lmb
//! mask validate face.lmb
//! mask export face.lmb -o face.volume.stl --mode volume --thickness 2
//! ```

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

mod commands;

use commands::{export, info, validate};

/// mask - inspect, validate, and export symmetric relief mask projects.
#[derive(Parser)]
#[command(name = "mask")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Suppress all non-error output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Increase output verbosity (-v for info, -vv for debug, -vvv for trace)
    #[arg(long, short, global = true, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand)]
enum Commands {
    /// Display project statistics
    Info {
        /// Input project file
        input: PathBuf,
    },

    /// Audit a project against the mesh invariants
    Validate {
        /// Input project file
        input: PathBuf,
    },

    /// Export a project as binary STL
    Export {
        /// Input project file
        input: PathBuf,

        /// Output STL path
        #[arg(short, long)]
        output: PathBuf,

        /// Export mode
        #[arg(long, value_enum, default_value = "surface")]
        mode: ExportMode,

        /// Shell thickness in world units (volume mode only)
        #[arg(long)]
        thickness: Option<f64>,
    },
}

/// Which STL pipeline to run.
#[derive(Clone, Copy, ValueEnum)]
pub enum ExportMode {
    /// Flat mirrored surface (zero thickness)
    Surface,
    /// Closed extruded shell (printable solid)
    Volume,
}

fn init_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "mask_mesh=info,mask=info",
            2 => "mask_mesh=debug,mask=debug",
            _ => "trace",
        }
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    match cli.command {
        Commands::Info { input } => info::run(&input),
        Commands::Validate { input } => validate::run(&input),
        Commands::Export {
            input,
            output,
            mode,
            thickness,
        } => export::run(&input, &output, mode, thickness),
    }
}
