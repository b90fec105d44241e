//! Command-line argument definitions for the Trellis CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments control input/output paths, configuration file
//! selection, the layout algorithm and logging verbosity.

use clap::{Parser, ValueEnum};

use trellis::AlgorithmSelection;

/// Layout algorithm names accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlgorithmArg {
    Auto,
    Force,
    Layered,
    Tree,
    Grid,
}

impl From<AlgorithmArg> for AlgorithmSelection {
    fn from(arg: AlgorithmArg) -> Self {
        match arg {
            AlgorithmArg::Auto => AlgorithmSelection::Auto,
            AlgorithmArg::Force => AlgorithmSelection::Force,
            AlgorithmArg::Layered => AlgorithmSelection::Layered,
            AlgorithmArg::Tree => AlgorithmSelection::Tree,
            AlgorithmArg::Grid => AlgorithmSelection::Grid,
        }
    }
}

/// Command-line arguments for the Trellis layout tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Path to the input graph document (TOML)
    #[arg(help = "Path to the input file")]
    pub input: String,

    /// Path to the output report; printed to stdout when omitted
    #[arg(short, long)]
    pub output: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Layout algorithm, overriding the configuration file
    #[arg(short, long, value_enum)]
    pub algorithm: Option<AlgorithmArg>,

    /// Report the graph's structure instead of laying it out
    #[arg(long)]
    pub analyze: bool,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: String,
}
