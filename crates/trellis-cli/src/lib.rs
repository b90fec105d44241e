//! Trellis CLI library
//!
//! This module contains the core CLI logic for the Trellis layout tool:
//! read a graph document, lay it out and write a TOML report.

pub mod error_adapter;

mod args;
mod config;
mod document;
mod error;

pub use args::{AlgorithmArg, Args};
pub use document::{GraphDocument, LayoutReport};
pub use error::CliError;

use std::{fs, path::Path};

use log::{debug, info};

use trellis::{AutoLayout, analyze_graph};

/// Run the Trellis CLI application
///
/// This function reads the input document, computes its layout (or, with
/// `--analyze`, its structural characteristics) and writes the TOML report
/// to the output file or to stdout.
///
/// # Errors
///
/// Returns `CliError` for:
/// - File I/O errors
/// - Configuration loading errors
/// - Malformed graph documents
/// - Invalid layout options or nodes
pub fn run(args: &Args) -> Result<(), CliError> {
    info!(input_path = args.input; "Processing graph");

    let mut options = config::load_config(args.config.as_ref())?;
    if let Some(algorithm) = args.algorithm {
        options = options.with_algorithm(algorithm);
    }

    let path = Path::new(&args.input);
    let src = fs::read_to_string(path)?;
    let document = GraphDocument::parse(&src).map_err(|err| CliError::Document {
        path: path.to_path_buf(),
        src: src.clone(),
        err,
    })?;
    let nodes = document.nodes();
    let connections = document.connections();
    debug!(nodes = nodes.len(), connections = connections.len(); "Graph document parsed");

    let report = if args.analyze {
        let characteristics = analyze_graph(&nodes, &connections)?;
        toml::to_string(&characteristics)?
    } else {
        let result = AutoLayout::new(options).compute(&nodes, &connections)?;
        LayoutReport::new(&result).to_toml()?
    };

    match &args.output {
        Some(output) => {
            fs::write(output, report)?;
            info!(output_file = output; "Report written");
        }
        None => print!("{report}"),
    }

    Ok(())
}
