//! Error adapter for converting CliError to miette diagnostics.
//!
//! This module provides the bridge between the CLI's standard error types
//! and miette's rich diagnostic formatting. TOML syntax errors in the graph
//! document or the configuration file are rendered with the offending span
//! labeled in the source text.

use std::fmt;

use miette::{Diagnostic as MietteDiagnostic, LabeledSpan, SourceSpan};

use trellis::TrellisError;

use crate::CliError;

/// Adapter that renders a [`CliError`] through miette.
pub struct ErrorAdapter<'a>(pub &'a CliError);

impl fmt::Debug for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.0, f)
    }
}

impl fmt::Display for ErrorAdapter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for ErrorAdapter<'_> {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        // The labeled span already shows the TOML message
        if self.0.toml_source().is_some() {
            return None;
        }
        std::error::Error::source(self.0)
    }
}

impl MietteDiagnostic for ErrorAdapter<'_> {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let code = match self.0 {
            CliError::Io(_) => "trellis::io",
            CliError::Document { .. } => "trellis::document",
            CliError::Config { .. } | CliError::MissingConfig(_) => "trellis::config",
            CliError::Layout(TrellisError::InvalidOption { .. }) => "trellis::option",
            CliError::Layout(TrellisError::InvalidNode { .. }) => "trellis::node",
            CliError::Report(_) => "trellis::report",
        };
        Some(Box::new(code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        let help = match self.0 {
            CliError::Document { .. } => {
                "nodes are `[[nodes]]` tables with an `id`; connections are \
                 `[[connections]]` tables with a `source` and a `target`"
            }
            CliError::Config { .. } => "layout options belong in a `[layout]` table",
            CliError::Layout(TrellisError::InvalidOption { .. }) => {
                "check the `[layout]` table of the configuration file"
            }
            _ => return None,
        };
        Some(Box::new(help))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        self.0
            .toml_source()
            .map(|(_, src)| src as &dyn miette::SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let (err, _) = self.0.toml_source()?;
        let span = SourceSpan::from(err.span()?);
        let label = LabeledSpan::new_primary_with_span(Some(err.message().to_string()), span);
        Some(Box::new(std::iter::once(label)))
    }
}
