//! Error types for layout operations.
//!
//! Structurally odd graphs (self-loops, duplicate connections, dangling
//! endpoints, cycles) are never errors. [`TrellisError`] only reports
//! precondition violations at the API boundary.

use thiserror::Error;

use trellis_core::identifier::NodeId;

/// The main error type for layout operations.
#[derive(Debug, Error)]
pub enum TrellisError {
    #[error("Invalid option `{option}`: {reason}")]
    InvalidOption {
        option: &'static str,
        reason: String,
    },

    #[error("Invalid node `{id}`: {reason}")]
    InvalidNode { id: NodeId, reason: String },
}

impl TrellisError {
    /// Create a new `InvalidOption` error.
    pub fn invalid_option(option: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option,
            reason: reason.into(),
        }
    }
}
