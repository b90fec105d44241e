//! Graph structures shared by the analyzer and every layout engine.
//!
//! A [`LayoutGraph`] is built once per layout call from the caller's nodes
//! and connections. Engines never look at the raw input again; they address
//! nodes by dense index and read the precomputed adjacency.

mod graph;

pub use graph::{LayoutGraph, NodeEntry};
