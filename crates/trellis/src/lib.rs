//! Trellis - Automatic layout for node-and-connection graphs.
//!
//! Trellis positions the nodes of a directed graph. Four engines are
//! available: a force-directed simulation with an optional Barnes-Hut
//! approximation, a layered (Sugiyama-style) drawing, a contour-based tree
//! drawing and a plain grid. When no algorithm is named, the graph is
//! analyzed and an engine is picked from its structure.
//!
//! # Example
//!
//! ```
//! use trellis::{
//!     Algorithm, LayoutOptions,
//!     model::{Connection, Node},
//! };
//!
//! let nodes = [Node::new("root"), Node::new("left"), Node::new("right")];
//! let connections = [
//!     Connection::new("e1", "root", "left"),
//!     Connection::new("e2", "root", "right"),
//! ];
//!
//! let result = trellis::compute_layout(&nodes, &connections, &LayoutOptions::default())
//!     .expect("valid input");
//!
//! // Three nodes and two connections without cycles form a tree
//! assert_eq!(result.algorithm(), Algorithm::Tree);
//! let root = result.position("root").expect("root is laid out");
//! let left = result.position("left").expect("left is laid out");
//! assert!(left.y() > root.y());
//! ```

pub mod analysis;
pub mod config;
pub mod layout;
pub mod structure;

mod error;

pub use trellis_core::{geometry, identifier, model};

pub use config::{Algorithm, AlgorithmSelection, LayoutOptions};
pub use error::TrellisError;
pub use layout::{
    LayoutMetrics, LayoutResult,
    engines::{Jitter, RandomJitter},
};

use std::time::Instant;

use log::info;

use analysis::GraphCharacteristics;
use layout::engines::{EngineBuilder, LayoutContext};
use model::{Connection, Node};
use structure::LayoutGraph;

/// Reusable entry point holding layout options.
///
/// # Examples
///
/// ```
/// use trellis::{
///     AutoLayout, LayoutOptions,
///     config::{Algorithm, GridOptions},
///     model::Node,
/// };
///
/// let layout = AutoLayout::new(
///     LayoutOptions::default()
///         .with_algorithm(Algorithm::Grid)
///         .with_grid(GridOptions { columns: Some(2), spacing: 50.0 }),
/// );
///
/// let nodes: Vec<Node> = ["a", "b", "c", "d"].into_iter().map(Node::new).collect();
/// let result = layout.compute(&nodes, &[]).expect("valid input");
///
/// assert_eq!(result.positions().len(), 4);
/// assert_eq!(result.iterations(), 0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct AutoLayout {
    options: LayoutOptions,
}

impl AutoLayout {
    /// Create a layout entry point with the given options.
    pub fn new(options: LayoutOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &LayoutOptions {
        &self.options
    }

    /// Lay out `nodes` and `connections`.
    ///
    /// The force engine draws its jitter from a generator seeded with
    /// `force.jitter_seed` when one is configured, and from the thread-local
    /// generator otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError`] when an option is out of range or a node
    /// carries a non-finite position or an invalid size. Unusual structure
    /// (cycles, self-loops, duplicate or dangling connections) is never an
    /// error.
    pub fn compute(
        &self,
        nodes: &[Node],
        connections: &[Connection],
    ) -> Result<LayoutResult, TrellisError> {
        match self.options.force().jitter_seed {
            Some(seed) => {
                self.compute_with_jitter(nodes, connections, &mut RandomJitter::seeded(seed))
            }
            None => {
                self.compute_with_jitter(nodes, connections, &mut RandomJitter::thread_local())
            }
        }
    }

    /// Lay out `nodes` and `connections` with a caller-supplied jitter source.
    ///
    /// Any closure returning a [`Point`](geometry::Point) can be passed,
    /// which makes force layouts fully reproducible.
    ///
    /// # Errors
    ///
    /// Same as [`AutoLayout::compute`].
    pub fn compute_with_jitter(
        &self,
        nodes: &[Node],
        connections: &[Connection],
        jitter: &mut dyn Jitter,
    ) -> Result<LayoutResult, TrellisError> {
        let start = Instant::now();

        self.options.validate()?;
        let graph = LayoutGraph::build(nodes, connections, &self.options)?;

        let algorithm = self.resolve_algorithm(&graph);
        let engine = EngineBuilder::new(&self.options).engine(algorithm);
        let mut context = LayoutContext::new(jitter);
        let placement = engine.calculate(&graph, &mut context);

        let result = LayoutResult::from_placement(
            &graph,
            placement,
            algorithm,
            self.options.padding(),
            start.elapsed(),
        );
        info!(
            algorithm:% = algorithm,
            nodes = graph.node_count(),
            iterations = result.iterations(),
            elapsed:? = result.metrics().execution_time();
            "Layout computed"
        );
        Ok(result)
    }

    fn resolve_algorithm(&self, graph: &LayoutGraph) -> Algorithm {
        if let Some(algorithm) = self.options.algorithm().concrete() {
            return algorithm;
        }

        let characteristics = analysis::analyze(graph);
        let algorithm = characteristics.select_algorithm();
        info!(
            algorithm:% = algorithm,
            nodes = characteristics.node_count,
            connections = characteristics.edge_count,
            has_cycles = characteristics.has_cycles,
            is_tree = characteristics.is_tree;
            "Algorithm selected automatically"
        );
        algorithm
    }
}

/// Lay out a graph with the given options.
///
/// Shorthand for `AutoLayout::new(options.clone()).compute(nodes, connections)`.
///
/// # Errors
///
/// Same as [`AutoLayout::compute`].
pub fn compute_layout(
    nodes: &[Node],
    connections: &[Connection],
    options: &LayoutOptions,
) -> Result<LayoutResult, TrellisError> {
    AutoLayout::new(options.clone()).compute(nodes, connections)
}

/// Analyze the structure of a graph without laying it out.
///
/// Node sizes play no part in the analysis, so default options are used to
/// build the graph.
///
/// # Errors
///
/// Returns [`TrellisError::InvalidNode`] for nodes with a non-finite position
/// or an invalid size.
pub fn analyze_graph(
    nodes: &[Node],
    connections: &[Connection],
) -> Result<GraphCharacteristics, TrellisError> {
    let graph = LayoutGraph::build(nodes, connections, &LayoutOptions::default())?;
    Ok(analysis::analyze(&graph))
}
