//! Layout engine factory module
//!
//! Every algorithm implements [`LayoutEngine`]. [`EngineBuilder`] turns the
//! per-algorithm option sections of [`LayoutOptions`] into a configured
//! engine for the algorithm the orchestrator settled on.

pub mod force;
mod grid;
mod layered;
mod tree;

use trellis_core::geometry::Point;

use crate::{
    config::{Algorithm, LayoutOptions},
    structure::LayoutGraph,
};

pub use force::{Jitter, RandomJitter};

/// Per-call state handed to an engine alongside the graph.
pub struct LayoutContext<'a> {
    jitter: &'a mut dyn Jitter,
}

impl<'a> LayoutContext<'a> {
    pub fn new(jitter: &'a mut dyn Jitter) -> Self {
        Self { jitter }
    }

    /// Source of the displacement used to separate coincident bodies.
    pub fn jitter(&mut self) -> &mut dyn Jitter {
        &mut *self.jitter
    }
}

/// Raw engine output, before normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct Placement {
    /// Node centers, indexed like the graph's nodes.
    pub positions: Vec<Point>,
    /// Iterations actually performed; zero for non-iterative engines.
    pub iterations: usize,
    pub edge_crossings: Option<usize>,
}

impl Placement {
    /// Creates a placement for a non-iterative engine.
    pub fn new(positions: Vec<Point>) -> Self {
        Self {
            positions,
            iterations: 0,
            edge_crossings: None,
        }
    }

    /// Returns the placement every engine produces for graphs of at most one
    /// node: nothing for an empty graph, the origin for a single node.
    pub fn trivial(graph: &LayoutGraph) -> Option<Self> {
        match graph.node_count() {
            0 => Some(Self::new(Vec::new())),
            1 => Some(Self::new(vec![Point::default()])),
            _ => None,
        }
    }

    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    pub fn with_edge_crossings(mut self, crossings: usize) -> Self {
        self.edge_crossings = Some(crossings);
        self
    }
}

/// Trait defining the interface for layout engines
pub trait LayoutEngine {
    /// Calculate node centers for `graph`.
    ///
    /// The returned positions are indexed like the graph's nodes. They need
    /// not be centered; the caller normalizes them.
    fn calculate(&self, graph: &LayoutGraph, context: &mut LayoutContext<'_>) -> Placement;
}

/// Builder for creating configured layout engines.
pub struct EngineBuilder<'a> {
    options: &'a LayoutOptions,
}

impl<'a> EngineBuilder<'a> {
    /// Create a builder that configures engines from `options`
    pub fn new(options: &'a LayoutOptions) -> Self {
        Self { options }
    }

    /// Get an engine of the specified type with configured options
    pub fn engine(&self, algorithm: Algorithm) -> Box<dyn LayoutEngine> {
        match algorithm {
            Algorithm::Force => Box::new(force::Engine::new(self.options.force().clone())),
            Algorithm::Layered => Box::new(layered::Engine::new(self.options.layered().clone())),
            Algorithm::Tree => Box::new(tree::Engine::new(self.options.tree().clone())),
            Algorithm::Grid => Box::new(grid::Engine::new(self.options.grid().clone())),
        }
    }
}
