//! Layout results returned to callers.

use std::time::Duration;

use indexmap::IndexMap;
use log::warn;
use serde::Serialize;

use trellis_core::{
    geometry::{Bounds, Point, Size},
    identifier::NodeId,
};

use crate::{config::Algorithm, layout::engines::Placement, structure::LayoutGraph};

/// Quality and cost measurements of a layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutMetrics {
    execution_time: Duration,
    edge_crossings: Option<usize>,
    bounding_box: Size,
}

impl LayoutMetrics {
    /// Wall-clock time of the whole layout call.
    pub fn execution_time(&self) -> Duration {
        self.execution_time
    }

    /// Crossings between connections of adjacent layers; layered layouts only.
    pub fn edge_crossings(&self) -> Option<usize> {
        self.edge_crossings
    }

    /// Size of the box enclosing every node, padding included.
    pub fn bounding_box(&self) -> Size {
        self.bounding_box
    }
}

/// The outcome of a layout call.
///
/// Positions are node centers keyed by id, in input order. The enclosing box
/// of all nodes is centered on the origin.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LayoutResult {
    positions: IndexMap<NodeId, Point>,
    iterations: usize,
    algorithm: Algorithm,
    metrics: LayoutMetrics,
}

impl LayoutResult {
    /// Normalizes raw engine output.
    ///
    /// Non-finite coordinates are replaced by zero, the enclosing box of all
    /// nodes is moved to the origin and its size is grown by `padding` on
    /// every side.
    pub(crate) fn from_placement(
        graph: &LayoutGraph,
        placement: Placement,
        algorithm: Algorithm,
        padding: f32,
        execution_time: Duration,
    ) -> Self {
        let Placement {
            positions,
            iterations,
            edge_crossings,
        } = placement;

        let positions: Vec<Point> = positions
            .into_iter()
            .zip(graph.nodes())
            .map(|(position, node)| sanitize(position, node.id()))
            .collect();

        let bounds = Bounds::enclosing(
            positions
                .iter()
                .zip(graph.nodes())
                .map(|(&position, node)| (position, node.size())),
        );
        let (center, bounding_box) = match bounds {
            Some(bounds) => (bounds.center(), bounds.to_size().add_padding(padding)),
            None => (Point::default(), Size::default()),
        };

        let positions = graph
            .nodes()
            .zip(positions)
            .map(|(node, position)| (node.id().clone(), position.sub_point(center)))
            .collect();

        Self {
            positions,
            iterations,
            algorithm,
            metrics: LayoutMetrics {
                execution_time,
                edge_crossings,
                bounding_box,
            },
        }
    }

    /// Computed centers keyed by node id, in input order.
    pub fn positions(&self) -> &IndexMap<NodeId, Point> {
        &self.positions
    }

    /// Returns the computed center of the node named `id`.
    pub fn position(&self, id: &str) -> Option<Point> {
        self.positions.get(id).copied()
    }

    /// Iterations actually performed; zero for non-iterative algorithms.
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    /// The algorithm that produced the layout; never "auto".
    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn metrics(&self) -> &LayoutMetrics {
        &self.metrics
    }
}

fn sanitize(position: Point, id: &NodeId) -> Point {
    if position.is_finite() {
        return position;
    }
    warn!(id:% = id, position:? = position; "Replacing non-finite coordinate");
    Point::new(finite_or_zero(position.x()), finite_or_zero(position.y()))
}

fn finite_or_zero(value: f32) -> f32 {
    if value.is_finite() { value } else { 0.0 }
}
