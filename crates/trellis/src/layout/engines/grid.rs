//! Grid layout engine
//!
//! Places nodes row by row in input order. Every cell is as large as the
//! largest node dimension plus the configured spacing, and the grid is
//! centered on the origin.

use trellis_core::geometry::Point;

use crate::{
    config::GridOptions,
    layout::engines::{LayoutContext, LayoutEngine, Placement},
    structure::LayoutGraph,
};

/// The grid layout engine
pub struct Engine {
    options: GridOptions,
}

impl Engine {
    /// Create a new grid layout engine
    pub fn new(options: GridOptions) -> Self {
        Self { options }
    }

    fn columns(&self, node_count: usize) -> usize {
        let columns = self
            .options
            .columns
            .unwrap_or_else(|| (node_count as f64).sqrt().ceil() as usize);
        columns.clamp(1, node_count.max(1))
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &LayoutGraph, _context: &mut LayoutContext<'_>) -> Placement {
        if let Some(placement) = Placement::trivial(graph) {
            return placement;
        }

        let node_count = graph.node_count();
        let columns = self.columns(node_count);
        let rows = node_count.div_ceil(columns);
        let largest = graph
            .nodes()
            .map(|node| node.size().max_dimension())
            .fold(0.0, f32::max);
        let cell = largest + self.options.spacing;

        let column_center = (columns - 1) as f32 / 2.0;
        let row_center = (rows - 1) as f32 / 2.0;

        let positions = (0..node_count)
            .map(|index| {
                let row = index / columns;
                let column = index % columns;
                Point::new(
                    (column as f32 - column_center) * cell,
                    (row as f32 - row_center) * cell,
                )
            })
            .collect();

        Placement::new(positions)
    }
}
