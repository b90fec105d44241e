//! Layered layout engine
//!
//! Layers are stacked `layer_spacing` apart. Within a layer, nodes are laid
//! out side by side, `node_spacing` apart, and the row is centered on the
//! layer axis. Coordinates are computed top to bottom and then mapped into
//! the configured direction.

use log::debug;

use trellis_core::geometry::Point;

use crate::{
    config::LayeredOptions,
    layout::engines::{LayoutContext, LayoutEngine, Placement},
    structure::LayoutGraph,
};

use super::{
    ordering::{Ordering, reduce_crossings},
    ranking::{assign_layers, group_by_layer},
};

/// The layered layout engine
///
/// Suited to directed acyclic graphs; cyclic input is tolerated and laid
/// out with the cycle's back edges pointing upward.
pub struct Engine {
    options: LayeredOptions,
}

impl Engine {
    /// Create a new layered layout engine
    pub fn new(options: LayeredOptions) -> Self {
        Self { options }
    }

    fn positions(&self, graph: &LayoutGraph, layers: &[Vec<usize>]) -> Vec<Point> {
        let direction = self.options.direction;
        let spacing = self.options.node_spacing;
        let mut positions = vec![Point::default(); graph.node_count()];

        for (layer_index, layer) in layers.iter().enumerate() {
            let extents: Vec<f32> = layer
                .iter()
                .map(|&node| direction.cross_extent(graph.node(node).size()))
                .collect();
            let gaps = spacing * layer.len().saturating_sub(1) as f32;
            let total = extents.iter().sum::<f32>() + gaps;
            let y = layer_index as f32 * self.options.layer_spacing;

            let mut cursor = -total / 2.0;
            for (&node, &extent) in layer.iter().zip(&extents) {
                let x = cursor + extent / 2.0;
                positions[node] = direction.transform(Point::new(x, y));
                cursor += extent + spacing;
            }
        }

        positions
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &LayoutGraph, _context: &mut LayoutContext<'_>) -> Placement {
        if let Some(placement) = Placement::trivial(graph) {
            return placement.with_edge_crossings(0);
        }

        let layer_of = assign_layers(graph);
        let initial = Ordering::new(group_by_layer(&layer_of), graph.node_count());
        debug!(
            nodes = graph.node_count(),
            layers = initial.layers().len();
            "Layers assigned"
        );

        let (ordering, crossings) = if self.options.crossing_reduction {
            reduce_crossings(
                graph,
                &layer_of,
                initial,
                self.options.crossing_method,
                self.options.crossing_iterations,
            )
        } else {
            let crossings = initial.count_crossings(graph, &layer_of);
            (initial, crossings)
        };

        let positions = self.positions(graph, ordering.layers());
        Placement::new(positions).with_edge_crossings(crossings)
    }
}
