//! Crossing reduction by iterative layer sweeps.

use log::{debug, trace};

use crate::{config::CrossingMethod, structure::LayoutGraph};

/// Orders within layers, plus each node's position inside its layer.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Ordering {
    layers: Vec<Vec<usize>>,
    position: Vec<usize>,
}

impl Ordering {
    pub(super) fn new(layers: Vec<Vec<usize>>, node_count: usize) -> Self {
        let mut ordering = Self {
            layers,
            position: vec![0; node_count],
        };
        for layer in 0..ordering.layers.len() {
            ordering.refresh_positions(layer);
        }
        ordering
    }

    pub(super) fn layers(&self) -> &[Vec<usize>] {
        &self.layers
    }

    fn refresh_positions(&mut self, layer: usize) {
        for (position, &node) in self.layers[layer].iter().enumerate() {
            self.position[node] = position;
        }
    }

    /// Reorders `layer` by the positions of its neighbors in `fixed`.
    fn reorder(
        &mut self,
        graph: &LayoutGraph,
        layer_of: &[usize],
        layer: usize,
        fixed: usize,
        method: CrossingMethod,
    ) {
        let mut keyed: Vec<(f32, usize)> = self.layers[layer]
            .iter()
            .map(|&node| {
                let mut neighbor_positions: Vec<f32> = graph
                    .neighbors(node)
                    .iter()
                    .filter(|&&neighbor| layer_of[neighbor] == fixed)
                    .map(|&neighbor| self.position[neighbor] as f32)
                    .collect();

                let key = sort_key(&mut neighbor_positions, method)
                    .unwrap_or(self.position[node] as f32);
                (key, node)
            })
            .collect();

        keyed.sort_by(|a, b| a.0.total_cmp(&b.0));
        self.layers[layer] = keyed.into_iter().map(|(_, node)| node).collect();
        self.refresh_positions(layer);
    }

    /// Total crossings between every pair of adjacent layers.
    pub(super) fn count_crossings(&self, graph: &LayoutGraph, layer_of: &[usize]) -> usize {
        (1..self.layers.len())
            .map(|layer| self.crossings_between(graph, layer_of, layer - 1, layer))
            .sum()
    }

    /// Crossings among connections joining `upper` and `lower`.
    ///
    /// Downward and upward connections are counted separately: two
    /// connections cross when their endpoints appear in opposite order in
    /// the two layers.
    fn crossings_between(
        &self,
        graph: &LayoutGraph,
        layer_of: &[usize],
        upper: usize,
        lower: usize,
    ) -> usize {
        let mut downward = Vec::new();
        let mut upward = Vec::new();

        for &node in &self.layers[upper] {
            for &target in graph.outgoing(node) {
                if layer_of[target] == lower {
                    downward.push((self.position[node], self.position[target]));
                }
            }
        }
        for &node in &self.layers[lower] {
            for &target in graph.outgoing(node) {
                if layer_of[target] == upper {
                    upward.push((self.position[target], self.position[node]));
                }
            }
        }

        count_inversions(&downward) + count_inversions(&upward)
    }
}

/// Barycenter or median of `positions`; `None` when empty.
fn sort_key(positions: &mut [f32], method: CrossingMethod) -> Option<f32> {
    if positions.is_empty() {
        return None;
    }

    match method {
        CrossingMethod::Barycenter => {
            Some(positions.iter().sum::<f32>() / positions.len() as f32)
        }
        CrossingMethod::Median => {
            positions.sort_by(f32::total_cmp);
            let middle = positions.len() / 2;
            if positions.len() % 2 == 1 {
                Some(positions[middle])
            } else {
                Some((positions[middle - 1] + positions[middle]) / 2.0)
            }
        }
    }
}

/// Number of segment pairs whose endpoints are ordered oppositely.
fn count_inversions(segments: &[(usize, usize)]) -> usize {
    let mut crossings = 0;
    for (i, &(a1, b1)) in segments.iter().enumerate() {
        for &(a2, b2) in &segments[i + 1..] {
            if (a1 < a2 && b1 > b2) || (a1 > a2 && b1 < b2) {
                crossings += 1;
            }
        }
    }
    crossings
}

/// Runs forward and backward sweeps, keeping the ordering with the fewest
/// crossings.
///
/// Returns the retained ordering and its crossing count. Stops early once
/// an ordering without crossings is found.
pub(super) fn reduce_crossings(
    graph: &LayoutGraph,
    layer_of: &[usize],
    initial: Ordering,
    method: CrossingMethod,
    iterations: usize,
) -> (Ordering, usize) {
    let mut best_crossings = initial.count_crossings(graph, layer_of);
    let mut best = initial.clone();
    let mut current = initial;
    let layer_count = current.layers.len();

    for iteration in 0..iterations {
        if best_crossings == 0 {
            break;
        }

        for layer in 1..layer_count {
            current.reorder(graph, layer_of, layer, layer - 1, method);
        }
        for layer in (0..layer_count.saturating_sub(1)).rev() {
            current.reorder(graph, layer_of, layer, layer + 1, method);
        }

        let crossings = current.count_crossings(graph, layer_of);
        trace!(iteration = iteration, crossings = crossings; "Crossing reduction sweep");
        if crossings < best_crossings {
            best_crossings = crossings;
            best = current.clone();
        }
    }

    debug!(crossings = best_crossings; "Crossing reduction finished");
    (best, best_crossings)
}
