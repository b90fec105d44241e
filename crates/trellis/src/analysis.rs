//! Structural analysis of a [`LayoutGraph`] and automatic algorithm selection.
//!
//! [`analyze`] computes a [`GraphCharacteristics`] snapshot: cycles,
//! tree-ness, connectivity and degree statistics.
//! [`GraphCharacteristics::select_algorithm`] turns that snapshot into the
//! algorithm used when the caller asks for [`AlgorithmSelection::Auto`].
//!
//! [`AlgorithmSelection::Auto`]: crate::config::AlgorithmSelection::Auto

use std::collections::VecDeque;

use log::debug;
use serde::Serialize;

use crate::{config::Algorithm, structure::LayoutGraph};

/// Structural summary of a graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphCharacteristics {
    pub node_count: usize,
    /// Valid connections, duplicates and self-loops included.
    pub edge_count: usize,
    pub is_tree: bool,
    pub is_dag: bool,
    pub has_cycles: bool,
    pub max_degree: usize,
    pub avg_degree: f32,
    pub component_count: usize,
    pub density: f32,
}

impl GraphCharacteristics {
    /// Picks an algorithm for this graph; the first matching rule wins.
    ///
    /// 1. No nodes or no edges: grid.
    /// 2. Tree-shaped: tree.
    /// 3. Sparse DAG (average degree < 3, density < 0.2): layered.
    /// 4. Any other DAG: layered.
    /// 5. Cyclic or dense (density > 0.3): force.
    /// 6. Otherwise: force.
    pub fn select_algorithm(&self) -> Algorithm {
        let (algorithm, rule) = if self.node_count == 0 || self.edge_count == 0 {
            (Algorithm::Grid, "no nodes or no edges")
        } else if self.is_tree {
            (Algorithm::Tree, "tree-shaped")
        } else if self.is_dag && self.avg_degree < 3.0 && self.density < 0.2 {
            (Algorithm::Layered, "sparse DAG")
        } else if self.is_dag {
            (Algorithm::Layered, "DAG")
        } else if self.has_cycles || self.density > 0.3 {
            (Algorithm::Force, "cyclic or dense")
        } else {
            (Algorithm::Force, "fallback")
        };

        debug!(algorithm:% = algorithm, rule = rule; "Selected layout algorithm");
        algorithm
    }
}

/// Computes the structural characteristics of `graph`.
pub fn analyze(graph: &LayoutGraph) -> GraphCharacteristics {
    let node_count = graph.node_count();
    let edge_count = graph.edge_count();
    let has_cycles = detect_cycles(graph);
    let component_count = count_connected_components(graph);

    let degrees = (0..node_count).map(|index| graph.degree(index));
    let max_degree = degrees.clone().max().unwrap_or(0);
    let avg_degree = if node_count == 0 {
        0.0
    } else {
        degrees.sum::<usize>() as f32 / node_count as f32
    };

    let is_tree = if node_count <= 1 {
        edge_count == 0
    } else {
        edge_count == node_count - 1 && component_count == 1 && !has_cycles
    };

    let characteristics = GraphCharacteristics {
        node_count,
        edge_count,
        is_tree,
        is_dag: !has_cycles,
        has_cycles,
        max_degree,
        avg_degree,
        component_count,
        density: density(node_count, edge_count),
    };
    debug!(characteristics:? = characteristics; "Graph analyzed");
    characteristics
}

/// Returns true if the outgoing adjacency contains a closed walk.
///
/// Three-color depth-first search: reaching a node that is still on the
/// current path (gray) closes a cycle. Self-loops count. The traversal keeps
/// an explicit stack of `(node, next successor position)` frames.
pub fn detect_cycles(graph: &LayoutGraph) -> bool {
    #[derive(Clone, Copy, PartialEq)]
    enum Color {
        White,
        Gray,
        Black,
    }

    let mut colors = vec![Color::White; graph.node_count()];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in 0..graph.node_count() {
        if colors[start] != Color::White {
            continue;
        }
        colors[start] = Color::Gray;
        stack.push((start, 0));

        while let Some((node, cursor)) = stack.last_mut() {
            let node = *node;
            let Some(&next) = graph.outgoing(node).get(*cursor) else {
                colors[node] = Color::Black;
                stack.pop();
                continue;
            };
            *cursor += 1;

            match colors[next] {
                Color::Gray => return true,
                Color::White => {
                    colors[next] = Color::Gray;
                    stack.push((next, 0));
                }
                Color::Black => {}
            }
        }
    }

    false
}

/// Counts weakly connected components with a breadth-first traversal.
pub fn count_connected_components(graph: &LayoutGraph) -> usize {
    let mut visited = vec![false; graph.node_count()];
    let mut queue = VecDeque::new();
    let mut components = 0;

    for start in 0..graph.node_count() {
        if visited[start] {
            continue;
        }
        components += 1;
        visited[start] = true;
        queue.push_back(start);

        while let Some(node) = queue.pop_front() {
            for &neighbor in graph.neighbors(node) {
                if !visited[neighbor] {
                    visited[neighbor] = true;
                    queue.push_back(neighbor);
                }
            }
        }
    }

    components
}

/// Edge density of a directed graph: `e / (n * (n - 1))`, or 0 below two nodes.
pub fn density(node_count: usize, edge_count: usize) -> f32 {
    if node_count > 1 {
        edge_count as f32 / (node_count as f32 * (node_count - 1) as f32)
    } else {
        0.0
    }
}


#[cfg(test)]
mod proptest_tests {
    use petgraph::{algo::is_cyclic_directed, graph::DiGraph};
    use proptest::prelude::*;
    use trellis_core::model::{Connection, Node};

    use super::*;
    use crate::config::LayoutOptions;

    fn edges_strategy() -> impl Strategy<Value = (usize, Vec<(usize, usize)>)> {
        (1usize..12).prop_flat_map(|n| (Just(n), prop::collection::vec((0..n, 0..n), 0..24)))
    }

    fn build(n: usize, edges: &[(usize, usize)]) -> LayoutGraph {
        let nodes: Vec<Node> = (0..n).map(|i| Node::new(format!("n{i}"))).collect();
        let connections: Vec<Connection> = edges
            .iter()
            .enumerate()
            .map(|(i, (s, t))| Connection::new(format!("e{i}"), format!("n{s}"), format!("n{t}")))
            .collect();
        LayoutGraph::build(&nodes, &connections, &LayoutOptions::default()).unwrap()
    }

    proptest! {
        #[test]
        fn cycle_detection_matches_petgraph((n, edges) in edges_strategy()) {
            let graph = build(n, &edges);

            let mut reference = DiGraph::<(), ()>::new();
            let indices: Vec<_> = (0..n).map(|_| reference.add_node(())).collect();
            for &(s, t) in &edges {
                reference.add_edge(indices[s], indices[t], ());
            }

            prop_assert_eq!(detect_cycles(&graph), is_cyclic_directed(&reference));
        }

        #[test]
        fn tree_implies_connected_and_acyclic((n, edges) in edges_strategy()) {
            let graph = build(n, &edges);
            let characteristics = analyze(&graph);

            if characteristics.is_tree {
                prop_assert_eq!(characteristics.component_count, 1);
                prop_assert!(!characteristics.has_cycles);
                prop_assert_eq!(characteristics.edge_count + 1, n);
            }
            prop_assert_eq!(characteristics.is_dag, !characteristics.has_cycles);
        }
    }
}
