//! Layer assignment.

use std::collections::VecDeque;

use crate::structure::LayoutGraph;

/// Assigns a layer to every node.
///
/// Cycles are broken first (see [`acyclic_successors`]). The layers are
/// then the longest paths over the remaining connections, walked
/// breadth-first in topological order: each node sits one layer below its
/// deepest predecessor and nodes without one sit in layer 0. Every
/// connection that is not part of a cycle spans at least one layer.
pub(super) fn assign_layers(graph: &LayoutGraph) -> Vec<usize> {
    let successors = acyclic_successors(graph);

    let mut in_degrees = vec![0usize; graph.node_count()];
    for &successor in successors.iter().flatten() {
        in_degrees[successor] += 1;
    }

    let mut layers = vec![0; graph.node_count()];
    let mut queue: VecDeque<usize> = in_degrees
        .iter()
        .enumerate()
        .filter(|(_, in_degree)| **in_degree == 0)
        .map(|(index, _)| index)
        .collect();

    while let Some(node) = queue.pop_front() {
        for &successor in &successors[node] {
            layers[successor] = layers[successor].max(layers[node] + 1);
            in_degrees[successor] -= 1;
            if in_degrees[successor] == 0 {
                queue.push_back(successor);
            }
        }
    }

    layers
}

/// Outgoing adjacency without the connections that close a cycle.
///
/// Depth-first search from the source nodes: the nodes without incoming
/// connections or, when every node has one, the nodes with the fewest.
/// Nodes the sources never reach start further searches in index order. A
/// connection to a node still on the current path is a back edge and is
/// dropped, which also drops self-loops. Its target reaches its source, so
/// only connections on a cycle are ever dropped.
fn acyclic_successors(graph: &LayoutGraph) -> Vec<Vec<usize>> {
    let node_count = graph.node_count();
    let in_degrees: Vec<usize> = (0..node_count)
        .map(|index| {
            graph
                .incoming(index)
                .iter()
                .filter(|&&source| source != index)
                .count()
        })
        .collect();
    let min_in_degree = in_degrees.iter().copied().min().unwrap_or(0);
    let sources = (0..node_count).filter(|&index| in_degrees[index] == min_in_degree);

    let mut visited = vec![false; node_count];
    let mut on_path = vec![false; node_count];
    let mut successors = vec![Vec::new(); node_count];
    let mut stack: Vec<(usize, usize)> = Vec::new();

    for start in sources.chain(0..node_count) {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        on_path[start] = true;
        stack.push((start, 0));

        while let Some((node, cursor)) = stack.last_mut() {
            let node = *node;
            let Some(&next) = graph.outgoing(node).get(*cursor) else {
                on_path[node] = false;
                stack.pop();
                continue;
            };
            *cursor += 1;

            if on_path[next] {
                continue;
            }
            successors[node].push(next);
            if !visited[next] {
                visited[next] = true;
                on_path[next] = true;
                stack.push((next, 0));
            }
        }
    }

    successors
}

/// Groups node indices by layer, keeping index order within a layer.
pub(super) fn group_by_layer(layer_of: &[usize]) -> Vec<Vec<usize>> {
    let layer_count = layer_of.iter().max().map_or(0, |deepest| deepest + 1);
    let mut layers = vec![Vec::new(); layer_count];
    for (node, &layer) in layer_of.iter().enumerate() {
        layers[layer].push(node);
    }
    layers
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::engines::test_support::graph;

    #[test]
    fn test_chain() {
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c")]);
        assert_eq!(assign_layers(&g), vec![0, 1, 2]);
    }

    #[test]
    fn test_longest_path_wins() {
        // a -> d is short, a -> b -> c -> d is long
        let g = graph(
            &["a", "b", "c", "d"],
            &[("a", "d"), ("a", "b"), ("b", "c"), ("c", "d")],
        );
        assert_eq!(assign_layers(&g), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_self_loops_are_ignored() {
        let g = graph(&["a", "b"], &[("a", "a"), ("a", "b")]);
        assert_eq!(assign_layers(&g), vec![0, 1]);
    }

    #[test]
    fn test_cycle_is_broken_at_its_back_edge() {
        // Every node has one incoming connection; the search starts at a
        let g = graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        assert_eq!(assign_layers(&g), vec![0, 1, 2]);
    }

    #[test]
    fn test_cycle_not_reached_from_sources() {
        // a is the only source; b <-> c starts its own search at b
        let g = graph(&["a", "b", "c"], &[("b", "c"), ("c", "b")]);
        assert_eq!(assign_layers(&g), vec![0, 0, 1]);
    }

    #[test]
    fn test_tails_of_a_cycle_point_down() {
        // n1 <-> n0 and n1 <-> n2 form the cycle, n4 -> n1 and n2 -> n3 hang off it
        let g = graph(
            &["n0", "n1", "n2", "n3", "n4"],
            &[
                ("n1", "n0"),
                ("n0", "n1"),
                ("n1", "n2"),
                ("n2", "n1"),
                ("n2", "n3"),
                ("n4", "n1"),
            ],
        );
        let layers = assign_layers(&g);

        assert_eq!(layers, vec![2, 1, 2, 3, 0]);
        assert!(layers[3] > layers[2]);
        assert!(layers[1] > layers[4]);
    }

    #[test]
    fn test_group_by_layer() {
        assert_eq!(
            group_by_layer(&[1, 0, 1, 2]),
            vec![vec![1], vec![0, 2], vec![3]]
        );
        assert!(group_by_layer(&[]).is_empty());
    }
}
