//! Directed graph with precomputed adjacency.
//!
//! The graph stores every valid connection in a petgraph [`DiGraph`], so
//! duplicate connections and self-loops survive for counting purposes, and
//! keeps three deduplicated adjacency lists per node for the traversals the
//! engines perform:
//!
//! - outgoing: unique targets, self-loops included
//! - incoming: unique sources, self-loops included
//! - neighbors: unique nodes connected in either direction, self excluded
//!
//! Every list preserves first-seen connection order, which keeps the
//! deterministic engines byte-stable across runs.

use std::collections::{HashMap, HashSet};

use log::{debug, warn};
use petgraph::{
    graph::{DiGraph, NodeIndex},
    visit::EdgeRef,
};

use trellis_core::{
    geometry::{Point, Size},
    identifier::{ConnectionId, NodeId},
    model::{Connection, Node},
};

use crate::{config::LayoutOptions, error::TrellisError};

/// A node as seen by the layout engines.
#[derive(Debug, Clone, PartialEq)]
pub struct NodeEntry {
    id: NodeId,
    size: Size,
    position: Option<Point>,
}

impl NodeEntry {
    pub fn id(&self) -> &NodeId {
        &self.id
    }

    /// The resolved size: override, then declared size, then the default.
    pub fn size(&self) -> Size {
        self.size
    }

    /// The center supplied by the caller, if any.
    pub fn position(&self) -> Option<Point> {
        self.position
    }
}

/// Adjacency lists indexed by node index.
#[derive(Debug, Default)]
struct Adjacency {
    lists: Vec<Vec<usize>>,
    seen: Vec<HashSet<usize>>,
}

impl Adjacency {
    fn with_len(len: usize) -> Self {
        Self {
            lists: vec![Vec::new(); len],
            seen: vec![HashSet::new(); len],
        }
    }

    fn insert(&mut self, from: usize, to: usize) {
        if self.seen[from].insert(to) {
            self.lists[from].push(to);
        }
    }

    fn get(&self, index: usize) -> &[usize] {
        &self.lists[index]
    }
}

/// The graph handed to the analyzer and the engines.
///
/// Node indices are dense, start at zero and follow input order (after
/// duplicate ids are dropped).
#[derive(Debug)]
pub struct LayoutGraph {
    graph: DiGraph<NodeEntry, ConnectionId>,
    index_of: HashMap<NodeId, NodeIndex>,
    outgoing: Adjacency,
    incoming: Adjacency,
    neighbors: Adjacency,
}

impl LayoutGraph {
    /// Builds the graph from caller input.
    ///
    /// Duplicate node ids keep their first occurrence. Connections naming an
    /// unknown endpoint are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::InvalidNode`] when a node has a non-finite
    /// position or a resolved size that is not finite and non-negative.
    pub fn build(
        nodes: &[Node],
        connections: &[Connection],
        options: &LayoutOptions,
    ) -> Result<Self, TrellisError> {
        let mut graph = DiGraph::with_capacity(nodes.len(), connections.len());
        let mut index_of = HashMap::with_capacity(nodes.len());

        for node in nodes {
            if index_of.contains_key(node.id()) {
                warn!(id:% = node.id(); "Duplicate node id, keeping the first occurrence");
                continue;
            }

            if let Some(position) = node.position() {
                if !position.is_finite() {
                    return Err(TrellisError::InvalidNode {
                        id: node.id().clone(),
                        reason: format!("position {position:?} is not finite"),
                    });
                }
            }

            let size = options
                .node_size(node.id())
                .or(node.size())
                .unwrap_or(options.default_node_size());
            if !size.is_valid() {
                return Err(TrellisError::InvalidNode {
                    id: node.id().clone(),
                    reason: format!("size {size:?} is not finite and non-negative"),
                });
            }

            let index = graph.add_node(NodeEntry {
                id: node.id().clone(),
                size,
                position: node.position(),
            });
            index_of.insert(node.id().clone(), index);
        }

        let node_count = graph.node_count();
        let mut outgoing = Adjacency::with_len(node_count);
        let mut incoming = Adjacency::with_len(node_count);
        let mut neighbors = Adjacency::with_len(node_count);

        for connection in connections {
            let (Some(&source), Some(&target)) = (
                index_of.get(connection.source()),
                index_of.get(connection.target()),
            ) else {
                debug!(
                    connection:% = connection.id(),
                    source:% = connection.source(),
                    target:% = connection.target();
                    "Ignoring connection with unknown endpoint"
                );
                continue;
            };

            graph.add_edge(source, target, connection.id().clone());

            let (s, t) = (source.index(), target.index());
            outgoing.insert(s, t);
            incoming.insert(t, s);
            if s != t {
                neighbors.insert(s, t);
                neighbors.insert(t, s);
            }
        }

        debug!(
            nodes = graph.node_count(),
            edges = graph.edge_count();
            "Layout graph built"
        );

        Ok(Self {
            graph,
            index_of,
            outgoing,
            incoming,
            neighbors,
        })
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of valid connections, duplicates and self-loops included.
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Returns the node at `index`.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn node(&self, index: usize) -> &NodeEntry {
        &self.graph[NodeIndex::new(index)]
    }

    /// Returns every node in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &NodeEntry> {
        self.graph.node_weights()
    }

    /// Looks up the index of a node by id.
    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).map(|index| index.index())
    }

    /// Returns every valid connection as `(source, target)` in input order.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.graph
            .edge_references()
            .map(|edge| (edge.source().index(), edge.target().index()))
    }

    /// Unique targets of connections leaving `index`.
    pub fn outgoing(&self, index: usize) -> &[usize] {
        self.outgoing.get(index)
    }

    /// Unique sources of connections entering `index`.
    pub fn incoming(&self, index: usize) -> &[usize] {
        self.incoming.get(index)
    }

    /// Unique nodes connected to `index` in either direction.
    pub fn neighbors(&self, index: usize) -> &[usize] {
        self.neighbors.get(index)
    }

    /// Unique outgoing plus unique incoming neighbors.
    pub fn degree(&self, index: usize) -> usize {
        self.outgoing(index).len() + self.incoming(index).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(nodes: &[Node], connections: &[Connection]) -> LayoutGraph {
        LayoutGraph::build(nodes, connections, &LayoutOptions::default()).expect("valid graph")
    }

    #[test]
    fn test_adjacency_is_deduplicated() {
        let nodes = [Node::new("a"), Node::new("b"), Node::new("c")];
        let connections = [
            Connection::new("e1", "a", "b"),
            Connection::new("e2", "a", "b"),
            Connection::new("e3", "b", "a"),
            Connection::new("e4", "a", "c"),
        ];
        let graph = build(&nodes, &connections);

        assert_eq!(graph.edge_count(), 4);
        assert_eq!(graph.outgoing(0), &[1, 2]);
        assert_eq!(graph.incoming(0), &[1]);
        assert_eq!(graph.neighbors(0), &[1, 2]);
        assert_eq!(graph.neighbors(1), &[0]);
        assert_eq!(graph.degree(0), 3);
    }

    #[test]
    fn test_self_loops_are_counted_but_not_neighbors() {
        let nodes = [Node::new("a")];
        let connections = [Connection::new("e", "a", "a")];
        let graph = build(&nodes, &connections);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.outgoing(0), &[0]);
        assert_eq!(graph.incoming(0), &[0]);
        assert!(graph.neighbors(0).is_empty());
    }

    #[test]
    fn test_unknown_endpoints_are_filtered() {
        let nodes = [Node::new("a"), Node::new("b")];
        let connections = [
            Connection::new("e1", "a", "ghost"),
            Connection::new("e2", "ghost", "b"),
            Connection::new("e3", "a", "b"),
        ];
        let graph = build(&nodes, &connections);

        assert_eq!(graph.edge_count(), 1);
        assert_eq!(graph.edges().collect::<Vec<_>>(), vec![(0, 1)]);
    }

    #[test]
    fn test_duplicate_node_ids_keep_first() {
        let nodes = [
            Node::new("a").with_size(Size::new(10.0, 10.0)),
            Node::new("b"),
            Node::new("a").with_size(Size::new(99.0, 99.0)),
        ];
        let graph = build(&nodes, &[]);

        assert_eq!(graph.node_count(), 2);
        assert_eq!(graph.node(0).size(), Size::new(10.0, 10.0));
        assert_eq!(graph.index_of("b"), Some(1));
    }

    #[test]
    fn test_size_resolution_order() {
        let nodes = [
            Node::new("declared").with_size(Size::new(10.0, 20.0)),
            Node::new("overridden").with_size(Size::new(10.0, 20.0)),
            Node::new("plain"),
        ];
        let options = LayoutOptions::default()
            .with_default_node_size(Size::new(7.0, 8.0))
            .with_node_size("overridden", Size::new(30.0, 40.0));
        let graph = LayoutGraph::build(&nodes, &[], &options).expect("valid graph");

        assert_eq!(graph.node(0).size(), Size::new(10.0, 20.0));
        assert_eq!(graph.node(1).size(), Size::new(30.0, 40.0));
        assert_eq!(graph.node(2).size(), Size::new(7.0, 8.0));
    }

    #[test]
    fn test_invalid_node_is_rejected() {
        let options = LayoutOptions::default();

        let nan_position = [Node::new("a").with_position(Point::new(f32::NAN, 0.0))];
        assert!(matches!(
            LayoutGraph::build(&nan_position, &[], &options),
            Err(TrellisError::InvalidNode { .. })
        ));

        let negative_size = [Node::new("a").with_size(Size::new(-1.0, 5.0))];
        assert!(matches!(
            LayoutGraph::build(&negative_size, &[], &options),
            Err(TrellisError::InvalidNode { .. })
        ));
    }
}
