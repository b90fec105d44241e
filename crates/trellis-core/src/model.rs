//! Input model consumed by the layout engines.
//!
//! A graph is described by a slice of [`Node`]s and a slice of
//! [`Connection`]s. Port identifiers, labels and any other editor state are
//! irrelevant to layout and are not modeled here.

use crate::{
    geometry::{Point, Size},
    identifier::{ConnectionId, NodeId},
};

/// Size assumed for nodes that declare none and have no override.
pub const DEFAULT_NODE_SIZE: Size = Size::new(100.0, 50.0);

/// A node to be positioned.
///
/// The position is the node's current center, if it has been placed.
/// Unplaced nodes are seeded by the engine that needs a starting point.
#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    position: Option<Point>,
    size: Option<Size>,
}

impl Node {
    /// Creates an unplaced node without a declared size.
    pub fn new(id: impl Into<NodeId>) -> Self {
        Self {
            id: id.into(),
            position: None,
            size: None,
        }
    }

    /// Returns the node with its current center set.
    pub fn with_position(mut self, position: Point) -> Self {
        self.position = Some(position);
        self
    }

    /// Returns the node with a declared size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = Some(size);
        self
    }

    pub fn id(&self) -> &NodeId {
        &self.id
    }

    pub fn position(&self) -> Option<Point> {
        self.position
    }

    pub fn size(&self) -> Option<Size> {
        self.size
    }
}

/// A directed connection between two nodes.
#[derive(Debug, Clone, PartialEq)]
pub struct Connection {
    id: ConnectionId,
    source: NodeId,
    target: NodeId,
}

impl Connection {
    /// Creates a connection from `source` to `target`.
    pub fn new(
        id: impl Into<ConnectionId>,
        source: impl Into<NodeId>,
        target: impl Into<NodeId>,
    ) -> Self {
        Self {
            id: id.into(),
            source: source.into(),
            target: target.into(),
        }
    }

    pub fn id(&self) -> &ConnectionId {
        &self.id
    }

    pub fn source(&self) -> &NodeId {
        &self.source
    }

    pub fn target(&self) -> &NodeId {
        &self.target
    }
}
