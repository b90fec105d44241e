//! Tree layout engine
//!
//! A contour-based layout in the Reingold-Tilford family for forests.
//!
//! Every node's parent is the source of its first incoming connection;
//! parentless nodes are roots. Self-loops and connections that would make a
//! node its own ancestor are ignored, so each node belongs to exactly one
//! tree.
//!
//! A post-order pass places each subtree relative to its root: children are
//! packed left to right as tightly as their per-depth contours allow, and
//! the parent is centered over its first and last child. A pre-order pass
//! then accumulates the relative offsets into absolute positions.

use log::debug;

use trellis_core::geometry::Point;

use crate::{
    config::TreeOptions,
    layout::engines::{LayoutContext, LayoutEngine, Placement},
    structure::LayoutGraph,
};

/// Horizontal extent of a subtree at one depth, relative to its root.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Span {
    left: f32,
    right: f32,
}

impl Span {
    fn shifted(self, offset: f32) -> Self {
        Self {
            left: self.left + offset,
            right: self.right + offset,
        }
    }

    fn merge(self, other: Self) -> Self {
        Self {
            left: self.left.min(other.left),
            right: self.right.max(other.right),
        }
    }
}

/// Per-node record of the tree arena, indexed like the graph's nodes.
#[derive(Debug, Clone, Default)]
struct TreeNode {
    parent: Option<usize>,
    children: Vec<usize>,
    /// Offset of this node's center from its parent's center.
    offset: f32,
    /// Extent of the subtree per depth, relative to this node's center.
    /// Consumed by the parent during the post-order pass.
    contour: Vec<Span>,
}

/// The tree layout engine
pub struct Engine {
    options: TreeOptions,
}

impl Engine {
    /// Create a new tree layout engine
    pub fn new(options: TreeOptions) -> Self {
        Self { options }
    }

    /// Builds the forest and returns the arena together with the roots.
    fn build_forest(graph: &LayoutGraph) -> (Vec<TreeNode>, Vec<usize>) {
        let mut arena = vec![TreeNode::default(); graph.node_count()];

        for (source, target) in graph.edges() {
            if source == target || arena[target].parent.is_some() {
                continue;
            }
            if is_ancestor(&arena, target, source) {
                continue;
            }
            arena[target].parent = Some(source);
            arena[source].children.push(target);
        }

        let roots = (0..arena.len())
            .filter(|&index| arena[index].parent.is_none())
            .collect();
        (arena, roots)
    }

    /// Post-order pass: computes offsets and contours of every subtree
    /// below `root`.
    fn measure(&self, graph: &LayoutGraph, arena: &mut [TreeNode], root: usize) {
        for node in post_order(arena, root) {
            let half = self.options.direction.cross_extent(graph.node(node).size()) / 2.0;
            let own = Span {
                left: -half,
                right: half,
            };

            let children = arena[node].children.clone();
            if children.is_empty() {
                arena[node].contour = vec![own];
                continue;
            }

            let mut merged: Vec<Span> = Vec::new();
            let mut offsets = Vec::with_capacity(children.len());
            for &child in &children {
                let contour = std::mem::take(&mut arena[child].contour);
                let gap = self.options.sibling_spacing;
                let offset = if merged.is_empty() {
                    0.0
                } else {
                    merged
                        .iter()
                        .zip(&contour)
                        .map(|(placed, next)| placed.right + gap - next.left)
                        .fold(f32::MIN, f32::max)
                };

                for (depth, span) in contour.into_iter().enumerate() {
                    let span = span.shifted(offset);
                    match merged.get_mut(depth) {
                        Some(existing) => *existing = existing.merge(span),
                        None => merged.push(span),
                    }
                }
                offsets.push(offset);
            }

            let first = offsets[0];
            let last = offsets[offsets.len() - 1];
            let center = (first + last) / 2.0;
            for (&child, offset) in children.iter().zip(offsets) {
                arena[child].offset = offset - center;
            }

            let mut contour = Vec::with_capacity(merged.len() + 1);
            contour.push(own);
            contour.extend(merged.into_iter().map(|span| span.shifted(-center)));
            arena[node].contour = contour;
        }
    }

    fn calculate_positions(&self, graph: &LayoutGraph) -> Vec<Point> {
        let (mut arena, roots) = Self::build_forest(graph);
        debug!(nodes = graph.node_count(), trees = roots.len(); "Forest built");

        let mut x = vec![0.0; arena.len()];
        let mut depth = vec![0usize; arena.len()];
        let mut cursor = 0.0;
        let mut forest_left = f32::MAX;
        let mut forest_right = f32::MIN;

        for &root in &roots {
            self.measure(graph, &mut arena, root);

            let contour = std::mem::take(&mut arena[root].contour);
            let left = contour.iter().map(|span| span.left).fold(f32::MAX, f32::min);
            let right = contour.iter().map(|span| span.right).fold(f32::MIN, f32::max);

            let root_x = cursor - left;
            forest_left = forest_left.min(root_x + left);
            forest_right = forest_right.max(root_x + right);
            cursor = root_x + right + self.options.tree_spacing;

            // Pre-order pass
            x[root] = root_x;
            let mut stack = vec![root];
            while let Some(node) = stack.pop() {
                for &child in &arena[node].children {
                    x[child] = x[node] + arena[child].offset;
                    depth[child] = depth[node] + 1;
                    stack.push(child);
                }
            }
        }

        let shift = if roots.is_empty() {
            0.0
        } else {
            (forest_left + forest_right) / 2.0
        };

        x.into_iter()
            .zip(depth)
            .map(|(x, depth)| {
                let point = Point::new(x - shift, depth as f32 * self.options.level_spacing);
                self.options.direction.transform(point)
            })
            .collect()
    }
}

/// Returns true if `candidate` is `node` or one of its ancestors.
fn is_ancestor(arena: &[TreeNode], candidate: usize, node: usize) -> bool {
    let mut current = Some(node);
    while let Some(index) = current {
        if index == candidate {
            return true;
        }
        current = arena[index].parent;
    }
    false
}

/// Nodes of the subtree below `root`, children before parents.
fn post_order(arena: &[TreeNode], root: usize) -> Vec<usize> {
    let mut order = Vec::new();
    let mut stack = vec![root];
    while let Some(node) = stack.pop() {
        order.push(node);
        stack.extend(arena[node].children.iter().copied());
    }
    order.reverse();
    order
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &LayoutGraph, _context: &mut LayoutContext<'_>) -> Placement {
        if let Some(placement) = Placement::trivial(graph) {
            return placement;
        }
        Placement::new(self.calculate_positions(graph))
    }
}
