//! Configuration types for layout computation.
//!
//! This module provides the option structures that control which algorithm
//! runs and how each engine behaves. All types implement
//! [`serde::Deserialize`] with `#[serde(default)]`, so a partial table (for
//! example a TOML section naming only `iterations`) is merged over the
//! per-algorithm defaults.
//!
//! # Overview
//!
//! - [`LayoutOptions`] - Top-level options: algorithm selection, padding, node sizes.
//! - [`ForceOptions`] - Physics simulation parameters.
//! - [`LayeredOptions`] - Layer spacing, crossing reduction and direction.
//! - [`TreeOptions`] - Level and sibling spacing and direction.
//! - [`GridOptions`] - Column count and cell spacing.
//!
//! # Example
//!
//! ```
//! # use trellis::config::{AlgorithmSelection, LayoutOptions};
//! let options: LayoutOptions = toml::from_str(
//!     r#"
//!     algorithm = "layered"
//!
//!     [layered]
//!     layer_spacing = 200.0
//!     "#,
//! )
//! .unwrap();
//!
//! assert_eq!(options.algorithm(), AlgorithmSelection::Layered);
//! assert_eq!(options.layered().layer_spacing, 200.0);
//! // Fields that were not named keep their defaults
//! assert!(options.layered().crossing_reduction);
//! ```

use std::{collections::HashMap, fmt};

use serde::{Deserialize, Serialize};

use trellis_core::{
    geometry::{Point, Size},
    identifier::NodeId,
    model::DEFAULT_NODE_SIZE,
};

use crate::error::TrellisError;

/// A concrete layout algorithm.
///
/// This is what a [`LayoutResult`](crate::LayoutResult) reports; it can never
/// be "auto".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Algorithm {
    Force,
    Layered,
    Tree,
    Grid,
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Algorithm::Force => "force",
            Algorithm::Layered => "layered",
            Algorithm::Tree => "tree",
            Algorithm::Grid => "grid",
        };
        f.write_str(name)
    }
}

/// The algorithm requested by the caller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlgorithmSelection {
    /// Pick an algorithm from the graph's structure.
    #[default]
    Auto,
    Force,
    Layered,
    Tree,
    Grid,
}

impl AlgorithmSelection {
    /// Returns the concrete algorithm, or `None` for [`AlgorithmSelection::Auto`].
    pub fn concrete(self) -> Option<Algorithm> {
        match self {
            AlgorithmSelection::Auto => None,
            AlgorithmSelection::Force => Some(Algorithm::Force),
            AlgorithmSelection::Layered => Some(Algorithm::Layered),
            AlgorithmSelection::Tree => Some(Algorithm::Tree),
            AlgorithmSelection::Grid => Some(Algorithm::Grid),
        }
    }
}

impl From<Algorithm> for AlgorithmSelection {
    fn from(algorithm: Algorithm) -> Self {
        match algorithm {
            Algorithm::Force => AlgorithmSelection::Force,
            Algorithm::Layered => AlgorithmSelection::Layered,
            Algorithm::Tree => AlgorithmSelection::Tree,
            Algorithm::Grid => AlgorithmSelection::Grid,
        }
    }
}

/// Presentation direction for layered and tree results.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Direction {
    #[default]
    #[serde(alias = "TB")]
    TopBottom,
    #[serde(alias = "BT")]
    BottomTop,
    #[serde(alias = "LR")]
    LeftRight,
    #[serde(alias = "RL")]
    RightLeft,
}

impl Direction {
    /// Returns true when layers (or tree levels) advance along the x axis.
    pub fn is_horizontal(self) -> bool {
        matches!(self, Direction::LeftRight | Direction::RightLeft)
    }

    /// Maps a point computed in top-to-bottom space into this direction.
    pub fn transform(self, point: Point) -> Point {
        match self {
            Direction::TopBottom => point,
            Direction::BottomTop => Point::new(point.x(), -point.y()),
            Direction::LeftRight => point.swap(),
            Direction::RightLeft => Point::new(-point.y(), point.x()),
        }
    }

    /// Extent of a node along the axis in which siblings are spread.
    pub(crate) fn cross_extent(self, size: Size) -> f32 {
        if self.is_horizontal() {
            size.height()
        } else {
            size.width()
        }
    }
}

/// Sort key used when reordering a layer during crossing reduction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrossingMethod {
    /// Mean position of the neighbors in the fixed layer.
    #[default]
    Barycenter,
    /// Median position of the neighbors in the fixed layer.
    Median,
}

/// Axis along which a directional bias pushes connection targets.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    #[default]
    Y,
}

/// A constant push applied to connection targets along one axis.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FlowBias {
    pub axis: Axis,
    pub strength: f32,
}

impl Default for FlowBias {
    fn default() -> Self {
        Self {
            axis: Axis::Y,
            strength: 2.0,
        }
    }
}

/// Parameters of the force-directed simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForceOptions {
    /// Iteration budget before adaptive scaling.
    pub iterations: usize,
    /// Rest length of a connection spring.
    pub spring_length: f32,
    /// Hooke constant of a connection spring.
    pub spring_strength: f32,
    /// Numerator of the inverse-square repulsion.
    pub repulsion_strength: f32,
    /// Velocity retained between iterations, in `[0, 1)`.
    pub damping: f32,
    /// Upper bound on the net force applied to a node per iteration.
    pub max_force: f32,
    /// Measure repulsion edge-to-edge and lengthen springs by node widths.
    pub size_aware: bool,
    /// Use the Barnes-Hut approximation for large graphs.
    pub barnes_hut: bool,
    /// Barnes-Hut opening criterion.
    pub theta: f32,
    /// Scale spring length, repulsion and iterations with graph size.
    pub adaptive: bool,
    /// Apply a downward bias to acyclic graphs when `bias` is unset.
    pub auto_bias: bool,
    /// Explicit directional bias, applied regardless of graph shape.
    pub bias: Option<FlowBias>,
    /// Average per-node displacement below which the simulation stops.
    pub convergence_threshold: f32,
    /// Seed for overlap jitter; `None` draws from the thread RNG.
    pub jitter_seed: Option<u64>,
}

impl Default for ForceOptions {
    fn default() -> Self {
        Self {
            iterations: 300,
            spring_length: 150.0,
            spring_strength: 0.05,
            repulsion_strength: 8000.0,
            damping: 0.8,
            max_force: 25.0,
            size_aware: true,
            barnes_hut: true,
            theta: 0.7,
            adaptive: true,
            auto_bias: true,
            bias: None,
            convergence_threshold: 0.1,
            jitter_seed: None,
        }
    }
}

/// Parameters of the layered (Sugiyama-style) engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredOptions {
    /// Distance between consecutive layers.
    pub layer_spacing: f32,
    /// Gap between neighboring nodes of the same layer.
    pub node_spacing: f32,
    pub crossing_reduction: bool,
    pub crossing_method: CrossingMethod,
    /// Maximum number of forward/backward sweep pairs.
    pub crossing_iterations: usize,
    pub direction: Direction,
}

impl Default for LayeredOptions {
    fn default() -> Self {
        Self {
            layer_spacing: 150.0,
            node_spacing: 60.0,
            crossing_reduction: true,
            crossing_method: CrossingMethod::Barycenter,
            crossing_iterations: 24,
            direction: Direction::TopBottom,
        }
    }
}

/// Parameters of the tree engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Distance between consecutive depths.
    pub level_spacing: f32,
    /// Minimum gap between neighboring subtrees at every depth.
    pub sibling_spacing: f32,
    /// Gap between the trees of a forest.
    pub tree_spacing: f32,
    pub direction: Direction,
}

impl Default for TreeOptions {
    fn default() -> Self {
        Self {
            level_spacing: 120.0,
            sibling_spacing: 40.0,
            tree_spacing: 80.0,
            direction: Direction::TopBottom,
        }
    }
}

/// Parameters of the grid engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridOptions {
    /// Number of columns; `None` means `ceil(sqrt(node count))`.
    pub columns: Option<usize>,
    /// Gap added to the largest node dimension to form a cell.
    pub spacing: f32,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self {
            columns: None,
            spacing: 50.0,
        }
    }
}

/// Top-level layout options.
///
/// Groups the algorithm selection, the padding reported around the result,
/// node size resolution and the nested per-algorithm option sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutOptions {
    algorithm: AlgorithmSelection,
    padding: f32,
    default_node_size: Size,
    /// Measured sizes that take precedence over the sizes declared on nodes.
    node_sizes: HashMap<NodeId, Size>,
    force: ForceOptions,
    layered: LayeredOptions,
    tree: TreeOptions,
    grid: GridOptions,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            algorithm: AlgorithmSelection::Auto,
            padding: 50.0,
            default_node_size: DEFAULT_NODE_SIZE,
            node_sizes: HashMap::new(),
            force: ForceOptions::default(),
            layered: LayeredOptions::default(),
            tree: TreeOptions::default(),
            grid: GridOptions::default(),
        }
    }
}

impl LayoutOptions {
    /// Returns the options with the given algorithm selected.
    pub fn with_algorithm(mut self, algorithm: impl Into<AlgorithmSelection>) -> Self {
        self.algorithm = algorithm.into();
        self
    }

    /// Returns the options with the given padding.
    pub fn with_padding(mut self, padding: f32) -> Self {
        self.padding = padding;
        self
    }

    /// Returns the options with the size used for nodes that declare none.
    pub fn with_default_node_size(mut self, size: Size) -> Self {
        self.default_node_size = size;
        self
    }

    /// Returns the options with a measured size override for one node.
    pub fn with_node_size(mut self, id: impl Into<NodeId>, size: Size) -> Self {
        self.node_sizes.insert(id.into(), size);
        self
    }

    pub fn with_force(mut self, force: ForceOptions) -> Self {
        self.force = force;
        self
    }

    pub fn with_layered(mut self, layered: LayeredOptions) -> Self {
        self.layered = layered;
        self
    }

    pub fn with_tree(mut self, tree: TreeOptions) -> Self {
        self.tree = tree;
        self
    }

    pub fn with_grid(mut self, grid: GridOptions) -> Self {
        self.grid = grid;
        self
    }

    pub fn algorithm(&self) -> AlgorithmSelection {
        self.algorithm
    }

    pub fn padding(&self) -> f32 {
        self.padding
    }

    pub fn default_node_size(&self) -> Size {
        self.default_node_size
    }

    /// Returns the size override registered for `id`, if any.
    pub fn node_size(&self, id: &NodeId) -> Option<Size> {
        self.node_sizes.get(id).copied()
    }

    pub fn force(&self) -> &ForceOptions {
        &self.force
    }

    pub fn layered(&self) -> &LayeredOptions {
        &self.layered
    }

    pub fn tree(&self) -> &TreeOptions {
        &self.tree
    }

    pub fn grid(&self) -> &GridOptions {
        &self.grid
    }

    /// Checks every option value.
    ///
    /// # Errors
    ///
    /// Returns [`TrellisError::InvalidOption`] for the first value that would
    /// produce meaningless geometry: negative or non-finite distances,
    /// a non-positive `theta`, damping outside `[0, 1)` or zero grid columns.
    pub fn validate(&self) -> Result<(), TrellisError> {
        non_negative("padding", self.padding)?;
        if !self.default_node_size.is_valid() {
            return Err(TrellisError::invalid_option(
                "default_node_size",
                "dimensions must be finite and non-negative",
            ));
        }
        for (id, size) in &self.node_sizes {
            if !size.is_valid() {
                return Err(TrellisError::InvalidNode {
                    id: id.clone(),
                    reason: format!("size override {size:?} is not finite and non-negative"),
                });
            }
        }

        let force = &self.force;
        non_negative("force.spring_length", force.spring_length)?;
        non_negative("force.spring_strength", force.spring_strength)?;
        non_negative("force.repulsion_strength", force.repulsion_strength)?;
        non_negative("force.max_force", force.max_force)?;
        non_negative("force.convergence_threshold", force.convergence_threshold)?;
        if !(force.theta.is_finite() && force.theta > 0.0) {
            return Err(TrellisError::invalid_option(
                "force.theta",
                format!("must be a positive number, got {}", force.theta),
            ));
        }
        if !(0.0..1.0).contains(&force.damping) {
            return Err(TrellisError::invalid_option(
                "force.damping",
                format!("must be in [0, 1), got {}", force.damping),
            ));
        }
        if let Some(bias) = force.bias {
            if !bias.strength.is_finite() {
                return Err(TrellisError::invalid_option(
                    "force.bias.strength",
                    "must be finite",
                ));
            }
        }

        non_negative("layered.layer_spacing", self.layered.layer_spacing)?;
        non_negative("layered.node_spacing", self.layered.node_spacing)?;

        non_negative("tree.level_spacing", self.tree.level_spacing)?;
        non_negative("tree.sibling_spacing", self.tree.sibling_spacing)?;
        non_negative("tree.tree_spacing", self.tree.tree_spacing)?;

        non_negative("grid.spacing", self.grid.spacing)?;
        if self.grid.columns == Some(0) {
            return Err(TrellisError::invalid_option(
                "grid.columns",
                "must be at least 1",
            ));
        }

        Ok(())
    }
}

fn non_negative(option: &'static str, value: f32) -> Result<(), TrellisError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(TrellisError::invalid_option(
            option,
            format!("must be a finite, non-negative number, got {value}"),
        ))
    }
}
