//! Barnes-Hut quadtree.
//!
//! The tree is built in one phase by [`QuadTreeBuilder`] and queried in
//! another through the immutable [`QuadTree`]. Cells live in an arena and
//! refer to their children by index.
//!
//! Each cell tracks the number of bodies below it, their total mass and their
//! mass-weighted position sum, so its center of mass is available without a
//! second pass. A query walks the tree from the root and replaces any cell
//! that is far enough from the target (`width / distance < theta`) by its
//! bodies gathered at the center of mass. Mass only places that center: the
//! push is the pairwise law times the body count, as for exact repulsion.

use trellis_core::geometry::Point;

use super::{Body, Jitter, Repulsion};

/// Depth at which cells stop subdividing and start collecting bodies.
const MAX_DEPTH: usize = 24;

#[derive(Debug, Clone, PartialEq)]
enum CellKind {
    Empty,
    /// Body indices; more than one only at [`MAX_DEPTH`].
    Leaf(Vec<usize>),
    Internal([usize; 4]),
}

#[derive(Debug, Clone)]
struct Cell {
    center: Point,
    half_width: f32,
    depth: usize,
    count: usize,
    mass: f32,
    weighted_position: Point,
    kind: CellKind,
}

impl Cell {
    fn new(center: Point, half_width: f32, depth: usize) -> Self {
        Self {
            center,
            half_width,
            depth,
            count: 0,
            mass: 0.0,
            weighted_position: Point::default(),
            kind: CellKind::Empty,
        }
    }

    fn center_of_mass(&self) -> Point {
        self.weighted_position.scale(1.0 / self.mass)
    }

    /// Index of the child quadrant that contains `position`.
    fn quadrant(&self, position: Point) -> usize {
        let right = usize::from(position.x() >= self.center.x());
        let below = usize::from(position.y() >= self.center.y());
        right + 2 * below
    }

    fn contains(&self, position: Point) -> bool {
        (position.x() - self.center.x()).abs() <= self.half_width
            && (position.y() - self.center.y()).abs() <= self.half_width
    }
}

/// Build phase of the quadtree.
#[derive(Debug)]
pub struct QuadTreeBuilder<'a> {
    bodies: &'a [Body],
    cells: Vec<Cell>,
}

impl<'a> QuadTreeBuilder<'a> {
    /// Creates an empty tree whose root square covers every body in `bodies`.
    pub fn new(bodies: &'a [Body]) -> Self {
        let mut min = Point::new(f32::MAX, f32::MAX);
        let mut max = Point::new(f32::MIN, f32::MIN);
        for body in bodies {
            min = Point::new(min.x().min(body.position.x()), min.y().min(body.position.y()));
            max = Point::new(max.x().max(body.position.x()), max.y().max(body.position.y()));
        }

        let root = if bodies.is_empty() {
            Cell::new(Point::default(), 1.0, 0)
        } else {
            let extent = max.sub_point(min);
            Cell::new(
                min.midpoint(max),
                extent.x().max(extent.y()) / 2.0 + 1.0,
                0,
            )
        };

        Self {
            bodies,
            cells: vec![root],
        }
    }

    /// Inserts the body at `index` of the slice the builder was created with.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range.
    pub fn insert(&mut self, index: usize) {
        self.insert_from(0, index);
    }

    /// Finishes the build phase.
    pub fn build(self) -> QuadTree<'a> {
        QuadTree {
            bodies: self.bodies,
            cells: self.cells,
        }
    }

    fn insert_from(&mut self, start: usize, index: usize) {
        enum Step {
            Occupy,
            Split,
            Descend(usize),
        }

        let body = self.bodies[index];
        let mut current = start;

        loop {
            let cell = &mut self.cells[current];
            cell.count += 1;
            cell.mass += body.mass;
            cell.weighted_position = cell
                .weighted_position
                .add_point(body.position.scale(body.mass));

            let step = match &cell.kind {
                CellKind::Empty => Step::Occupy,
                CellKind::Leaf(_) if cell.depth >= MAX_DEPTH => Step::Occupy,
                CellKind::Leaf(_) => Step::Split,
                CellKind::Internal(children) => {
                    Step::Descend(children[cell.quadrant(body.position)])
                }
            };

            match step {
                Step::Occupy => {
                    match &mut cell.kind {
                        CellKind::Leaf(occupants) => occupants.push(index),
                        kind => *kind = CellKind::Leaf(vec![index]),
                    }
                    return;
                }
                Step::Descend(child) => current = child,
                Step::Split => {
                    let occupants = match std::mem::replace(&mut cell.kind, CellKind::Empty) {
                        CellKind::Leaf(occupants) => occupants,
                        _ => Vec::new(),
                    };
                    let children = self.subdivide(current);
                    for occupant in occupants {
                        let quadrant = self.cells[current].quadrant(self.bodies[occupant].position);
                        self.insert_from(children[quadrant], occupant);
                    }
                    current = children[self.cells[current].quadrant(body.position)];
                }
            }
        }
    }

    /// Creates the four children of `parent` and marks it internal.
    fn subdivide(&mut self, parent: usize) -> [usize; 4] {
        let Cell {
            center,
            half_width,
            depth,
            ..
        } = self.cells[parent];
        let quarter = half_width / 2.0;

        let mut children = [0; 4];
        for (quadrant, child) in children.iter_mut().enumerate() {
            let dx = if quadrant & 1 == 1 { quarter } else { -quarter };
            let dy = if quadrant & 2 == 2 { quarter } else { -quarter };
            *child = self.cells.len();
            self.cells.push(Cell::new(
                center.add_point(Point::new(dx, dy)),
                quarter,
                depth + 1,
            ));
        }

        self.cells[parent].kind = CellKind::Internal(children);
        children
    }
}

/// Query phase of the quadtree.
#[derive(Debug)]
pub struct QuadTree<'a> {
    bodies: &'a [Body],
    cells: Vec<Cell>,
}

impl<'a> QuadTree<'a> {
    /// Builds a tree containing every body in `bodies`.
    pub fn build(bodies: &'a [Body]) -> Self {
        let mut builder = QuadTreeBuilder::new(bodies);
        for index in 0..bodies.len() {
            builder.insert(index);
        }
        builder.build()
    }

    /// Approximate repulsion on the body at `target`.
    ///
    /// Bodies sharing a leaf with the walk are evaluated exactly. An internal
    /// cell is aggregated when it does not contain the target and its width
    /// divided by the distance to its center of mass is below `theta`.
    pub fn repulsion_on(
        &self,
        target: usize,
        repulsion: &Repulsion,
        theta: f32,
        jitter: &mut dyn Jitter,
    ) -> Point {
        let body = &self.bodies[target];
        let mut force = Point::default();
        let mut stack = vec![0];

        while let Some(current) = stack.pop() {
            let cell = &self.cells[current];
            match &cell.kind {
                CellKind::Empty => {}
                CellKind::Leaf(occupants) => {
                    for &occupant in occupants {
                        if occupant != target {
                            let push = repulsion.between(body, &self.bodies[occupant], jitter);
                            force = force.add_point(push);
                        }
                    }
                }
                CellKind::Internal(children) => {
                    let center = cell.center_of_mass();
                    let distance = body.position.sub_point(center).hypot();
                    let width = cell.half_width * 2.0;

                    if !cell.contains(body.position) && width < theta * distance {
                        let push = repulsion.aggregate(body, center, cell.count, jitter);
                        force = force.add_point(push);
                    } else {
                        stack.extend(children.iter().copied());
                    }
                }
            }
        }

        force
    }
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;
    use trellis_core::geometry::Size;

    use super::*;

    proptest! {
        #[test]
        fn root_totals_cover_every_body(
            points in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 1..64)
        ) {
            let bodies: Vec<Body> = points
                .iter()
                .map(|&(x, y)| Body::new(Point::new(x, y), Size::new(40.0, 40.0)))
                .collect();
            let tree = QuadTree::build(&bodies);
            let expected: f32 = bodies.iter().map(|body| body.mass).sum();

            prop_assert_eq!(tree.cells[0].count, bodies.len());
            prop_assert!((tree.cells[0].mass - expected).abs() < 1e-3);
        }

        #[test]
        fn repulsion_is_finite(
            points in prop::collection::vec((-500.0f32..500.0, -500.0f32..500.0), 2..64)
        ) {
            let bodies: Vec<Body> = points
                .iter()
                .map(|&(x, y)| Body::new(Point::new(x, y), Size::new(40.0, 40.0)))
                .collect();
            let tree = QuadTree::build(&bodies);
            let repulsion = Repulsion::new(8000.0, true);
            let mut jitter = || Point::new(0.5, 0.5);

            for target in 0..bodies.len() {
                prop_assert!(tree.repulsion_on(target, &repulsion, 0.7, &mut jitter).is_finite());
            }
        }
    }
}
