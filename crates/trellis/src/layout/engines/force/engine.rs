//! Force-directed layout engine
//!
//! This module implements a damped spring/repulsion simulation for arbitrary
//! graphs, cyclic ones included.

use std::f32::consts::TAU;

use log::{debug, trace};

use trellis_core::geometry::Point;

use crate::{
    analysis,
    config::{Axis, FlowBias, ForceOptions},
    layout::engines::{LayoutContext, LayoutEngine, Placement},
    structure::LayoutGraph,
};

use super::{Body, Jitter, QuadTree, Repulsion};

/// Node count from which Barnes-Hut replaces the exact pairwise repulsion.
const BARNES_HUT_THRESHOLD: usize = 50;

/// Simulation parameters after adaptive scaling.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Parameters {
    spring_length: f32,
    repulsion_strength: f32,
    iterations: usize,
}

/// Force layout engine
///
/// Positions are seeded from the caller's positions (or a circle for unplaced
/// nodes) and then relaxed: every node repels every other node, connected
/// nodes attract through springs, and acyclic graphs receive a gentle
/// downward bias so that connections tend to point the same way.
pub struct Engine {
    options: ForceOptions,
}

impl Engine {
    /// Create a new force layout engine
    pub fn new(options: ForceOptions) -> Self {
        Self { options }
    }

    /// Scales the configured parameters with the size and density of `graph`.
    fn parameters(&self, graph: &LayoutGraph) -> Parameters {
        let options = &self.options;
        if !options.adaptive {
            return Parameters {
                spring_length: options.spring_length,
                repulsion_strength: options.repulsion_strength,
                iterations: options.iterations,
            };
        }

        let node_count = graph.node_count() as f32;
        let density = analysis::density(graph.node_count(), graph.edge_count());
        let scale = (node_count / 20.0).sqrt().clamp(1.0, 3.0);
        let average_width =
            graph.nodes().map(|node| node.size().width()).sum::<f32>() / node_count.max(1.0);
        let iteration_scale = (1.0 + node_count / 500.0).min(2.0);

        Parameters {
            spring_length: (options.spring_length * scale).max(1.2 * average_width),
            repulsion_strength: options.repulsion_strength * scale * scale * (1.0 + density),
            iterations: (options.iterations as f32 * iteration_scale).ceil() as usize,
        }
    }

    /// The bias applied to connections, if any.
    fn bias(&self, graph: &LayoutGraph) -> Option<FlowBias> {
        match self.options.bias {
            Some(bias) => Some(bias),
            None if self.options.auto_bias && !analysis::detect_cycles(graph) => {
                Some(FlowBias::default())
            }
            None => None,
        }
    }

    /// Initial bodies: caller positions, else a circle scaled by √n.
    fn seed_bodies(&self, graph: &LayoutGraph, spring_length: f32) -> Vec<Body> {
        let node_count = graph.node_count();
        let radius = spring_length * (node_count as f32).sqrt() / 2.0;

        graph
            .nodes()
            .enumerate()
            .map(|(index, node)| {
                let position = node.position().unwrap_or_else(|| {
                    let angle = TAU * index as f32 / node_count as f32;
                    Point::new(radius * angle.cos(), radius * angle.sin())
                });
                Body::new(position, node.size())
            })
            .collect()
    }

    fn repulsion_forces(
        &self,
        bodies: &[Body],
        repulsion: &Repulsion,
        jitter: &mut dyn Jitter,
    ) -> Vec<Point> {
        let mut forces = vec![Point::default(); bodies.len()];

        if !self.options.barnes_hut || bodies.len() < BARNES_HUT_THRESHOLD {
            for (target, force) in forces.iter_mut().enumerate() {
                for (other, body) in bodies.iter().enumerate() {
                    if other != target {
                        let push = repulsion.between(&bodies[target], body, jitter);
                        *force = force.add_point(push);
                    }
                }
            }
            return forces;
        }

        let tree = QuadTree::build(bodies);
        for (target, force) in forces.iter_mut().enumerate() {
            *force = tree.repulsion_on(target, repulsion, self.options.theta, jitter);
        }
        forces
    }

    fn add_spring_forces(
        &self,
        graph: &LayoutGraph,
        bodies: &[Body],
        spring_length: f32,
        forces: &mut [Point],
    ) {
        for source in 0..bodies.len() {
            for &target in graph.outgoing(source) {
                if source == target {
                    continue;
                }

                let delta = bodies[target].position.sub_point(bodies[source].position);
                let distance = delta.hypot();
                if distance < 1.0 {
                    continue;
                }

                let ideal_length = if self.options.size_aware {
                    let widths = bodies[source].size.width() + bodies[target].size.width();
                    spring_length + widths / 2.0
                } else {
                    spring_length
                };

                // Positive when stretched: pulls the endpoints together
                let stretch = distance - ideal_length;
                let pull = delta.scale(self.options.spring_strength * stretch / distance);
                forces[source] = forces[source].add_point(pull);
                forces[target] = forces[target].sub_point(pull);
            }
        }
    }

    fn add_bias_forces(
        graph: &LayoutGraph,
        bodies: &[Body],
        bias: FlowBias,
        spring_length: f32,
        forces: &mut [Point],
    ) {
        let push = match bias.axis {
            Axis::X => Point::new(bias.strength, 0.0),
            Axis::Y => Point::new(0.0, bias.strength),
        };
        let along = |point: Point| match bias.axis {
            Axis::X => point.x(),
            Axis::Y => point.y(),
        };

        for source in 0..bodies.len() {
            for &target in graph.outgoing(source) {
                if source == target {
                    continue;
                }
                let gap = along(bodies[target].position) - along(bodies[source].position);
                if gap < spring_length {
                    forces[target] = forces[target].add_point(push);
                    forces[source] = forces[source].sub_point(push);
                }
            }
        }
    }

    /// Run force-directed layout algorithm
    fn run_force_simulation(&self, graph: &LayoutGraph, jitter: &mut dyn Jitter) -> Placement {
        let parameters = self.parameters(graph);
        let bias = self.bias(graph);
        let repulsion = Repulsion::new(parameters.repulsion_strength, self.options.size_aware);
        let mut bodies = self.seed_bodies(graph, parameters.spring_length);
        let mut velocities = vec![Point::default(); bodies.len()];

        debug!(
            nodes = bodies.len(),
            spring_length = parameters.spring_length,
            repulsion_strength = parameters.repulsion_strength,
            iterations = parameters.iterations,
            bias:? = bias;
            "Starting force simulation"
        );

        let mut performed = 0;
        for iteration in 0..parameters.iterations {
            performed = iteration + 1;

            let mut forces = self.repulsion_forces(&bodies, &repulsion, jitter);
            self.add_spring_forces(graph, &bodies, parameters.spring_length, &mut forces);
            if let Some(bias) = bias {
                Self::add_bias_forces(graph, &bodies, bias, parameters.spring_length, &mut forces);
            }

            let mut displacement = 0.0;
            for ((body, velocity), force) in bodies.iter_mut().zip(&mut velocities).zip(forces) {
                let force = clamp_force(force, self.options.max_force);
                let mut next = velocity.scale(self.options.damping).add_point(force);
                if !next.is_finite() {
                    next = Point::default();
                }

                *velocity = next;
                body.position = body.position.add_point(next);
                displacement += next.hypot();
            }

            let average = displacement / bodies.len() as f32;
            trace!(iteration = iteration, average_displacement = average; "Force iteration");

            if average < self.options.convergence_threshold {
                debug!(iterations = performed; "Force simulation converged");
                break;
            }
        }

        let positions = bodies.into_iter().map(|body| body.position).collect();
        Placement::new(positions).with_iterations(performed)
    }
}

/// Limits the magnitude of `force` to `max`; non-finite forces become zero.
fn clamp_force(force: Point, max: f32) -> Point {
    if !force.is_finite() {
        return Point::default();
    }
    let magnitude = force.hypot();
    if magnitude > max {
        force.scale(max / magnitude)
    } else {
        force
    }
}

impl LayoutEngine for Engine {
    fn calculate(&self, graph: &LayoutGraph, context: &mut LayoutContext<'_>) -> Placement {
        if let Some(placement) = Placement::trivial(graph) {
            return placement;
        }
        self.run_force_simulation(graph, context.jitter())
    }
}

#[cfg(test)]
mod tests {
    use float_cmp::approx_eq;
    use trellis_core::{
        geometry::Size,
        model::{Connection, Node},
    };

    use super::*;
    use crate::{
        config::LayoutOptions,
        layout::engines::test_support::{graph, run},
    };

    fn engine(options: ForceOptions) -> Engine {
        Engine::new(options)
    }

    #[test]
    fn test_zero_iterations_returns_seeds() {
        let nodes = [
            Node::new("a").with_position(Point::new(10.0, 20.0)),
            Node::new("b").with_position(Point::new(-30.0, 5.0)),
        ];
        let g = LayoutGraph::build(&nodes, &[], &LayoutOptions::default()).expect("valid graph");
        let placement = run(
            &engine(ForceOptions {
                iterations: 0,
                ..ForceOptions::default()
            }),
            &g,
        );

        assert_eq!(placement.iterations, 0);
        assert_eq!(
            placement.positions,
            vec![Point::new(10.0, 20.0), Point::new(-30.0, 5.0)]
        );
    }

    #[test]
    fn test_unplaced_nodes_are_seeded_on_a_circle() {
        let g = graph(&["a", "b", "c", "d"], &[]);
        let placement = run(
            &engine(ForceOptions {
                iterations: 0,
                adaptive: false,
                ..ForceOptions::default()
            }),
            &g,
        );

        // radius = 150 * sqrt(4) / 2
        for position in &placement.positions {
            assert!(approx_eq!(f32, position.hypot(), 150.0, epsilon = 1e-3));
        }
    }

    #[test]
    fn test_adaptive_parameters() {
        let ids: Vec<String> = (0..125).map(|i| format!("n{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let g = graph(&id_refs, &[]);
        let parameters = engine(ForceOptions::default()).parameters(&g);

        // scale = sqrt(125 / 20) = 2.5, density 0
        assert!(approx_eq!(f32, parameters.spring_length, 375.0, ulps = 4));
        assert!(approx_eq!(f32, parameters.repulsion_strength, 50_000.0, ulps = 4));
        // 300 * (1 + 125 / 500)
        assert_eq!(parameters.iterations, 375);
    }

    #[test]
    fn test_spring_length_covers_wide_nodes() {
        let nodes = [
            Node::new("a").with_size(Size::new(400.0, 20.0)),
            Node::new("b").with_size(Size::new(400.0, 20.0)),
        ];
        let g = LayoutGraph::build(&nodes, &[], &LayoutOptions::default()).expect("valid graph");
        let parameters = engine(ForceOptions::default()).parameters(&g);

        assert!(approx_eq!(f32, parameters.spring_length, 480.0, ulps = 4));
    }

    #[test]
    fn test_non_adaptive_parameters_are_unchanged() {
        let g = graph(&["a", "b"], &[("a", "b")]);
        let options = ForceOptions {
            adaptive: false,
            ..ForceOptions::default()
        };
        let parameters = engine(options.clone()).parameters(&g);

        assert_eq!(parameters.spring_length, options.spring_length);
        assert_eq!(parameters.repulsion_strength, options.repulsion_strength);
        assert_eq!(parameters.iterations, options.iterations);
    }

    #[test]
    fn test_auto_bias_only_for_acyclic_graphs() {
        let default = engine(ForceOptions::default());
        assert!(default.bias(&graph(&["a", "b"], &[("a", "b")])).is_some());
        assert!(default.bias(&graph(&["a", "b"], &[("a", "b"), ("b", "a")])).is_none());

        let explicit = engine(ForceOptions {
            bias: Some(FlowBias {
                axis: Axis::X,
                strength: 1.0,
            }),
            ..ForceOptions::default()
        });
        assert_eq!(
            explicit.bias(&graph(&["a", "b"], &[("a", "b"), ("b", "a")])),
            Some(FlowBias {
                axis: Axis::X,
                strength: 1.0
            })
        );

        let disabled = engine(ForceOptions {
            auto_bias: false,
            ..ForceOptions::default()
        });
        assert!(disabled.bias(&graph(&["a", "b"], &[("a", "b")])).is_none());
    }

    #[test]
    fn test_connected_pair_settles_and_points_down() {
        let g = graph(&["a", "b"], &[("a", "b")]);
        let placement = run(&engine(ForceOptions::default()), &g);

        assert!(placement.iterations > 0);
        assert!(placement.positions.iter().all(|p| p.is_finite()));
        let gap = placement.positions[0].sub_point(placement.positions[1]).hypot();
        assert!(gap > 50.0, "nodes should not collapse, gap = {gap}");
    }

    #[test]
    fn test_coincident_nodes_are_separated() {
        let nodes = [
            Node::new("a").with_position(Point::new(0.0, 0.0)),
            Node::new("b").with_position(Point::new(0.0, 0.0)),
        ];
        let connections = [Connection::new("e", "a", "b")];
        let g = LayoutGraph::build(&nodes, &connections, &LayoutOptions::default())
            .expect("valid graph");

        let mut sign = 1.0;
        let mut jitter = move || {
            sign = -sign;
            Point::new(sign, 0.0)
        };
        let mut context = LayoutContext::new(&mut jitter);
        let placement = engine(ForceOptions::default()).calculate(&g, &mut context);

        let gap = placement.positions[0].sub_point(placement.positions[1]).hypot();
        assert!(gap > 1.0);
    }

    #[test]
    fn test_barnes_hut_layout_is_finite() {
        let ids: Vec<String> = (0..120).map(|i| format!("n{i}")).collect();
        let id_refs: Vec<&str> = ids.iter().map(String::as_str).collect();
        let edges: Vec<(&str, &str)> = id_refs
            .windows(2)
            .map(|pair| (pair[0], pair[1]))
            .chain([(id_refs[119], id_refs[0])])
            .collect();
        let g = graph(&id_refs, &edges);
        let placement = run(
            &engine(ForceOptions {
                iterations: 40,
                ..ForceOptions::default()
            }),
            &g,
        );

        assert_eq!(placement.positions.len(), 120);
        assert!(placement.positions.iter().all(|p| p.is_finite()));
        assert!(placement.iterations <= 80);
    }

    #[test]
    fn test_barnes_hut_agrees_with_exact_repulsion() {
        // 64 default-size bodies, past the switch to Barnes-Hut
        let bodies: Vec<Body> = (0..64)
            .map(|i| {
                let position = Point::new((i % 8) as f32 * 300.0, (i / 8) as f32 * 300.0);
                Body::new(position, Size::new(100.0, 50.0))
            })
            .collect();
        let repulsion = Repulsion::new(8000.0, false);
        let mut jitter = || Point::default();

        let magnitude = |barnes_hut: bool, jitter: &mut dyn Jitter| -> f32 {
            let engine = engine(ForceOptions {
                barnes_hut,
                ..ForceOptions::default()
            });
            engine
                .repulsion_forces(&bodies, &repulsion, jitter)
                .iter()
                .map(|force| force.hypot())
                .sum()
        };
        let approximate = magnitude(true, &mut jitter);
        let exact = magnitude(false, &mut jitter);

        let ratio = approximate / exact;
        assert!((0.8..1.25).contains(&ratio), "ratio {ratio}");
    }

    #[test]
    fn test_clamp_force() {
        assert_eq!(clamp_force(Point::new(3.0, 4.0), 10.0), Point::new(3.0, 4.0));
        assert_eq!(clamp_force(Point::new(30.0, 40.0), 5.0), Point::new(3.0, 4.0));
        assert_eq!(clamp_force(Point::new(f32::NAN, 1.0), 5.0), Point::default());
    }
}
