//! Inverse-square repulsion between bodies.

use trellis_core::geometry::{Point, Size};

use super::Jitter;

/// Center distance below which two bodies are treated as coincident.
const MIN_DISTANCE: f32 = 1.0;

/// A node as seen by the physics simulation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Point,
    pub size: Size,
    pub mass: f32,
}

impl Body {
    /// Creates a body whose mass grows with its area, never below 1.
    pub fn new(position: Point, size: Size) -> Self {
        Self {
            position,
            size,
            mass: (size.area() / 1000.0).max(1.0),
        }
    }
}

/// Repulsion law shared by the exact and the approximate computations.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Repulsion {
    strength: f32,
    size_aware: bool,
}

impl Repulsion {
    pub fn new(strength: f32, size_aware: bool) -> Self {
        Self {
            strength,
            size_aware,
        }
    }

    /// Force exerted on `target` by `other`.
    ///
    /// The magnitude is `strength / d²`, where `d` is the gap between the two
    /// boxes when size-aware and the center distance otherwise. Overlapping
    /// boxes use `d = 1`. Coincident centers yield a jitter displacement.
    pub fn between(&self, target: &Body, other: &Body, jitter: &mut dyn Jitter) -> Point {
        let delta = target.position.sub_point(other.position);
        let center_distance = delta.hypot();
        if center_distance < MIN_DISTANCE {
            return jitter.nudge();
        }

        let distance = if self.size_aware {
            edge_distance(delta, target.size, other.size)
        } else {
            center_distance
        };

        let magnitude = self.strength / (distance * distance);
        delta.scale(magnitude / center_distance)
    }

    /// Force exerted on `target` by `count` bodies gathered at `center`.
    ///
    /// Each body contributes `strength / d²` with `d` the center distance, so
    /// the aggregate matches the pairwise law for bodies far from the target.
    pub fn aggregate(
        &self,
        target: &Body,
        center: Point,
        count: usize,
        jitter: &mut dyn Jitter,
    ) -> Point {
        let delta = target.position.sub_point(center);
        let distance = delta.hypot();
        if distance < MIN_DISTANCE {
            return jitter.nudge();
        }

        let magnitude = self.strength * count as f32 / (distance * distance);
        delta.scale(magnitude / distance)
    }
}

/// Distance between the borders of two boxes whose centers differ by `delta`.
fn edge_distance(delta: Point, a: Size, b: Size) -> f32 {
    let gap_x = (delta.x().abs() - (a.width() + b.width()) / 2.0).max(0.0);
    let gap_y = (delta.y().abs() - (a.height() + b.height()) / 2.0).max(0.0);
    gap_x.hypot(gap_y).max(MIN_DISTANCE)
}
