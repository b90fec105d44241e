//! Geometric value types shared by every layout engine.
//!
//! All coordinates are `f32`. A [`Point`] attached to a node denotes the
//! node's center; [`Point::to_bounds`] expands it by a [`Size`] into a
//! [`Bounds`] rectangle.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Point {
    x: f32,
    y: f32,
}

impl Point {
    /// Creates a new point with the specified coordinates
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Returns the x-coordinate of the point
    pub fn x(self) -> f32 {
        self.x
    }

    /// Returns the y-coordinate of the point
    pub fn y(self) -> f32 {
        self.y
    }

    /// Checks if both coordinates are finite (neither NaN nor infinite)
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Adds another point to this point, returning a new point
    pub fn add_point(self, other: Point) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }

    /// Subtracts another point from this point, returning a new point
    pub fn sub_point(self, other: Point) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
        }
    }

    /// Calculates the midpoint between this point and another point
    pub fn midpoint(self, other: Point) -> Self {
        Self {
            x: (self.x + other.x) / 2.0,
            y: (self.y + other.y) / 2.0,
        }
    }

    /// Calculates the hypotenuse (Euclidean distance from origin)
    pub fn hypot(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Multiplies both coordinates by the given factor
    pub fn scale(self, factor: f32) -> Self {
        Self {
            x: self.x * factor,
            y: self.y * factor,
        }
    }

    /// Returns a new point with the x and y coordinates exchanged
    pub fn swap(self) -> Self {
        Self {
            x: self.y,
            y: self.x,
        }
    }

    /// Converts a point and size into a bounds rectangle
    ///
    /// The point is treated as the center of the bounds, and the size
    /// is distributed equally in all directions around that center.
    pub fn to_bounds(self, size: Size) -> Bounds {
        let half_width = size.width / 2.0;
        let half_height = size.height / 2.0;

        Bounds {
            min_x: self.x - half_width,
            min_y: self.y - half_height,
            max_x: self.x + half_width,
            max_y: self.y + half_height,
        }
    }
}

/// Represents the dimensions of an element with width and height
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    width: f32,
    height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Returns the width dimension of this size
    pub fn width(self) -> f32 {
        self.width
    }

    /// Returns the height dimension of this size
    pub fn height(self) -> f32 {
        self.height
    }

    /// Returns the area covered by this size
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// Returns the larger of the two dimensions
    pub fn max_dimension(self) -> f32 {
        self.width.max(self.height)
    }

    /// Returns a new Size grown by `padding` on every side
    pub fn add_padding(self, padding: f32) -> Self {
        Self {
            width: self.width + padding * 2.0,
            height: self.height + padding * 2.0,
        }
    }

    /// Returns true if both dimensions are finite and non-negative
    pub fn is_valid(self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width >= 0.0 && self.height >= 0.0
    }
}

/// Represents a rectangular bounding box with minimum and maximum coordinates
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bounds {
    min_x: f32,
    min_y: f32,
    max_x: f32,
    max_y: f32,
}

impl Bounds {
    /// Returns the width of the bounds
    pub fn width(self) -> f32 {
        self.max_x - self.min_x
    }

    /// Returns the height of the bounds
    pub fn height(self) -> f32 {
        self.max_y - self.min_y
    }

    /// Returns the center of the bounds
    pub fn center(self) -> Point {
        Point {
            x: (self.min_x + self.max_x) / 2.0,
            y: (self.min_y + self.max_y) / 2.0,
        }
    }

    /// Converts bounds to a Size object
    pub fn to_size(self) -> Size {
        Size {
            width: self.width(),
            height: self.height(),
        }
    }

    /// Merges two bounds to create a larger bounds that contains both
    ///
    /// The resulting bounds will have the minimum values of both bounds for min_x and min_y,
    /// and the maximum values of both bounds for max_x and max_y.
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            min_x: self.min_x.min(other.min_x),
            min_y: self.min_y.min(other.min_y),
            max_x: self.max_x.max(other.max_x),
            max_y: self.max_y.max(other.max_y),
        }
    }

    /// Computes the bounds enclosing every `(center, size)` pair.
    ///
    /// Returns `None` for an empty iterator.
    pub fn enclosing<I>(boxes: I) -> Option<Self>
    where
        I: IntoIterator<Item = (Point, Size)>,
    {
        boxes
            .into_iter()
            .map(|(center, size)| center.to_bounds(size))
            .reduce(|acc, bounds| acc.merge(&bounds))
    }
}


#[cfg(test)]
mod proptest_tests {
    use float_cmp::approx_eq;
    use proptest::prelude::*;

    use super::*;

    fn point_strategy() -> impl Strategy<Value = Point> {
        (-1000.0f32..1000.0, -1000.0f32..1000.0).prop_map(|(x, y)| Point::new(x, y))
    }

    fn size_strategy() -> impl Strategy<Value = Size> {
        (0.0f32..500.0, 0.0f32..500.0).prop_map(|(w, h)| Size::new(w, h))
    }

    /// Enclosing bounds must contain every input box.
    fn check_enclosing_contains_all(boxes: Vec<(Point, Size)>) -> Result<(), TestCaseError> {
        let bounds = Bounds::enclosing(boxes.iter().copied()).expect("non-empty");

        for (center, size) in boxes {
            let b = center.to_bounds(size);
            prop_assert!(bounds.min_x <= b.min_x + 0.001);
            prop_assert!(bounds.min_y <= b.min_y + 0.001);
            prop_assert!(bounds.max_x >= b.max_x - 0.001);
            prop_assert!(bounds.max_y >= b.max_y - 0.001);
        }
        Ok(())
    }

    /// A box expanded from its center keeps that center and its size.
    fn check_to_bounds_round_trips(center: Point, size: Size) -> Result<(), TestCaseError> {
        let bounds = center.to_bounds(size);

        prop_assert!(approx_eq!(f32, bounds.center().x(), center.x(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, bounds.center().y(), center.y(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, bounds.to_size().width(), size.width(), epsilon = 0.01));
        prop_assert!(approx_eq!(f32, bounds.to_size().height(), size.height(), epsilon = 0.01));
        Ok(())
    }

    proptest! {
        #[test]
        fn enclosing_contains_all(
            boxes in prop::collection::vec((point_strategy(), size_strategy()), 1..20)
        ) {
            check_enclosing_contains_all(boxes)?;
        }

        #[test]
        fn to_bounds_round_trips(center in point_strategy(), size in size_strategy()) {
            check_to_bounds_round_trips(center, size)?;
        }
    }
}
