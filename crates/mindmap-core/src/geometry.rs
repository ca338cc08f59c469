#![forbid(unsafe_code)]

//! Geometric primitives.
//!
//! All coordinates are screen-space `f32` values before the viewport
//! transform is applied. The tree grows left to right: `x` runs along the
//! depth axis and `y` along the sibling axis.

use serde::{Deserialize, Serialize};

/// A point in diagram space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    /// Depth-axis coordinate (horizontal).
    pub x: f32,
    /// Sibling-axis coordinate (vertical).
    pub y: f32,
}

impl Point {
    /// The origin.
    pub const ORIGIN: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new point.
    #[inline]
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset by `dx`, `dy`.
    #[inline]
    #[must_use]
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Width and height of a surface or box.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    /// Create a new size.
    #[inline]
    #[must_use]
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Shrink by the given margins, never going below zero.
    #[must_use]
    pub fn inset(self, margin: Sides) -> Self {
        Self {
            width: (self.width - margin.horizontal_sum()).max(0.0),
            height: (self.height - margin.vertical_sum()).max(0.0),
        }
    }
}

/// Sides for padding/margin.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Sides {
    pub top: f32,
    pub right: f32,
    pub bottom: f32,
    pub left: f32,
}

impl Sides {
    /// Create new sides with specific values.
    pub const fn new(top: f32, right: f32, bottom: f32, left: f32) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Create new sides with equal values.
    pub const fn all(val: f32) -> Self {
        Self::new(val, val, val, val)
    }

    /// Sum of left and right.
    #[inline]
    pub fn horizontal_sum(&self) -> f32 {
        self.left + self.right
    }

    /// Sum of top and bottom.
    #[inline]
    pub fn vertical_sum(&self) -> f32 {
        self.top + self.bottom
    }
}

/// Affine pan/zoom transform: uniform scale `k` followed by translation.
///
/// Maps a diagram point `p` to `(p.x * k + x, p.y * k + y)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform {
    pub x: f32,
    pub y: f32,
    pub k: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, unit scale.
    pub const IDENTITY: Self = Self {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    /// Create a transform.
    #[must_use]
    pub const fn new(x: f32, y: f32, k: f32) -> Self {
        Self { x, y, k }
    }

    /// Pure translation.
    #[must_use]
    pub const fn translate(x: f32, y: f32) -> Self {
        Self::new(x, y, 1.0)
    }

    /// Map a diagram point to surface coordinates.
    #[must_use]
    pub fn apply(&self, p: Point) -> Point {
        Point::new(p.x * self.k + self.x, p.y * self.k + self.y)
    }

    /// Map a surface point back to diagram coordinates.
    #[must_use]
    pub fn invert(&self, p: Point) -> Point {
        Point::new((p.x - self.x) / self.k, (p.y - self.y) / self.k)
    }

    /// Shift the translation by a surface-space delta.
    #[must_use]
    pub fn panned(self, dx: f32, dy: f32) -> Self {
        Self::new(self.x + dx, self.y + dy, self.k)
    }

    /// Rescale to `k`, keeping the diagram point under `anchor` fixed.
    #[must_use]
    pub fn scaled_about(self, k: f32, anchor: Point) -> Self {
        let fixed = self.invert(anchor);
        Self::new(anchor.x - fixed.x * k, anchor.y - fixed.y * k, k)
    }

    /// SVG `transform` attribute value.
    #[must_use]
    pub fn to_svg(&self) -> String {
        format!("translate({},{}) scale({})", self.x, self.y, self.k)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transform_apply_invert_inverse() {
        let t = Transform::new(150.0, -40.0, 2.0);
        let p = Point::new(12.5, -3.0);
        let back = t.invert(t.apply(p));
        assert!(back.distance(p) < 1e-4);
    }

    #[test]
    fn scaled_about_keeps_anchor_fixed() {
        let t = Transform::translate(10.0, 20.0);
        let anchor = Point::new(300.0, 200.0);
        let before = t.invert(anchor);
        let zoomed = t.scaled_about(3.0, anchor);
        let after = zoomed.invert(anchor);
        assert!(before.distance(after) < 1e-3);
        assert_eq!(zoomed.k, 3.0);
    }

    #[test]
    fn size_inset_clamps_at_zero() {
        let size = Size::new(100.0, 40.0).inset(Sides::new(20.0, 90.0, 30.0, 90.0));
        assert_eq!(size, Size::new(0.0, 0.0));
        let size = Size::new(1280.0, 800.0).inset(Sides::new(20.0, 90.0, 30.0, 90.0));
        assert_eq!(size, Size::new(1100.0, 750.0));
    }

    #[test]
    fn svg_transform_format() {
        assert_eq!(
            Transform::new(150.0, 375.0, 1.0).to_svg(),
            "translate(150,375) scale(1)"
        );
    }
}
