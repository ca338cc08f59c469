#![forbid(unsafe_code)]

//! Link curves.

use mindmap_core::animation::Interpolate;
use mindmap_core::geometry::Point;
use serde::{Deserialize, Serialize};

/// The two anchor points of a parent→child link, before the node-width
/// offset is applied to the source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LinkEnds {
    pub source: Point,
    pub target: Point,
}

impl LinkEnds {
    pub const fn new(source: Point, target: Point) -> Self {
        Self { source, target }
    }

    /// Zero-length link sitting at `at`.
    pub const fn collapsed(at: Point) -> Self {
        Self::new(at, at)
    }
}

impl Interpolate for LinkEnds {
    fn lerp(self, to: Self, t: f32) -> Self {
        Self::new(self.source.lerp(to.source, t), self.target.lerp(to.target, t))
    }
}

/// Control points of the cubic from the parent's right edge to the child's
/// left edge. Both control points sit at the horizontal midpoint, so the
/// curve leaves and arrives horizontally.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cubic {
    pub start: Point,
    pub c1: Point,
    pub c2: Point,
    pub end: Point,
}

/// Cubic between `s` (parent anchor) and `d` (child anchor).
pub fn cubic(s: Point, d: Point, node_width: f32) -> Cubic {
    let start = Point::new(s.x + node_width, s.y);
    let mid = (start.x + d.x) / 2.0;
    Cubic {
        start,
        c1: Point::new(mid, s.y),
        c2: Point::new(mid, d.y),
        end: d,
    }
}

/// SVG path data for the link from `s` to `d`.
pub fn diagonal(s: Point, d: Point, node_width: f32) -> String {
    let c = cubic(s, d, node_width);
    format!(
        "M {} {} C {} {}, {} {}, {} {}",
        c.start.x, c.start.y, c.c1.x, c.c1.y, c.c2.x, c.c2.y, c.end.x, c.end.y
    )
}

impl Cubic {
    /// Point on the curve at parameter `t`.
    pub fn at(&self, t: f32) -> Point {
        let u = 1.0 - t;
        let (a, b, c, d) = (u * u * u, 3.0 * u * u * t, 3.0 * u * t * t, t * t * t);
        Point::new(
            a * self.start.x + b * self.c1.x + c * self.c2.x + d * self.end.x,
            a * self.start.y + b * self.c1.y + c * self.c2.y + d * self.end.y,
        )
    }
}
