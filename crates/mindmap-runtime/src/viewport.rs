#![forbid(unsafe_code)]

//! Pan/zoom viewport.
//!
//! The transform maps diagram coordinates onto the drawing surface. Drag
//! and wheel input apply immediately; [`Viewport::reset`] animates back to
//! the framing that centers the root vertically.

use std::time::Duration;

use mindmap_core::animation::{Animation, Tween};
use mindmap_core::geometry::{Point, Sides, Size, Transform};

/// Wheel delta units per doubling of the zoom factor.
const WHEEL_UNITS_PER_DOUBLING: f32 = 500.0;

#[derive(Debug, Clone)]
pub struct Viewport {
    window: Size,
    margin: Sides,
    reset_left: f32,
    zoom_min: f32,
    zoom_max: f32,
    transition: Duration,
    transform: Tween<Transform>,
}

impl Viewport {
    /// A viewport for a `window`, initially translated by the margin.
    pub fn new(window: Size, margin: Sides) -> Self {
        Self {
            window,
            margin,
            reset_left: 150.0,
            zoom_min: 0.1,
            zoom_max: 8.0,
            transition: Duration::from_millis(750),
            transform: Tween::settled(Transform::translate(margin.left, margin.top)),
        }
    }

    #[must_use]
    pub fn reset_left(mut self, x: f32) -> Self {
        self.reset_left = x;
        self
    }

    /// Allowed zoom factors. Bounds are swapped if given in reverse.
    #[must_use]
    pub fn zoom_extent(mut self, min: f32, max: f32) -> Self {
        self.zoom_min = min.min(max);
        self.zoom_max = max.max(min);
        self
    }

    #[must_use]
    pub fn transition(mut self, duration: Duration) -> Self {
        self.transition = duration;
        self
    }

    /// Current (possibly mid-animation) transform.
    pub fn transform(&self) -> Transform {
        self.transform.current()
    }

    /// Transform the viewport is heading to.
    pub fn target(&self) -> Transform {
        self.transform.target()
    }

    pub fn window(&self) -> Size {
        self.window
    }

    /// Window size minus the margins.
    pub fn usable(&self) -> Size {
        self.window.inset(self.margin)
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.window = Size::new(width.max(0.0), height.max(0.0));
        tracing::trace!(width, height, "viewport resized");
    }

    /// Pan by a surface-space delta, cancelling any running reset.
    pub fn pan(&mut self, dx: f32, dy: f32) {
        let next = self.transform().panned(dx, dy);
        self.transform = Tween::settled(next);
    }

    /// Zoom around `anchor`. Positive `delta` zooms in.
    pub fn zoom(&mut self, delta: f32, anchor: Point) {
        let current = self.transform();
        let k = (current.k * (delta / WHEEL_UNITS_PER_DOUBLING).exp2())
            .clamp(self.zoom_min, self.zoom_max);
        self.transform = Tween::settled(current.scaled_about(k, anchor));
    }

    /// Framing that puts the root at the reset margin, centered vertically.
    pub fn home(&self, root_y: f32) -> Transform {
        Transform::translate(self.reset_left, self.usable().height / 2.0 - root_y)
    }

    /// Animate to [`Viewport::home`].
    pub fn reset(&mut self, root_y: f32) {
        let home = self.home(root_y);
        self.transform.retarget(home, self.transition);
    }

    /// Advance the reset animation. Returns `true` while it is running.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.transform.tick(dt);
        !self.transform.is_complete()
    }

    /// Jump to the end of the running animation.
    pub fn finish(&mut self) {
        self.transform = Tween::settled(self.transform.target());
    }

    pub fn is_animating(&self) -> bool {
        !self.transform.is_complete()
    }
}
