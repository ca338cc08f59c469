#![forbid(unsafe_code)]

//! Time-based animation primitives.
//!
//! Everything here is driven by an explicit `tick(dt)` from the host so that
//! transitions are deterministic under test. Nothing reads a wall clock.
//!
//! # Invariants
//!
//! 1. `value()` of a progress animation is always within `[0.0, 1.0]`.
//! 2. Zero durations are clamped to 1ns so progress never divides by zero.
//! 3. A completed animation stays complete.

use std::time::Duration;

use crate::geometry::{Point, Transform};

/// Easing curve: maps linear progress `t ∈ [0, 1]` to eased progress.
pub type EasingFn = fn(f32) -> f32;

/// A host-ticked animation.
pub trait Animation {
    /// Advance by `dt`.
    fn tick(&mut self, dt: Duration);

    /// Whether the animation has reached its end.
    fn is_complete(&self) -> bool;

    /// Current eased progress.
    fn value(&self) -> f32;
}

// ---------------------------------------------------------------------------
// Easing
// ---------------------------------------------------------------------------

#[inline]
pub fn linear(t: f32) -> f32 {
    t.clamp(0.0, 1.0)
}

/// Symmetric cubic: slow start, fast middle, slow end. The default curve for
/// every diagram transition.
#[inline]
pub fn ease_in_out_cubic(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

fn non_zero(duration: Duration) -> Duration {
    if duration.is_zero() {
        Duration::from_nanos(1)
    } else {
        duration
    }
}

// ---------------------------------------------------------------------------
// Fade
// ---------------------------------------------------------------------------

/// Progress animation from 0.0 to 1.0 over a fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct Fade {
    elapsed: Duration,
    duration: Duration,
    easing: EasingFn,
}

impl Fade {
    /// Create a linear fade.
    pub fn new(duration: Duration) -> Self {
        Self {
            elapsed: Duration::ZERO,
            duration: non_zero(duration),
            easing: linear,
        }
    }

    /// Set the easing function.
    #[must_use]
    pub fn easing(mut self, easing: EasingFn) -> Self {
        self.easing = easing;
        self
    }

    /// Uneased progress in `[0, 1]`.
    pub fn raw_progress(&self) -> f32 {
        (self.elapsed.as_secs_f64() / self.duration.as_secs_f64()).min(1.0) as f32
    }
}

impl Animation for Fade {
    fn tick(&mut self, dt: Duration) {
        self.elapsed = self.elapsed.saturating_add(dt);
    }

    fn is_complete(&self) -> bool {
        self.elapsed >= self.duration
    }

    fn value(&self) -> f32 {
        (self.easing)(self.raw_progress())
    }
}

// ---------------------------------------------------------------------------
// Interpolation
// ---------------------------------------------------------------------------

/// Values that can be blended linearly.
pub trait Interpolate: Copy {
    /// Blend from `self` (t = 0) to `to` (t = 1).
    fn lerp(self, to: Self, t: f32) -> Self;
}

impl Interpolate for f32 {
    fn lerp(self, to: Self, t: f32) -> Self {
        self + (to - self) * t
    }
}

impl Interpolate for Point {
    fn lerp(self, to: Self, t: f32) -> Self {
        Point::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t))
    }
}

impl Interpolate for Transform {
    fn lerp(self, to: Self, t: f32) -> Self {
        Transform::new(self.x.lerp(to.x, t), self.y.lerp(to.y, t), self.k.lerp(to.k, t))
    }
}

/// Interpolates a value between two endpoints along an eased [`Fade`].
#[derive(Debug, Clone, Copy)]
pub struct Tween<T> {
    from: T,
    to: T,
    clock: Fade,
}

impl<T: Interpolate> Tween<T> {
    /// Tween `from → to` over `duration` with cubic in-out easing.
    pub fn new(from: T, to: T, duration: Duration) -> Self {
        Self {
            from,
            to,
            clock: Fade::new(duration).easing(ease_in_out_cubic),
        }
    }

    /// A tween that is already at `value` and complete.
    pub fn settled(value: T) -> Self {
        let mut tween = Self::new(value, value, Duration::ZERO);
        tween.clock.tick(Duration::from_nanos(1));
        tween
    }

    /// Interpolated value at the current time.
    pub fn current(&self) -> T {
        self.from.lerp(self.to, self.clock.value())
    }

    /// Start value.
    pub fn from(&self) -> T {
        self.from
    }

    /// End value.
    pub fn target(&self) -> T {
        self.to
    }

    /// Restart from wherever the tween currently is toward a new target.
    pub fn retarget(&mut self, to: T, duration: Duration) {
        let here = self.current();
        *self = Self::new(here, to, duration);
    }
}

impl<T: Interpolate> Animation for Tween<T> {
    fn tick(&mut self, dt: Duration) {
        self.clock.tick(dt);
    }

    fn is_complete(&self) -> bool {
        self.clock.is_complete()
    }

    fn value(&self) -> f32 {
        self.clock.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS_750: Duration = Duration::from_millis(750);

    #[test]
    fn fade_zero_duration_completes_on_first_tick() {
        let mut fade = Fade::new(Duration::ZERO);
        assert!(!fade.is_complete());
        fade.tick(Duration::from_nanos(1));
        assert!(fade.is_complete());
        assert_eq!(fade.value(), 1.0);
    }

    #[test]
    fn cubic_in_out_is_symmetric() {
        for i in 0..=50 {
            let t = i as f32 / 100.0;
            let a = ease_in_out_cubic(t);
            let b = 1.0 - ease_in_out_cubic(1.0 - t);
            assert!((a - b).abs() < 1e-5, "t={t}: {a} vs {b}");
        }
        assert_eq!(ease_in_out_cubic(0.5), 0.5);
    }

    #[test]
    fn tween_reaches_target() {
        let mut tween = Tween::new(Point::new(0.0, 0.0), Point::new(250.0, 90.0), MS_750);
        tween.tick(Duration::from_millis(375));
        let mid = tween.current();
        assert!((mid.x - 125.0).abs() < 1e-3);
        tween.tick(Duration::from_millis(375));
        assert!(tween.is_complete());
        assert_eq!(tween.current(), Point::new(250.0, 90.0));
    }

    #[test]
    fn retarget_starts_from_current_value() {
        let mut tween = Tween::new(0.0_f32, 100.0, MS_750);
        tween.tick(Duration::from_millis(375));
        let here = tween.current();
        tween.retarget(0.0, MS_750);
        assert_eq!(tween.from(), here);
        assert_eq!(tween.current(), here);
        assert!(!tween.is_complete());
    }

    #[test]
    fn settled_tween_is_complete() {
        let tween = Tween::settled(Transform::translate(150.0, 200.0));
        assert!(tween.is_complete());
        assert_eq!(tween.current(), Transform::translate(150.0, 200.0));
    }
}
