#![forbid(unsafe_code)]

//! `mindmap-web` hosts the mind-map editor in a browser page.
//!
//! Design goals:
//! - **Host-driven I/O**: the page pushes pointer, key, and resize events and
//!   carries out the returned effects (HTTP, downloads, dialogs).
//! - **Deterministic time**: the host advances a monotonic clock explicitly;
//!   animations only move when [`WebSession::advance`] is called.
//! - **No blocking / no threads**: suitable for `wasm32-unknown-unknown`.
//!
//! The wasm-bindgen surface lives in `wasm` and is only compiled for
//! `wasm32`; everything else runs natively in tests.

pub mod asset_cache;

#[cfg(target_arch = "wasm32")]
mod wasm;

use core::time::Duration;

use chrono::{DateTime, Utc};
use mindmap_core::event::Event;
use mindmap_core::geometry::Size;
use mindmap_core::Result;
use mindmap_runtime::{
    AppMode, DocumentStore, Effect, MindMapApp, MindMapConfig, Msg, Program, SceneView,
};

/// Deterministic monotonic clock controlled by the host.
#[derive(Debug, Default, Clone)]
pub struct DeterministicClock {
    now: Duration,
}

impl DeterministicClock {
    /// Create a clock starting at `0`.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            now: Duration::ZERO,
        }
    }

    /// Set current monotonic time. Returns the elapsed time since the last
    /// reading; time never runs backwards.
    pub fn set(&mut self, now: Duration) -> Duration {
        let dt = now.saturating_sub(self.now);
        self.now = self.now.max(now);
        dt
    }

    /// Advance monotonic time by `dt`.
    pub fn advance(&mut self, dt: Duration) {
        self.now = self.now.saturating_add(dt);
    }

    pub fn now(&self) -> Duration {
        self.now
    }
}

/// What the host must do after a batch of input.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct WebOutputs {
    /// Effects other than animation ticks, in emission order.
    pub effects: Vec<Effect>,
    /// The scene changed and should be redrawn.
    pub dirty: bool,
}

/// One editor page.
pub struct WebSession {
    program: Program<MindMapApp>,
    clock: DeterministicClock,
    tick_pending: bool,
    outputs: WebOutputs,
}

impl WebSession {
    /// Load the startup document for `mode` and draw the first frame.
    pub fn new(
        config: MindMapConfig,
        mode: AppMode,
        snapshot: Option<&str>,
        store: Box<dyn DocumentStore>,
        width: f32,
        height: f32,
    ) -> Result<Self> {
        let app = MindMapApp::load(config, mode, snapshot, store.as_ref(), Size::new(width, height))?;
        let mut session = Self {
            program: Program::new(app, store),
            clock: DeterministicClock::new(),
            tick_pending: false,
            outputs: WebOutputs::default(),
        };
        session.program.init();
        session.collect();
        Ok(session)
    }

    pub fn clock(&self) -> &DeterministicClock {
        &self.clock
    }

    pub fn app(&self) -> &MindMapApp {
        self.program.model()
    }

    /// Push an interaction event.
    pub fn push_event(&mut self, event: Event) {
        self.send(Msg::Event(event));
    }

    /// Push an application message (toolbar action, HTTP answer).
    pub fn send(&mut self, msg: Msg) {
        self.program.dispatch(msg);
        self.collect();
    }

    /// Advance time by `dt`, stepping animations if any are running.
    pub fn advance(&mut self, dt: Duration) {
        self.clock.advance(dt);
        self.step(dt);
    }

    /// Move the clock to the absolute time `now`.
    pub fn advance_to(&mut self, now: Duration) {
        let dt = self.clock.set(now);
        self.step(dt);
    }

    fn step(&mut self, dt: Duration) {
        if self.tick_pending && !dt.is_zero() {
            self.tick_pending = false;
            self.send(Msg::Tick(dt));
        }
    }

    /// Whether animations want more frames.
    pub fn is_animating(&self) -> bool {
        self.tick_pending
    }

    pub fn export(&mut self, now: DateTime<Utc>) {
        self.send(Msg::Export(now));
    }

    pub fn share_completed(&mut self, status: u16, body: impl Into<String>) {
        self.send(Msg::ShareCompleted {
            status,
            body: body.into(),
        });
    }

    pub fn share_failed(&mut self, reason: impl Into<String>) {
        self.send(Msg::ShareFailed(reason.into()));
    }

    /// Current scene.
    pub fn scene(&self) -> SceneView {
        self.program.view()
    }

    /// Current scene as a standalone SVG document.
    pub fn svg(&self) -> String {
        self.app().to_svg()
    }

    /// Take accumulated outputs.
    pub fn take_outputs(&mut self) -> WebOutputs {
        std::mem::take(&mut self.outputs)
    }

    fn collect(&mut self) {
        for effect in self.program.take_effects() {
            match effect {
                Effect::Tick(_) => self.tick_pending = true,
                other => self.outputs.effects.push(other),
            }
        }
        self.outputs.dirty = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_never_runs_backwards() {
        let mut clock = DeterministicClock::new();
        assert_eq!(clock.set(Duration::from_millis(30)), Duration::from_millis(30));
        assert_eq!(clock.set(Duration::from_millis(10)), Duration::ZERO);
        assert_eq!(clock.now(), Duration::from_millis(30));
        clock.advance(Duration::from_millis(5));
        assert_eq!(clock.now(), Duration::from_millis(35));
    }
}
