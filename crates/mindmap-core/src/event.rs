#![forbid(unsafe_code)]

//! Canonical interaction events.
//!
//! The host translates raw browser (or test harness) input into these
//! events. Hit-testing happens on the host side: a click already knows
//! whether it landed on a node body, an expander, or the background.
//!
//! # Design Notes
//!
//! - Coordinates are surface pixels, before the viewport transform.
//! - There is no background double-click event: double-click zoom is
//!   disabled and double-click is reserved for renaming.

use bitflags::bitflags;

use crate::geometry::Point;
use crate::id::NodeId;

/// Canonical interaction event.
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Pointer activation on a diagram element.
    Pointer(PointerEvent),

    /// A keyboard event, routed to the inline rename field when one is open.
    Key(KeyEvent),

    /// The inline rename field's content changed.
    Input(String),

    /// The inline rename field lost focus.
    Blur,

    /// Drag on the background; pans the viewport by the surface delta.
    Drag {
        dx: f32,
        dy: f32,
    },

    /// Wheel over the surface; positive `delta` zooms in around `at`.
    Wheel {
        delta: f32,
        at: Point,
    },

    /// Window was resized.
    Resize {
        width: f32,
        height: f32,
    },
}

/// What a pointer event landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HitTarget {
    /// A node's body or label.
    Node(NodeId),
    /// A node's expand/collapse indicator.
    Expander(NodeId),
    /// Empty surface.
    Background,
}

/// Kind of pointer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerKind {
    Click,
    DoubleClick,
}

/// A pointer activation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PointerEvent {
    pub kind: PointerKind,
    pub target: HitTarget,
}

impl PointerEvent {
    /// Single click on `target`.
    #[must_use]
    pub const fn click(target: HitTarget) -> Self {
        Self {
            kind: PointerKind::Click,
            target,
        }
    }

    /// Double click on `target`.
    #[must_use]
    pub const fn double_click(target: HitTarget) -> Self {
        Self {
            kind: PointerKind::DoubleClick,
            target,
        }
    }
}

/// A keyboard event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEvent {
    /// The key code that was pressed.
    pub code: KeyCode,

    /// Modifier keys held during the event.
    pub modifiers: Modifiers,
}

impl KeyEvent {
    /// Create a new key event with no modifiers.
    #[must_use]
    pub const fn new(code: KeyCode) -> Self {
        Self {
            code,
            modifiers: Modifiers::NONE,
        }
    }

    /// Create a key event with modifiers.
    #[must_use]
    pub const fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Whether this is the rename confirm key.
    #[must_use]
    pub fn is_confirm(&self) -> bool {
        self.code == KeyCode::Enter && !self.modifiers.contains(Modifiers::SHIFT)
    }
}

/// Key codes the editor distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Enter,
    Escape,
    Backspace,
    Tab,
    Char(char),
}

bitflags! {
    /// Modifier keys that can be held during a key event.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Modifiers: u8 {
        const NONE  = 0b0000;
        const SHIFT = 0b0001;
        const ALT   = 0b0010;
        const CTRL  = 0b0100;
        const SUPER = 0b1000;
    }
}

impl From<PointerEvent> for Event {
    fn from(event: PointerEvent) -> Self {
        Event::Pointer(event)
    }
}

impl From<KeyEvent> for Event {
    fn from(event: KeyEvent) -> Self {
        Event::Key(event)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shift_enter_is_not_confirm() {
        assert!(KeyEvent::new(KeyCode::Enter).is_confirm());
        assert!(
            !KeyEvent::new(KeyCode::Enter)
                .with_modifiers(Modifiers::SHIFT)
                .is_confirm()
        );
        assert!(!KeyEvent::new(KeyCode::Char('a')).is_confirm());
    }

    #[test]
    fn pointer_event_into_event() {
        let ev: Event = PointerEvent::click(HitTarget::Background).into();
        assert_eq!(
            ev,
            Event::Pointer(PointerEvent {
                kind: PointerKind::Click,
                target: HitTarget::Background,
            })
        );
    }
}
