#![forbid(unsafe_code)]

//! Render/diff engine for the mind-map diagram.
//!
//! [`Renderer`] keeps the on-screen scene, reconciles it against each new
//! layout with a keyed diff ([`diff`]), and drives enter/update/exit
//! transitions from a host clock. A [`Frame`] snapshot can be drawn by any
//! host or serialized with [`svg::to_svg`].

pub mod diff;
pub mod path;
pub mod renderer;
pub mod scene;
pub mod svg;

pub use diff::KeyedDiff;
pub use path::{LinkEnds, diagonal};
pub use renderer::{RenderConfig, RenderSummary, Renderer};
pub use scene::{Expander, Frame, LinkView, NodeView, Phase};
