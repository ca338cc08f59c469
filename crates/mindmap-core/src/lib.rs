#![forbid(unsafe_code)]

//! Core: geometry, animation primitives, interaction events, and errors.
//!
//! # Role in the mind-map workspace
//! `mindmap-core` is the leaf crate. It owns the value types every other
//! crate agrees on: screen-space [`geometry`], stable node [`id`]s, the
//! time-based [`animation`] primitives that drive transitions, the canonical
//! interaction [`event`]s a host pushes in, and the [`error`] taxonomy.
//!
//! # How it fits in the system
//! The model (`mindmap-model`) and layout (`mindmap-layout`) crates build on
//! these types; the render engine interpolates [`geometry::Point`]s with
//! [`animation::Tween`]; the runtime turns [`event::Event`]s into edits.

pub mod animation;
pub mod error;
pub mod event;
pub mod geometry;
pub mod id;
pub mod logging;

pub use error::{MindMapError, Result};
pub use id::{IdAllocator, NodeId};

// Re-export tracing macros at crate root for ergonomic use.
#[cfg(feature = "tracing")]
pub use logging::{debug, error, info, trace, warn};
