#![forbid(unsafe_code)]

//! Mind-map data model.
//!
//! - [`document`]: the persisted [`MapNode`] tree and its JSON form.
//! - [`hierarchy`]: the runtime [`Hierarchy`] arena with ids, parent links,
//!   depths, and layout positions.
//! - [`visibility`]: expand/collapse operations on the arena.

pub mod document;
pub mod hierarchy;
pub mod visibility;

pub use document::{MapNode, default_document, parse_document};
pub use hierarchy::{ChildSlots, Hierarchy, LayoutPosition, TreeNode};
pub use visibility::Visibility;
