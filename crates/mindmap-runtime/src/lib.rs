#![forbid(unsafe_code)]

//! Runtime: the mind-map editor as an Elm-style program.
//!
//! # Role in the mind-map workspace
//! `mindmap-runtime` is the orchestrator. It owns the [`editor::Editor`]
//! (selection, structural edits, inline rename, import), the pan/zoom
//! [`viewport::Viewport`], local [`persistence`], and the share and export
//! exchanges. [`app::MindMapApp`] ties them to the render engine and maps
//! interaction events onto edits.
//!
//! # How it fits in the system
//! Hosts construct a [`program::Program`] around a [`MindMapApp`], feed it
//! [`mindmap_core::event::Event`]s and [`app::Msg`]s, and carry out the
//! returned [`program::Effect`]s. `mindmap-web` does this for the browser,
//! `mindmap-cli` for scripted use.

pub mod app;
pub mod config;
pub mod editor;
pub mod export;
pub mod mode;
pub mod persistence;
pub mod program;
pub mod share;
pub mod viewport;

pub use app::{MindMapApp, Msg, SceneView};
pub use config::{ConfigError, MindMapConfig};
pub use editor::{Editor, RenameSession};
pub use export::{Export, export_filename};
pub use mode::AppMode;
pub use persistence::{
    DocumentStore, FileStore, MemoryStore, StorageError, load_document, load_or_default,
    save_document,
};
pub use program::{Cmd, Effect, Model, Notification, Program};
pub use share::{ShareLink, ShareRequest, parse_share_response};
pub use viewport::Viewport;
