//! The mind-map editor as a [`Model`].
//!
//! Wires the edit controller, render engine, and viewport together and maps
//! interaction events onto them:
//!
//! | Event | Edit mode | View mode |
//! |-------|-----------|-----------|
//! | click node | select, redraw from it | ignored |
//! | click expander | toggle, redraw from it | same |
//! | click background | clear selection | ignored |
//! | double-click node | open rename field | ignored |
//! | Enter / blur | commit rename, save | ignored |
//! | drag / wheel | pan / zoom | same |

use std::time::Duration;

use chrono::{DateTime, Utc};
use mindmap_core::event::{Event, HitTarget, KeyCode, PointerKind};
use mindmap_core::geometry::{Point, Size, Transform};
use mindmap_core::{MindMapError, NodeId, Result};
use mindmap_model::{Hierarchy, MapNode, default_document, parse_document};
use mindmap_render::{Frame, Renderer};
use serde::Serialize;

use crate::config::MindMapConfig;
use crate::editor::{Editor, RenameSession};
use crate::export::Export;
use crate::mode::AppMode;
use crate::persistence::{DocumentStore, load_or_default};
use crate::program::{Cmd, Model, Notification};
use crate::share::{ShareRequest, parse_share_response};
use crate::viewport::Viewport;

/// Interval between animation ticks requested from the host.
pub const FRAME_INTERVAL: Duration = Duration::from_millis(16);

#[derive(Debug, Clone)]
pub enum Msg {
    Event(Event),
    /// Animation time passed.
    Tick(Duration),
    AddChild,
    RemoveSelected,
    ExpandAll,
    CollapseAll,
    ResetView,
    /// Replace the document with this JSON text.
    Import(String),
    /// Download the document, dated `now`.
    Export(DateTime<Utc>),
    Share,
    /// The share endpoint answered.
    ShareCompleted { status: u16, body: String },
    /// The share request never got an answer.
    ShareFailed(String),
    /// Discard the stored document and start over. The host confirms first.
    ResetMap,
}

impl From<Event> for Msg {
    fn from(event: Event) -> Self {
        Msg::Event(event)
    }
}

/// Everything the host needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SceneView {
    pub frame: Frame,
    pub transform: Transform,
    pub surface: Size,
    pub rename: Option<RenameSession>,
    pub mode: AppMode,
}

pub struct MindMapApp {
    config: MindMapConfig,
    mode: AppMode,
    editor: Editor,
    renderer: Renderer,
    viewport: Viewport,
}

impl MindMapApp {
    pub fn new(config: MindMapConfig, mode: AppMode, document: MapNode, window: Size) -> Result<Self> {
        let editor = Editor::new(document, mode.is_editable())?
            .placeholder_name(config.placeholder_name.clone());
        let renderer = Renderer::new(config.render_config());
        let viewport = Viewport::new(window, config.margin)
            .reset_left(config.reset_left_margin)
            .zoom_extent(config.zoom_min, config.zoom_max)
            .transition(config.transition());
        Ok(Self {
            config,
            mode,
            editor,
            renderer,
            viewport,
        })
    }

    /// Pick the startup document for `mode`.
    ///
    /// View mode shows `snapshot`; edit mode reads `store`. Anything
    /// unusable falls back to the default document.
    pub fn load(
        config: MindMapConfig,
        mode: AppMode,
        snapshot: Option<&str>,
        store: &dyn DocumentStore,
        window: Size,
    ) -> Result<Self> {
        let document = match mode {
            AppMode::View => match snapshot.map(parse_document) {
                Some(Ok(doc)) => doc,
                Some(Err(err)) => {
                    tracing::warn!(error = %err, "snapshot is unusable, showing default document");
                    default_document(&config.default_root_name)
                }
                None => default_document(&config.default_root_name),
            },
            AppMode::Edit => load_or_default(store, &config.storage_key, &config.default_root_name),
        };
        tracing::info!(%mode, nodes = document.count(), "mind map loaded");
        Self::new(config, mode, document, window)
    }

    pub fn config(&self) -> &MindMapConfig {
        &self.config
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub fn editor(&self) -> &Editor {
        &self.editor
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        self.editor.hierarchy()
    }

    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Standalone SVG of the current frame.
    pub fn to_svg(&self) -> String {
        mindmap_render::svg::to_svg(
            &self.renderer.frame(),
            self.viewport.transform(),
            self.viewport.window(),
            self.renderer.config(),
        )
    }

    /// Jump every running animation to its end.
    pub fn finish_animations(&mut self) {
        self.renderer.finish();
        self.viewport.finish();
    }

    fn render_from(&mut self, source: NodeId) {
        let selection = self.editor.selection();
        let summary = self
            .renderer
            .render(self.editor.hierarchy_mut(), source, selection);
        tracing::trace!(
            source = source.get(),
            entered = summary.nodes.entered.len(),
            exited = summary.nodes.exited.len(),
            "render"
        );
    }

    fn render_root(&mut self) {
        let root = self.editor.hierarchy().root_id();
        self.render_from(root);
    }

    /// New nodes of a fresh document grow out of the middle of the surface.
    fn seed_root(&mut self) {
        let hierarchy = self.editor.hierarchy_mut();
        let root = hierarchy.root_id();
        let y = self.viewport.usable().height / 2.0;
        hierarchy.set_previous_position(root, Point::new(0.0, y));
    }

    fn root_y(&self) -> f32 {
        self.hierarchy()
            .root()
            .position()
            .current
            .map_or(0.0, |p| p.y)
    }

    fn reset_view(&mut self) {
        let y = self.root_y();
        self.viewport.reset(y);
    }

    fn start(&mut self) {
        if self
            .editor
            .hierarchy_mut()
            .apply_default_policy(self.config.auto_collapse_threshold)
        {
            tracing::debug!("large map, top-level subtrees collapsed");
        }
        self.seed_root();
        self.render_root();
        self.reset_view();
    }

    fn persist(&self) -> Cmd<Msg> {
        if !self.mode.is_editable() {
            return Cmd::none();
        }
        Cmd::Persist {
            key: self.config.storage_key.clone(),
            json: self.editor.document().to_json(),
        }
    }

    fn animate(&self) -> Cmd<Msg> {
        if self.renderer.is_animating() || self.viewport.is_animating() {
            Cmd::tick(FRAME_INTERVAL)
        } else {
            Cmd::none()
        }
    }

    fn fail(&self, err: MindMapError) -> Cmd<Msg> {
        tracing::warn!(error = %err, "operation failed");
        Cmd::alert(err.user_message())
    }

    fn handle_event(&mut self, event: Event) -> Cmd<Msg> {
        let editable = self.mode.is_editable();
        match event {
            Event::Pointer(pointer) => match (pointer.kind, pointer.target) {
                (PointerKind::Click, HitTarget::Node(id)) if editable => {
                    self.editor.select(id);
                    self.render_from(id);
                    self.animate()
                }
                (PointerKind::Click, HitTarget::Expander(id)) => {
                    if self.editor.toggle(id).is_some() {
                        self.render_from(id);
                    }
                    self.animate()
                }
                (PointerKind::Click, HitTarget::Background) if editable => {
                    if self.editor.clear_selection() {
                        self.render_root();
                    }
                    self.animate()
                }
                (PointerKind::DoubleClick, HitTarget::Node(id)) if editable => {
                    match self.editor.begin_rename(id) {
                        Ok(()) => Cmd::none(),
                        Err(err) => self.fail(err),
                    }
                }
                _ => Cmd::none(),
            },
            Event::Key(key) if key.is_confirm() => self.commit_rename(),
            Event::Key(key) if matches!(key.code, KeyCode::Escape) => {
                self.editor.cancel_rename();
                Cmd::none()
            }
            Event::Key(_) => Cmd::none(),
            Event::Input(text) => {
                self.editor.update_rename(text);
                Cmd::none()
            }
            Event::Blur => self.commit_rename(),
            Event::Drag { dx, dy } => {
                self.viewport.pan(dx, dy);
                Cmd::none()
            }
            Event::Wheel { delta, at } => {
                self.viewport.zoom(delta, at);
                Cmd::none()
            }
            Event::Resize { width, height } => {
                self.viewport.resize(width, height);
                self.render_root();
                self.animate()
            }
        }
    }

    fn commit_rename(&mut self) -> Cmd<Msg> {
        match self.editor.commit_rename() {
            Ok(Some(id)) => {
                self.render_from(id);
                Cmd::batch(vec![self.persist(), self.animate()])
            }
            Ok(None) => Cmd::none(),
            Err(err) => self.fail(err),
        }
    }

    fn import(&mut self, text: &str) -> Cmd<Msg> {
        if let Err(err) = self.editor.import_document(text) {
            return self.fail(err);
        }
        self.seed_root();
        self.render_root();
        self.reset_view();
        Cmd::batch(vec![
            self.persist(),
            Cmd::alert("Import succeeded."),
            self.animate(),
        ])
    }

    fn reset_map(&mut self) -> Cmd<Msg> {
        if !self.mode.is_editable() {
            return self.fail(MindMapError::ReadOnly);
        }
        let document = default_document(&self.config.default_root_name);
        if let Err(err) = self.editor.replace_document(document) {
            return self.fail(err);
        }
        self.renderer.clear();
        self.start();
        Cmd::batch(vec![
            Cmd::ClearStorage {
                key: self.config.storage_key.clone(),
            },
            self.animate(),
        ])
    }
}

impl Model for MindMapApp {
    type Message = Msg;
    type View = SceneView;

    fn init(&mut self) -> Cmd<Msg> {
        self.start();
        self.animate()
    }

    fn update(&mut self, msg: Msg) -> Cmd<Msg> {
        match msg {
            Msg::Event(event) => self.handle_event(event),
            Msg::Tick(dt) => {
                self.renderer.tick(dt);
                self.viewport.tick(dt);
                self.animate()
            }
            Msg::AddChild => match self.editor.add_child() {
                Ok(_) => {
                    self.render_root();
                    Cmd::batch(vec![self.persist(), self.animate()])
                }
                Err(err) => self.fail(err),
            },
            Msg::RemoveSelected => match self.editor.remove_node() {
                Ok(_) => {
                    self.render_root();
                    Cmd::batch(vec![self.persist(), self.animate()])
                }
                Err(err) => self.fail(err),
            },
            Msg::ExpandAll => {
                self.editor.expand_all();
                self.render_root();
                self.animate()
            }
            Msg::CollapseAll => {
                self.editor.collapse_all();
                self.render_root();
                self.reset_view();
                self.animate()
            }
            Msg::ResetView => {
                self.reset_view();
                self.animate()
            }
            Msg::Import(text) => self.import(&text),
            Msg::Export(now) => Cmd::Download(Export::new(self.editor.document(), now)),
            Msg::Share => Cmd::Share(ShareRequest::new(
                self.config.share_endpoint.clone(),
                self.editor.document(),
            )),
            Msg::ShareCompleted { status, body } => match parse_share_response(status, &body) {
                Ok(link) => {
                    tracing::info!(url = %link.url, "share link created");
                    Cmd::Notify(Notification::Prompt {
                        message: "Read-only share link:".to_string(),
                        value: link.url,
                    })
                }
                Err(err) => self.fail(err),
            },
            Msg::ShareFailed(reason) => self.fail(MindMapError::network(reason)),
            Msg::ResetMap => self.reset_map(),
        }
    }

    fn view(&self) -> SceneView {
        SceneView {
            frame: self.renderer.frame(),
            transform: self.viewport.transform(),
            surface: self.viewport.window(),
            rename: self.editor.rename_session().cloned(),
            mode: self.mode,
        }
    }
}
