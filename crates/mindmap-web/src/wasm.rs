#![forbid(unsafe_code)]

//! wasm-bindgen surface over [`WebSession`].
//!
//! Node ids cross the boundary as numbers taken from the rendered frame
//! (`data-id` in the SVG). Effects and scenes cross as JSON.

use mindmap_core::NodeId;
use mindmap_core::event::{Event, HitTarget, KeyCode, KeyEvent, Modifiers, PointerEvent};
use mindmap_core::geometry::Point;
use mindmap_runtime::persistence::StorageResult;
use mindmap_runtime::{AppMode, DocumentStore, MindMapConfig, Msg, StorageError};
use std::time::Duration;
use wasm_bindgen::prelude::*;
use web_time::Instant;

use crate::WebSession;

/// Browser `localStorage`, looked up on every call.
#[derive(Debug, Default, Clone, Copy)]
struct LocalStorage;

impl LocalStorage {
    fn storage() -> StorageResult<web_sys::Storage> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok().flatten())
            .ok_or_else(|| StorageError::Unavailable("localStorage is not available".into()))
    }
}

fn js_error(value: JsValue) -> StorageError {
    StorageError::Unavailable(value.as_string().unwrap_or_else(|| format!("{value:?}")))
}

impl DocumentStore for LocalStorage {
    fn name(&self) -> &str {
        "LocalStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Self::storage()?.get_item(key).map_err(js_error)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        Self::storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        Self::storage()?.remove_item(key).map_err(js_error)
    }

    fn is_available(&self) -> bool {
        Self::storage().is_ok()
    }
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<String, JsValue> {
    serde_json::to_string(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

fn node(id: f64) -> NodeId {
    NodeId::from_raw(id.max(0.0) as u64)
}

#[wasm_bindgen]
pub struct MindMapWeb {
    session: WebSession,
    last_frame: Option<Instant>,
}

#[wasm_bindgen]
impl MindMapWeb {
    /// `mode` is `"view"` or `"edit"`; `snapshot` is the server document
    /// for view mode; `config` is optional TOML.
    #[wasm_bindgen(constructor)]
    pub fn new(
        mode: &str,
        snapshot: Option<String>,
        config: Option<String>,
        width: f32,
        height: f32,
    ) -> Result<MindMapWeb, JsValue> {
        let mode: AppMode = mode.parse().map_err(|e: String| JsValue::from_str(&e))?;
        let config = match config {
            Some(text) => MindMapConfig::from_toml_str(&text)
                .map_err(|e| JsValue::from_str(&e.to_string()))?,
            None => MindMapConfig::default(),
        };
        let session = WebSession::new(
            config,
            mode,
            snapshot.as_deref(),
            Box::new(LocalStorage),
            width,
            height,
        )
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
        Ok(Self {
            session,
            last_frame: None,
        })
    }

    #[wasm_bindgen(js_name = clickNode)]
    pub fn click_node(&mut self, id: f64) {
        self.pointer(PointerEvent::click(HitTarget::Node(node(id))));
    }

    #[wasm_bindgen(js_name = clickExpander)]
    pub fn click_expander(&mut self, id: f64) {
        self.pointer(PointerEvent::click(HitTarget::Expander(node(id))));
    }

    #[wasm_bindgen(js_name = clickBackground)]
    pub fn click_background(&mut self) {
        self.pointer(PointerEvent::click(HitTarget::Background));
    }

    #[wasm_bindgen(js_name = doubleClickNode)]
    pub fn double_click_node(&mut self, id: f64) {
        self.pointer(PointerEvent::double_click(HitTarget::Node(node(id))));
    }

    fn pointer(&mut self, event: PointerEvent) {
        self.session.push_event(Event::Pointer(event));
    }

    /// Text of the inline rename field changed.
    #[wasm_bindgen(js_name = renameInput)]
    pub fn rename_input(&mut self, text: String) {
        self.session.push_event(Event::Input(text));
    }

    /// A DOM `key` value pressed inside the rename field.
    #[wasm_bindgen(js_name = renameKey)]
    pub fn rename_key(&mut self, key: &str, shift: bool) {
        let code = match key {
            "Enter" => KeyCode::Enter,
            "Escape" => KeyCode::Escape,
            _ => return,
        };
        let modifiers = if shift { Modifiers::SHIFT } else { Modifiers::NONE };
        self.session
            .push_event(Event::Key(KeyEvent::new(code).with_modifiers(modifiers)));
    }

    #[wasm_bindgen(js_name = renameBlur)]
    pub fn rename_blur(&mut self) {
        self.session.push_event(Event::Blur);
    }

    pub fn drag(&mut self, dx: f32, dy: f32) {
        self.session.push_event(Event::Drag { dx, dy });
    }

    pub fn wheel(&mut self, delta: f32, x: f32, y: f32) {
        self.session.push_event(Event::Wheel {
            delta,
            at: Point::new(x, y),
        });
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.session.push_event(Event::Resize { width, height });
    }

    /// Call from `requestAnimationFrame`. Returns whether more frames are
    /// wanted.
    #[wasm_bindgen(js_name = animationFrame)]
    pub fn animation_frame(&mut self) -> bool {
        let now = Instant::now();
        let dt = self
            .last_frame
            .map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);
        self.session.advance(dt);
        if !self.session.is_animating() {
            self.last_frame = None;
        }
        self.session.is_animating()
    }

    #[wasm_bindgen(js_name = addChild)]
    pub fn add_child(&mut self) {
        self.session.send(Msg::AddChild);
    }

    #[wasm_bindgen(js_name = removeSelected)]
    pub fn remove_selected(&mut self) {
        self.session.send(Msg::RemoveSelected);
    }

    #[wasm_bindgen(js_name = expandAll)]
    pub fn expand_all(&mut self) {
        self.session.send(Msg::ExpandAll);
    }

    #[wasm_bindgen(js_name = collapseAll)]
    pub fn collapse_all(&mut self) {
        self.session.send(Msg::CollapseAll);
    }

    #[wasm_bindgen(js_name = resetView)]
    pub fn reset_view(&mut self) {
        self.session.send(Msg::ResetView);
    }

    #[wasm_bindgen(js_name = importJson)]
    pub fn import_json(&mut self, text: String) {
        self.session.send(Msg::Import(text));
    }

    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&mut self) {
        let millis = js_sys::Date::now() as i64;
        let now = chrono::DateTime::from_timestamp_millis(millis).unwrap_or_default();
        self.session.export(now);
    }

    pub fn share(&mut self) {
        self.session.send(Msg::Share);
    }

    #[wasm_bindgen(js_name = shareCompleted)]
    pub fn share_completed(&mut self, status: u16, body: String) {
        self.session.share_completed(status, body);
    }

    #[wasm_bindgen(js_name = shareFailed)]
    pub fn share_failed(&mut self, reason: String) {
        self.session.share_failed(reason);
    }

    /// Call after the user confirmed the reset dialog.
    #[wasm_bindgen(js_name = resetMap)]
    pub fn reset_map(&mut self) {
        self.session.send(Msg::ResetMap);
    }

    pub fn svg(&self) -> String {
        self.session.svg()
    }

    /// Current scene as JSON.
    #[wasm_bindgen(js_name = sceneJson)]
    pub fn scene_json(&self) -> Result<String, JsValue> {
        to_js(&self.session.scene())
    }

    /// Pending effects as a JSON array; clears them.
    #[wasm_bindgen(js_name = drainEffectsJson)]
    pub fn drain_effects_json(&mut self) -> Result<String, JsValue> {
        let outputs = self.session.take_outputs();
        if !outputs.effects.is_empty() {
            tracing::debug!(count = outputs.effects.len(), "effects drained");
        }
        to_js(&outputs.effects)
    }
}
