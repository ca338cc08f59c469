#![forbid(unsafe_code)]

//! Editor configuration.
//!
//! Every field defaults to the reference sizing, so an empty file (or no
//! file) behaves like `MindMapConfig::default()`.
//!
//! ```toml
//! transition_ms = 500
//! auto_collapse_threshold = 8
//!
//! [margin]
//! top = 20.0
//! right = 90.0
//! bottom = 30.0
//! left = 90.0
//! ```

use std::path::Path;
use std::time::Duration;

use mindmap_core::geometry::Sides;
use mindmap_layout::LayoutConfig;
use mindmap_render::RenderConfig;
use serde::{Deserialize, Serialize};

/// Tunable parameters of the editor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MindMapConfig {
    /// Duration of node, link and viewport transitions.
    pub transition_ms: u64,
    pub sibling_spacing: f32,
    pub depth_spacing: f32,
    pub node_width: f32,
    pub node_height: f32,
    /// Inset of the drawing area inside the window.
    pub margin: Sides,
    /// Root `x` after a view reset.
    pub reset_left_margin: f32,
    /// Collapse top-level subtrees on load when the root has more children.
    pub auto_collapse_threshold: usize,
    pub placeholder_name: String,
    pub default_root_name: String,
    pub storage_key: String,
    pub share_endpoint: String,
    pub zoom_min: f32,
    pub zoom_max: f32,
}

impl Default for MindMapConfig {
    fn default() -> Self {
        Self {
            transition_ms: 750,
            sibling_spacing: 45.0,
            depth_spacing: 250.0,
            node_width: 220.0,
            node_height: 35.0,
            margin: Sides::new(20.0, 90.0, 30.0, 90.0),
            reset_left_margin: 150.0,
            auto_collapse_threshold: 5,
            placeholder_name: "Nouveau".to_string(),
            default_root_name: "Racine (Double-clic)".to_string(),
            storage_key: "mindmap_data".to_string(),
            share_endpoint: "/api/share".to_string(),
            zoom_min: 0.1,
            zoom_max: 8.0,
        }
    }
}

impl MindMapConfig {
    /// Load from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        let errors = config.validate();
        if errors.is_empty() {
            Ok(config)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Load from a TOML file on disk.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Check ranges. An empty list means the config is usable.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if self.sibling_spacing <= 0.0 {
            errors.push(format!("sibling_spacing must be positive, got {}", self.sibling_spacing));
        }
        if self.depth_spacing <= 0.0 {
            errors.push(format!("depth_spacing must be positive, got {}", self.depth_spacing));
        }
        if self.node_width <= 0.0 || self.node_height <= 0.0 {
            errors.push("node size must be positive".to_string());
        }
        if !(self.zoom_min > 0.0 && self.zoom_min <= self.zoom_max) {
            errors.push(format!(
                "zoom extent must satisfy 0 < zoom_min <= zoom_max, got {}..{}",
                self.zoom_min, self.zoom_max
            ));
        }
        if self.placeholder_name.is_empty() || self.default_root_name.is_empty() {
            errors.push("node names must not be empty".to_string());
        }
        if self.storage_key.is_empty() {
            errors.push("storage_key must not be empty".to_string());
        }
        errors
    }

    pub fn transition(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    pub fn layout_config(&self) -> LayoutConfig {
        LayoutConfig {
            sibling_spacing: self.sibling_spacing,
            depth_spacing: self.depth_spacing,
            ..LayoutConfig::default()
        }
    }

    pub fn render_config(&self) -> RenderConfig {
        RenderConfig {
            transition: self.transition(),
            node_width: self.node_width,
            node_height: self.node_height,
            layout: self.layout_config(),
        }
    }
}

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    Toml(toml::de::Error),
    /// Out-of-range values.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            Self::Validation(errors) => write!(f, "validation errors: {}", errors.join("; ")),
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            Self::Toml(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        assert_eq!(MindMapConfig::from_toml_str("").unwrap(), MindMapConfig::default());
    }

    #[test]
    fn partial_override() {
        let config = MindMapConfig::from_toml_str(
            "transition_ms = 300\n[margin]\ntop = 0.0\nright = 0.0\nbottom = 0.0\nleft = 10.0\n",
        )
        .unwrap();
        assert_eq!(config.transition(), Duration::from_millis(300));
        assert_eq!(config.margin.left, 10.0);
        assert_eq!(config.placeholder_name, "Nouveau");
    }

    #[test]
    fn unknown_key_is_rejected() {
        let err = MindMapConfig::from_toml_str("colour = \"red\"").unwrap_err();
        assert!(matches!(err, ConfigError::Toml(_)));
    }

    #[test]
    fn bad_zoom_extent_fails_validation() {
        let err = MindMapConfig::from_toml_str("zoom_min = 4.0\nzoom_max = 2.0").unwrap_err();
        let ConfigError::Validation(errors) = err else {
            panic!("expected validation error");
        };
        assert_eq!(errors.len(), 1);
    }
}
