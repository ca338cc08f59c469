#![forbid(unsafe_code)]

//! Standalone SVG serialization of a [`Frame`].
//!
//! Only structure and state classes are emitted; colors belong to the
//! stylesheet. State classes on `g.node`:
//!
//! | class | meaning |
//! |-------|---------|
//! | `selected` | highlighted border |
//! | `collapsed` | has hidden children, expander filled |
//! | `leaf` | no children, no expander drawn |

use std::fmt::Write;

use mindmap_core::geometry::{Size, Transform};

use crate::renderer::RenderConfig;
use crate::scene::{Expander, Frame, NodeView};

/// Serialize `frame` under the viewport `transform`.
pub fn to_svg(frame: &Frame, transform: Transform, size: Size, config: &RenderConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        size.width, size.height
    );
    let _ = writeln!(out, r#"  <g transform="{}">"#, transform.to_svg());
    for link in &frame.links {
        let _ = writeln!(out, r#"    <path class="link" d="{}"/>"#, link.path);
    }
    for node in &frame.nodes {
        write_node(&mut out, node, config);
    }
    out.push_str("  </g>\n</svg>\n");
    out
}

fn write_node(out: &mut String, node: &NodeView, config: &RenderConfig) {
    let mut classes = String::from("node");
    if node.selected {
        classes.push_str(" selected");
    }
    match node.expander {
        Expander::Filled => classes.push_str(" collapsed"),
        Expander::None => classes.push_str(" leaf"),
        Expander::Open => {}
    }
    let _ = writeln!(
        out,
        r#"    <g class="{classes}" data-id="{}" transform="translate({},{})" opacity="{}">"#,
        node.id, node.position.x, node.position.y, node.opacity
    );
    let _ = writeln!(
        out,
        r#"      <rect width="{w}" height="{h}" x="0" y="{y}" rx="6" ry="6"/>"#,
        w = config.node_width,
        h = config.node_height,
        y = -config.node_height / 2.0
    );
    let _ = writeln!(
        out,
        r#"      <text dy=".35em" x="15">{}</text>"#,
        escape_xml(&node.label)
    );
    if node.expander != Expander::None {
        let _ = writeln!(
            out,
            r#"      <circle class="expander" r="5" cx="{}" cy="0"/>"#,
            config.node_width
        );
    }
    out.push_str("    </g>\n");
}

fn escape_xml(value: &str) -> String {
    v_htmlescape::escape(value).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escape_xml_special_chars() {
        let escaped = escape_xml(r#"a<b & "c">"#);
        assert!(escaped.starts_with("a&lt;b &amp; "));
        assert!(!escaped.contains('<') && !escaped.contains('"'));
    }
}
