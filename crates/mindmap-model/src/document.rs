#![forbid(unsafe_code)]

//! Persisted document form.
//!
//! A [`MapNode`] tree is the single source of truth for the map. It is what
//! gets stored, exported, imported and shared; the runtime hierarchy is
//! derived from it.
//!
//! # Shape
//!
//! ```json
//! { "name": "Root", "children": [ { "name": "Child" } ] }
//! ```
//!
//! - The root must carry a non-empty string `name`.
//! - Descendants without a `name` get an empty label.
//! - `children` presence is kept as found: absent stays absent, `[]` stays
//!   `[]`, so a document survives import followed by export unchanged.
//! - Unknown keys are dropped. The runtime id is never serialized.

use mindmap_core::{MindMapError, NodeId, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A persisted map node: a name plus optional ordered children.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "serde_json::Value")]
pub struct MapNode {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<MapNode>>,
    #[serde(skip)]
    id: Option<NodeId>,
}

impl PartialEq for MapNode {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name && self.children == other.children
    }
}

impl MapNode {
    /// A node without a `children` key.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: None,
            id: None,
        }
    }

    /// A node with an explicit empty `children` list, the shape used for
    /// freshly created nodes and the default document.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            children: Some(Vec::new()),
            id: None,
        }
    }

    /// Builder: append a child.
    #[must_use]
    pub fn with_child(mut self, child: MapNode) -> Self {
        self.children.get_or_insert_with(Vec::new).push(child);
        self
    }

    /// Runtime id, once the node has been part of a hierarchy.
    pub fn id(&self) -> Option<NodeId> {
        self.id
    }

    pub(crate) fn set_id(&mut self, id: NodeId) {
        self.id = Some(id);
    }

    /// Children in order; empty when the key is absent.
    pub fn children(&self) -> &[MapNode] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Whether the persisted form has at least one child.
    pub fn has_children(&self) -> bool {
        !self.children().is_empty()
    }

    /// Append a child, creating the `children` list when absent.
    pub fn push_child(&mut self, child: MapNode) {
        self.children.get_or_insert_with(Vec::new).push(child);
    }

    /// Remove and return the child at `index`.
    pub fn remove_child(&mut self, index: usize) -> Option<MapNode> {
        let children = self.children.as_mut()?;
        (index < children.len()).then(|| children.remove(index))
    }

    /// Total number of nodes in this subtree, self included.
    pub fn count(&self) -> usize {
        1 + self.children().iter().map(MapNode::count).sum::<usize>()
    }

    /// Node at a child-index path from this node.
    pub fn get(&self, path: &[usize]) -> Option<&MapNode> {
        path.iter()
            .try_fold(self, |node, &i| node.children.as_ref()?.get(i))
    }

    /// Mutable node at a child-index path from this node.
    pub fn get_mut(&mut self, path: &[usize]) -> Option<&mut MapNode> {
        path.iter()
            .try_fold(self, |node, &i| node.children.as_mut()?.get_mut(i))
    }

    /// Parse a document root from a JSON value.
    pub fn from_value(value: &Value) -> Result<Self> {
        let object = value
            .as_object()
            .ok_or_else(|| MindMapError::invalid_document("the document must be a JSON object"))?;
        match object.get("name") {
            Some(Value::String(name)) if !name.is_empty() => {}
            Some(Value::String(_)) => {
                return Err(MindMapError::invalid_document("the root name is empty"));
            }
            Some(_) => {
                return Err(MindMapError::invalid_document("the root name must be a string"));
            }
            None => return Err(MindMapError::invalid_document("the root has no name")),
        }
        node_from_object(object)
    }

    /// JSON value of this subtree.
    pub fn to_value(&self) -> Value {
        let mut object = Map::new();
        object.insert("name".to_string(), Value::String(self.name.clone()));
        if let Some(children) = &self.children {
            object.insert(
                "children".to_string(),
                Value::Array(children.iter().map(MapNode::to_value).collect()),
            );
        }
        Value::Object(object)
    }

    /// Compact JSON text.
    pub fn to_json(&self) -> String {
        self.to_value().to_string()
    }

    /// Pretty JSON text, two-space indented.
    pub fn to_json_pretty(&self) -> String {
        format!("{:#}", self.to_value())
    }
}

impl TryFrom<Value> for MapNode {
    type Error = MindMapError;

    fn try_from(value: Value) -> Result<Self> {
        MapNode::from_value(&value)
    }
}

fn node_from_object(object: &Map<String, Value>) -> Result<MapNode> {
    let name = match object.get("name") {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    };
    let children = match object.get("children") {
        None | Some(Value::Null) => None,
        Some(Value::Array(items)) => Some(
            items
                .iter()
                .map(|item| {
                    item.as_object()
                        .ok_or_else(|| MindMapError::invalid_document("every child must be an object"))
                        .and_then(node_from_object)
                })
                .collect::<Result<Vec<_>>>()?,
        ),
        Some(_) => {
            return Err(MindMapError::invalid_document("\"children\" must be an array"));
        }
    };
    Ok(MapNode {
        name,
        children,
        id: None,
    })
}

/// Parse JSON text into a document.
///
/// Malformed text fails with [`MindMapError::ParseError`]; well-formed JSON
/// with the wrong shape fails with [`MindMapError::InvalidDocument`].
pub fn parse_document(text: &str) -> Result<MapNode> {
    let value: Value = serde_json::from_str(text)?;
    MapNode::from_value(&value)
}

/// The document shown when nothing has been stored yet.
pub fn default_document(root_name: &str) -> MapNode {
    MapNode::placeholder(root_name)
}
