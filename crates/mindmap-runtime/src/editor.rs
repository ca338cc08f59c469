#![forbid(unsafe_code)]

//! Edit controller.
//!
//! Owns the hierarchy, the single-node selection, and the inline rename
//! session. Every operation either succeeds completely or returns an error
//! with the model untouched. Mutations are refused in view mode.

use mindmap_core::{IdAllocator, MindMapError, NodeId, Result};
use mindmap_model::{Hierarchy, MapNode, Visibility, parse_document};
use serde::Serialize;

/// An open inline rename: the node and the text typed so far.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameSession {
    pub node: NodeId,
    pub text: String,
}

#[derive(Debug)]
pub struct Editor {
    hierarchy: Hierarchy,
    ids: IdAllocator,
    editable: bool,
    selection: Option<NodeId>,
    rename: Option<RenameSession>,
    placeholder_name: String,
}

impl Editor {
    /// Wrap `document`. Fails if the root has no name.
    pub fn new(document: MapNode, editable: bool) -> Result<Self> {
        let mut ids = IdAllocator::new();
        let hierarchy = Hierarchy::build(document, &mut ids)?;
        Ok(Self {
            hierarchy,
            ids,
            editable,
            selection: None,
            rename: None,
            placeholder_name: "Nouveau".to_string(),
        })
    }

    /// Name given to nodes created by [`Editor::add_child`].
    #[must_use]
    pub fn placeholder_name(mut self, name: impl Into<String>) -> Self {
        self.placeholder_name = name.into();
        self
    }

    pub fn hierarchy(&self) -> &Hierarchy {
        &self.hierarchy
    }

    pub fn hierarchy_mut(&mut self) -> &mut Hierarchy {
        &mut self.hierarchy
    }

    pub fn document(&self) -> &MapNode {
        self.hierarchy.document()
    }

    pub fn is_editable(&self) -> bool {
        self.editable
    }

    pub fn selection(&self) -> Option<NodeId> {
        self.selection
    }

    pub fn rename_session(&self) -> Option<&RenameSession> {
        self.rename.as_ref()
    }

    fn ensure_editable(&self) -> Result<()> {
        if self.editable {
            Ok(())
        } else {
            Err(MindMapError::ReadOnly)
        }
    }

    /// Select `id`. Ignored in view mode and for unknown ids.
    ///
    /// Returns `true` if the selection changed.
    pub fn select(&mut self, id: NodeId) -> bool {
        if !self.editable || !self.hierarchy.contains(id) || self.selection == Some(id) {
            return false;
        }
        self.selection = Some(id);
        true
    }

    /// Returns `true` if something was selected.
    pub fn clear_selection(&mut self) -> bool {
        self.selection.take().is_some()
    }

    /// Expand or collapse `id`. Allowed in every mode.
    pub fn toggle(&mut self, id: NodeId) -> Option<Visibility> {
        self.hierarchy.toggle(id)
    }

    pub fn expand_all(&mut self) {
        self.hierarchy.expand_all();
    }

    pub fn collapse_all(&mut self) {
        self.hierarchy.collapse_all();
    }

    /// Append a placeholder child to the selected node and reveal it.
    ///
    /// Returns the new child's id.
    pub fn add_child(&mut self) -> Result<NodeId> {
        self.ensure_editable()?;
        let parent = self.selection.ok_or(MindMapError::NoSelection)?;
        let path = self
            .hierarchy
            .node(parent)
            .map(|n| n.path().to_vec())
            .ok_or(MindMapError::NoSelection)?;
        let child = MapNode::placeholder(self.placeholder_name.clone());
        let added = self.hierarchy.mutate(&mut self.ids, |doc| {
            doc.get_mut(&path).map(|node| node.push_child(child)).is_some()
        });
        if !added {
            return Err(MindMapError::NoSelection);
        }
        self.hierarchy.expand(parent);
        let id = self
            .hierarchy
            .node(parent)
            .and_then(|n| n.visible_children().last().copied())
            .ok_or(MindMapError::NoSelection)?;
        tracing::debug!(parent = parent.get(), child = id.get(), "child added");
        Ok(id)
    }

    /// Delete the selected node and its subtree.
    ///
    /// Returns the removed subtree. The selection is cleared.
    pub fn remove_node(&mut self) -> Result<MapNode> {
        self.ensure_editable()?;
        let id = self.selection.ok_or(MindMapError::NoSelection)?;
        let node = self.hierarchy.node(id).ok_or(MindMapError::NoSelection)?;
        let Some((&index, parent_path)) = node.path().split_last() else {
            return Err(MindMapError::RootProtected);
        };
        let parent_path = parent_path.to_vec();
        let removed = self.hierarchy.mutate(&mut self.ids, |doc| {
            doc.get_mut(&parent_path).and_then(|p| p.remove_child(index))
        });
        let removed = removed.ok_or(MindMapError::NoSelection)?;
        self.selection = None;
        if self
            .rename
            .as_ref()
            .is_some_and(|s| !self.hierarchy.contains(s.node))
        {
            self.rename = None;
        }
        tracing::debug!(node = id.get(), removed = removed.count(), "subtree removed");
        Ok(removed)
    }

    /// Set a node's name directly.
    ///
    /// The root keeps its name when `name` is empty, since a nameless root
    /// cannot be loaded back.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<()> {
        self.ensure_editable()?;
        if name.is_empty() && id == self.hierarchy.root_id() {
            return Err(MindMapError::invalid_document("the root name is empty"));
        }
        if self.hierarchy.rename(id, name) {
            Ok(())
        } else {
            Err(MindMapError::NoSelection)
        }
    }

    /// Open the inline rename field on `id`, prefilled with its name.
    pub fn begin_rename(&mut self, id: NodeId) -> Result<()> {
        self.ensure_editable()?;
        let node = self.hierarchy.node(id).ok_or(MindMapError::NoSelection)?;
        self.rename = Some(RenameSession {
            node: id,
            text: node.name().to_string(),
        });
        Ok(())
    }

    /// Replace the text of the open rename field. No-op when none is open.
    pub fn update_rename(&mut self, text: impl Into<String>) -> bool {
        match self.rename.as_mut() {
            Some(session) => {
                session.text = text.into();
                true
            }
            None => false,
        }
    }

    /// Close the rename field, keeping the typed text.
    ///
    /// Returns the renamed node, or `None` when no rename was open.
    pub fn commit_rename(&mut self) -> Result<Option<NodeId>> {
        let Some(session) = self.rename.take() else {
            return Ok(None);
        };
        self.rename_node(session.node, &session.text)?;
        Ok(Some(session.node))
    }

    /// Close the rename field, discarding the typed text.
    pub fn cancel_rename(&mut self) -> bool {
        self.rename.take().is_some()
    }

    /// Replace the whole document with parsed `text`.
    ///
    /// On error the current document, selection, and rename stay as they
    /// were.
    pub fn import_document(&mut self, text: &str) -> Result<()> {
        self.ensure_editable()?;
        let document = parse_document(text)?;
        self.replace_document(document)
    }

    /// Replace the whole document, keeping the id sequence monotonic.
    pub fn replace_document(&mut self, document: MapNode) -> Result<()> {
        let hierarchy = Hierarchy::build(document, &mut self.ids)?;
        tracing::info!(nodes = hierarchy.node_count(), "document replaced");
        self.hierarchy = hierarchy;
        self.selection = None;
        self.rename = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor() -> Editor {
        let doc = MapNode::new("A")
            .with_child(MapNode::new("B").with_child(MapNode::new("D")))
            .with_child(MapNode::new("C"));
        Editor::new(doc, true).unwrap()
    }

    fn id_of(editor: &Editor, name: &str) -> NodeId {
        editor
            .hierarchy()
            .iter()
            .find(|n| n.name() == name)
            .map(|n| n.id())
            .unwrap()
    }

    #[test]
    fn add_child_needs_selection() {
        let mut ed = editor();
        let before = ed.document().clone();
        assert_eq!(ed.add_child(), Err(MindMapError::NoSelection));
        assert_eq!(ed.document(), &before);
    }

    #[test]
    fn add_child_expands_collapsed_parent() {
        let mut ed = editor();
        let b = id_of(&ed, "B");
        ed.toggle(b);
        ed.select(b);
        let child = ed.add_child().unwrap();
        let node = ed.hierarchy().node(child).unwrap();
        assert_eq!(node.name(), "Nouveau");
        assert_eq!(node.parent(), Some(b));
        assert_eq!(ed.hierarchy().visibility(b), Some(Visibility::Expanded));
        assert_eq!(ed.hierarchy().node(b).unwrap().visible_children().len(), 2);
        assert_eq!(ed.selection(), Some(b));
    }

    #[test]
    fn add_child_to_leaf_uses_placeholder_shape() {
        let mut ed = editor();
        let c = id_of(&ed, "C");
        ed.select(c);
        ed.add_child().unwrap();
        let json = ed.document().to_json();
        assert!(json.contains(r#"{"name":"C","children":[{"name":"Nouveau","children":[]}]}"#));
    }

    #[test]
    fn root_cannot_be_removed() {
        let mut ed = editor();
        let root = ed.hierarchy().root_id();
        ed.select(root);
        assert_eq!(ed.remove_node(), Err(MindMapError::RootProtected));
        assert_eq!(ed.hierarchy().node_count(), 4);
        assert_eq!(ed.selection(), Some(root));
    }

    #[test]
    fn remove_drops_subtree_and_selection() {
        let mut ed = editor();
        let b = id_of(&ed, "B");
        let c = id_of(&ed, "C");
        ed.select(b);
        let removed = ed.remove_node().unwrap();
        assert_eq!(removed.count(), 2);
        assert_eq!(ed.selection(), None);
        assert_eq!(ed.hierarchy().node_count(), 2);
        assert_eq!(id_of(&ed, "C"), c);
        assert_eq!(ed.remove_node(), Err(MindMapError::NoSelection));
    }

    #[test]
    fn view_mode_refuses_edits() {
        let doc = MapNode::new("A").with_child(MapNode::new("B"));
        let mut ed = Editor::new(doc, false).unwrap();
        let b = ed.hierarchy().root().visible_children()[0];
        assert!(!ed.select(b));
        assert_eq!(ed.begin_rename(b), Err(MindMapError::ReadOnly));
        assert_eq!(ed.add_child(), Err(MindMapError::ReadOnly));
        assert_eq!(ed.import_document(r#"{"name":"X"}"#), Err(MindMapError::ReadOnly));
        assert_eq!(ed.toggle(ed.hierarchy().root_id()), Some(Visibility::Collapsed));
    }

    #[test]
    fn rename_commit_and_cancel() {
        let mut ed = editor();
        let d = id_of(&ed, "D");
        ed.begin_rename(d).unwrap();
        assert_eq!(ed.rename_session().unwrap().text, "D");
        ed.update_rename("Delta");
        assert_eq!(ed.commit_rename().unwrap(), Some(d));
        assert_eq!(ed.document().get(&[0, 0]).unwrap().name, "Delta");
        assert_eq!(ed.commit_rename().unwrap(), None);

        ed.begin_rename(d).unwrap();
        ed.update_rename("ignored");
        assert!(ed.cancel_rename());
        assert_eq!(ed.hierarchy().node(d).unwrap().name(), "Delta");
    }

    #[test]
    fn root_keeps_name_when_cleared() {
        let mut ed = editor();
        let root = ed.hierarchy().root_id();
        ed.begin_rename(root).unwrap();
        ed.update_rename("");
        assert!(matches!(
            ed.commit_rename(),
            Err(MindMapError::InvalidDocument { .. })
        ));
        assert!(ed.rename_session().is_none());
        assert_eq!(ed.document().name, "A");

        let d = id_of(&ed, "D");
        ed.rename_node(d, "").unwrap();
        assert_eq!(ed.document().get(&[0, 0]).unwrap().name, "");
    }

    #[test]
    fn failed_import_keeps_document() {
        let mut ed = editor();
        let before = ed.document().clone();
        assert!(matches!(
            ed.import_document("{oops"),
            Err(MindMapError::ParseError { .. })
        ));
        assert!(matches!(
            ed.import_document(r#"{"children":[]}"#),
            Err(MindMapError::InvalidDocument { .. })
        ));
        assert_eq!(ed.document(), &before);
    }

    #[test]
    fn import_replaces_and_clears_selection() {
        let mut ed = editor();
        let old_root = ed.hierarchy().root_id();
        ed.select(old_root);
        ed.import_document(r#"{"name":"X","children":[{"name":"Y"}]}"#)
            .unwrap();
        assert_eq!(ed.selection(), None);
        assert_eq!(ed.hierarchy().root().name(), "X");
        assert_ne!(ed.hierarchy().root_id(), old_root);
    }
}
