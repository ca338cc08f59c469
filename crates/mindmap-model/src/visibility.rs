#![forbid(unsafe_code)]

//! Expand/collapse state.
//!
//! Visibility lives only on the runtime wrappers; the persisted document
//! never changes when a node is toggled.

use mindmap_core::NodeId;

use crate::hierarchy::{ChildSlots, Hierarchy};

/// Display state of a node's children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Expanded,
    Collapsed,
    Leaf,
}

impl Hierarchy {
    /// Current visibility of `id`, or `None` for an unknown id.
    pub fn visibility(&self, id: NodeId) -> Option<Visibility> {
        self.node(id).map(|node| match node.slots() {
            ChildSlots::Leaf => Visibility::Leaf,
            ChildSlots::Visible(_) => Visibility::Expanded,
            ChildSlots::Hidden(_) => Visibility::Collapsed,
        })
    }

    /// Flip between expanded and collapsed. Leaves are left alone.
    ///
    /// Returns the new state.
    pub fn toggle(&mut self, id: NodeId) -> Option<Visibility> {
        let node = self.node_mut(id)?;
        node.slots = match std::mem::take(&mut node.slots) {
            ChildSlots::Visible(ids) => ChildSlots::Hidden(ids),
            ChildSlots::Hidden(ids) => ChildSlots::Visible(ids),
            ChildSlots::Leaf => ChildSlots::Leaf,
        };
        self.visibility(id)
    }

    /// Expand one level. Returns `true` if the node was collapsed.
    pub fn expand(&mut self, id: NodeId) -> bool {
        let Some(node) = self.node_mut(id) else {
            return false;
        };
        if !node.is_collapsed() {
            return false;
        }
        node.slots = std::mem::take(&mut node.slots).expanded();
        true
    }

    /// Collapse `id` and every expanded descendant, deepest first.
    ///
    /// Descendants that were already collapsed are left as they are, so
    /// re-expanding `id` restores exactly one level.
    pub fn collapse_subtree(&mut self, id: NodeId) {
        let children = match self.node(id) {
            Some(node) => node.visible_children().to_vec(),
            None => return,
        };
        if children.is_empty() {
            return;
        }
        for child in children {
            self.collapse_subtree(child);
        }
        if let Some(node) = self.node_mut(id) {
            node.slots = std::mem::take(&mut node.slots).collapsed();
        }
    }

    /// Expand `id` and every descendant.
    pub fn expand_subtree(&mut self, id: NodeId) {
        self.expand(id);
        let children = match self.node(id) {
            Some(node) => node.visible_children().to_vec(),
            None => return,
        };
        for child in children {
            self.expand_subtree(child);
        }
    }

    /// Collapse every top-level subtree. The root stays expanded.
    pub fn collapse_all(&mut self) {
        let root = self.root_id();
        self.expand(root);
        for child in self.root().visible_children().to_vec() {
            self.collapse_subtree(child);
        }
    }

    /// Expand the whole tree.
    pub fn expand_all(&mut self) {
        let root = self.root_id();
        self.expand_subtree(root);
    }

    /// Collapse each top-level subtree when the root has more than
    /// `threshold` children. Returns whether anything was collapsed.
    pub fn apply_default_policy(&mut self, threshold: usize) -> bool {
        let top_level = self.root().visible_children().len();
        if top_level <= threshold {
            return false;
        }
        for child in self.root().visible_children().to_vec() {
            self.collapse_subtree(child);
        }
        mindmap_core::debug!(top_level, threshold, "auto-collapsed top-level subtrees");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::MapNode;
    use mindmap_core::IdAllocator;

    fn wide(n: usize) -> Hierarchy {
        let mut root = MapNode::new("root");
        for i in 0..n {
            root.push_child(MapNode::new(format!("t{i}")).with_child(MapNode::new(format!("t{i}.0"))));
        }
        Hierarchy::build(root, &mut IdAllocator::new()).unwrap()
    }

    #[test]
    fn toggle_leaf_is_noop() {
        let mut h = Hierarchy::build(MapNode::new("A"), &mut IdAllocator::new()).unwrap();
        let root = h.root_id();
        assert_eq!(h.toggle(root), Some(Visibility::Leaf));
        assert_eq!(h.visibility(root), Some(Visibility::Leaf));
    }

    #[test]
    fn default_policy_threshold_is_exclusive() {
        let mut h = wide(5);
        assert!(!h.apply_default_policy(5));
        let mut h6 = wide(6);
        assert!(h6.apply_default_policy(5));
        for &child in h6.root().visible_children() {
            assert_eq!(h6.visibility(child), Some(Visibility::Collapsed));
        }
        assert_eq!(h6.visibility(h6.root_id()), Some(Visibility::Expanded));
        assert_eq!(h.visible_ids().len(), 11);
        assert_eq!(h6.visible_ids().len(), 7);
    }

    #[test]
    fn collapse_all_keeps_root_expanded() {
        let mut h = wide(2);
        let root = h.root_id();
        h.toggle(root);
        h.collapse_all();
        assert_eq!(h.visibility(root), Some(Visibility::Expanded));
        for &child in h.root().visible_children() {
            assert_eq!(h.visibility(child), Some(Visibility::Collapsed));
        }
    }

    #[test]
    fn expand_all_reaches_every_node() {
        let mut h = wide(3);
        h.collapse_all();
        let root = h.root_id();
        h.toggle(root);
        h.expand_all();
        assert_eq!(h.visible_ids().len(), h.node_count());
    }
}
