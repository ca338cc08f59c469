#![forbid(unsafe_code)]

//! Runtime hierarchy derived from the persisted document.
//!
//! [`Hierarchy`] owns the [`MapNode`] document and an arena of [`TreeNode`]
//! wrappers in pre-order (root first). Wrappers carry what the persisted
//! form does not: a stable [`NodeId`], parent link, depth, the
//! visible/hidden child split, and layout positions.
//!
//! # Invariants
//!
//! 1. Exactly one root, at arena index 0, with no parent.
//! 2. A node's children live in exactly one slot: visible, hidden, or none
//!    at all for a leaf ([`ChildSlots`] makes the split exclusive).
//! 3. Ids are unique within the arena and never reused in a session.
//! 4. Structural edits go to the document first; the arena is regenerated
//!    by [`Hierarchy::rebuild`].
//!
//! # Identity across rebuilds
//!
//! Ids are stored on the persisted nodes (never serialized), so a rebuild
//! keeps the id of every node that survived the edit and carries its
//! collapse state and previous position across. New nodes get fresh ids
//! from the session counter in pre-order.

use std::collections::{HashMap, HashSet};

use mindmap_core::geometry::Point;
use mindmap_core::{IdAllocator, MindMapError, NodeId, Result};

use crate::document::{MapNode, parse_document};

/// Where a node's children currently live.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChildSlots {
    /// No children in the persisted form.
    #[default]
    Leaf,
    /// Expanded: children are laid out and drawn.
    Visible(Vec<NodeId>),
    /// Collapsed: children are kept but not drawn.
    Hidden(Vec<NodeId>),
}

impl ChildSlots {
    /// Move visible children into the hidden slot.
    pub(crate) fn collapsed(self) -> Self {
        match self {
            Self::Visible(ids) => Self::Hidden(ids),
            other => other,
        }
    }

    /// Move hidden children into the visible slot.
    pub(crate) fn expanded(self) -> Self {
        match self {
            Self::Hidden(ids) => Self::Visible(ids),
            other => other,
        }
    }
}

/// Layout position of a node across renders.
///
/// `previous` is the position at the end of the last render (the origin of
/// the next transition); `current` is the latest layout result.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct LayoutPosition {
    pub previous: Option<Point>,
    pub current: Option<Point>,
}

/// Runtime node wrapper.
#[derive(Debug, Clone, PartialEq)]
pub struct TreeNode {
    pub(crate) id: NodeId,
    pub(crate) name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) depth: usize,
    pub(crate) path: Vec<usize>,
    pub(crate) slots: ChildSlots,
    pub(crate) position: LayoutPosition,
}

impl TreeNode {
    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Distance from the root; the root is at depth 0.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Child-index path from the document root to this node.
    pub fn path(&self) -> &[usize] {
        &self.path
    }

    pub fn slots(&self) -> &ChildSlots {
        &self.slots
    }

    /// Children that are laid out; empty when collapsed or a leaf.
    pub fn visible_children(&self) -> &[NodeId] {
        match &self.slots {
            ChildSlots::Visible(ids) => ids,
            _ => &[],
        }
    }

    /// Children kept aside by a collapse; empty when expanded or a leaf.
    pub fn hidden_children(&self) -> &[NodeId] {
        match &self.slots {
            ChildSlots::Hidden(ids) => ids,
            _ => &[],
        }
    }

    pub fn has_children(&self) -> bool {
        !matches!(self.slots, ChildSlots::Leaf)
    }

    pub fn is_collapsed(&self) -> bool {
        matches!(self.slots, ChildSlots::Hidden(_))
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn position(&self) -> LayoutPosition {
        self.position
    }
}

/// The document plus its runtime arena.
#[derive(Debug, Clone)]
pub struct Hierarchy {
    document: MapNode,
    nodes: Vec<TreeNode>,
    index: HashMap<NodeId, usize>,
}

impl Hierarchy {
    /// Wrap a document, assigning ids to every node that lacks one.
    ///
    /// Fails with [`MindMapError::InvalidDocument`] when the root has no
    /// name; nothing is allocated in that case.
    pub fn build(mut document: MapNode, ids: &mut IdAllocator) -> Result<Self> {
        if document.name.is_empty() {
            return Err(MindMapError::invalid_document("the root has no name"));
        }
        let nodes = flatten(&mut document, ids);
        let index = index_of(&nodes);
        mindmap_core::debug!(nodes = nodes.len(), "hierarchy built");
        Ok(Self {
            document,
            nodes,
            index,
        })
    }

    /// Parse JSON text and build the hierarchy in one step.
    pub fn from_json(text: &str, ids: &mut IdAllocator) -> Result<Self> {
        Self::build(parse_document(text)?, ids)
    }

    /// Regenerate the arena from the current document.
    ///
    /// Surviving nodes keep their id, collapse state, and positions.
    pub fn rebuild(&mut self, ids: &mut IdAllocator) {
        let old_nodes = std::mem::take(&mut self.nodes);
        let old_index = std::mem::take(&mut self.index);
        let mut nodes = flatten(&mut self.document, ids);
        for node in &mut nodes {
            if let Some(old) = old_index.get(&node.id).map(|&i| &old_nodes[i]) {
                node.position = old.position;
                if old.is_collapsed() {
                    node.slots = std::mem::take(&mut node.slots).collapsed();
                }
            }
        }
        self.index = index_of(&nodes);
        self.nodes = nodes;
        mindmap_core::debug!(nodes = self.nodes.len(), "hierarchy rebuilt");
    }

    /// Apply a structural edit to the document, then rebuild.
    pub fn mutate<R>(&mut self, ids: &mut IdAllocator, edit: impl FnOnce(&mut MapNode) -> R) -> R {
        let out = edit(&mut self.document);
        self.rebuild(ids);
        out
    }

    /// The persisted document.
    pub fn document(&self) -> &MapNode {
        &self.document
    }

    /// Give up the arena and return the document.
    pub fn into_document(self) -> MapNode {
        self.document
    }

    pub fn root(&self) -> &TreeNode {
        &self.nodes[0]
    }

    pub fn root_id(&self) -> NodeId {
        self.nodes[0].id
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.index.get(&id).map(|&i| &self.nodes[i])
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        let i = *self.index.get(&id)?;
        Some(&mut self.nodes[i])
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.index.contains_key(&id)
    }

    /// Total node count, hidden nodes included.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// All nodes in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = &TreeNode> {
        self.nodes.iter()
    }

    /// Ids of the nodes reachable from the root through visible slots, in
    /// pre-order.
    pub fn visible_ids(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![self.root_id()];
        while let Some(id) = stack.pop() {
            out.push(id);
            if let Some(node) = self.node(id) {
                stack.extend(node.visible_children().iter().rev().copied());
            }
        }
        out
    }

    /// Whether `id` is drawn: every ancestor is expanded.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let mut current = self.node(id);
        while let Some(node) = current {
            match node.parent {
                None => return true,
                Some(parent) => {
                    let parent = self.node(parent);
                    if parent.is_some_and(TreeNode::is_collapsed) {
                        return false;
                    }
                    current = parent;
                }
            }
        }
        false
    }

    /// Change a node's label in place. Does not rebuild.
    pub fn rename(&mut self, id: NodeId, name: &str) -> bool {
        let Some(i) = self.index.get(&id).copied() else {
            return false;
        };
        let Some(target) = self.document.get_mut(&self.nodes[i].path) else {
            return false;
        };
        target.name = name.to_string();
        self.nodes[i].name = name.to_string();
        true
    }

    /// Record a fresh layout result for a node.
    pub fn set_current_position(&mut self, id: NodeId, at: Point) {
        if let Some(node) = self.node_mut(id) {
            node.position.current = Some(at);
        }
    }

    /// Seed the origin of the next transition for a node.
    pub fn set_previous_position(&mut self, id: NodeId, at: Point) {
        if let Some(node) = self.node_mut(id) {
            node.position.previous = Some(at);
        }
    }

    /// Overwrite every visible node's previous position with its current one.
    pub fn commit_positions(&mut self) {
        for id in self.visible_ids() {
            if let Some(node) = self.node_mut(id) {
                if node.position.current.is_some() {
                    node.position.previous = node.position.current;
                }
            }
        }
    }
}

fn index_of(nodes: &[TreeNode]) -> HashMap<NodeId, usize> {
    nodes.iter().enumerate().map(|(i, n)| (n.id, i)).collect()
}

fn flatten(document: &mut MapNode, ids: &mut IdAllocator) -> Vec<TreeNode> {
    let mut out = Vec::with_capacity(document.count());
    let mut seen = HashSet::new();
    let mut path = Vec::new();
    visit(document, None, 0, &mut path, ids, &mut seen, &mut out);
    out
}

fn visit(
    node: &mut MapNode,
    parent: Option<NodeId>,
    depth: usize,
    path: &mut Vec<usize>,
    ids: &mut IdAllocator,
    seen: &mut HashSet<NodeId>,
    out: &mut Vec<TreeNode>,
) -> NodeId {
    let id = match node.id() {
        Some(id) if seen.insert(id) => id,
        _ => {
            let id = ids.next_id();
            seen.insert(id);
            node.set_id(id);
            id
        }
    };
    let slot = out.len();
    out.push(TreeNode {
        id,
        name: node.name.clone(),
        parent,
        depth,
        path: path.clone(),
        slots: ChildSlots::Leaf,
        position: LayoutPosition::default(),
    });
    let mut child_ids = Vec::new();
    if let Some(children) = node.children.as_mut() {
        for (i, child) in children.iter_mut().enumerate() {
            path.push(i);
            child_ids.push(visit(child, Some(id), depth + 1, path, ids, seen, out));
            path.pop();
        }
    }
    if !child_ids.is_empty() {
        out[slot].slots = ChildSlots::Visible(child_ids);
    }
    id
}
