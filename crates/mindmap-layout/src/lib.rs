#![forbid(unsafe_code)]

//! Tidy tree layout.
//!
//! Positions every visible node of a [`Hierarchy`] with the linear-time
//! Buchheim-Jünger-Leipert refinement of Walker's algorithm:
//!
//! 1. **First walk (post-order):** give each node a preliminary sibling-axis
//!    coordinate, pushing each subtree right until its left contour clears
//!    the right contour of everything already placed to its left. Threads
//!    make contour traversal amortized O(1).
//! 2. **Second walk (pre-order):** accumulate modifiers into final
//!    coordinates, anchored so the root sits at sibling coordinate 0.
//! 3. **Scaling:** sibling units are multiplied by `sibling_spacing`; the
//!    depth axis is `depth * depth_spacing`.
//!
//! The tree grows left to right, so the depth axis maps to screen `x` and
//! the sibling axis to screen `y`.
//!
//! # Invariants
//!
//! 1. Adjacent nodes on the same level are at least one unit apart (two
//!    units when they have different parents).
//! 2. A parent is centered between its first and last visible child.
//! 3. Nodes at equal depth share the same `x`.
//! 4. The same visible shape always yields the same positions.

use mindmap_core::NodeId;
use mindmap_core::geometry::Point;
use mindmap_model::Hierarchy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Spacing constants.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LayoutConfig {
    /// Size of one sibling-axis unit.
    pub sibling_spacing: f32,
    /// Distance between consecutive depth levels.
    pub depth_spacing: f32,
    /// Units between adjacent nodes sharing a parent.
    pub sibling_separation: f32,
    /// Units between adjacent nodes with different parents.
    pub cousin_separation: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            sibling_spacing: 45.0,
            depth_spacing: 250.0,
            sibling_separation: 1.0,
            cousin_separation: 2.0,
        }
    }
}

/// Positions of the visible nodes, in pre-order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayoutResult {
    positions: Vec<(NodeId, Point)>,
    index: FxHashMap<NodeId, usize>,
}

impl LayoutResult {
    /// Position of `id`, if it was laid out.
    pub fn get(&self, id: NodeId) -> Option<Point> {
        self.index.get(&id).map(|&i| self.positions[i].1)
    }

    /// `(id, position)` pairs in pre-order.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, Point)> + '_ {
        self.positions.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Working state of one node during the walks.
#[derive(Debug, Clone)]
struct Slot {
    id: NodeId,
    depth: usize,
    parent: Option<usize>,
    children: Vec<usize>,
    /// Index among its siblings.
    number: usize,
    prelim: f32,
    modifier: f32,
    shift: f32,
    change: f32,
    thread: Option<usize>,
    ancestor: usize,
    /// Default ancestor carried between this node's children.
    default_ancestor: Option<usize>,
}

/// The tidy tree layout engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct TidyLayout {
    config: LayoutConfig,
}

impl TidyLayout {
    pub fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Compute positions for every visible node.
    pub fn compute(&self, hierarchy: &Hierarchy) -> LayoutResult {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("tidy_layout").entered();

        let mut slots = collect(hierarchy);
        let post_order = post_order(&slots);
        for &v in &post_order {
            self.first_walk(v, &mut slots);
        }

        let mut units = vec![0.0f32; slots.len()];
        let root_offset = -slots[0].prelim;
        // Slots are in pre-order, so parents are finalized before children.
        for v in 0..slots.len() {
            let parent_mod = slots[v].parent.map_or(root_offset, |p| slots[p].modifier);
            units[v] = slots[v].prelim + parent_mod;
            slots[v].modifier += parent_mod;
        }

        let positions: Vec<(NodeId, Point)> = slots
            .iter()
            .zip(&units)
            .map(|(slot, &u)| {
                let x = slot.depth as f32 * self.config.depth_spacing;
                let y = u * self.config.sibling_spacing;
                (slot.id, Point::new(x, y))
            })
            .collect();
        let index = positions
            .iter()
            .enumerate()
            .map(|(i, &(id, _))| (id, i))
            .collect();

        #[cfg(feature = "tracing")]
        tracing::trace!(nodes = positions.len(), "layout computed");

        LayoutResult { positions, index }
    }

    /// Compute positions and store them as each node's current position.
    pub fn apply(&self, hierarchy: &mut Hierarchy) -> LayoutResult {
        let result = self.compute(hierarchy);
        for (id, at) in result.iter() {
            hierarchy.set_current_position(id, at);
        }
        result
    }

    fn separation(&self, a: usize, b: usize, slots: &[Slot]) -> f32 {
        if slots[a].parent == slots[b].parent {
            self.config.sibling_separation
        } else {
            self.config.cousin_separation
        }
    }

    fn first_walk(&self, v: usize, slots: &mut [Slot]) {
        let left_sibling = left_sibling(v, slots);
        if slots[v].children.is_empty() {
            if let Some(w) = left_sibling {
                slots[v].prelim = slots[w].prelim + self.separation(v, w, slots);
            }
        } else {
            execute_shifts(v, slots);
            let first = slots[v].children[0];
            let last = slots[v].children[slots[v].children.len() - 1];
            let midpoint = (slots[first].prelim + slots[last].prelim) / 2.0;
            match left_sibling {
                Some(w) => {
                    slots[v].prelim = slots[w].prelim + self.separation(v, w, slots);
                    slots[v].modifier = slots[v].prelim - midpoint;
                }
                None => slots[v].prelim = midpoint,
            }
        }
        if let Some(parent) = slots[v].parent {
            let fallback = slots[parent].children[0];
            let ancestor = slots[parent].default_ancestor.unwrap_or(fallback);
            let ancestor = self.apportion(v, left_sibling, ancestor, slots);
            slots[parent].default_ancestor = Some(ancestor);
        }
    }

    /// Push `v`'s subtree clear of its left siblings' subtrees, threading
    /// contours as it goes. Returns the new default ancestor.
    fn apportion(
        &self,
        v: usize,
        left_sibling: Option<usize>,
        mut ancestor: usize,
        slots: &mut [Slot],
    ) -> usize {
        let Some(w) = left_sibling else {
            return ancestor;
        };
        let Some(parent) = slots[v].parent else {
            return ancestor;
        };

        // i: inner, o: outer; p: right side (v), m: left side (w)
        let mut vip = v;
        let mut vop = v;
        let mut vim = w;
        let mut vom = slots[parent].children[0];
        let mut sip = slots[vip].modifier;
        let mut sop = slots[vop].modifier;
        let mut sim = slots[vim].modifier;
        let mut som = slots[vom].modifier;

        let mut next_im = next_right(vim, slots);
        let mut next_ip = next_left(vip, slots);
        while let (Some(im), Some(ip)) = (next_im, next_ip) {
            vim = im;
            vip = ip;
            if let Some(next) = next_left(vom, slots) {
                vom = next;
            }
            if let Some(next) = next_right(vop, slots) {
                vop = next;
            }
            slots[vop].ancestor = v;

            let shift = slots[vim].prelim + sim - slots[vip].prelim - sip
                + self.separation(vim, vip, slots);
            if shift > 0.0 {
                let from = next_ancestor(vim, v, ancestor, slots);
                move_subtree(from, v, shift, slots);
                sip += shift;
                sop += shift;
            }

            sim += slots[vim].modifier;
            sip += slots[vip].modifier;
            som += slots[vom].modifier;
            sop += slots[vop].modifier;

            next_im = next_right(vim, slots);
            next_ip = next_left(vip, slots);
        }

        if let Some(im) = next_im {
            if next_right(vop, slots).is_none() {
                slots[vop].thread = Some(im);
                slots[vop].modifier += sim - sop;
            }
        }
        if let Some(ip) = next_ip {
            if next_left(vom, slots).is_none() {
                slots[vom].thread = Some(ip);
                slots[vom].modifier += sip - som;
                ancestor = v;
            }
        }
        ancestor
    }
}

/// Flatten the visible part of the hierarchy into pre-order slots.
fn collect(hierarchy: &Hierarchy) -> Vec<Slot> {
    let visible = hierarchy.visible_ids();
    let position: FxHashMap<NodeId, usize> =
        visible.iter().enumerate().map(|(i, &id)| (id, i)).collect();

    let mut slots = visible
        .iter()
        .enumerate()
        .map(|(i, &id)| {
            let node = hierarchy.node(id);
            let parent = node
                .and_then(|n| n.parent())
                .and_then(|p| position.get(&p).copied());
            let children: Vec<usize> = node
                .map(|n| {
                    n.visible_children()
                        .iter()
                        .filter_map(|c| position.get(c).copied())
                        .collect()
                })
                .unwrap_or_default();
            Slot {
                id,
                depth: node.map_or(0, |n| n.depth()),
                parent,
                children,
                number: 0,
                prelim: 0.0,
                modifier: 0.0,
                shift: 0.0,
                change: 0.0,
                thread: None,
                ancestor: i,
                default_ancestor: None,
            }
        })
        .collect::<Vec<_>>();

    for v in 0..slots.len() {
        for (number, child) in slots[v].children.clone().into_iter().enumerate() {
            slots[child].number = number;
        }
    }
    slots
}

/// Children before parents, left subtrees before right ones.
fn post_order(slots: &[Slot]) -> Vec<usize> {
    let mut out = Vec::with_capacity(slots.len());
    let mut stack = vec![0usize];
    while let Some(v) = stack.pop() {
        out.push(v);
        stack.extend(slots[v].children.iter().copied());
    }
    out.reverse();
    out
}

fn left_sibling(v: usize, slots: &[Slot]) -> Option<usize> {
    let parent = slots[v].parent?;
    let number = slots[v].number;
    (number > 0).then(|| slots[parent].children[number - 1])
}

fn next_left(v: usize, slots: &[Slot]) -> Option<usize> {
    slots[v].children.first().copied().or(slots[v].thread)
}

fn next_right(v: usize, slots: &[Slot]) -> Option<usize> {
    slots[v].children.last().copied().or(slots[v].thread)
}

fn next_ancestor(vim: usize, v: usize, fallback: usize, slots: &[Slot]) -> usize {
    let candidate = slots[vim].ancestor;
    if slots[candidate].parent == slots[v].parent {
        candidate
    } else {
        fallback
    }
}

fn move_subtree(wm: usize, wp: usize, shift: f32, slots: &mut [Slot]) {
    let subtrees = (slots[wp].number as f32 - slots[wm].number as f32).max(1.0);
    let change = shift / subtrees;
    slots[wp].change -= change;
    slots[wp].shift += shift;
    slots[wm].change += change;
    slots[wp].prelim += shift;
    slots[wp].modifier += shift;
}

/// Spread accumulated shifts over the children of `v`, right to left.
fn execute_shifts(v: usize, slots: &mut [Slot]) {
    let mut shift = 0.0f32;
    let mut change = 0.0f32;
    for i in (0..slots[v].children.len()).rev() {
        let w = slots[v].children[i];
        slots[w].prelim += shift;
        slots[w].modifier += shift;
        change += slots[w].change;
        shift += slots[w].shift + change;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_core::IdAllocator;
    use mindmap_model::MapNode;

    fn layout(doc: MapNode) -> (Hierarchy, LayoutResult) {
        let h = Hierarchy::build(doc, &mut IdAllocator::new()).unwrap();
        let r = TidyLayout::default().compute(&h);
        (h, r)
    }

    fn at(h: &Hierarchy, r: &LayoutResult, name: &str) -> Point {
        let id = h.iter().find(|n| n.name() == name).unwrap().id();
        r.get(id).unwrap()
    }

    #[test]
    fn single_node_sits_at_origin() {
        let (h, r) = layout(MapNode::new("A"));
        assert_eq!(r.len(), 1);
        assert_eq!(at(&h, &r, "A"), Point::ORIGIN);
    }

    #[test]
    fn two_children_straddle_parent() {
        let (h, r) = layout(MapNode::new("A").with_child(MapNode::new("B")).with_child(MapNode::new("C")));
        assert_eq!(at(&h, &r, "A"), Point::new(0.0, 0.0));
        assert_eq!(at(&h, &r, "B"), Point::new(250.0, -22.5));
        assert_eq!(at(&h, &r, "C"), Point::new(250.0, 22.5));
    }

    #[test]
    fn cousins_get_double_separation() {
        let doc = MapNode::new("R")
            .with_child(MapNode::new("A").with_child(MapNode::new("a1")))
            .with_child(MapNode::new("B").with_child(MapNode::new("b1")));
        let (h, r) = layout(doc);
        assert_eq!(at(&h, &r, "R").y, 0.0);
        assert_eq!(at(&h, &r, "A").y, -45.0);
        assert_eq!(at(&h, &r, "B").y, 45.0);
        assert_eq!(at(&h, &r, "a1"), Point::new(500.0, -45.0));
        assert_eq!(at(&h, &r, "b1"), Point::new(500.0, 45.0));
    }

    #[test]
    fn collapsed_children_are_not_laid_out() {
        let doc = MapNode::new("A").with_child(MapNode::new("B").with_child(MapNode::new("C")));
        let mut h = Hierarchy::build(doc, &mut IdAllocator::new()).unwrap();
        let b = h.root().visible_children()[0];
        h.toggle(b);
        let r = TidyLayout::default().apply(&mut h);
        assert_eq!(r.len(), 2);
        let c = h.node(b).unwrap().hidden_children()[0];
        assert_eq!(r.get(c), None);
        assert_eq!(h.node(b).unwrap().position().current, Some(Point::new(250.0, 0.0)));
    }
}
