#![forbid(unsafe_code)]

//! Rendered elements and their per-frame snapshots.

use std::time::Duration;

use mindmap_core::NodeId;
use mindmap_core::animation::{Animation, Tween};
use mindmap_core::geometry::Point;
use serde::Serialize;

use crate::path::{LinkEnds, diagonal};

/// Lifecycle of a rendered element across renders.
///
/// `absent → Entering → Settled → Exiting → absent`. A settled element
/// that moves stays `Settled`; an exiting element whose key reappears goes
/// back to `Settled`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Entering,
    Settled,
    Exiting,
}

/// Expand/collapse indicator drawn at a node's right edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Expander {
    /// Leaf: no indicator at all.
    None,
    /// Expanded: hollow indicator.
    Open,
    /// Has hidden children: filled indicator.
    Filled,
}

#[derive(Debug, Clone)]
pub(crate) struct NodeSprite {
    pub(crate) label: String,
    pub(crate) motion: Tween<Point>,
    pub(crate) opacity: Tween<f32>,
    pub(crate) phase: Phase,
    pub(crate) selected: bool,
    pub(crate) expander: Expander,
}

impl NodeSprite {
    pub(crate) fn entering(from: Point, to: Point, duration: Duration) -> Self {
        Self {
            label: String::new(),
            motion: Tween::new(from, to, duration),
            opacity: Tween::new(0.0, 1.0, duration),
            phase: Phase::Entering,
            selected: false,
            expander: Expander::None,
        }
    }

    pub(crate) fn tick(&mut self, dt: Duration) {
        self.motion.tick(dt);
        self.opacity.tick(dt);
        if self.phase == Phase::Entering && self.is_idle() {
            self.phase = Phase::Settled;
        }
    }

    pub(crate) fn is_idle(&self) -> bool {
        self.motion.is_complete() && self.opacity.is_complete()
    }
}

#[derive(Debug, Clone)]
pub(crate) struct LinkSprite {
    pub(crate) motion: Tween<LinkEnds>,
    pub(crate) phase: Phase,
}

impl LinkSprite {
    pub(crate) fn tick(&mut self, dt: Duration) {
        self.motion.tick(dt);
        if self.phase == Phase::Entering && self.motion.is_complete() {
            self.phase = Phase::Settled;
        }
    }
}

/// Snapshot of one node.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeView {
    pub id: NodeId,
    pub label: String,
    pub position: Point,
    pub opacity: f32,
    pub phase: Phase,
    pub selected: bool,
    pub expander: Expander,
}

/// Snapshot of one parent→child link, keyed by the child.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkView {
    pub target: NodeId,
    pub ends: LinkEnds,
    pub path: String,
    pub phase: Phase,
}

impl LinkView {
    pub(crate) fn new(target: NodeId, sprite: &LinkSprite, node_width: f32) -> Self {
        let ends = sprite.motion.current();
        Self {
            target,
            ends,
            path: diagonal(ends.source, ends.target, node_width),
            phase: sprite.phase,
        }
    }
}

/// Everything drawn at one instant. Links are drawn beneath nodes.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Frame {
    pub nodes: Vec<NodeView>,
    pub links: Vec<LinkView>,
}

impl Frame {
    pub fn node(&self, id: NodeId) -> Option<&NodeView> {
        self.nodes.iter().find(|n| n.id == id)
    }

    pub fn link(&self, target: NodeId) -> Option<&LinkView> {
        self.links.iter().find(|l| l.target == target)
    }

    /// Nodes that are not on their way out.
    pub fn live_nodes(&self) -> impl Iterator<Item = &NodeView> {
        self.nodes.iter().filter(|n| n.phase != Phase::Exiting)
    }
}
