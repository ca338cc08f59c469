#![forbid(unsafe_code)]

//! The render/diff engine.
//!
//! [`Renderer::render`] lays the hierarchy out, matches the new visible set
//! against what is on screen by node id (links by their child's id), and
//! starts transitions:
//!
//! - **Entering** elements start at the animation source's *previous*
//!   position and grow out of it.
//! - **Updating** elements move from wherever they are now to their new
//!   position.
//! - **Exiting** elements shrink into the source's *current* position and
//!   are dropped once their transition finishes.
//!
//! After every render each visible node's previous position is overwritten
//! with the one just computed, so the next render starts from there.

use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::time::Duration;

use mindmap_core::NodeId;
use mindmap_core::animation::{Animation, Tween};
use mindmap_core::geometry::Point;
use mindmap_layout::{LayoutConfig, LayoutResult, TidyLayout};
use mindmap_model::{Hierarchy, Visibility};

use crate::diff::KeyedDiff;
use crate::path::LinkEnds;
use crate::scene::{Expander, Frame, LinkSprite, LinkView, NodeSprite, NodeView, Phase};

/// Sizing and timing of the diagram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderConfig {
    pub transition: Duration,
    pub node_width: f32,
    pub node_height: f32,
    pub layout: LayoutConfig,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            transition: Duration::from_millis(750),
            node_width: 220.0,
            node_height: 35.0,
            layout: LayoutConfig::default(),
        }
    }
}

/// What one render call changed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderSummary {
    pub nodes: KeyedDiff,
    pub links: KeyedDiff,
}

/// Retained scene plus the layout engine.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
    layout: TidyLayout,
    nodes: BTreeMap<NodeId, NodeSprite>,
    links: BTreeMap<NodeId, LinkSprite>,
}

impl Renderer {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            config,
            layout: TidyLayout::new(config.layout),
            nodes: BTreeMap::new(),
            links: BTreeMap::new(),
        }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Re-layout and reconcile the scene, animating from `source`.
    ///
    /// `selection` gets the highlighted state. An unknown `source` falls
    /// back to the root.
    pub fn render(
        &mut self,
        hierarchy: &mut Hierarchy,
        source: NodeId,
        selection: Option<NodeId>,
    ) -> RenderSummary {
        #[cfg(feature = "tracing")]
        let _span = tracing::debug_span!("render", source = source.get()).entered();

        let layout = self.layout.apply(hierarchy);
        let source = if hierarchy.contains(source) {
            source
        } else {
            hierarchy.root_id()
        };
        let anchor = hierarchy
            .node(source)
            .map(|n| n.position())
            .unwrap_or_default();
        let origin = anchor.previous.or(anchor.current).unwrap_or(Point::ORIGIN);
        let sink = anchor.current.or(anchor.previous).unwrap_or(Point::ORIGIN);

        let summary = RenderSummary {
            nodes: self.reconcile_nodes(hierarchy, &layout, origin, sink, selection),
            links: self.reconcile_links(hierarchy, &layout, origin, sink),
        };
        hierarchy.commit_positions();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            entered = summary.nodes.entered.len(),
            updated = summary.nodes.updated.len(),
            exited = summary.nodes.exited.len(),
            "render reconciled"
        );
        summary
    }

    fn reconcile_nodes(
        &mut self,
        hierarchy: &Hierarchy,
        layout: &LayoutResult,
        origin: Point,
        sink: Point,
        selection: Option<NodeId>,
    ) -> KeyedDiff {
        let duration = self.config.transition;
        let visible: Vec<NodeId> = layout.iter().map(|(id, _)| id).collect();
        let diff = KeyedDiff::compute(&self.nodes, &visible);

        for (id, target) in layout.iter() {
            let sprite = match self.nodes.entry(id) {
                Entry::Vacant(slot) => slot.insert(NodeSprite::entering(origin, target, duration)),
                Entry::Occupied(slot) => {
                    let sprite = slot.into_mut();
                    if sprite.phase == Phase::Exiting {
                        sprite.phase = Phase::Settled;
                    }
                    sprite.motion.retarget(target, duration);
                    if sprite.opacity.target() < 1.0 {
                        sprite.opacity.retarget(1.0, duration);
                    }
                    sprite
                }
            };
            if let Some(node) = hierarchy.node(id) {
                sprite.label = node.name().to_string();
                sprite.expander = match hierarchy.visibility(id) {
                    Some(Visibility::Collapsed) => Expander::Filled,
                    Some(Visibility::Expanded) => Expander::Open,
                    _ => Expander::None,
                };
            }
            sprite.selected = selection == Some(id);
        }

        for id in &diff.exited {
            if let Some(sprite) = self.nodes.get_mut(id) {
                sprite.phase = Phase::Exiting;
                sprite.selected = false;
                sprite.motion.retarget(sink, duration);
                sprite.opacity.retarget(0.0, duration);
            }
        }
        diff
    }

    fn reconcile_links(
        &mut self,
        hierarchy: &Hierarchy,
        layout: &LayoutResult,
        origin: Point,
        sink: Point,
    ) -> KeyedDiff {
        let duration = self.config.transition;
        let mut wanted: Vec<(NodeId, LinkEnds)> = Vec::with_capacity(layout.len());
        for (id, target) in layout.iter() {
            let parent = hierarchy.node(id).and_then(|n| n.parent());
            if let Some(source) = parent.and_then(|p| layout.get(p)) {
                wanted.push((id, LinkEnds::new(source, target)));
            }
        }
        let keys: Vec<NodeId> = wanted.iter().map(|(id, _)| *id).collect();
        let diff = KeyedDiff::compute(&self.links, &keys);

        for (id, ends) in wanted {
            match self.links.get_mut(&id) {
                Some(link) => {
                    if link.phase == Phase::Exiting {
                        link.phase = Phase::Settled;
                    }
                    link.motion.retarget(ends, duration);
                }
                None => {
                    self.links.insert(
                        id,
                        LinkSprite {
                            motion: Tween::new(LinkEnds::collapsed(origin), ends, duration),
                            phase: Phase::Entering,
                        },
                    );
                }
            }
        }
        for id in &diff.exited {
            if let Some(link) = self.links.get_mut(id) {
                link.phase = Phase::Exiting;
                link.motion.retarget(LinkEnds::collapsed(sink), duration);
            }
        }
        diff
    }

    /// Advance every transition by `dt` and drop finished exits.
    ///
    /// Returns whether anything is still moving.
    pub fn tick(&mut self, dt: Duration) -> bool {
        for sprite in self.nodes.values_mut() {
            sprite.tick(dt);
        }
        for link in self.links.values_mut() {
            link.tick(dt);
        }
        self.nodes
            .retain(|_, s| !(s.phase == Phase::Exiting && s.is_idle()));
        self.links
            .retain(|_, l| !(l.phase == Phase::Exiting && l.motion.is_complete()));
        self.is_animating()
    }

    /// Jump every transition to its end.
    pub fn finish(&mut self) {
        let long = self.config.transition.saturating_mul(2);
        self.tick(long.max(Duration::from_nanos(1)));
    }

    pub fn is_animating(&self) -> bool {
        self.nodes.values().any(|s| !s.is_idle())
            || self.links.values().any(|l| !l.motion.is_complete())
    }

    /// Drop the whole scene without transitions.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.links.clear();
    }

    /// Snapshot of the scene at the current instant.
    pub fn frame(&self) -> Frame {
        Frame {
            nodes: self
                .nodes
                .iter()
                .map(|(&id, s)| NodeView {
                    id,
                    label: s.label.clone(),
                    position: s.motion.current(),
                    opacity: s.opacity.current(),
                    phase: s.phase,
                    selected: s.selected,
                    expander: s.expander,
                })
                .collect(),
            links: self
                .links
                .iter()
                .map(|(&id, l)| LinkView::new(id, l, self.config.node_width))
                .collect(),
        }
    }
}
