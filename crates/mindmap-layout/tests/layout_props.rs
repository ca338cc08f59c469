//! Property tests for the tidy tree layout.

use std::collections::BTreeMap;

use mindmap_core::IdAllocator;
use mindmap_layout::{LayoutConfig, TidyLayout};
use mindmap_model::{Hierarchy, MapNode};
use proptest::prelude::*;

fn arb_doc() -> impl Strategy<Value = MapNode> {
    let leaf = Just(MapNode::new("n"));
    leaf.prop_recursive(5, 64, 6, |inner| {
        prop::collection::vec(inner, 0..6).prop_map(|children| {
            children
                .into_iter()
                .fold(MapNode::new("n"), |parent, child| parent.with_child(child))
        })
    })
}

fn build(doc: MapNode) -> Hierarchy {
    Hierarchy::build(doc, &mut IdAllocator::new()).unwrap()
}

proptest! {
    #[test]
    fn same_shape_same_positions(doc in arb_doc()) {
        let a = build(doc.clone());
        let b = build(doc);
        let layout = TidyLayout::default();
        let pa: Vec<_> = layout.compute(&a).iter().map(|(_, p)| p).collect();
        let pb: Vec<_> = layout.compute(&b).iter().map(|(_, p)| p).collect();
        prop_assert_eq!(pa, pb);
    }

    #[test]
    fn same_level_nodes_never_overlap(doc in arb_doc()) {
        let h = build(doc);
        let config = LayoutConfig::default();
        let result = TidyLayout::new(config).compute(&h);

        // Pre-order visits each level left to right.
        let mut levels: BTreeMap<usize, Vec<f32>> = BTreeMap::new();
        for (id, p) in result.iter() {
            levels.entry(h.node(id).unwrap().depth()).or_default().push(p.y);
        }
        for ys in levels.values() {
            for pair in ys.windows(2) {
                prop_assert!(
                    pair[1] - pair[0] >= config.sibling_spacing - 1e-2,
                    "gap {} too small in {:?}", pair[1] - pair[0], ys
                );
            }
        }
    }

    #[test]
    fn depth_axis_is_depth_times_spacing(doc in arb_doc()) {
        let h = build(doc);
        let result = TidyLayout::default().compute(&h);
        for (id, p) in result.iter() {
            let depth = h.node(id).unwrap().depth() as f32;
            prop_assert_eq!(p.x, depth * 250.0);
        }
    }

    #[test]
    fn parents_center_over_children(doc in arb_doc()) {
        let h = build(doc);
        let result = TidyLayout::default().compute(&h);
        prop_assert_eq!(result.get(h.root_id()).unwrap().y, 0.0);
        for node in h.iter() {
            let children = node.visible_children();
            if let (Some(first), Some(last)) = (children.first(), children.last()) {
                let mid = (result.get(*first).unwrap().y + result.get(*last).unwrap().y) / 2.0;
                let y = result.get(node.id()).unwrap().y;
                prop_assert!((y - mid).abs() < 1e-2, "{y} vs {mid}");
            }
        }
    }

    #[test]
    fn collapsing_hides_subtree_from_layout(doc in arb_doc()) {
        let mut h = build(doc);
        let full = TidyLayout::default().compute(&h).len();
        prop_assert_eq!(full, h.node_count());
        h.collapse_all();
        let collapsed = TidyLayout::default().compute(&h).len();
        prop_assert_eq!(collapsed, 1 + h.root().visible_children().len());
    }
}

#[test]
fn resize_does_not_change_relative_positions() {
    let doc = MapNode::new("A")
        .with_child(MapNode::new("B").with_child(MapNode::new("D")))
        .with_child(MapNode::new("C"));
    let mut h = build(doc);
    let layout = TidyLayout::default();
    let first: Vec<_> = layout.apply(&mut h).iter().collect();
    let second: Vec<_> = layout.apply(&mut h).iter().collect();
    assert_eq!(first, second);
}
