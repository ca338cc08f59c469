//! Property tests: after any toggle sequence the settled scene matches the layout.

use mindmap_core::IdAllocator;
use mindmap_layout::TidyLayout;
use mindmap_model::{Hierarchy, MapNode};
use mindmap_render::{Phase, Renderer};
use proptest::prelude::*;

fn arb_doc() -> impl Strategy<Value = MapNode> {
    let leaf = Just(MapNode::new("n"));
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop::collection::vec(inner, 0..5).prop_map(|children| {
            children
                .into_iter()
                .fold(MapNode::new("n"), |parent, child| parent.with_child(child))
        })
    })
}

proptest! {
    #[test]
    fn settled_sprites_sit_on_their_layout_positions(
        doc in arb_doc(),
        toggles in prop::collection::vec(any::<prop::sample::Index>(), 0..8),
    ) {
        let mut h = Hierarchy::build(doc, &mut IdAllocator::new()).unwrap();
        let all: Vec<_> = h.iter().map(|n| n.id()).collect();
        let root = h.root_id();
        let mut r = Renderer::default();
        r.render(&mut h, root, None);

        for pick in toggles {
            let id = all[pick.index(all.len())];
            h.toggle(id);
            r.render(&mut h, id, None);
            r.finish();

            let layout = TidyLayout::default().compute(&h);
            let frame = r.frame();
            prop_assert_eq!(frame.nodes.len(), layout.len());
            prop_assert_eq!(frame.links.len(), layout.len() - 1);
            for node in &frame.nodes {
                prop_assert_eq!(node.phase, Phase::Settled);
                prop_assert!((node.opacity - 1.0).abs() < 1e-6);
                let at = layout.get(node.id).unwrap();
                prop_assert!(
                    (node.position.x - at.x).abs() < 1e-3 && (node.position.y - at.y).abs() < 1e-3,
                    "{:?} settled at {:?}, laid out at {:?}", node.id, node.position, at
                );
            }
        }
    }
}
