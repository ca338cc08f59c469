use mindmap_core::MindMapError;
use mindmap_core::geometry::{Point, Sides, Size};
use mindmap_model::{MapNode, Visibility};
use mindmap_runtime::{Editor, Viewport};
use proptest::prelude::*;

#[derive(Debug, Clone)]
enum Op {
    Select(usize),
    Add,
    Remove,
    Toggle(usize),
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0usize..64).prop_map(Op::Select),
        Just(Op::Add),
        Just(Op::Remove),
        (0usize..64).prop_map(Op::Toggle),
    ]
}

proptest! {
    #[test]
    fn edits_keep_document_and_hierarchy_in_step(ops in prop::collection::vec(op(), 1..60)) {
        let mut editor = Editor::new(MapNode::placeholder("Root"), true).unwrap();
        for op in ops {
            let ids: Vec<_> = editor.hierarchy().iter().map(|n| n.id()).collect();
            let before = editor.document().count();
            match op {
                Op::Select(i) => {
                    editor.select(ids[i % ids.len()]);
                }
                Op::Toggle(i) => {
                    editor.toggle(ids[i % ids.len()]);
                }
                Op::Add => match editor.add_child() {
                    Ok(id) => {
                        prop_assert_eq!(editor.document().count(), before + 1);
                        let parent = editor.hierarchy().node(id).and_then(|n| n.parent()).unwrap();
                        prop_assert_eq!(editor.hierarchy().visibility(parent), Some(Visibility::Expanded));
                    }
                    Err(err) => {
                        prop_assert_eq!(err, MindMapError::NoSelection);
                    }
                },
                Op::Remove => match editor.remove_node() {
                    Ok(removed) => {
                        prop_assert_eq!(editor.document().count(), before - removed.count());
                        prop_assert_eq!(editor.selection(), None);
                    }
                    Err(err) => {
                        prop_assert!(matches!(err, MindMapError::NoSelection | MindMapError::RootProtected));
                        prop_assert_eq!(editor.document().count(), before);
                    }
                },
            }
            prop_assert_eq!(editor.hierarchy().node_count(), editor.document().count());
            prop_assert_eq!(editor.hierarchy().root().name(), "Root");
        }
    }

    #[test]
    fn zoom_stays_in_extent(deltas in prop::collection::vec(-3000.0f32..3000.0, 1..40)) {
        let mut viewport = Viewport::new(Size::new(800.0, 600.0), Sides::all(10.0))
            .zoom_extent(0.1, 8.0);
        for delta in deltas {
            viewport.zoom(delta, Point::new(200.0, 150.0));
            let k = viewport.transform().k;
            prop_assert!((0.1..=8.0).contains(&k), "k = {}", k);
        }
    }
}
