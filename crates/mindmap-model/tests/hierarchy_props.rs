//! Property and scenario tests for the hierarchy model.

use mindmap_core::{IdAllocator, MindMapError};
use mindmap_model::{Hierarchy, MapNode, Visibility, parse_document};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use serde_json::{Value, json};

fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = "[a-zA-Z ]{1,8}".prop_map(|name| json!({ "name": name }));
    leaf.prop_recursive(4, 48, 5, |inner| {
        ("[a-zA-Z ]{1,8}", prop::collection::vec(inner, 0..5))
            .prop_map(|(name, children)| json!({ "name": name, "children": children }))
    })
}

fn object_count(value: &Value) -> usize {
    1 + value
        .get("children")
        .and_then(Value::as_array)
        .map_or(0, |c| c.iter().map(object_count).sum())
}

proptest! {
    #[test]
    fn build_node_count_matches_document(value in arb_value()) {
        let text = value.to_string();
        let h = Hierarchy::from_json(&text, &mut IdAllocator::new()).unwrap();
        prop_assert_eq!(h.node_count(), object_count(&value));
    }

    #[test]
    fn nameless_root_is_rejected(value in arb_value()) {
        let mut value = value;
        value.as_object_mut().unwrap().remove("name");
        let mut ids = IdAllocator::new();
        let err = Hierarchy::from_json(&value.to_string(), &mut ids).unwrap_err();
        prop_assert!(matches!(err, MindMapError::InvalidDocument { .. }), "{err:?}");
        prop_assert_eq!(ids.issued(), 0);
    }

    #[test]
    fn toggle_is_an_involution(value in arb_value()) {
        let mut h = Hierarchy::from_json(&value.to_string(), &mut IdAllocator::new()).unwrap();
        let ids: Vec<_> = h.iter().map(|n| n.id()).collect();
        for id in ids {
            let before = h.node(id).unwrap().slots().clone();
            h.toggle(id);
            h.toggle(id);
            prop_assert_eq!(h.node(id).unwrap().slots(), &before);
        }
    }

    #[test]
    fn export_import_round_trip(value in arb_value()) {
        let doc = parse_document(&value.to_string()).unwrap();
        let exported = doc.to_json_pretty();
        let again = parse_document(&exported).unwrap();
        prop_assert_eq!(&again, &doc);
        prop_assert_eq!(again.to_json_pretty(), exported);
    }

    #[test]
    fn ids_are_unique(value in arb_value()) {
        let h = Hierarchy::from_json(&value.to_string(), &mut IdAllocator::new()).unwrap();
        let mut ids: Vec<_> = h.iter().map(|n| n.id()).collect();
        ids.sort();
        ids.dedup();
        prop_assert_eq!(ids.len(), h.node_count());
    }
}

#[test]
fn collapse_and_restore_keeps_child_order() {
    let mut h = Hierarchy::from_json(
        r#"{"name":"A","children":[{"name":"B"},{"name":"C"}]}"#,
        &mut IdAllocator::new(),
    )
    .unwrap();
    let a = h.root_id();
    let children = h.root().visible_children().to_vec();

    assert_eq!(h.toggle(a), Some(Visibility::Collapsed));
    assert!(h.root().visible_children().is_empty());
    assert_eq!(h.root().hidden_children(), children.as_slice());

    assert_eq!(h.toggle(a), Some(Visibility::Expanded));
    let names: Vec<_> = h
        .root()
        .visible_children()
        .iter()
        .map(|id| h.node(*id).unwrap().name().to_string())
        .collect();
    assert_eq!(names, vec!["B", "C"]);
    assert!(h.root().hidden_children().is_empty());
}

#[test]
fn collapse_subtree_preserves_deeper_collapses() {
    let mut h = Hierarchy::build(
        MapNode::new("R").with_child(
            MapNode::new("A").with_child(MapNode::new("B").with_child(MapNode::new("C"))),
        ),
        &mut IdAllocator::new(),
    )
    .unwrap();
    let a = h.root().visible_children()[0];
    let b = h.node(a).unwrap().visible_children()[0];

    h.collapse_subtree(a);
    assert_eq!(h.visibility(a), Some(Visibility::Collapsed));
    assert_eq!(h.visibility(b), Some(Visibility::Collapsed));

    h.toggle(a);
    assert_eq!(h.visibility(a), Some(Visibility::Expanded));
    assert_eq!(h.visibility(b), Some(Visibility::Collapsed));

    h.collapse_subtree(a);
    h.expand_subtree(a);
    assert_eq!(h.visibility(b), Some(Visibility::Expanded));
}
