#![forbid(unsafe_code)]

//! Keyed reconciliation of the rendered set against a new visible set.

use std::collections::{BTreeMap, BTreeSet};

use mindmap_core::NodeId;

/// Result of matching old keys against new keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyedDiff {
    pub entered: Vec<NodeId>,
    pub updated: Vec<NodeId>,
    pub exited: Vec<NodeId>,
}

impl KeyedDiff {
    /// Match `old` against `new` by key. `entered` and `updated` follow the
    /// order of `new`; `exited` is in key order.
    pub fn compute<V>(old: &BTreeMap<NodeId, V>, new: &[NodeId]) -> Self {
        let fresh: BTreeSet<NodeId> = new.iter().copied().collect();
        let mut diff = Self::default();
        for &id in new {
            if old.contains_key(&id) {
                diff.updated.push(id);
            } else {
                diff.entered.push(id);
            }
        }
        diff.exited = old.keys().copied().filter(|id| !fresh.contains(id)).collect();
        diff
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mindmap_core::IdAllocator;

    #[test]
    fn classifies_keys() {
        let mut ids = IdAllocator::new();
        let (a, b, c) = (ids.next_id(), ids.next_id(), ids.next_id());
        let old: BTreeMap<NodeId, ()> = [(a, ()), (b, ())].into_iter().collect();
        let diff = KeyedDiff::compute(&old, &[c, a]);
        assert_eq!(diff.entered, vec![c]);
        assert_eq!(diff.updated, vec![a]);
        assert_eq!(diff.exited, vec![b]);
    }
}
