#![forbid(unsafe_code)]

//! Stable runtime node identity.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Session-unique identity of a runtime node.
///
/// Ids are handed out by an [`IdAllocator`] in strictly increasing order and
/// are never reused within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    /// Rebuild an id a host read back from a rendered frame.
    ///
    /// Ids that were never issued are simply unknown to every lookup.
    #[must_use]
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id counter, one per editing session.
#[derive(Debug, Clone, Default)]
pub struct IdAllocator {
    last: u64,
}

impl IdAllocator {
    /// Create a counter whose first id is `1`.
    #[must_use]
    pub const fn new() -> Self {
        Self { last: 0 }
    }

    /// Hand out the next id.
    pub fn next_id(&mut self) -> NodeId {
        self.last = self.last.saturating_add(1);
        NodeId(self.last)
    }

    /// Number of ids handed out so far.
    #[must_use]
    pub const fn issued(&self) -> u64 {
        self.last
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_strictly_increasing() {
        let mut ids = IdAllocator::new();
        let a = ids.next_id();
        let b = ids.next_id();
        let c = ids.next_id();
        assert!(a < b && b < c);
        assert_eq!(a.get(), 1);
        assert_eq!(ids.issued(), 3);
    }
}
