#![forbid(unsafe_code)]

//! Document download.

use chrono::{DateTime, Utc};
use mindmap_model::MapNode;
use serde::Serialize;

/// A file the host should offer for download.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Export {
    pub filename: String,
    pub contents: String,
}

impl Export {
    /// Pretty-printed document named after the UTC date of `now`.
    pub fn new(document: &MapNode, now: DateTime<Utc>) -> Self {
        Self {
            filename: export_filename(now),
            contents: document.to_json_pretty(),
        }
    }
}

/// `mindmap_YYYY-MM-DD.json`
pub fn export_filename(now: DateTime<Utc>) -> String {
    format!("mindmap_{}.json", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn filename_uses_utc_date() {
        let now = Utc.with_ymd_and_hms(2024, 3, 7, 23, 59, 0).unwrap();
        assert_eq!(export_filename(now), "mindmap_2024-03-07.json");
    }

    #[test]
    fn contents_are_pretty() {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let export = Export::new(&MapNode::new("A").with_child(MapNode::new("B")), now);
        assert!(export.contents.starts_with("{\n  \"name\": \"A\""));
    }
}
