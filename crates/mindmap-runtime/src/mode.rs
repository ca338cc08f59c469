#![forbid(unsafe_code)]

//! Run mode supplied by the host page.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// `view` shows a server snapshot read-only; `edit` is backed by local
/// storage and allows every edit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppMode {
    View,
    #[default]
    Edit,
}

impl AppMode {
    pub fn is_editable(self) -> bool {
        self == Self::Edit
    }
}

impl FromStr for AppMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "view" => Ok(Self::View),
            "edit" => Ok(Self::Edit),
            other => Err(format!("unknown mode `{other}` (expected `view` or `edit`)")),
        }
    }
}

impl fmt::Display for AppMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::View => "view",
            Self::Edit => "edit",
        })
    }
}
