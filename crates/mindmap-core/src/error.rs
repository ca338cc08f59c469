#![forbid(unsafe_code)]

//! Error taxonomy.
//!
//! Every failure is detected and reported at the point it happens; none
//! leaves the in-memory model partially changed.

use thiserror::Error;

/// Result alias used across the workspace.
pub type Result<T, E = MindMapError> = std::result::Result<T, E>;

/// Failures surfaced to the user as a blocking notification.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MindMapError {
    /// A document lacks a usable root `name` or has a malformed shape.
    #[error("invalid document: {reason}")]
    InvalidDocument { reason: String },

    /// Text is not valid JSON.
    #[error("parse error: {message}")]
    ParseError { message: String },

    /// The operation needs a selected node.
    #[error("no node selected")]
    NoSelection,

    /// The root node cannot be deleted.
    #[error("the root node cannot be deleted")]
    RootProtected,

    /// The share call failed or returned an unexpected shape.
    #[error("network failure: {message}")]
    NetworkFailure { message: String },

    /// A mutating operation was attempted in view mode.
    #[error("the map is read-only")]
    ReadOnly,

    /// The local persistence backend failed.
    #[error("storage failure: {message}")]
    Storage { message: String },
}

impl MindMapError {
    pub fn invalid_document(reason: impl Into<String>) -> Self {
        Self::InvalidDocument {
            reason: reason.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkFailure {
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    /// Text of the alert shown to the user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::InvalidDocument { .. } => {
                "Invalid file: the root node must have a \"name\".".to_string()
            }
            Self::ParseError { message } => format!("Could not read the file: {message}"),
            Self::NoSelection => "Select a node first.".to_string(),
            Self::RootProtected => "The root node cannot be deleted.".to_string(),
            Self::NetworkFailure { .. } => "Sharing failed. Please try again.".to_string(),
            Self::ReadOnly => "This map is read-only.".to_string(),
            Self::Storage { message } => format!("Could not save the map: {message}"),
        }
    }
}

impl From<serde_json::Error> for MindMapError {
    fn from(err: serde_json::Error) -> Self {
        Self::ParseError {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_carries_parser_detail() {
        let err: MindMapError = serde_json::from_str::<serde_json::Value>("{oops")
            .unwrap_err()
            .into();
        let MindMapError::ParseError { message } = &err else {
            panic!("expected ParseError, got {err:?}");
        };
        assert!(message.contains("line 1"));
        assert!(err.user_message().contains(message.as_str()));
    }

    #[test]
    fn display_includes_reason() {
        let err = MindMapError::invalid_document("root has no name");
        assert_eq!(err.to_string(), "invalid document: root has no name");
    }
}
