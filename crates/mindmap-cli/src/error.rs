use mindmap_core::MindMapError;
use mindmap_runtime::{ConfigError, StorageError};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    MindMap(#[from] MindMapError),

    #[error("no usable document stored under `{key}`")]
    NothingStored { key: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },
}

impl CliError {
    /// Process exit status: `2` for unusable input documents, `1` otherwise.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::MindMap(MindMapError::InvalidDocument { .. } | MindMapError::ParseError { .. }) => 2,
            Self::InvalidArgument { .. } => 64,
            _ => 1,
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_errors_exit_with_two() {
        let err = CliError::from(MindMapError::invalid_document("no name"));
        assert_eq!(err.exit_code(), 2);
        assert_eq!(err.to_string(), "invalid document: no name");
    }

    #[test]
    fn other_errors_exit_with_one() {
        let err = CliError::from(MindMapError::network("timeout"));
        assert_eq!(err.exit_code(), 1);
        assert_eq!(CliError::invalid("bad").exit_code(), 64);
        let err = CliError::NothingStored {
            key: "mindmap_data".into(),
        };
        assert_eq!(err.exit_code(), 1);
        assert_eq!(err.to_string(), "no usable document stored under `mindmap_data`");
    }
}
