//! Error types for the document model

use crate::path::Path;
use crate::schema::NodeType;
use thiserror::Error;

pub type DocumentResult<T> = Result<T, DocumentError>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DocumentError {
    #[error("No node at {0}")]
    PathNotFound(Path),

    #[error("Node at {0} cannot hold children")]
    NotAContainer(Path),

    #[error("Invalid range {start}..{end} under {parent} ({len} children)")]
    InvalidRange {
        parent: Path,
        start: usize,
        end: usize,
        len: usize,
    },

    #[error("Schema violation: {child} is not allowed inside {parent}")]
    SchemaViolation { parent: NodeType, child: NodeType },

    #[error("Node at {0} is not a column")]
    NotAColumn(Path),

    #[error("Node at {0} is not a column group")]
    NotAColumnGroup(Path),

    #[error("Column group at {path} has {count} columns and cannot be dissolved")]
    GroupNotDissolvable { path: Path, count: usize },

    #[error("Invalid column width: {0}")]
    InvalidWidth(f64),

    #[error("The document root cannot be replaced")]
    RootNotReplaceable,

    #[error("JSON error: {0}")]
    Json(String),
}

impl DocumentError {
    pub fn invalid_range(parent: &Path, start: usize, end: usize, len: usize) -> Self {
        Self::InvalidRange {
            parent: parent.clone(),
            start,
            end,
            len,
        }
    }
}

impl From<serde_json::Error> for DocumentError {
    fn from(e: serde_json::Error) -> Self {
        DocumentError::Json(e.to_string())
    }
}
