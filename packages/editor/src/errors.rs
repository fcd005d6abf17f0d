//! Error types for the editor

use quire_document::DocumentError;
use thiserror::Error;

pub type EditorResult<T> = Result<T, EditorError>;

#[derive(Error, Debug)]
pub enum EditorError {
    #[error("Document error: {0}")]
    Document(#[from] DocumentError),

    #[error("Config error: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Transaction built against version {built}, editor is at {current}")]
    StaleTransaction { built: u64, current: u64 },

    #[error("Position resolution failed: {0}")]
    Resolution(String),

    #[error("Invalid resize geometry: {0}")]
    InvalidGeometry(String),

    #[error("Nothing to drop")]
    EmptyDrop,
}

impl EditorError {
    pub fn resolution(message: impl Into<String>) -> Self {
        Self::Resolution(message.into())
    }
}
