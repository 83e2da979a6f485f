use std::path::PathBuf;
use thiserror::Error;

/// Failure taxonomy shared by every layer of the pipeline.
///
/// Public entry points never let these escape: ingestion turns them into
/// `false`, chain construction into `None` and chain invocation into a
/// printable message.
#[derive(Error, Debug)]
pub enum RagError {
    /// Missing or invalid credential, unknown provider, bad setting.
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("document not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    #[error("no content: {0}")]
    EmptyContent(String),

    #[error("failed to extract text: {0}")]
    Extraction(String),

    /// Vector store or model provider failure, including connectivity and auth.
    #[error("upstream error: {0}")]
    Upstream(String),
}

impl RagError {
    pub fn config(msg: impl Into<String>) -> Self {
        RagError::Configuration(msg.into())
    }

    pub fn upstream(msg: impl Into<String>) -> Self {
        RagError::Upstream(msg.into())
    }

    pub fn is_configuration(&self) -> bool {
        matches!(self, RagError::Configuration(_))
    }
}

impl From<reqwest::Error> for RagError {
    fn from(e: reqwest::Error) -> Self {
        RagError::Upstream(format!("HTTP request failed: {e}"))
    }
}

impl From<rusqlite::Error> for RagError {
    fn from(e: rusqlite::Error) -> Self {
        RagError::Upstream(format!("vector store: {e}"))
    }
}

impl From<serde_json::Error> for RagError {
    fn from(e: serde_json::Error) -> Self {
        RagError::Upstream(format!("malformed payload: {e}"))
    }
}
