use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, RagError>;

#[derive(Debug, Error)]
pub enum RagError {
    #[error("missing required setting {0}")]
    MissingSetting(&'static str),

    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: &'static str, reason: String },

    #[error("data file not found at: {}", .0.display())]
    CorpusNotFound(PathBuf),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("{method} {url} failed: {status} {body}")]
    Status {
        method: &'static str,
        url: String,
        status: u16,
        body: String,
    },

    #[error("{method} {url} decode failed: {source} | {body}")]
    Decode {
        method: &'static str,
        url: String,
        #[source]
        source: serde_json::Error,
        body: String,
    },

    #[error("invalid embeddings response: {0}")]
    Embedding(String),

    #[error("expected {expected} embeddings, got {actual}")]
    EmbeddingCount { expected: usize, actual: usize },

    #[error("dimension mismatch: expected {expected}, got {actual}")]
    DimensionMismatch { expected: usize, actual: usize },

    #[error("collection {0} not found")]
    CollectionNotFound(String),
}
