use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};

/// Text embedded at startup to learn the embedding width.
pub const PROBE_TEXT: &str = "_";

pub fn embed_query(embedder: &dyn Embedder, text: &str) -> Result<Vec<f32>> {
    let vecs = embedder.embed(&[text.to_string()])?;
    vecs.into_iter().next().ok_or(RagError::EmbeddingCount {
        expected: 1,
        actual: 0,
    })
}

/// Width of the vectors `embedder` produces, found by embedding [`PROBE_TEXT`].
pub fn probe_width(embedder: &dyn Embedder) -> Result<usize> {
    let width = embed_query(embedder, PROBE_TEXT)?.len();
    if width == 0 {
        return Err(RagError::Embedding("probe returned an empty vector".to_string()));
    }
    Ok(width)
}
