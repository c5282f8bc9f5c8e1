use tracing::debug;

use crate::embed_chunks::Embedder;
use crate::embed_query::embed_query;
use crate::error::Result;
use crate::store_qdrant::{Hit, VectorStore};

/// Embeds `question` and returns the `k` nearest corpus lines, best first.
/// A `k` of zero is treated as one.
///
/// No similarity floor is applied, so a sparse collection still yields its
/// closest (possibly unrelated) lines.
pub fn retrieve_top(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    collection: &str,
    question: &str,
    k: usize,
) -> Result<Vec<Hit>> {
    let k = k.max(1);
    let query_vec = embed_query(embedder, question)?;
    let hits = store.search(collection, &query_vec, k)?;
    debug!(collection, requested = k, found = hits.len(), "retrieved context");
    Ok(hits)
}
