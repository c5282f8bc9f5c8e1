use tracing::info;

use crate::embed_chunks::Embedder;
use crate::error::{RagError, Result};
use crate::load_corpus::Corpus;
use crate::store_qdrant::{Distance, Point, PointPayload, VectorStore};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The collection was already there; nothing was embedded or written.
    AlreadyIndexed,
    /// The collection was created and filled with `points` lines.
    Indexed { points: usize },
}

/// Creates and fills `collection` from the corpus unless it already exists.
///
/// Creation and upsert are separate calls, so a failure between them leaves
/// a partial collection that later runs treat as indexed. Delete it by hand
/// to re-index.
pub fn bootstrap_collection(
    embedder: &dyn Embedder,
    store: &dyn VectorStore,
    collection: &str,
    corpus: &Corpus,
    width: usize,
) -> Result<BootstrapOutcome> {
    if store.collection_exists(collection)? {
        info!(collection, "collection exists, skipping indexing");
        return Ok(BootstrapOutcome::AlreadyIndexed);
    }

    store.create_collection(collection, width, Distance::Cosine)?;

    let lines = corpus.lines();
    if lines.is_empty() {
        info!(collection, "corpus has no lines, collection left empty");
        return Ok(BootstrapOutcome::Indexed { points: 0 });
    }

    let vectors = embedder.embed(&lines)?;
    if vectors.len() != lines.len() {
        return Err(RagError::EmbeddingCount {
            expected: lines.len(),
            actual: vectors.len(),
        });
    }
    let points: Vec<Point> = lines
        .into_iter()
        .zip(vectors)
        .enumerate()
        .map(|(id, (text, vector))| Point {
            id: id as u64,
            vector,
            payload: PointPayload { text },
        })
        .collect();
    store.upsert(collection, &points)?;

    info!(collection, points = points.len(), width, "indexed corpus");
    Ok(BootstrapOutcome::Indexed {
        points: points.len(),
    })
}
