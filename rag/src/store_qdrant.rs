use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Distance {
    Cosine,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PointPayload {
    pub text: String,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Point {
    pub id: u64,
    pub vector: Vec<f32>,
    pub payload: PointPayload,
}

/// One search result, most similar first in any returned list.
#[derive(Clone, Debug, PartialEq)]
pub struct Hit {
    pub id: u64,
    pub score: f32,
    pub text: String,
}

/// The operations the assistant needs from a vector database.
///
/// Implementations must reject vectors whose width differs from the
/// collection's instead of truncating or padding them.
pub trait VectorStore: Send + Sync {
    fn collection_exists(&self, collection: &str) -> Result<bool>;
    fn create_collection(&self, collection: &str, size: usize, distance: Distance) -> Result<()>;
    fn upsert(&self, collection: &str, points: &[Point]) -> Result<()>;
    /// Returns up to `limit` hits with their payload, best match first.
    fn search(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<Hit>>;
}

/// Qdrant over its REST API.
#[derive(Clone, Debug)]
pub struct QdrantStore {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
struct CreateCollection {
    vectors: VectorParams,
}

#[derive(Serialize)]
struct VectorParams {
    size: usize,
    distance: Distance,
}

#[derive(Serialize)]
struct UpsertPoints<'a> {
    points: &'a [Point],
}

#[derive(Serialize)]
struct QueryRequest<'a> {
    query: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Deserialize)]
struct QdrantResponse<T> {
    result: Option<T>,
}

#[derive(Deserialize)]
struct ExistsResult {
    exists: bool,
}

#[derive(Deserialize)]
struct QueryResult {
    points: Vec<ScoredPoint>,
}

#[derive(Deserialize)]
struct ScoredPoint {
    id: u64,
    #[serde(default)]
    score: f32,
    payload: Option<HitPayload>,
}

#[derive(Deserialize)]
struct HitPayload {
    text: Option<String>,
}

impl QdrantStore {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_headers(&[("api-key", api_key)])?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.qdrant_url, &cfg.qdrant_api_key)
    }

    fn collection_url(&self, collection: &str) -> String {
        format!("{}/collections/{}", self.base_url, collection)
    }
}

impl VectorStore for QdrantStore {
    fn collection_exists(&self, collection: &str) -> Result<bool> {
        let url = format!("{}/exists", self.collection_url(collection));
        let res = self.http.get_json::<QdrantResponse<ExistsResult>>(&url)?;
        Ok(res.result.is_some_and(|r| r.exists))
    }

    fn create_collection(&self, collection: &str, size: usize, distance: Distance) -> Result<()> {
        debug!(collection, size, ?distance, "creating collection");
        let body = CreateCollection {
            vectors: VectorParams { size, distance },
        };
        self.http
            .put_json::<QdrantResponse<serde_json::Value>, _>(&self.collection_url(collection), &body)?;
        Ok(())
    }

    fn upsert(&self, collection: &str, points: &[Point]) -> Result<()> {
        if points.is_empty() {
            return Ok(());
        }
        debug!(collection, count = points.len(), "upserting points");
        let url = format!("{}/points?wait=true", self.collection_url(collection));
        let body = UpsertPoints { points };
        self.http
            .put_json::<QdrantResponse<serde_json::Value>, _>(&url, &body)?;
        Ok(())
    }

    fn search(&self, collection: &str, vector: &[f32], limit: usize) -> Result<Vec<Hit>> {
        let url = format!("{}/points/query", self.collection_url(collection));
        let req = QueryRequest {
            query: vector,
            limit,
            with_payload: true,
        };
        let res = self.http.post_json::<QdrantResponse<QueryResult>, _>(&url, &req)?;
        Ok(res
            .result
            .map(|r| r.points)
            .unwrap_or_default()
            .into_iter()
            .map(|p| Hit {
                id: p.id,
                score: p.score,
                text: p.payload.and_then(|payload| payload.text).unwrap_or_default(),
            })
            .collect())
    }
}
