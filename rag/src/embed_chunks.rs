use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::config::Config;
use crate::error::{RagError, Result};
use crate::http::HttpClient;

/// Turns text into fixed-width vectors. The same implementation must be used
/// for indexing and for questions.
pub trait Embedder: Send + Sync {
    /// Returns one vector per input, in input order.
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;
}

/// Embeddings served by Ollama's `/api/embed`.
#[derive(Clone, Debug)]
pub struct OllamaEmbedder {
    http: HttpClient,
    url: String,
    model: String,
}

#[derive(Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

impl OllamaEmbedder {
    pub fn new(base_url: &str, model: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::new()?,
            url: format!("{}/api/embed", base_url.trim_end_matches('/')),
            model: model.to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.ollama_url, &cfg.embed_model)
    }
}

impl Embedder for OllamaEmbedder {
    fn embed(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(vec![]);
        }
        debug!(count = texts.len(), model = %self.model, "embedding texts");
        let req = EmbedRequest {
            model: &self.model,
            input: texts,
        };
        let res = self.http.post_json::<Value, _>(&self.url, &req)?;
        let vectors = parse_embeddings(res)?;
        if vectors.len() != texts.len() {
            return Err(RagError::EmbeddingCount {
                expected: texts.len(),
                actual: vectors.len(),
            });
        }
        Ok(vectors)
    }
}

fn parse_embeddings(value: Value) -> Result<Vec<Vec<f32>>> {
    if let Some(embeddings) = value.get("embeddings") {
        return parse_embeddings_value(embeddings);
    }
    if let Some(embedding) = value.get("embedding") {
        return parse_embeddings_value(embedding);
    }
    Err(RagError::Embedding("no embeddings in response".to_string()))
}

fn parse_embeddings_value(value: &Value) -> Result<Vec<Vec<f32>>> {
    let Some(arr) = value.as_array() else {
        return Err(RagError::Embedding("embeddings is not an array".to_string()));
    };
    if arr.is_empty() {
        return Ok(vec![]);
    }
    if arr[0].is_array() {
        return arr.iter().map(parse_vec).collect();
    }
    Ok(vec![parse_vec(value)?])
}

fn parse_vec(value: &Value) -> Result<Vec<f32>> {
    let arr = value
        .as_array()
        .ok_or_else(|| RagError::Embedding("embedding is not an array".to_string()))?;
    arr.iter()
        .map(|v| {
            v.as_f64()
                .map(|n| n as f32)
                .ok_or_else(|| RagError::Embedding("embedding value is not a number".to_string()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parses_batch_and_single_shapes() {
        let batch = parse_embeddings(json!({"embeddings": [[1.0, 2.0], [3.0, 4.5]]})).unwrap();
        assert_eq!(batch, vec![vec![1.0, 2.0], vec![3.0, 4.5]]);

        let single = parse_embeddings(json!({"embedding": [0.5, -0.5]})).unwrap();
        assert_eq!(single, vec![vec![0.5, -0.5]]);
    }

    #[test]
    fn rejects_malformed_vectors() {
        assert!(parse_embeddings(json!({"data": []})).is_err());
        assert!(parse_embeddings(json!({"embeddings": [["a"]]})).is_err());
        assert!(parse_embeddings(json!({"embeddings": "nope"})).is_err());
    }
}
