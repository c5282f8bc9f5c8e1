use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::Result;
use crate::http::HttpClient;

/// Sampling settings sent with every completion.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Sampling {
    pub temperature: f32,
    pub top_p: f32,
}

impl Default for Sampling {
    fn default() -> Self {
        Self {
            temperature: 0.2,
            top_p: 0.1,
        }
    }
}

/// A hosted text-generation model.
pub trait Completer: Send + Sync {
    /// Returns the raw reply text. A reply without text is an empty string.
    fn complete(&self, model: &str, prompt: &str, sampling: &Sampling) -> Result<String>;
}

/// Google Gemini `generateContent`.
#[derive(Clone, Debug)]
pub struct GeminiClient {
    http: HttpClient,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: &'a Sampling,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self> {
        Ok(Self {
            http: HttpClient::with_headers(&[("x-goog-api-key", api_key)])?,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn from_config(cfg: &Config) -> Result<Self> {
        Self::new(&cfg.gemini_url, &cfg.gemini_api_key)
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model_path(model))
    }
}

impl Completer for GeminiClient {
    fn complete(&self, model: &str, prompt: &str, sampling: &Sampling) -> Result<String> {
        let url = self.endpoint(model);
        debug!(model, prompt_len = prompt.len(), "requesting completion");
        let req = GenerateRequest {
            contents: [Content {
                parts: [Part { text: prompt }],
            }],
            generation_config: sampling,
        };
        let res = self.http.post_json::<GenerateResponse, _>(&url, &req)?;
        let text: String = res
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
            .unwrap_or_default();
        if text.is_empty() {
            warn!(model, "completion returned no text");
        }
        Ok(text)
    }
}

/// Model ids are addressed as `models/<name>`; bare names get the prefix.
pub fn model_path(model: &str) -> String {
    if model.starts_with("models/") || model.starts_with("tunedModels/") {
        model.to_string()
    } else {
        format!("models/{}", model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_path_adds_prefix_once() {
        assert_eq!(model_path("gemini-2.0-flash-001"), "models/gemini-2.0-flash-001");
        assert_eq!(model_path("models/gemini-2.0-flash-001"), "models/gemini-2.0-flash-001");
    }

    #[test]
    fn sampling_serializes_in_camel_case() {
        let json = serde_json::to_value(Sampling::default()).unwrap();
        let temperature = json["temperature"].as_f64().unwrap();
        let top_p = json["topP"].as_f64().unwrap();
        assert!((temperature - 0.2).abs() < 1e-6);
        assert!((top_p - 0.1).abs() < 1e-6);
    }
}
