use std::env;
use std::fs;

use crate::error::{RagError, Result};
use crate::generate::Sampling;
use crate::history::DEFAULT_HISTORY_EXCHANGES;

const DEFAULT_PERSONA: &str = include_str!("persona.txt");

pub const DEFAULT_COLLECTION: &str = "rag_qa";
pub const DEFAULT_CHAT_MODEL: &str = "models/gemini-2.0-flash-001";
pub const DEFAULT_TOP_K: usize = 5;
pub const DEFAULT_CONTEXT_EXCHANGES: usize = 2;

#[derive(Clone, Debug)]
pub struct Config {
    pub corpus_path: String,
    pub gemini_url: String,
    pub gemini_api_key: String,
    pub chat_model: String,
    pub ollama_url: String,
    pub embed_model: String,
    pub qdrant_url: String,
    pub qdrant_api_key: String,
    pub collection: String,
    pub top_k: usize,
    pub context_exchanges: usize,
    pub history_exchanges: usize,
    pub sampling: Sampling,
    pub system_prompt: String,
    pub app_title: String,
    pub log_file: String,
}

impl Config {
    /// Reads the configuration from the environment. Secrets have no
    /// defaults; a missing one is a fatal startup error.
    pub fn from_env() -> Result<Self> {
        // Load .env if present so keys work without a manual `source .env`.
        let _ = dotenvy::dotenv();
        Ok(Self {
            corpus_path: env::var("DATA_FILE_PATH").unwrap_or_else(|_| "ioniq.csv".to_string()),
            gemini_url: env::var("GEMINI_URL")
                .unwrap_or_else(|_| "https://generativelanguage.googleapis.com/v1beta".to_string()),
            gemini_api_key: required("GOOGLE_API_KEY")?,
            chat_model: env::var("GENAI_MODEL")
                .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string()),
            ollama_url: env::var("OLLAMA_URL").unwrap_or_else(|_| "http://localhost:11434".to_string()),
            embed_model: env::var("OLLAMA_EMBED_MODEL").unwrap_or_else(|_| "nomic-embed-text".to_string()),
            qdrant_url: required("QDRANT_URL")?,
            qdrant_api_key: required("QDRANT_API_KEY")?,
            collection: env::var("QDRANT_COLLECTION").unwrap_or_else(|_| DEFAULT_COLLECTION.to_string()),
            // Qdrant rejects `limit: 0`.
            top_k: parsed("RAG_TOP_K", DEFAULT_TOP_K).max(1),
            context_exchanges: parsed("RAG_CONTEXT_EXCHANGES", DEFAULT_CONTEXT_EXCHANGES),
            history_exchanges: parsed("RAG_HISTORY_EXCHANGES", DEFAULT_HISTORY_EXCHANGES),
            sampling: Sampling {
                temperature: parsed("RAG_TEMPERATURE", 0.2),
                top_p: parsed("RAG_TOP_P", 0.1),
            },
            system_prompt: system_prompt()?,
            app_title: env::var("RAG_APP_TITLE")
                .unwrap_or_else(|_| "Hyundai IONIQ 5 Sales Assistant".to_string()),
            log_file: env::var("RAG_LOG_FILE").unwrap_or_else(|_| "salesbot.log".to_string()),
        })
    }
}

/// The persona shipped with the binary.
pub fn default_persona() -> &'static str {
    DEFAULT_PERSONA
}

fn required(name: &'static str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(RagError::MissingSetting(name)),
    }
}

fn parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name).ok().and_then(|v| v.trim().parse().ok()).unwrap_or(default)
}

fn system_prompt() -> Result<String> {
    if let Ok(prompt) = env::var("RAG_SYSTEM_PROMPT") {
        return Ok(prompt);
    }
    match env::var("RAG_SYSTEM_PROMPT_FILE") {
        Ok(path) => Ok(fs::read_to_string(path)?),
        Err(_) => Ok(DEFAULT_PERSONA.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_env<T>(vars: &[(&str, &str)], f: impl FnOnce() -> T) -> T {
        for (name, value) in vars {
            env::set_var(name, value);
        }
        let out = f();
        for (name, _) in vars {
            env::remove_var(name);
        }
        out
    }

    #[test]
    fn zero_top_k_is_raised_to_one() {
        let cfg = with_env(
            &[
                ("GOOGLE_API_KEY", "g"),
                ("QDRANT_URL", "http://localhost:6333"),
                ("QDRANT_API_KEY", "q"),
                ("RAG_TOP_K", "0"),
                ("RAG_CONTEXT_EXCHANGES", "0"),
            ],
            Config::from_env,
        )
        .unwrap();
        assert_eq!(cfg.top_k, 1);
        assert_eq!(cfg.context_exchanges, 0);
    }
}
