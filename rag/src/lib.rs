mod bootstrap;
mod build_prompt;
mod chunk_text;
mod clean_reply;
mod config;
mod embed_chunks;
mod embed_query;
mod error;
mod generate;
mod history;
mod http;
mod load_corpus;
mod retrieve_chunks;
mod store_qdrant;

pub use bootstrap::{bootstrap_collection, BootstrapOutcome};
pub use build_prompt::{Prompt, PromptBuilder, Section};
pub use chunk_text::chunk_lines;
pub use clean_reply::clean_reply;
pub use config::{
    default_persona, Config, DEFAULT_CHAT_MODEL, DEFAULT_COLLECTION, DEFAULT_CONTEXT_EXCHANGES,
    DEFAULT_TOP_K,
};
pub use embed_chunks::{Embedder, OllamaEmbedder};
pub use embed_query::{embed_query, probe_width, PROBE_TEXT};
pub use error::{RagError, Result};
pub use generate::{model_path, Completer, GeminiClient, Sampling};
pub use history::{Role, Session, Turn, DEFAULT_HISTORY_EXCHANGES};
pub use load_corpus::Corpus;
pub use retrieve_chunks::retrieve_top;
pub use store_qdrant::{Distance, Hit, Point, PointPayload, QdrantStore, VectorStore};

use tracing::debug;

/// Per-turn settings that are not client connection details.
#[derive(Clone, Debug)]
pub struct Options {
    pub collection: String,
    pub model: String,
    pub persona: String,
    pub top_k: usize,
    pub context_exchanges: usize,
    pub sampling: Sampling,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            collection: DEFAULT_COLLECTION.to_string(),
            model: DEFAULT_CHAT_MODEL.to_string(),
            persona: default_persona().to_string(),
            top_k: DEFAULT_TOP_K,
            context_exchanges: DEFAULT_CONTEXT_EXCHANGES,
            sampling: Sampling::default(),
        }
    }
}

impl From<&Config> for Options {
    fn from(cfg: &Config) -> Self {
        Self {
            collection: cfg.collection.clone(),
            model: cfg.chat_model.clone(),
            persona: cfg.system_prompt.clone(),
            top_k: cfg.top_k,
            context_exchanges: cfg.context_exchanges,
            sampling: cfg.sampling,
        }
    }
}

/// What one successful turn produced.
#[derive(Clone, Debug, PartialEq)]
pub struct Reply {
    pub answer: String,
    pub context: Vec<Hit>,
}

/// The question-answering pipeline: embedder, vector store and completion
/// model, built once and shared by every session.
pub struct Assistant {
    options: Options,
    embedder: Box<dyn Embedder>,
    store: Box<dyn VectorStore>,
    completer: Box<dyn Completer>,
}

impl Assistant {
    pub fn new(
        options: Options,
        embedder: Box<dyn Embedder>,
        store: Box<dyn VectorStore>,
        completer: Box<dyn Completer>,
    ) -> Self {
        Self {
            options,
            embedder,
            store,
            completer,
        }
    }

    /// Builds the Ollama, Qdrant and Gemini clients from `cfg`. No network
    /// call is made here.
    pub fn connect(cfg: &Config) -> Result<Self> {
        Ok(Self::new(
            Options::from(cfg),
            Box::new(OllamaEmbedder::from_config(cfg)?),
            Box::new(QdrantStore::from_config(cfg)?),
            Box::new(GeminiClient::from_config(cfg)?),
        ))
    }

    pub fn embedding_width(&self) -> Result<usize> {
        probe_width(self.embedder.as_ref())
    }

    pub fn bootstrap(&self, corpus: &Corpus, width: usize) -> Result<BootstrapOutcome> {
        bootstrap_collection(
            self.embedder.as_ref(),
            self.store.as_ref(),
            &self.options.collection,
            corpus,
            width,
        )
    }

    /// Probes the embedding width, then indexes the corpus if needed.
    pub fn prepare(&self, corpus: &Corpus) -> Result<BootstrapOutcome> {
        let width = self.embedding_width()?;
        self.bootstrap(corpus, width)
    }

    pub fn retrieve(&self, question: &str) -> Result<Vec<Hit>> {
        retrieve_top(
            self.embedder.as_ref(),
            self.store.as_ref(),
            &self.options.collection,
            question,
            self.options.top_k,
        )
    }

    pub fn build_prompt(&self, session: &Session, question: &str, hits: &[Hit]) -> Prompt {
        PromptBuilder::new()
            .persona(self.options.persona.as_str())
            .retrieved(hits.iter().map(|h| h.text.as_str()))
            .history(session.recent(self.options.context_exchanges * 2))
            .question(question)
            .build()
    }

    /// Runs one turn and records it in `session`.
    ///
    /// Any failure is returned before the session is touched, so a failed
    /// turn leaves the history as it was.
    pub fn answer(&self, session: &mut Session, question: &str) -> Result<Reply> {
        let hits = self.retrieve(question)?;
        let prompt = self.build_prompt(session, question, &hits);
        let raw = self
            .completer
            .complete(&self.options.model, &prompt.render(), &self.options.sampling)?;
        let answer = clean_reply(&raw);
        debug!(raw_len = raw.len(), answer_len = answer.len(), "completed turn");
        session.record(question, answer.as_str());
        Ok(Reply {
            answer,
            context: hits,
        })
    }
}
