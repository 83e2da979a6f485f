use serde::{Deserialize, Serialize};
use shared::error::RagError;
use std::fmt;
use std::str::FromStr;

/// Every collection name is this prefix followed by the provider identifier.
pub const COLLECTION_PREFIX: &str = "documents_";

/// Embedding/generation backend selectable per session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    HuggingFace,
    OpenAi,
    Google,
}

impl Provider {
    pub const ALL: [Provider; 3] = [Provider::HuggingFace, Provider::OpenAi, Provider::Google];

    pub fn as_str(&self) -> &'static str {
        match self {
            Provider::HuggingFace => "huggingface",
            Provider::OpenAi => "openai",
            Provider::Google => "google",
        }
    }

    /// HuggingFace runs embeddings locally and has no generation model.
    pub fn supports_generation(&self) -> bool {
        !matches!(self, Provider::HuggingFace)
    }

    /// One collection per provider: embedding spaces of different
    /// dimensionality must never share a collection.
    pub fn collection_name(&self) -> String {
        format!("{COLLECTION_PREFIX}{}", self.as_str())
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "huggingface" => Ok(Provider::HuggingFace),
            "openai" => Ok(Provider::OpenAi),
            "google" => Ok(Provider::Google),
            other => Err(RagError::config(format!("unknown provider '{other}'"))),
        }
    }
}

/// Which entry point is selecting a provider. Ingestion accepts the local
/// embedder; querying needs a provider that can also generate answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderScope {
    Ingestion,
    Query,
}

impl ProviderScope {
    pub fn providers(&self) -> &'static [Provider] {
        match self {
            ProviderScope::Ingestion => &Provider::ALL,
            ProviderScope::Query => &[Provider::OpenAi, Provider::Google],
        }
    }

    pub fn default_provider(&self) -> Provider {
        match self {
            ProviderScope::Ingestion => Provider::HuggingFace,
            ProviderScope::Query => Provider::OpenAi,
        }
    }

    pub fn accepts(&self, provider: Provider) -> bool {
        self.providers().contains(&provider)
    }

    /// Strict selection: unknown or out-of-scope identifiers are errors.
    pub fn select(&self, raw: &str) -> Result<Provider, RagError> {
        let provider: Provider = raw.parse()?;
        if self.accepts(provider) {
            Ok(provider)
        } else {
            Err(RagError::config(format!(
                "provider '{provider}' is not available for {}",
                self.label()
            )))
        }
    }

    /// Lenient selection used by the binding: anything unusable falls back
    /// to the scope default with a warning instead of failing.
    pub fn normalize(&self, raw: &str) -> Provider {
        match self.select(raw) {
            Ok(provider) => provider,
            Err(e) => {
                let fallback = self.default_provider();
                tracing::warn!("{e}; using '{fallback}'");
                fallback
            }
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ProviderScope::Ingestion => "ingestion",
            ProviderScope::Query => "querying",
        }
    }
}

/// Extracted text of one page, or of a whole file for formats without pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentPage {
    /// Zero-based; `None` for formats without pages.
    pub page: Option<usize>,
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkMetadata {
    pub source: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<usize>,
    pub chunk_index: usize,
    /// Offset of the first character of the window, in characters.
    pub start_index: usize,
}

/// Contiguous span of source text. Immutable once produced by ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentChunk {
    pub text: String,
    pub metadata: ChunkMetadata,
}

impl DocumentChunk {
    /// Stable identifier so that re-ingesting a file overwrites instead of duplicating.
    pub fn stable_id(&self) -> String {
        let page = self.metadata.page.map(|p| p.to_string()).unwrap_or_default();
        let key = format!(
            "{}\u{0}{page}\u{0}{}\u{0}{}",
            self.metadata.source, self.metadata.start_index, self.text
        );
        format!("{:x}", md5::compute(key.as_bytes()))
    }
}

/// A retrieved chunk with its cosine distance to the query (lower is closer).
/// Produced per query, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredChunk {
    pub chunk: DocumentChunk,
    pub score: f32,
}
