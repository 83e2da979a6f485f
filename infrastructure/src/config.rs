use domain::chunking::{ChunkingConfig, DEFAULT_CHUNK_OVERLAP, DEFAULT_CHUNK_SIZE};
use domain::models::ProviderScope;
use dotenvy::dotenv;
use shared::error::RagError;
use shared::types::Result;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_PDF_PATH: &str = "document.pdf";
pub const DEFAULT_DATABASE_URL: &str = "sqlite://vectordb.sqlite3";
pub const DEFAULT_HUGGINGFACE_EMBEDDING_MODEL: &str = "sentence-transformers/all-MiniLM-L6-v2";
pub const DEFAULT_OPENAI_EMBEDDING_MODEL: &str = "text-embedding-3-small";
pub const DEFAULT_OPENAI_LLM_MODEL: &str = "gpt-5-nano";
pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_GOOGLE_EMBEDDING_MODEL: &str = "models/gemini-embedding-001";
pub const DEFAULT_GOOGLE_LLM_MODEL: &str = "gemini-2.5-flash-lite";
pub const DEFAULT_GOOGLE_BASE_URL: &str = "https://generativelanguage.googleapis.com";

/// Process-wide settings, resolved once at startup and handed to each
/// component at construction.
#[derive(Debug, Clone)]
pub struct Config {
    pub pdf_path: PathBuf,
    pub database_url: String,
    /// Raw `EMBEDDING_PROVIDER`; validated against a scope when bound.
    pub embedding_provider: Option<String>,
    pub huggingface_embedding_model: String,
    pub openai_api_key: Option<String>,
    pub openai_embedding_model: String,
    pub openai_llm_model: String,
    pub openai_base_url: String,
    pub google_api_key: Option<String>,
    pub google_embedding_model: String,
    pub google_llm_model: String,
    pub google_base_url: String,
    pub chunking: ChunkingConfig,
}

impl Config {
    /// Read `.env` (if any) and then the process environment.
    pub fn load() -> Result<Self> {
        dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };
        let or = |key: &str, default: &str| get(key).unwrap_or_else(|| default.to_string());

        let chunk_size = parse_usize("CHUNK_SIZE", get("CHUNK_SIZE"), DEFAULT_CHUNK_SIZE)?;
        let chunk_overlap =
            parse_usize("CHUNK_OVERLAP", get("CHUNK_OVERLAP"), DEFAULT_CHUNK_OVERLAP)?;

        Ok(Self {
            pdf_path: PathBuf::from(or("PDF_PATH", DEFAULT_PDF_PATH)),
            database_url: or("DATABASE_URL", DEFAULT_DATABASE_URL),
            embedding_provider: get("EMBEDDING_PROVIDER").map(|p| p.to_lowercase()),
            huggingface_embedding_model: or(
                "HUGGINGFACE_EMBEDDING_MODEL",
                DEFAULT_HUGGINGFACE_EMBEDDING_MODEL,
            ),
            openai_api_key: get("OPENAI_API_KEY"),
            openai_embedding_model: or("OPENAI_EMBEDDING_MODEL", DEFAULT_OPENAI_EMBEDDING_MODEL),
            openai_llm_model: or("OPENAI_LLM_MODEL", DEFAULT_OPENAI_LLM_MODEL),
            openai_base_url: or("OPENAI_BASE_URL", DEFAULT_OPENAI_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            google_api_key: get("GOOGLE_API_KEY"),
            google_embedding_model: or("GOOGLE_EMBEDDING_MODEL", DEFAULT_GOOGLE_EMBEDDING_MODEL),
            google_llm_model: or("GOOGLE_LLM_MODEL", DEFAULT_GOOGLE_LLM_MODEL),
            google_base_url: or("GOOGLE_BASE_URL", DEFAULT_GOOGLE_BASE_URL)
                .trim_end_matches('/')
                .to_string(),
            chunking: ChunkingConfig::new(chunk_size, chunk_overlap)?,
        })
    }

    /// Provider requested for this process: the CLI flag wins over
    /// `EMBEDDING_PROVIDER`, which wins over the scope default.
    pub fn requested_provider(&self, cli_choice: Option<&str>, scope: ProviderScope) -> String {
        cli_choice
            .map(str::to_string)
            .or_else(|| self.embedding_provider.clone())
            .unwrap_or_else(|| scope.default_provider().as_str().to_string())
    }
}

fn parse_usize(key: &str, raw: Option<String>, default: usize) -> Result<usize> {
    match raw {
        None => Ok(default),
        Some(value) => value
            .parse()
            .map_err(|_| RagError::config(format!("{key} must be a non-negative integer, got '{value}'"))),
    }
}
