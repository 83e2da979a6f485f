//! Capability interfaces with one implementation per provider, selected
//! through the provider registry rather than by branching at call sites.

use crate::models::Provider;
use async_trait::async_trait;
use shared::types::Result;

#[async_trait]
pub trait EmbeddingClient: Send + Sync {
    /// Embed document chunks for storage. Output order matches input order.
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>>;

    fn provider(&self) -> Provider;

    fn model_name(&self) -> &str;
}

/// Text generation with deterministic decoding (temperature zero wherever
/// the model accepts it).
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;

    fn provider(&self) -> Provider;

    fn model_name(&self) -> &str;
}

/// Anything the interactive shell can put a question to. Implementations
/// report their own failures as text and never return an error.
#[async_trait]
pub trait QuestionAnswerer: Send + Sync {
    async fn answer(&self, question: &str) -> String;
}
