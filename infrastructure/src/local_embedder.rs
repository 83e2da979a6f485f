use async_trait::async_trait;
use domain::models::Provider;
use domain::ports::EmbeddingClient;
use fastembed::{EmbeddingModel, TextEmbedding, TextInitOptions};
use shared::error::RagError;
use shared::types::Result;
use tokio::sync::Mutex;

const BATCH_SIZE: usize = 32;

/// Map a sentence-transformers style name onto a bundled ONNX model.
/// Names fastembed already knows are accepted as-is.
pub fn resolve_model(name: &str) -> Result<EmbeddingModel> {
    let short = name.rsplit('/').next().unwrap_or(name).to_ascii_lowercase();
    let known = match short.as_str() {
        "all-minilm-l6-v2" => Some(EmbeddingModel::AllMiniLML6V2),
        "all-minilm-l12-v2" => Some(EmbeddingModel::AllMiniLML12V2),
        "paraphrase-multilingual-minilm-l12-v2" => Some(EmbeddingModel::ParaphraseMLMiniLML12V2),
        "bge-small-en-v1.5" => Some(EmbeddingModel::BGESmallENV15),
        "bge-base-en-v1.5" => Some(EmbeddingModel::BGEBaseENV15),
        "multilingual-e5-small" => Some(EmbeddingModel::MultilingualE5Small),
        _ => None,
    };
    match known {
        Some(model) => Ok(model),
        None => name.parse::<EmbeddingModel>().map_err(|e| {
            RagError::config(format!("unsupported local embedding model '{name}': {e}"))
        }),
    }
}

/// CPU embeddings computed in-process; no credential required.
pub struct LocalEmbedder {
    model: Mutex<TextEmbedding>,
    model_name: String,
}

impl LocalEmbedder {
    pub fn new(model_name: &str) -> Result<Self> {
        let model = resolve_model(model_name)?;
        let embedding = TextEmbedding::try_new(TextInitOptions::new(model))
            .map_err(|e| RagError::upstream(format!("failed to load {model_name}: {e}")))?;
        Ok(Self {
            model: Mutex::new(embedding),
            model_name: model_name.to_string(),
        })
    }

    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut model = self.model.lock().await;
        model
            .embed(texts, Some(BATCH_SIZE))
            .map_err(|e| RagError::upstream(format!("local embedding failed: {e}")))
    }
}

#[async_trait]
impl EmbeddingClient for LocalEmbedder {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let refs: Vec<&str> = texts.iter().map(String::as_str).collect();
        self.embed(&refs).await
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed(&[text])
            .await?
            .pop()
            .ok_or_else(|| RagError::upstream("local embedder returned no vector"))
    }

    fn provider(&self) -> Provider {
        Provider::HuggingFace
    }

    fn model_name(&self) -> &str {
        &self.model_name
    }
}
