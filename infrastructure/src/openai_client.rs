use crate::http::send_json;
use async_trait::async_trait;
use domain::models::Provider;
use domain::ports::{EmbeddingClient, GenerationClient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::RagError;
use shared::types::Result;

const EMBEDDING_BATCH_SIZE: usize = 100;

#[derive(Serialize)]
struct EmbeddingRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Deserialize)]
struct EmbeddingData {
    index: usize,
    embedding: Vec<f32>,
}

#[derive(Serialize)]
struct Message<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<Message<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Clone)]
pub struct OpenAiEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiEmbeddings {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let request = EmbeddingRequest {
            model: &self.model,
            input: texts,
        };
        let mut response: EmbeddingResponse = send_json(
            self.client.post(&url).bearer_auth(&self.api_key).json(&request),
            "OpenAI embeddings",
        )
        .await?;
        if response.data.len() != texts.len() {
            return Err(RagError::upstream(format!(
                "OpenAI returned {} embeddings for {} inputs",
                response.data.len(),
                texts.len()
            )));
        }
        response.data.sort_by_key(|d| d.index);
        Ok(response.data.into_iter().map(|d| d.embedding).collect())
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            tracing::debug!("Embedding {} chunks with OpenAI", batch.len());
            embeddings.extend(self.embed_batch(batch).await?);
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| RagError::upstream("empty embedding response from OpenAI"))
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Clone)]
pub struct OpenAiChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }

    /// Reasoning model families only accept the default temperature, so
    /// zero is sent to every other model.
    fn temperature(&self) -> Option<f32> {
        let fixed = ["gpt-5", "o1", "o3", "o4"]
            .iter()
            .any(|family| self.model.starts_with(family));
        if fixed {
            None
        } else {
            Some(0.0)
        }
    }
}

#[async_trait]
impl GenerationClient for OpenAiChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let request = ChatRequest {
            model: &self.model,
            messages: vec![Message {
                role: "user",
                content: prompt,
            }],
            temperature: self.temperature(),
        };
        let response: ChatResponse = send_json(
            self.client.post(&url).bearer_auth(&self.api_key).json(&request),
            "OpenAI chat",
        )
        .await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or_else(|| RagError::upstream("OpenAI response missing text"))
    }

    fn provider(&self) -> Provider {
        Provider::OpenAi
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
