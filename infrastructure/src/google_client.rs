use crate::http::send_json;
use async_trait::async_trait;
use domain::models::Provider;
use domain::ports::{EmbeddingClient, GenerationClient};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use shared::error::RagError;
use shared::types::Result;

const EMBEDDING_BATCH_SIZE: usize = 100;
const TASK_DOCUMENT: &str = "RETRIEVAL_DOCUMENT";
const TASK_QUERY: &str = "RETRIEVAL_QUERY";

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

impl<'a> Content<'a> {
    fn text(role: Option<&'a str>, text: &'a str) -> Self {
        Self {
            role,
            parts: vec![Part { text }],
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: &'a str,
    content: Content<'a>,
    task_type: &'a str,
}

#[derive(Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

#[derive(Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Deserialize)]
struct EmbedContentResponse {
    embedding: ContentEmbedding,
}

#[derive(Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
    generation_config: GenerationConfig,
}

#[derive(Deserialize)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
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

/// Resource name as the API expects it: `models/<id>`.
fn model_path(model: &str) -> String {
    if model.starts_with("models/") {
        model.to_string()
    } else {
        format!("models/{model}")
    }
}

#[derive(Clone)]
pub struct GoogleEmbeddings {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GoogleEmbeddings {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model_path(model),
        }
    }
}

#[async_trait]
impl EmbeddingClient for GoogleEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
        let url = format!("{}/v1beta/{}:batchEmbedContents", self.base_url, self.model);
        let mut embeddings = Vec::with_capacity(texts.len());
        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            tracing::debug!("Embedding {} chunks with Google", batch.len());
            let request = BatchEmbedRequest {
                requests: batch
                    .iter()
                    .map(|text| EmbedContentRequest {
                        model: &self.model,
                        content: Content::text(None, text),
                        task_type: TASK_DOCUMENT,
                    })
                    .collect(),
            };
            let response: BatchEmbedResponse = send_json(
                self.client
                    .post(&url)
                    .header("x-goog-api-key", &self.api_key)
                    .json(&request),
                "Google embeddings",
            )
            .await?;
            if response.embeddings.len() != batch.len() {
                return Err(RagError::upstream(format!(
                    "Google returned {} embeddings for {} inputs",
                    response.embeddings.len(),
                    batch.len()
                )));
            }
            embeddings.extend(response.embeddings.into_iter().map(|e| e.values));
        }
        Ok(embeddings)
    }

    async fn embed_query(&self, text: &str) -> Result<Vec<f32>> {
        let url = format!("{}/v1beta/{}:embedContent", self.base_url, self.model);
        let request = EmbedContentRequest {
            model: &self.model,
            content: Content::text(None, text),
            task_type: TASK_QUERY,
        };
        let response: EmbedContentResponse = send_json(
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
            "Google embeddings",
        )
        .await?;
        Ok(response.embedding.values)
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[derive(Clone)]
pub struct GoogleChat {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
}

impl GoogleChat {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl GenerationClient for GoogleChat {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/{}:generateContent",
            self.base_url,
            model_path(&self.model)
        );
        let request = GenerateRequest {
            contents: vec![Content::text(Some("user"), prompt)],
            generation_config: GenerationConfig { temperature: 0.0 },
        };
        let response: GenerateResponse = send_json(
            self.client
                .post(&url)
                .header("x-goog-api-key", &self.api_key)
                .json(&request),
            "Gemini",
        )
        .await?;

        let mut output = String::new();
        if let Some(content) = response
            .candidates
            .and_then(|list| list.into_iter().next())
            .and_then(|c| c.content)
        {
            for part in content.parts {
                if let Some(text) = part.text {
                    output.push_str(&text);
                }
            }
        }
        if output.is_empty() {
            return Err(RagError::upstream("Gemini response missing text"));
        }
        Ok(output)
    }

    fn provider(&self) -> Provider {
        Provider::Google
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}
