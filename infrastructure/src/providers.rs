use crate::config::Config;
use crate::google_client::{GoogleChat, GoogleEmbeddings};
use crate::local_embedder::LocalEmbedder;
use crate::openai_client::{OpenAiChat, OpenAiEmbeddings};
use domain::models::Provider;
use domain::ports::{EmbeddingClient, GenerationClient};
use shared::error::RagError;
use shared::types::Result;

/// Models and credential a provider runs with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub provider: Provider,
    pub embedding_model: String,
    pub llm_model: Option<String>,
    /// Environment variable holding the API key; `None` for local models.
    pub credential_env: Option<&'static str>,
}

pub struct ProviderRegistry {
    config: Config,
}

impl ProviderRegistry {
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn spec(&self, provider: Provider) -> ProviderSpec {
        let c = &self.config;
        match provider {
            Provider::HuggingFace => ProviderSpec {
                provider,
                embedding_model: c.huggingface_embedding_model.clone(),
                llm_model: None,
                credential_env: None,
            },
            Provider::OpenAi => ProviderSpec {
                provider,
                embedding_model: c.openai_embedding_model.clone(),
                llm_model: Some(c.openai_llm_model.clone()),
                credential_env: Some("OPENAI_API_KEY"),
            },
            Provider::Google => ProviderSpec {
                provider,
                embedding_model: c.google_embedding_model.clone(),
                llm_model: Some(c.google_llm_model.clone()),
                credential_env: Some("GOOGLE_API_KEY"),
            },
        }
    }

    /// Look up a provider by identifier and check its credential is present.
    /// Both failures are `Configuration` errors raised before any network use.
    pub fn resolve(&self, identifier: &str) -> Result<ProviderSpec> {
        let provider: Provider = identifier.parse()?;
        self.credential(provider)?;
        let spec = self.spec(provider);
        match &spec.llm_model {
            Some(llm) => tracing::info!(
                provider = %provider,
                embedding_model = %spec.embedding_model,
                llm_model = %llm,
                "Provider selected"
            ),
            None => tracing::info!(
                provider = %provider,
                embedding_model = %spec.embedding_model,
                "Provider selected"
            ),
        }
        Ok(spec)
    }

    fn credential(&self, provider: Provider) -> Result<Option<&str>> {
        let key = match provider {
            Provider::HuggingFace => return Ok(None),
            Provider::OpenAi => self.config.openai_api_key.as_deref(),
            Provider::Google => self.config.google_api_key.as_deref(),
        };
        match key {
            Some(key) => Ok(Some(key)),
            None => Err(RagError::config(format!(
                "{} is not set; it is required for provider '{provider}'",
                self.spec(provider).credential_env.unwrap_or_default()
            ))),
        }
    }

    fn api_key(&self, provider: Provider) -> Result<&str> {
        self.credential(provider)?
            .ok_or_else(|| RagError::config(format!("provider '{provider}' takes no API key")))
    }

    pub fn embedding_client(&self, provider: Provider) -> Result<Box<dyn EmbeddingClient>> {
        let c = &self.config;
        let client: Box<dyn EmbeddingClient> = match provider {
            Provider::HuggingFace => Box::new(LocalEmbedder::new(&c.huggingface_embedding_model)?),
            Provider::OpenAi => Box::new(OpenAiEmbeddings::new(
                &c.openai_base_url,
                self.api_key(provider)?,
                &c.openai_embedding_model,
            )),
            Provider::Google => Box::new(GoogleEmbeddings::new(
                &c.google_base_url,
                self.api_key(provider)?,
                &c.google_embedding_model,
            )),
        };
        Ok(client)
    }

    pub fn generation_client(&self, provider: Provider) -> Result<Box<dyn GenerationClient>> {
        let c = &self.config;
        let client: Box<dyn GenerationClient> = match provider {
            Provider::HuggingFace => {
                return Err(RagError::config(
                    "provider 'huggingface' has no generation model; use openai or google",
                ))
            }
            Provider::OpenAi => Box::new(OpenAiChat::new(
                &c.openai_base_url,
                self.api_key(provider)?,
                &c.openai_llm_model,
            )),
            Provider::Google => Box::new(GoogleChat::new(
                &c.google_base_url,
                self.api_key(provider)?,
                &c.google_llm_model,
            )),
        };
        tracing::info!(provider = %provider, model = %client.model_name(), "LLM ready");
        Ok(client)
    }
}
