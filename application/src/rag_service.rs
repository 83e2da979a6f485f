use async_trait::async_trait;
use domain::models::{Provider, ProviderScope};
use domain::ports::{GenerationClient, QuestionAnswerer};
use domain::prompt::{build_prompt, format_context};
use infrastructure::binding::VectorStoreBinding;
use infrastructure::providers::ProviderRegistry;
use infrastructure::vector_store::VectorStore;
use shared::types::Result;

/// Number of chunks retrieved per question.
pub const TOP_K: usize = 10;

/// Retrieval-answer pipeline bound to one provider for a whole session.
///
/// Grounding is a prompting contract: the model is told to answer only from
/// the retrieved context and to emit the refusal sentence otherwise. Nothing
/// here verifies that it complied.
pub struct RagChain {
    store: VectorStore,
    llm: Box<dyn GenerationClient>,
    top_k: usize,
}

impl RagChain {
    pub fn new(store: VectorStore, llm: Box<dyn GenerationClient>) -> Self {
        Self {
            store,
            llm,
            top_k: TOP_K,
        }
    }

    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    /// Bind the vector store and the LLM for `requested`. Credentials are
    /// checked before any client is created.
    pub fn try_build(registry: &ProviderRegistry, requested: &str) -> Result<Self> {
        let provider = ProviderScope::Query.normalize(requested);
        let store = VectorStoreBinding::new(registry).bind(provider.as_str(), ProviderScope::Query)?;
        let llm = registry.generation_client(provider)?;
        Ok(Self::new(store, llm))
    }

    /// `None` when construction fails; the reason is logged.
    pub fn build(registry: &ProviderRegistry, requested: &str) -> Option<Self> {
        match Self::try_build(registry, requested) {
            Ok(chain) => Some(chain),
            Err(e) => {
                tracing::error!("Error creating search chain: {e}");
                None
            }
        }
    }

    pub fn provider(&self) -> Provider {
        self.llm.provider()
    }

    pub fn collection_name(&self) -> &str {
        self.store.collection_name()
    }

    /// Formatted context block for `question`, in store order.
    pub async fn retrieve_context(&self, question: &str) -> Result<String> {
        let results = self
            .store
            .similarity_search_with_score(question, self.top_k)
            .await?;
        tracing::debug!(retrieved = results.len(), "Context retrieved");
        Ok(format_context(&results))
    }

    /// Model output is returned exactly as produced.
    pub async fn try_answer(&self, question: &str) -> Result<String> {
        let context = self.retrieve_context(question).await?;
        let prompt = build_prompt(&context, question);
        self.llm.generate(&prompt).await
    }

    pub async fn answer(&self, question: &str) -> String {
        match self.try_answer(question).await {
            Ok(answer) => answer,
            Err(e) => {
                tracing::error!("Error answering question: {e}");
                format!("Erro ao buscar documentos: {e}")
            }
        }
    }
}

#[async_trait]
impl QuestionAnswerer for RagChain {
    async fn answer(&self, question: &str) -> String {
        RagChain::answer(self, question).await
    }
}
