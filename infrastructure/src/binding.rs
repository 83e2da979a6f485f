use crate::providers::ProviderRegistry;
use crate::vector_store::VectorStore;
use domain::models::{Provider, ProviderScope};
use domain::ports::EmbeddingClient;
use shared::types::Result;

/// Connects a provider to its own collection in the backing store.
///
/// Binding the same provider twice against the same database targets the
/// same `documents_<provider>` collection, so previously ingested chunks
/// are visible to every later session.
pub struct VectorStoreBinding<'a> {
    registry: &'a ProviderRegistry,
}

impl<'a> VectorStoreBinding<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self { registry }
    }

    /// Normalize `requested` for `scope` (unknown or out-of-scope names fall
    /// back to the scope default with a warning), build the embedder and
    /// open the provider's collection. A missing credential is an error.
    pub fn bind(&self, requested: &str, scope: ProviderScope) -> Result<VectorStore> {
        let provider = scope.normalize(requested);
        let spec = self.registry.resolve(provider.as_str())?;
        let embedder = self.registry.embedding_client(spec.provider)?;
        self.open(provider, embedder)
    }

    /// Open `provider`'s collection with an already built embedder.
    pub fn open(&self, provider: Provider, embedder: Box<dyn EmbeddingClient>) -> Result<VectorStore> {
        let collection = provider.collection_name();
        let store = VectorStore::open(&self.registry.config().database_url, &collection, embedder)?;
        tracing::info!(collection = %collection, "Collection in use");
        Ok(store)
    }
}
