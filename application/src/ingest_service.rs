use domain::chunking::TextSplitter;
use domain::models::{DocumentChunk, ProviderScope};
use infrastructure::binding::VectorStoreBinding;
use infrastructure::document_loader::DocumentLoader;
use infrastructure::providers::ProviderRegistry;
use infrastructure::vector_store::VectorStore;
use shared::error::RagError;
use shared::telemetry::Telemetry;
use shared::types::Result;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct IngestReport {
    pub collection: String,
    pub chunks: usize,
    pub elapsed: Duration,
}

/// Load a document, split it into overlapping windows and write the
/// embedded windows to the provider's collection.
pub struct IngestService<'a> {
    registry: &'a ProviderRegistry,
    splitter: TextSplitter,
}

impl<'a> IngestService<'a> {
    pub fn new(registry: &'a ProviderRegistry) -> Self {
        Self {
            registry,
            splitter: TextSplitter::new(registry.config().chunking),
        }
    }

    /// Never fails past this point: any error is logged and reported as `false`.
    pub async fn ingest(&self, path: &Path, requested_provider: &str) -> bool {
        match self.try_ingest(path, requested_provider).await {
            Ok(report) => {
                tracing::info!(
                    collection = %report.collection,
                    chunks = report.chunks,
                    elapsed_ms = report.elapsed.as_millis() as u64,
                    "Document ingested"
                );
                true
            }
            Err(e) => {
                tracing::error!("Error ingesting document: {e}");
                false
            }
        }
    }

    /// The document is read and split before the store is bound, so a bad
    /// path never reaches the database or a provider.
    pub async fn try_ingest(&self, path: &Path, requested_provider: &str) -> Result<IngestReport> {
        let telemetry = Telemetry::new();
        let chunks = self.prepare(path)?;
        let store = VectorStoreBinding::new(self.registry).bind(requested_provider, ProviderScope::Ingestion)?;
        self.write(&store, &chunks, telemetry).await
    }

    /// Ingest into an already bound store.
    pub async fn ingest_into(&self, store: &VectorStore, path: &Path) -> Result<IngestReport> {
        let telemetry = Telemetry::new();
        let chunks = self.prepare(path)?;
        self.write(store, &chunks, telemetry).await
    }

    pub fn prepare(&self, path: &Path) -> Result<Vec<DocumentChunk>> {
        let pages = DocumentLoader::load(path)?;
        let chunks = self.splitter.split_pages(&pages, &path.to_string_lossy());
        if chunks.is_empty() {
            return Err(RagError::EmptyContent(format!(
                "'{}' produced no chunks",
                path.display()
            )));
        }
        tracing::info!(pages = pages.len(), "Split document into {} chunks", chunks.len());
        Ok(chunks)
    }

    async fn write(
        &self,
        store: &VectorStore,
        chunks: &[DocumentChunk],
        telemetry: Telemetry,
    ) -> Result<IngestReport> {
        let written = store.add_chunks(chunks).await?;
        tracing::debug!(elapsed_ms = telemetry.elapsed_ms(), "Chunks embedded and written");
        Ok(IngestReport {
            collection: store.collection_name().to_string(),
            chunks: written,
            elapsed: telemetry.elapsed(),
        })
    }
}
