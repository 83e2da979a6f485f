use domain::chunking::{ChunkingConfig, TextSplitter};
use domain::models::{ChunkMetadata, DocumentChunk, Provider, ProviderScope};
use infrastructure::binding::VectorStoreBinding;
use infrastructure::vector_store::VectorStore;
use tests::{registry_with, sqlite_url, FakeEmbedder};

fn chunk(text: &str, index: usize) -> DocumentChunk {
    DocumentChunk {
        text: text.to_string(),
        metadata: ChunkMetadata {
            source: "fatura.txt".to_string(),
            page: Some(0),
            chunk_index: index,
            start_index: index * 100,
        },
    }
}

#[tokio::test]
async fn test_rebinding_sees_previous_chunks() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[]);
    let binding = VectorStoreBinding::new(&registry);

    let first = binding
        .open(Provider::Google, FakeEmbedder::boxed(Provider::Google, 32))
        .unwrap();
    first
        .add_chunks(&[chunk("total da fatura 120 reais", 0), chunk("vencimento em maio", 1)])
        .await
        .unwrap();
    drop(first);

    let second = binding
        .open(Provider::Google, FakeEmbedder::boxed(Provider::Google, 32))
        .unwrap();
    assert_eq!(second.collection_name(), "documents_google");
    assert_eq!(second.count().unwrap(), 2);
}

#[tokio::test]
async fn test_reingesting_same_chunks_does_not_duplicate() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(&dir.path().join("v.sqlite3"));
    let store = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 16)).unwrap();

    let splitter = TextSplitter::new(ChunkingConfig::new(40, 10).unwrap());
    let chunks = splitter.split(&"palavra ".repeat(50), "doc.txt");
    store.add_chunks(&chunks).await.unwrap();
    store.add_chunks(&chunks).await.unwrap();
    assert_eq!(store.count().unwrap(), chunks.len());
}

#[tokio::test]
async fn test_collections_are_partitioned_by_provider() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[]);
    let binding = VectorStoreBinding::new(&registry);

    let local = binding
        .open(Provider::HuggingFace, FakeEmbedder::boxed(Provider::HuggingFace, 8))
        .unwrap();
    local.add_chunks(&[chunk("apenas local", 0)]).await.unwrap();

    let openai = binding
        .open(Provider::OpenAi, FakeEmbedder::boxed(Provider::OpenAi, 24))
        .unwrap();
    assert_eq!(openai.count().unwrap(), 0);
    assert!(openai
        .similarity_search_with_score("apenas local", 5)
        .await
        .unwrap()
        .is_empty());
    assert_eq!(local.count().unwrap(), 1);
}

#[tokio::test]
async fn test_dimension_mismatch_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(&dir.path().join("v.sqlite3"));

    let store = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 16)).unwrap();
    store.add_chunks(&[chunk("dezesseis dimensoes", 0)]).await.unwrap();
    assert_eq!(store.dimensions().unwrap(), Some(16));
    drop(store);

    let other = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 8)).unwrap();
    let write = other.add_chunks(&[chunk("oito", 1)]).await.unwrap_err();
    assert!(write.is_configuration());
    let query = other.similarity_search_with_score("oito", 3).await.unwrap_err();
    assert!(query.is_configuration());
    assert_eq!(other.count().unwrap(), 1);
}

#[tokio::test]
async fn test_search_orders_by_ascending_distance() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(&dir.path().join("v.sqlite3"));
    let store = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 256)).unwrap();
    store
        .add_chunks(&[
            chunk("o clima em lisboa", 0),
            chunk("faturamento anual da empresa", 1),
            chunk("faturamento da empresa em 2024 foi alto", 2),
        ])
        .await
        .unwrap();

    let results = store
        .similarity_search_with_score("faturamento da empresa", 2)
        .await
        .unwrap();
    assert_eq!(results.len(), 2);
    assert!(results[0].score <= results[1].score);
    assert!(results
        .iter()
        .all(|r| r.chunk.text.contains("faturamento")));
    assert_eq!(results[0].chunk.metadata.source, "fatura.txt");
}

#[test]
fn test_missing_google_key_fails_before_opening_database() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("nested").join("v.sqlite3");
    let registry = registry_with(&db, &[]);
    let err = VectorStoreBinding::new(&registry)
        .bind("google", ProviderScope::Query)
        .err()
        .unwrap();
    assert!(err.is_configuration());
    assert!(!db.exists());
}
