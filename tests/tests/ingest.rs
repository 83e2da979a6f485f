use application::ingest_service::IngestService;
use domain::models::Provider;
use infrastructure::binding::VectorStoreBinding;
use shared::error::RagError;
use tests::{registry_with, write_document, FailingEmbedder, FakeEmbedder};

#[tokio::test]
async fn test_text_document_is_chunked_and_stored() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[("CHUNK_SIZE", "100"), ("CHUNK_OVERLAP", "20")]);
    let text = "A receita cresceu no trimestre. ".repeat(40);
    let path = write_document(dir.path(), "relatorio.txt", &text);

    let store = VectorStoreBinding::new(&registry)
        .open(Provider::HuggingFace, FakeEmbedder::boxed(Provider::HuggingFace, 32))
        .unwrap();
    let report = IngestService::new(&registry)
        .ingest_into(&store, &path)
        .await
        .unwrap();

    let expected = registry
        .config()
        .chunking
        .expected_chunks(text.chars().count());
    assert_eq!(report.chunks, expected);
    assert_eq!(report.collection, "documents_huggingface");
    assert_eq!(store.count().unwrap(), expected);
}

#[tokio::test]
async fn test_missing_document_fails_without_touching_store() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[("OPENAI_API_KEY", "sk-test")]);

    let ok = IngestService::new(&registry)
        .ingest(&dir.path().join("nao-existe.pdf"), "openai")
        .await;
    assert!(!ok);
    assert!(!db.exists());
}

#[tokio::test]
async fn test_blank_document_is_empty_content() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with(&dir.path().join("v.sqlite3"), &[]);
    let path = write_document(dir.path(), "vazio.md", "  \n\n\t ");

    let err = IngestService::new(&registry).prepare(&path).unwrap_err();
    assert!(matches!(err, RagError::EmptyContent(_)));
}

#[tokio::test]
async fn test_missing_credential_reports_failure() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[]);
    let path = write_document(dir.path(), "nota.txt", "conteudo qualquer");

    let err = IngestService::new(&registry)
        .try_ingest(&path, "google")
        .await
        .unwrap_err();
    assert!(err.is_configuration());
    assert!(!db.exists());
}

#[tokio::test]
async fn test_embedding_failure_surfaces_as_upstream() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with(&dir.path().join("v.sqlite3"), &[]);
    let path = write_document(dir.path(), "nota.txt", "conteudo qualquer");
    let store = VectorStoreBinding::new(&registry)
        .open(Provider::OpenAi, Box::new(FailingEmbedder))
        .unwrap();

    let err = IngestService::new(&registry)
        .ingest_into(&store, &path)
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::Upstream(_)));
    assert_eq!(store.count().unwrap(), 0);
}
