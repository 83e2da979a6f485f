use application::rag_service::RagChain;
use domain::models::{ChunkMetadata, DocumentChunk, Provider};
use domain::prompt::REFUSAL_SENTENCE;
use infrastructure::binding::VectorStoreBinding;
use infrastructure::vector_store::VectorStore;
use tests::{registry_with, sqlite_url, FailingEmbedder, FakeEmbedder, ScriptedLlm};

fn chunk(text: &str, index: usize) -> DocumentChunk {
    DocumentChunk {
        text: text.to_string(),
        metadata: ChunkMetadata {
            source: "empresas.pdf".to_string(),
            page: Some(0),
            chunk_index: index,
            start_index: index * 50,
        },
    }
}

async fn seeded_store(url: &str) -> VectorStore {
    let store = VectorStore::open(url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 256)).unwrap();
    store
        .add_chunks(&[
            chunk("Alfa Energia faturamento 10 milhoes", 0),
            chunk("Beta Logistica fundada em 1998", 1),
            chunk("Alfa Energia sede em Recife", 2),
        ])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn test_refusal_is_passed_through_unchanged() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&sqlite_url(&dir.path().join("v.sqlite3"))).await;
    let llm = ScriptedLlm::new(REFUSAL_SENTENCE);

    let chain = RagChain::new(store, Box::new(llm));
    let answer = chain.answer("Qual é a capital da França?").await;
    assert_eq!(answer, REFUSAL_SENTENCE);
}

#[tokio::test]
async fn test_prompt_carries_scored_context_and_question() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&sqlite_url(&dir.path().join("v.sqlite3"))).await;
    let llm = ScriptedLlm::new("10 milhoes");
    let prompts = llm.prompts();

    let chain = RagChain::new(store, Box::new(llm)).with_top_k(2);
    assert_eq!(chain.answer("Qual o faturamento da Alfa Energia?").await, "10 milhoes");

    let recorded = prompts.lock().unwrap();
    assert_eq!(recorded.len(), 1);
    let prompt = &recorded[0];
    assert!(prompt.contains("PERGUNTA DO USUÁRIO:\nQual o faturamento da Alfa Energia?"));
    assert_eq!(prompt.matches("[Score: ").count(), 2);
    assert!(!prompt.contains("Beta Logistica"));
    assert!(prompt.contains(REFUSAL_SENTENCE));
}

#[tokio::test]
async fn test_context_scores_are_ascending() {
    let dir = tempfile::tempdir().unwrap();
    let store = seeded_store(&sqlite_url(&dir.path().join("v.sqlite3"))).await;
    let llm = ScriptedLlm::new("ok");
    let prompts = llm.prompts();

    let chain = RagChain::new(store, Box::new(llm));
    chain.answer("Alfa Energia").await;

    let recorded = prompts.lock().unwrap();
    let scores: Vec<f32> = recorded[0]
        .split("[Score: ")
        .skip(1)
        .map(|rest| rest[..rest.find(']').unwrap()].parse().unwrap())
        .collect();
    assert_eq!(scores.len(), 3);
    assert!(scores.windows(2).all(|w| w[0] <= w[1]));
}

#[tokio::test]
async fn test_empty_collection_still_asks_the_model() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(&dir.path().join("v.sqlite3"));
    let store = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 16)).unwrap();
    let llm = ScriptedLlm::new(REFUSAL_SENTENCE);
    let prompts = llm.prompts();

    let chain = RagChain::new(store, Box::new(llm));
    assert_eq!(chain.answer("Alguma coisa?").await, REFUSAL_SENTENCE);
    assert!(!prompts.lock().unwrap()[0].contains("[Score: "));
}

#[tokio::test]
async fn test_upstream_failure_becomes_error_text() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with(&dir.path().join("v.sqlite3"), &[]);
    let store = VectorStoreBinding::new(&registry)
        .open(Provider::OpenAi, Box::new(FailingEmbedder))
        .unwrap();
    let llm = ScriptedLlm::new("unused");
    let prompts = llm.prompts();

    let chain = RagChain::new(store, Box::new(llm));
    let answer = chain.answer("Qual o faturamento?").await;
    assert!(answer.starts_with("Erro ao buscar documentos: "));
    assert!(answer.contains("connection refused"));
    assert!(prompts.lock().unwrap().is_empty());
}

#[test]
fn test_build_without_openai_key_returns_none() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[("GOOGLE_API_KEY", "g-test")]);

    assert!(RagChain::build(&registry, "openai").is_none());
    assert!(!db.exists());
}

#[test]
fn test_build_with_key_binds_provider_collection() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("v.sqlite3");
    let registry = registry_with(&db, &[("GOOGLE_API_KEY", "g-test")]);

    let chain = RagChain::build(&registry, "google").unwrap();
    assert_eq!(chain.collection_name(), "documents_google");
    assert_eq!(chain.provider(), Provider::Google);
}

#[test]
fn test_huggingface_query_falls_back_to_openai() {
    let dir = tempfile::tempdir().unwrap();
    let registry = registry_with(
        &dir.path().join("v.sqlite3"),
        &[("OPENAI_API_KEY", "sk-test")],
    );

    let chain = RagChain::build(&registry, "huggingface").unwrap();
    assert_eq!(chain.collection_name(), "documents_openai");
    assert_eq!(chain.provider(), Provider::OpenAi);
}
