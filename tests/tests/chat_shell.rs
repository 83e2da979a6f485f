use application::rag_service::RagChain;
use domain::models::{ChunkMetadata, DocumentChunk, Provider};
use domain::prompt::REFUSAL_SENTENCE;
use domain::session::ShellState;
use infrastructure::vector_store::VectorStore;
use presentation::shell::ChatShell;
use tests::{sqlite_url, FakeEmbedder, ScriptedLlm};

#[tokio::test]
async fn test_session_answers_until_exit() {
    let dir = tempfile::tempdir().unwrap();
    let url = sqlite_url(&dir.path().join("v.sqlite3"));
    let store = VectorStore::open(&url, "documents_openai", FakeEmbedder::boxed(Provider::OpenAi, 32)).unwrap();
    store
        .add_chunks(&[DocumentChunk {
            text: "Gama SA faturou 3 milhoes".to_string(),
            metadata: ChunkMetadata {
                source: "gama.txt".to_string(),
                page: Some(0),
                chunk_index: 0,
                start_index: 0,
            },
        }])
        .await
        .unwrap();
    let llm = ScriptedLlm::new(REFUSAL_SENTENCE);
    let prompts = llm.prompts();
    let chain = RagChain::new(store, Box::new(llm));

    let input = "help\n\nQuanto a Gama faturou?\nQual a cor do ceu?\nsair\nignorada\n";
    let mut shell = ChatShell::new(input.as_bytes(), Vec::new());
    let state = shell.run(&chain, std::future::pending::<()>()).await.unwrap();
    assert_eq!(state, ShellState::Terminated);

    let output = String::from_utf8(shell.into_output()).unwrap();
    assert_eq!(output.matches("Processando...").count(), 2);
    assert_eq!(output.matches(REFUSAL_SENTENCE).count(), 2);
    assert!(output.contains("=== AJUDA ==="));
    assert_eq!(prompts.lock().unwrap().len(), 2);
    assert!(prompts.lock().unwrap()[0].contains("Gama SA faturou 3 milhoes"));
}
