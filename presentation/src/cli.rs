use crate::shell::{banner, ChatShell, SEPARATOR};
use application::ingest_service::IngestService;
use application::rag_service::RagChain;
use clap::Parser;
use colored::Colorize;
use domain::models::ProviderScope;
use infrastructure::config::Config;
use infrastructure::providers::ProviderRegistry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ingest")]
#[command(about = "Ingestão de PDF em banco vetorial com provedores configuráveis.")]
pub struct IngestCli {
    /// Provedor de embedding (sobrepõe EMBEDDING_PROVIDER)
    #[arg(long, value_parser = ["huggingface", "openai", "google"])]
    pub provider: Option<String>,

    /// Documento a ingerir (sobrepõe PDF_PATH)
    #[arg(long)]
    pub path: Option<PathBuf>,
}

#[derive(Parser, Debug)]
#[command(name = "search")]
#[command(about = "Teste de busca com provedores de embedding.")]
pub struct SearchCli {
    /// Provedor de embedding a utilizar (sobrepõe EMBEDDING_PROVIDER)
    #[arg(long, value_parser = ["openai", "google"])]
    pub provider: Option<String>,

    /// Pergunta de teste para executar
    #[arg(long = "pergunta", short = 'q', alias = "question", default_value = "Teste de busca")]
    pub question: String,
}

#[derive(Parser, Debug)]
#[command(name = "chat")]
#[command(about = "Chat com documentos usando múltiplos provedores de embeddings/LLM.")]
pub struct ChatCli {
    /// Provedor a usar nesta sessão (sobrepõe EMBEDDING_PROVIDER)
    #[arg(long, value_parser = ["openai", "google"])]
    pub provider: Option<String>,
}

pub fn print_startup_hints() {
    println!("Certifique-se de que:");
    println!("1. O banco de dados está acessível (DATABASE_URL)");
    println!("2. As variáveis de ambiente estão configuradas (.env)");
    println!("3. Os documentos foram ingeridos (execute ingest primeiro)");
}

/// Returns whether the document was ingested.
pub async fn run_ingest(cli: IngestCli, config: Config) -> bool {
    let requested = config.requested_provider(cli.provider.as_deref(), ProviderScope::Ingestion);
    let path = cli.path.unwrap_or_else(|| config.pdf_path.clone());
    let registry = ProviderRegistry::new(config);

    let ok = IngestService::new(&registry).ingest(&path, &requested).await;
    if ok {
        println!("{}", "PDF ingestion completed successfully!".green());
    } else {
        println!("{}", "PDF ingestion failed!".red());
    }
    ok
}

pub async fn run_search(cli: SearchCli, config: Config) -> bool {
    let requested = config.requested_provider(cli.provider.as_deref(), ProviderScope::Query);
    let registry = ProviderRegistry::new(config);

    match RagChain::build(&registry, &requested) {
        Some(chain) => {
            let answer = chain.answer(&cli.question).await;
            println!("{} {}", "Pergunta:".bold(), cli.question);
            println!("{} {}", "Resposta:".bold(), answer);
            true
        }
        None => {
            println!("{}", "Erro ao criar a cadeia de busca".red());
            print_startup_hints();
            false
        }
    }
}

pub async fn run_chat(cli: ChatCli, config: Config) -> anyhow::Result<bool> {
    println!("{}", banner());
    let requested = config.requested_provider(cli.provider.as_deref(), ProviderScope::Query);
    println!("Provedor selecionado: {requested}");

    let registry = ProviderRegistry::new(config);
    let Some(chain) = RagChain::build(&registry, &requested) else {
        println!(
            "{}",
            "Não foi possível iniciar o chat. Verifique os erros de inicialização.".red()
        );
        print_startup_hints();
        return Ok(false);
    };

    println!("{}", "Chat iniciado com sucesso!".green());
    println!("{SEPARATOR}");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut shell = ChatShell::new(stdin, tokio::io::stdout());
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!("Ctrl-C handler unavailable: {e}");
            std::future::pending::<()>().await;
        }
    };
    shell.run(&chain, interrupt).await?;
    Ok(true)
}
