use colored::Colorize;
use domain::ports::QuestionAnswerer;
use domain::session::{ShellCommand, ShellEvent, ShellState};
use std::future::Future;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};

pub const SEPARATOR: &str = "----------------------------------------";

pub fn banner() -> String {
    format!(
        "{}\nDigite 'sair' para encerrar o chat\nDigite 'ajuda' para ver instruções\n{SEPARATOR}",
        "=== Chat com Documentos ===".bold()
    )
}

pub fn help_text() -> String {
    format!(
        "\n{}\n\
         Este chat responde perguntas baseadas nos documentos ingeridos.\n\
         \nComandos especiais:\n\
         - 'sair', 'exit', 'quit', 'q': Encerrar o chat\n\
         - 'ajuda', 'help', 'h': Mostrar esta ajuda\n\
         \nDicas:\n\
         - Faça perguntas específicas sobre o conteúdo dos documentos\n\
         - Mude de provedor usando: chat --provider openai|google\n\
         - O assistente só responde com base no conteúdo ingerido\n\
         - Se a informação não estiver nos documentos, será informado\n\
         {SEPARATOR}",
        "=== AJUDA ===".bold()
    )
}

/// Read-answer loop over any line source and sink.
pub struct ChatShell<R, W> {
    lines: Lines<R>,
    out: W,
    state: ShellState,
}

impl<R, W> ChatShell<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(reader: R, out: W) -> Self {
        Self {
            lines: reader.lines(),
            out,
            state: ShellState::Idle,
        }
    }

    pub fn state(&self) -> ShellState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Runs until an exit token, end of input or `interrupt` resolves.
    /// A failed turn is reported and the loop keeps going.
    pub async fn run<A, I>(&mut self, answerer: &A, interrupt: I) -> std::io::Result<ShellState>
    where
        A: QuestionAnswerer + ?Sized,
        I: Future<Output = ()>,
    {
        tokio::pin!(interrupt);
        self.state = self.state.next(&ShellEvent::Start);

        while !self.state.is_terminated() {
            self.write(&format!("\n{}", "Você: ".cyan().bold())).await?;
            let event = tokio::select! {
                line = self.lines.next_line() => match line {
                    Ok(Some(line)) => ShellEvent::Input(ShellCommand::parse(&line)),
                    Ok(None) => ShellEvent::EndOfInput,
                    Err(e) => {
                        tracing::error!("Failed to read input: {e}");
                        ShellEvent::EndOfInput
                    }
                },
                _ = &mut interrupt => ShellEvent::Interrupt,
            };
            self.state = self.state.next(&event);

            match event {
                ShellEvent::Input(ShellCommand::Help) => {
                    self.writeln(&help_text()).await?;
                }
                ShellEvent::Input(ShellCommand::Ask(question)) => {
                    if let Err(e) = self.turn(answerer, &question).await {
                        tracing::error!("Turn failed: {e}");
                        self.writeln(&format!(
                            "\n{} {e}\nTente novamente ou digite 'sair' para encerrar.",
                            "Erro:".red().bold()
                        ))
                        .await?;
                    }
                    self.state = self.state.next(&ShellEvent::TurnComplete);
                }
                ShellEvent::Input(ShellCommand::Exit) => {
                    self.writeln("Encerrando chat...").await?;
                }
                ShellEvent::Interrupt | ShellEvent::EndOfInput => {
                    self.writeln("\n\nEncerrando chat...").await?;
                }
                _ => {}
            }
        }

        Ok(self.state)
    }

    async fn turn<A>(&mut self, answerer: &A, question: &str) -> std::io::Result<()>
    where
        A: QuestionAnswerer + ?Sized,
    {
        self.writeln("Processando...").await?;
        let answer = answerer.answer(question).await;
        self.writeln(&format!("\n{} {answer}", "Assistente:".green().bold()))
            .await
    }

    async fn write(&mut self, text: &str) -> std::io::Result<()> {
        self.out.write_all(text.as_bytes()).await?;
        self.out.flush().await
    }

    async fn writeln(&mut self, text: &str) -> std::io::Result<()> {
        self.write(&format!("{text}\n")).await
    }
}
