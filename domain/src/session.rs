/// Tokens that end the chat, matched case-insensitively after trimming.
pub const EXIT_TOKENS: [&str; 4] = ["sair", "exit", "quit", "q"];
pub const HELP_TOKENS: [&str; 3] = ["ajuda", "help", "h"];

/// One line of shell input, classified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Exit,
    Help,
    Blank,
    Ask(String),
}

impl ShellCommand {
    pub fn parse(line: &str) -> Self {
        let input = line.trim();
        let lowered = input.to_lowercase();
        if EXIT_TOKENS.contains(&lowered.as_str()) {
            ShellCommand::Exit
        } else if HELP_TOKENS.contains(&lowered.as_str()) {
            ShellCommand::Help
        } else if input.is_empty() {
            ShellCommand::Blank
        } else {
            ShellCommand::Ask(input.to_string())
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellState {
    Idle,
    AwaitingInput,
    Processing,
    Terminated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellEvent {
    Start,
    Input(ShellCommand),
    Interrupt,
    EndOfInput,
    /// A question finished, whether it produced an answer or an error.
    TurnComplete,
}

impl ShellState {
    /// Processing always returns to AwaitingInput; only input-side events
    /// (exit token, interrupt, EOF) terminate.
    pub fn next(self, event: &ShellEvent) -> ShellState {
        use ShellState::*;
        match (self, event) {
            (Terminated, _) => Terminated,
            (Idle, ShellEvent::Start) => AwaitingInput,
            (AwaitingInput, ShellEvent::Input(ShellCommand::Exit))
            | (AwaitingInput, ShellEvent::Interrupt)
            | (AwaitingInput, ShellEvent::EndOfInput) => Terminated,
            (AwaitingInput, ShellEvent::Input(ShellCommand::Ask(_))) => Processing,
            (AwaitingInput, ShellEvent::Input(_)) => AwaitingInput,
            (Processing, ShellEvent::TurnComplete) => AwaitingInput,
            (state, _) => state,
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, ShellState::Terminated)
    }
}
