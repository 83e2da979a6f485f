//! Grounded prompt assembly.
//!
//! The wording below is a compatibility surface: models are steered by it,
//! so changing a single line changes answering behaviour.

use crate::models::ScoredChunk;

/// Emitted verbatim by the model when the context does not hold the answer.
pub const REFUSAL_SENTENCE: &str = "Não tenho informações necessárias para responder sua pergunta.";

/// Render retrieval results in the order the store returned them, each
/// tagged with its score to four decimal places, separated by a blank line.
pub fn format_context(results: &[ScoredChunk]) -> String {
    results
        .iter()
        .map(|r| format!("[Score: {:.4}]\n{}", r.score, r.chunk.text))
        .collect::<Vec<_>>()
        .join("\n\n")
}

pub fn build_prompt(context: &str, question: &str) -> String {
    format!(
        r#"
CONTEXTO:
{context}

REGRAS:
- Responda somente com base no CONTEXTO.
- Se a informação não estiver explicitamente no CONTEXTO, responda:
  "{refusal}"
- Nunca invente ou use conhecimento externo.
- Nunca produza opiniões ou interpretações além do que está escrito.

EXEMPLOS DE PERGUNTAS FORA DO CONTEXTO:
Pergunta: "Qual é a capital da França?"
Resposta: "{refusal}"

Pergunta: "Quantos clientes temos em 2024?"
Resposta: "{refusal}"

Pergunta: "Você acha isso bom ou ruim?"
Resposta: "{refusal}"

PERGUNTA DO USUÁRIO:
{question}

RESPONDA A "PERGUNTA DO USUÁRIO"
"#,
        refusal = REFUSAL_SENTENCE,
    )
}
