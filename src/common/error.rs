use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // O Monde recusou as credenciais (ou nem respondeu). Guardamos o status
    // HTTP que ele devolveu como diagnóstico; 0 quando não houve resposta.
    #[error("Credenciais inválidas (Monde respondeu {0})")]
    CredenciaisInvalidas(u16),

    #[error("Token ausente")]
    TokenAusente,

    #[error("Token inválido")]
    TokenInvalido,

    #[error("Sessão não encontrada")]
    SessaoNaoEncontrada,

    #[error("Sessão expirada")]
    SessaoExpirada,

    #[error("Empresa não encontrada")]
    EmpresaNaoEncontrada,

    #[error("Plano não encontrado")]
    PlanoNaoEncontrado,

    // Falha em uma chamada de recurso do Monde: o status passa adiante
    // exatamente como veio, junto com o corpo quando ele era JSON.
    #[error("Monde devolveu status {status}")]
    Upstream { status: StatusCode, corpo: Value },

    // Falha de rede/timeout antes de qualquer resposta do Monde.
    #[error("Falha ao contatar o Monde: {0}")]
    MondeIndisponivel(#[from] reqwest::Error),

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            // 401 com o status do Monde como diagnóstico no corpo.
            AppError::CredenciaisInvalidas(status_monde) => {
                let body = Json(json!({
                    "error": "E-mail ou senha inválidos.",
                    "status_monde": status_monde,
                }));
                return (StatusCode::UNAUTHORIZED, body).into_response();
            }

            // Repassa o status e o corpo do Monde sem retocar nada.
            AppError::Upstream { status, corpo } => {
                let body = Json(json!({
                    "error": "Erro na API do Monde.",
                    "monde": corpo,
                }));
                return (status, body).into_response();
            }

            AppError::TokenAusente => (StatusCode::UNAUTHORIZED, "Token de autenticação ausente."),
            AppError::TokenInvalido => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido."),
            AppError::SessaoNaoEncontrada => (StatusCode::UNAUTHORIZED, "Sessão não encontrada. Faça login novamente."),
            AppError::SessaoExpirada => (StatusCode::UNAUTHORIZED, "Sessão expirada. Faça login novamente."),
            AppError::EmpresaNaoEncontrada => (StatusCode::NOT_FOUND, "Empresa não encontrada."),
            AppError::PlanoNaoEncontrado => (StatusCode::NOT_FOUND, "Plano não encontrado."),

            AppError::MondeIndisponivel(ref e) => {
                tracing::error!("Falha ao contatar o Monde: {}", e);
                (StatusCode::BAD_GATEWAY, "Não foi possível contatar o servidor Monde. Tente novamente.")
            }

            // Todos os outros erros (DatabaseError, JwtError, InternalServerError)
            // viram 500. O `tracing` loga o detalhe; o cliente recebe só a
            // mensagem genérica.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
