use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro central, com `thiserror` para melhor ergonomia.
// Cada variante sabe virar uma resposta HTTP em `into_response`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Username já existe")]
    UsernameAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Acesso negado")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Negócio não encontrado")]
    DealNotFound,

    #[error("Pagamento não encontrado")]
    PaymentNotFound,

    #[error("Parte não encontrada")]
    PartyNotFound,

    #[error("Requisição inválida: {0}")]
    BadRequest(String),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::UsernameAlreadyExists => {
                (StatusCode::CONFLICT, "Username already exists.".to_string())
            }
            AppError::InvalidCredentials => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials.".to_string())
            }
            // 401 de autenticação tem mensagem própria: o front precisa
            // distinguir "faça login" de uma falha genérica de gravação.
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                "Authentication required. Invalid or missing token.".to_string(),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "You do not have permission to perform this action.".to_string(),
            ),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "User not found.".to_string()),
            AppError::DealNotFound => (StatusCode::NOT_FOUND, "Deal not found.".to_string()),
            AppError::PaymentNotFound => {
                (StatusCode::NOT_FOUND, "Payment not found.".to_string())
            }
            AppError::PartyNotFound => (StatusCode::NOT_FOUND, "Party not found.".to_string()),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),

            // Todos os outros erros (DatabaseError, InternalServerError...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente recebe algo genérico.
            ref e => {
                tracing::error!("Erro interno do servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An unexpected error occurred.".to_string(),
                )
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
