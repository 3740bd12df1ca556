use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// As mensagens enviadas ao cliente ficam no `into_response`; aqui é o que
// aparece nos logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Validações feitas à mão (ex: schema de campos), fora do derive.
    #[error("Payload inválido: {0}")]
    InvalidPayload(String),

    #[error("Token ausente ou inválido")]
    Unauthorized,

    #[error("Papel insuficiente para esta rota")]
    Forbidden,

    #[error("Lead não encontrado")]
    LeadNotFound,

    #[error("Setup já concluído")]
    AlreadyInitialized,

    // Falha na chamada ao provedor de identidade. A mensagem do provedor
    // é repassada ao cliente como veio.
    #[error("Erro do provedor de identidade: {0}")]
    Upstream(String),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de serialização")]
    SerializationError(#[from] serde_json::Error),

    // Variante genérica para qualquer outro erro inesperado.
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
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "One or more fields are invalid",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::InvalidPayload(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::Upstream(message) => {
                let body = Json(json!({ "error": message }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, "Unauthorized"),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Forbidden"),
            AppError::LeadNotFound => (StatusCode::NOT_FOUND, "Lead not found"),
            AppError::AlreadyInitialized => (StatusCode::BAD_REQUEST, "Setup already complete"),

            // Todos os outros erros (DatabaseError, SerializationError,
            // InternalServerError) viram 500. O detalhe fica só no log.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
