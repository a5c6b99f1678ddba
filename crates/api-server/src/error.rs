use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use domain::DomainError;
use tracing::error;

pub const RENTAL_NOT_FOUND: &str = "Locação não encontrada na base de Dados.";
pub const USER_NOT_FOUND: &str = "Usuário não encontrado para o Id informado.";
pub const SEARCH_USER_NOT_FOUND: &str =
    "Não foi possível realizar a consulta. Usuário não encontrado para o Id informado.";
pub const INVALID_STATUS: &str =
    "Não foi possível atualizar o status da locação, envie um status válido.";

/// Failure of a request handler, rendered as a plain-text body.
#[derive(Debug, PartialEq)]
pub enum ApiError {
    /// 400 with the message as body.
    BadRequest(String),
    /// 404 with an empty body.
    NotFound,
    Internal(String),
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        match error {
            DomainError::ValidationError(message) => ApiError::BadRequest(message),
            DomainError::NotFound(_) => ApiError::NotFound,
            DomainError::RepositoryError(message) => ApiError::Internal(message),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message).into_response(),
            ApiError::NotFound => StatusCode::NOT_FOUND.into_response(),
            ApiError::Internal(message) => {
                error!("Request failed: {}", message);
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
            }
        }
    }
}
