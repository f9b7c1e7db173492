use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use medinv_core::error::CoreError;
use serde_json::json;

/// Message returned when a protected route is called without a session.
pub const UNAUTHORIZED_MESSAGE: &str = "No autorizado";

/// Application-level error type for proxy handlers.
///
/// Every variant renders as `{ "message": ... }`, the shape the console
/// surfaces in its toasts.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `medinv_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// No session cookie on a protected route.
    #[error("Missing session")]
    Unauthorized,

    /// The backend answered with a non-success status.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    /// The backend could not be reached.
    #[error("Upstream request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// The request body exceeds the configured limit.
    #[error("Payload too large")]
    PayloadTooLarge,

    /// The request is well formed but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            // --- CoreError variants ---
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => (
                    StatusCode::NOT_FOUND,
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, msg),
                CoreError::Conflict(msg) => (StatusCode::CONFLICT, msg),
                CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
                CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        default_message(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
                    )
                }
            },

            // --- Session ---
            AppError::Unauthorized => (StatusCode::UNAUTHORIZED, UNAUTHORIZED_MESSAGE.to_string()),

            // --- Upstream ---
            AppError::Upstream { status, message } => (status, message),
            AppError::Network(err) => {
                tracing::warn!(error = %err, "Backend unreachable");
                if err.is_timeout() {
                    (
                        StatusCode::GATEWAY_TIMEOUT,
                        "Tiempo de espera agotado".to_string(),
                    )
                } else {
                    (
                        StatusCode::BAD_GATEWAY,
                        "Error de conexión con el servidor".to_string(),
                    )
                }
            }

            // --- HTTP-specific errors ---
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                default_message(StatusCode::PAYLOAD_TOO_LARGE).to_string(),
            ),
            AppError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    default_message(StatusCode::INTERNAL_SERVER_ERROR).to_string(),
                )
            }
        };

        (status, axum::Json(json!({ "message": message }))).into_response()
    }
}

/// Fallback message for an upstream status whose body carried none.
pub fn default_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        400 => "Solicitud inválida",
        401 => UNAUTHORIZED_MESSAGE,
        403 => "Acceso denegado",
        404 => "Recurso no encontrado",
        409 => "Conflicto con el estado actual del recurso",
        413 => "Archivo demasiado grande",
        500..=599 => "Error interno del servidor",
        _ => "Error en la solicitud",
    }
}
