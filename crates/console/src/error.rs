use medinv_core::error::CoreError;
use reqwest::StatusCode;

/// Failure of a console action.
///
/// Every action is terminal on error: nothing is retried. The variant decides
/// how the failure is surfaced (see [`ConsoleError::toast_message`]).
#[derive(Debug, thiserror::Error)]
pub enum ConsoleError {
    /// The session is missing or was rejected; the console goes to `/login`.
    #[error("Session rejected")]
    Unauthorized,

    /// Input rejected locally or by the backend (400).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// Any other non-success status from the proxy.
    #[error("Upstream error ({status}): {message}")]
    Upstream { status: StatusCode, message: String },

    /// The proxy could not be reached or the body could not be read.
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),

    /// Another mutation of the same manager is still in flight.
    #[error("Another operation is in progress")]
    Busy,

    #[error(transparent)]
    Core(CoreError),
}

pub type ConsoleResult<T> = Result<T, ConsoleError>;

impl From<CoreError> for ConsoleError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(msg) => ConsoleError::Validation(msg),
            CoreError::Unauthorized(_) => ConsoleError::Unauthorized,
            other => ConsoleError::Core(other),
        }
    }
}

impl ConsoleError {
    /// Text of the error toast for this failure.
    pub fn toast_message(&self) -> String {
        match self {
            ConsoleError::Unauthorized => {
                "Tu sesión expiró, inicia sesión nuevamente".to_string()
            }
            ConsoleError::Validation(msg) => msg.clone(),
            ConsoleError::Upstream { status, .. } if status.is_server_error() => {
                "Error del servidor, intenta nuevamente".to_string()
            }
            ConsoleError::Upstream { message, .. } => message.clone(),
            ConsoleError::Network(_) => "Error de conexión con el servidor".to_string(),
            ConsoleError::Busy => "Hay una operación en curso".to_string(),
            ConsoleError::Core(err) => err.to_string(),
        }
    }

    /// Whether the console should send the user back to the login page.
    pub fn requires_login(&self) -> bool {
        matches!(self, ConsoleError::Unauthorized)
    }
}
