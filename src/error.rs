//! Error types for the ScholarHub client

use serde::Deserialize;
use thiserror::Error;

/// Error payload as the backend returns it.
///
/// Kept verbatim so callers can surface the message and any structured
/// blocking-reference list without reformulating them.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackendErrorBody {
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Loans blocking a delete, echoed untouched.
    #[serde(default)]
    pub prestamos_blocking: Vec<BlockingLoan>,
}

/// One loan reference inside a blocked-delete error payload
#[derive(Debug, Clone, Deserialize)]
pub struct BlockingLoan {
    #[serde(alias = "id")]
    pub id_prestamo: Option<i64>,
    #[serde(alias = "usuario_id")]
    pub id_usuario: Option<i64>,
}

impl BackendErrorBody {
    /// The human-readable message, preferring `error` over `message`
    pub fn display_message(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Main client error type
#[derive(Error, Debug)]
pub enum Error {
    #[error("authentication required: {0}")]
    Authentication(String),

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("validation error: {0}")]
    Validation(String),

    #[error("transition {from} -> {to} is not allowed")]
    InvalidTransition { from: String, to: String },

    /// Backend rejected the request; the payload is carried verbatim
    #[error("backend rejected request ({status}): {message}")]
    Backend {
        status: u16,
        message: String,
        body: BackendErrorBody,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Payload made it through deserialization but is not usable
    /// (missing id, unknown enum label, absent token)
    #[error("unexpected payload shape: {0}")]
    Shape(String),

    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

impl From<validator::ValidationErrors> for Error {
    fn from(errors: validator::ValidationErrors) -> Self {
        Error::Validation(errors.to_string())
    }
}

impl Error {
    /// Loans reported by the backend as blocking the failed operation
    pub fn blocking_loans(&self) -> &[BlockingLoan] {
        match self {
            Error::Backend { body, .. } => &body.prestamos_blocking,
            _ => &[],
        }
    }
}

/// Result type alias for client operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_blocked_delete_payload() {
        let json = r#"{
            "error": "El recurso tiene préstamos activos",
            "prestamos_blocking": [
                {"id_prestamo": 4, "id_usuario": 9},
                {"id": 7, "usuario_id": 2}
            ]
        }"#;
        let body: BackendErrorBody = serde_json::from_str(json).unwrap();
        assert_eq!(
            body.display_message(),
            Some("El recurso tiene préstamos activos")
        );
        assert_eq!(body.prestamos_blocking.len(), 2);
        assert_eq!(body.prestamos_blocking[0].id_prestamo, Some(4));
        assert_eq!(body.prestamos_blocking[1].id_prestamo, Some(7));
        assert_eq!(body.prestamos_blocking[1].id_usuario, Some(2));
    }

    #[test]
    fn message_falls_back_to_message_field() {
        let body: BackendErrorBody =
            serde_json::from_str(r#"{"message": "algo salió mal"}"#).unwrap();
        assert_eq!(body.display_message(), Some("algo salió mal"));
    }
}
