use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// API-specific errors
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not logged in")]
    NotAuthenticated,

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Server error: {0}")]
    ServerError(String),

    /// 2xx response whose body reports `success: false`
    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

/// Pull a human readable message out of an error body
pub fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(parsed) => parsed
            .error
            .or(parsed.detail)
            .or(parsed.message)
            .unwrap_or_else(|| body.trim().to_string()),
        Err(_) => body.trim().to_string(),
    }
}

impl ApiError {
    pub fn from_status(status: StatusCode, message: String) -> Self {
        let msg = if message.is_empty() {
            status.canonical_reason().unwrap_or("Unknown error").to_string()
        } else {
            message
        };

        match status {
            StatusCode::UNAUTHORIZED => ApiError::Unauthorized(msg),
            StatusCode::FORBIDDEN => ApiError::Unauthorized(msg),
            StatusCode::NOT_FOUND => ApiError::NotFound(msg),
            StatusCode::BAD_REQUEST => ApiError::BadRequest(msg),
            status if status.is_server_error() => ApiError::ServerError(msg),
            status if status.is_client_error() => ApiError::BadRequest(msg),
            _ => ApiError::Unknown(msg),
        }
    }

    /// Server and transport failures are worth retrying; client errors are not
    pub fn is_transient(&self) -> bool {
        matches!(self, ApiError::ServerError(_) | ApiError::Unknown(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_prefers_error_field() {
        assert_eq!(error_message(r#"{"error": "Plan not found"}"#), "Plan not found");
        assert_eq!(error_message(r#"{"detail": "Invalid token"}"#), "Invalid token");
        assert_eq!(error_message("Bad Gateway\n"), "Bad Gateway");
    }

    #[test]
    fn test_empty_message_uses_reason() {
        let error = ApiError::from_status(StatusCode::NOT_FOUND, String::new());
        assert_eq!(error.to_string(), "Resource not found: Not Found");
    }
}
